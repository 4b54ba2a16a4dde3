// src/main.rs

use axum::routing::{get, post};
use axum::{serve, Router};
use clap::Parser;
use std::sync::{Arc, RwLock};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

mod api;
mod config;
mod error;
mod logging;
mod model;
mod placement;

use api::handlers::{
    handle_add_ad, handle_clear_dismissals, handle_dismiss, handle_get_policy, handle_list_ads,
    handle_remove_ad, handle_resolve_request, handle_update_ad, handle_update_policy,
};
use config::ConfigManager;
use logging::runtime_logger::RuntimeLogger;
use model::adapters::{ConfigAdapter, FileConfigAdapter};
use model::ads;
use model::catalog::AdCatalog;
use model::policy::PagePolicyTable;
use placement::dismissal::{
    DismissalRepository, DismissalStore, FileDismissalRepository, MemoryDismissalRepository,
};

pub struct AppState {
    pub runtime_logger: Arc<RuntimeLogger>,
    pub config: Arc<ConfigManager>,
    pub dismissals: RwLock<DismissalStore>,
}

#[derive(Parser, Debug)]
#[command(version = "1.0", about = "A rule-based ad placement server")]
struct CliArgs {
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
    #[arg(long, default_value = "logs")]
    log_dir: String,
    #[arg(long, default_value = "static/ads.json")]
    ads_file: String,
    #[arg(long, default_value = "static/page_policies.json")]
    policies_file: String,
    #[arg(long, default_value = "static/dismissals.json")]
    dismissals_file: String,
    /// Run with a randomly generated catalog and in-memory dismissals.
    #[arg(long, default_value_t = false)]
    demo: bool,
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let log_file = rolling::hourly(&args.log_dir, "adserve_log.json");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);
    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json().with_writer(non_blocking));
    tracing::subscriber::set_global_default(subscriber)
        .expect("Unable to set global tracing subscriber");
    info!("ad placement server starting on port {}", args.port);

    let runtime_logger = RuntimeLogger::new(&args.log_dir, "runtime", 1000, 100, 1000);
    runtime_logger
        .log("INFO", "ad placement server is starting...")
        .await;

    let (catalog, policies) = if args.demo {
        (ads::init(), PagePolicyTable::new())
    } else {
        let adapter = FileConfigAdapter::new(&args.ads_file, &args.policies_file);
        let catalog = AdCatalog::from_records(adapter.get_ads())
            .expect("duplicate ad ids in the ads file");
        let policies = PagePolicyTable::from_entries(adapter.get_page_policies());
        (catalog, policies)
    };
    runtime_logger
        .log(
            "INFO",
            &format!(
                "loaded {} ads and {} page policies",
                catalog.len(),
                policies.len()
            ),
        )
        .await;

    let repository: Arc<dyn DismissalRepository> = if args.demo {
        Arc::new(MemoryDismissalRepository::default())
    } else {
        Arc::new(FileDismissalRepository::new(&args.dismissals_file))
    };
    let dismissals = DismissalStore::new(repository);

    let config = Arc::new(ConfigManager::new(catalog, policies));
    let state = Arc::new(AppState {
        runtime_logger: runtime_logger.clone(),
        config,
        dismissals: RwLock::new(dismissals),
    });

    let app = Router::new()
        .route("/resolve", post(handle_resolve_request))
        .route("/dismiss", post(handle_dismiss))
        .route("/dismissals/clear", post(handle_clear_dismissals))
        .route("/ads", get(handle_list_ads).post(handle_add_ad))
        .route("/ads/{id}", axum::routing::patch(handle_update_ad).delete(handle_remove_ad))
        .route(
            "/policy",
            get(handle_get_policy).patch(handle_update_policy),
        )
        .with_state(state);

    let addr = format!("0.0.0.0:{}", args.port);
    runtime_logger
        .log("INFO", &format!("ad placement server running at http://{}", addr))
        .await;
    let listener = TcpListener::bind(&addr).await.unwrap();
    serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
        })
        .await
        .unwrap();

    runtime_logger
        .log("INFO", "ad placement server shutting down")
        .await;
    runtime_logger.shutdown().await;
}
