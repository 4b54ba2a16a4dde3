// src/api/handlers.rs

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::logging::resolve_log::ResolveLog;
use crate::model::ads::{AdPatch, AdRecord};
use crate::model::context::ResolveContext;
use crate::model::policy::{PagePolicy, PagePolicyPatch, DEFAULT_PAGE};
use crate::placement::resolver::Placements;
use crate::AppState;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    pub page: String,
    pub user_type: String,
    /// RFC 3339. Omitted means "server clock"; anything unparseable
    /// falls back to the server clock with a warning rather than a 400.
    #[serde(default)]
    pub now: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub request_id: String,
    #[serde(flatten)]
    pub placements: Placements,
}

/// Resolve the ad placements for one page view. 204 when every slot
/// comes back empty, mirroring a no-fill response.
pub async fn handle_resolve_request(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResolveRequest>,
) -> (StatusCode, Json<ResolveResponse>) {
    let request_id = request
        .request_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let now = match request.now.as_deref() {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => ts,
            Err(_) => {
                state
                    .runtime_logger
                    .log(
                        "WARN",
                        &format!("unparseable now value {:?}, using server clock", raw),
                    )
                    .await;
                Utc::now().fixed_offset()
            }
        },
        None => Utc::now().fixed_offset(),
    };

    let ctx = ResolveContext {
        page: request.page,
        user_type: request.user_type,
        now,
    };

    let (placements, considered, dismissed) = {
        let dismissals = state.dismissals.read().unwrap();
        let ads = state.config.list_ads();
        let dismissed = ads
            .iter()
            .filter(|ad| dismissals.is_dismissed(&ad.id))
            .count();
        let placements = state.config.resolve(&dismissals, &ctx);
        (placements, ads.len(), dismissed)
    };

    let mut log = ResolveLog::new(&request_id, &ctx.page, &ctx.user_type);
    log.record_counts(considered, dismissed);
    log.record_slots(&placements);
    state
        .runtime_logger
        .log("INFO", &serde_json::to_string(&log).unwrap_or_default())
        .await;

    let status = if placements.is_empty() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    };
    (status, Json(ResolveResponse { request_id, placements }))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DismissRequest {
    pub ad_id: String,
    #[serde(default)]
    pub permanent: bool,
}

/// Record a dismissal. 404 for unknown ids, 422 for ads that are not
/// dismissible.
pub async fn handle_dismiss(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DismissRequest>,
) -> StatusCode {
    let Some(ad) = state.config.get_ad(&request.ad_id) else {
        state
            .runtime_logger
            .log("WARN", &format!("dismiss for unknown ad id {}", request.ad_id))
            .await;
        return StatusCode::NOT_FOUND;
    };

    let result = {
        let mut dismissals = state.dismissals.write().unwrap();
        dismissals.dismiss(&ad, request.permanent)
    };

    match result {
        Ok(()) => {
            state
                .runtime_logger
                .log(
                    "INFO",
                    &format!(
                        "ad {} dismissed (permanent: {})",
                        request.ad_id, request.permanent
                    ),
                )
                .await;
            StatusCode::NO_CONTENT
        }
        Err(e) => {
            state.runtime_logger.log("WARN", &e.to_string()).await;
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

/// Administrative reset of both dismissal sets.
pub async fn handle_clear_dismissals(State(state): State<Arc<AppState>>) -> StatusCode {
    {
        let mut dismissals = state.dismissals.write().unwrap();
        dismissals.clear_all();
    }
    state
        .runtime_logger
        .log("INFO", "dismissal state cleared")
        .await;
    StatusCode::NO_CONTENT
}

pub async fn handle_list_ads(State(state): State<Arc<AppState>>) -> Json<Vec<AdRecord>> {
    Json(state.config.list_ads())
}

pub async fn handle_add_ad(
    State(state): State<Arc<AppState>>,
    Json(record): Json<AdRecord>,
) -> (StatusCode, Json<Value>) {
    let id = record.id.clone();
    match state.config.add_ad(record) {
        Ok(()) => {
            state
                .runtime_logger
                .log("INFO", &format!("ad {} added to catalog", id))
                .await;
            (StatusCode::CREATED, Json(json!({ "id": id })))
        }
        Err(e) => {
            state.runtime_logger.log("WARN", &e.to_string()).await;
            (StatusCode::CONFLICT, Json(json!({ "error": e.to_string() })))
        }
    }
}

pub async fn handle_update_ad(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<AdPatch>,
) -> (StatusCode, Json<Value>) {
    match state.config.update_ad(&id, patch) {
        Ok(()) => {
            state
                .runtime_logger
                .log("INFO", &format!("ad {} updated", id))
                .await;
            (StatusCode::OK, Json(json!({ "id": id })))
        }
        Err(e) => {
            state.runtime_logger.log("WARN", &e.to_string()).await;
            (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() })))
        }
    }
}

pub async fn handle_remove_ad(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    state.config.remove_ad(&id);
    state
        .runtime_logger
        .log("INFO", &format!("ad {} removed from catalog", id))
        .await;
    StatusCode::NO_CONTENT
}

#[derive(Deserialize, Debug)]
pub struct PolicyQuery {
    #[serde(default = "default_page")]
    pub page: String,
}

fn default_page() -> String {
    DEFAULT_PAGE.to_string()
}

pub async fn handle_get_policy(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PolicyQuery>,
) -> Json<PagePolicy> {
    Json(state.config.get_policy(&query.page))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpdateRequest {
    pub page: String,
    #[serde(flatten)]
    pub patch: PagePolicyPatch,
}

pub async fn handle_update_policy(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PolicyUpdateRequest>,
) -> Json<PagePolicy> {
    let updated = state.config.update_policy(&request.page, request.patch);
    state
        .runtime_logger
        .log("INFO", &format!("policy for {} updated", request.page))
        .await;
    Json(updated)
}
