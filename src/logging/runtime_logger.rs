// src/logging/runtime_logger.rs

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task;
use tokio::time::{self, Duration};
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::fmt::MakeWriter;

const LEVELS: [&str; 3] = ["INFO", "WARN", "ERROR"];

struct LogEntry {
    level: String,
    content: String,
}

/// Runtime log sink. Entries fan out to one hourly-rolling file per
/// level and are flushed in batches from a background task. A second
/// background task deletes files older than the retention window.
pub struct RuntimeLogger {
    sender: Sender<LogEntry>,
}

impl RuntimeLogger {
    /// `flush_interval_ms` bounds how long an entry can sit in a
    /// buffer before reaching disk even when traffic is low.
    pub fn new(
        log_dir: &str,
        file_prefix: &str,
        buffer_size: usize,
        batch_size: usize,
        flush_interval_ms: u64,
    ) -> Arc<Self> {
        let (sender, receiver) = mpsc::channel(buffer_size);

        let mut appenders = HashMap::new();
        for level in LEVELS {
            let file_name = format!("{}_{}.json", file_prefix, level.to_lowercase());
            appenders.insert(level.to_string(), Arc::new(rolling::hourly(log_dir, file_name)));
        }

        tokio::spawn(Self::background_writer(
            appenders,
            receiver,
            batch_size,
            flush_interval_ms,
        ));

        {
            let log_dir = log_dir.to_string();
            tokio::spawn(async move {
                let retention_hours = 72;
                loop {
                    Self::cleanup_old_logs(&log_dir, retention_hours).await;
                    time::sleep(Duration::from_secs(3600)).await;
                }
            });
        }

        Arc::new(Self { sender })
    }

    pub async fn log(&self, level: &str, message: &str) {
        let entry = LogEntry {
            level: level.to_string(),
            content: json!({
                "timestamp": Utc::now().to_rfc3339(),
                "level": level,
                "message": message,
            })
            .to_string(),
        };
        if let Err(e) = self.sender.send(entry).await {
            eprintln!("failed to queue runtime log entry: {}", e);
        }
    }

    async fn background_writer(
        appenders: HashMap<String, Arc<RollingFileAppender>>,
        mut receiver: Receiver<LogEntry>,
        batch_size: usize,
        flush_interval_ms: u64,
    ) {
        let mut buffers: HashMap<String, Vec<String>> = appenders
            .keys()
            .map(|level| (level.clone(), Vec::new()))
            .collect();
        let mut interval = time::interval(Duration::from_millis(flush_interval_ms));

        loop {
            tokio::select! {
                entry = receiver.recv() => {
                    let Some(entry) = entry else { break };
                    // unknown levels land in the ERROR file rather than getting lost
                    let level = if appenders.contains_key(&entry.level) {
                        entry.level
                    } else {
                        "ERROR".to_string()
                    };
                    let buffer = buffers.entry(level.clone()).or_default();
                    buffer.push(entry.content);
                    if buffer.len() >= batch_size {
                        if let Some(appender) = appenders.get(&level) {
                            Self::flush(appender.clone(), buffer).await;
                        }
                    }
                }
                _ = interval.tick() => {
                    for (level, buffer) in buffers.iter_mut() {
                        if buffer.is_empty() {
                            continue;
                        }
                        if let Some(appender) = appenders.get(level) {
                            Self::flush(appender.clone(), buffer).await;
                        }
                    }
                }
            }
        }

        // sender dropped: drain what is left
        for (level, buffer) in buffers.iter_mut() {
            if buffer.is_empty() {
                continue;
            }
            if let Some(appender) = appenders.get(level) {
                Self::flush(appender.clone(), buffer).await;
            }
        }
    }

    async fn flush(appender: Arc<RollingFileAppender>, buffer: &mut Vec<String>) {
        let content = buffer.join("\n") + "\n";
        buffer.clear();
        let result = task::spawn_blocking(move || {
            let mut writer = appender.make_writer();
            writer.write_all(content.as_bytes())
        })
        .await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => eprintln!("failed to write runtime logs: {}", e),
            Err(e) => eprintln!("runtime log writer task failed: {}", e),
        }
    }

    async fn cleanup_old_logs(log_dir: &str, retention_hours: u64) {
        let retention = std::time::Duration::from_secs(retention_hours * 3600);
        let now = SystemTime::now();
        let Ok(mut dir) = tokio::fs::read_dir(log_dir).await else {
            return;
        };
        while let Ok(Some(entry)) = dir.next_entry().await {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            let Ok(modified) = metadata.modified() else {
                continue;
            };
            if now.duration_since(modified).unwrap_or_default() > retention {
                if let Err(e) = tokio::fs::remove_file(entry.path()).await {
                    eprintln!("failed to delete old log file {:?}: {}", entry.path(), e);
                }
            }
        }
    }

    /// Gives the background writer a chance to drain before exit.
    pub async fn shutdown(&self) {
        time::sleep(Duration::from_secs(1)).await;
    }
}
