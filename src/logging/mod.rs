// src/logging/mod.rs

pub mod resolve_log;
pub mod runtime_logger;
