// src/model/context.rs

use chrono::{DateTime, FixedOffset};

/// Per-request resolve context.
///
/// `now` is always supplied by the caller; nothing below this layer
/// reads the wall clock, which keeps matching deterministic. The user
/// type stays a plain string so unknown classifications simply fail
/// `user_type` conditions instead of erroring.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    pub page: String,
    pub user_type: String,
    pub now: DateTime<FixedOffset>,
}
