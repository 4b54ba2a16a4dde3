// src/logging/resolve_log.rs

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::placement::resolver::Placements;

/// Structured record of one placement resolution, emitted per request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResolveLog {
    pub timestamp: String,
    pub log_type: String,
    pub request_id: String,
    pub page: String,
    pub user_type: String,
    pub ads_considered: usize,
    pub ads_dismissed: usize,
    pub status: String,
    pub slots: Vec<SlotLog>,
}

/// Outcome of a single placement slot.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SlotLog {
    pub placement: String,
    pub filled: usize,
    pub ad_ids: Vec<String>,
}

impl ResolveLog {
    pub fn new(request_id: &str, page: &str, user_type: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            log_type: "ad_resolve".to_string(),
            request_id: request_id.to_string(),
            page: page.to_string(),
            user_type: user_type.to_string(),
            ads_considered: 0,
            ads_dismissed: 0,
            status: "empty".to_string(),
            slots: Vec::new(),
        }
    }

    pub fn record_counts(&mut self, considered: usize, dismissed: usize) {
        self.ads_considered = considered;
        self.ads_dismissed = dismissed;
    }

    pub fn record_slots(&mut self, placements: &Placements) {
        self.add_slot(
            "banner",
            placements.banner.iter().map(|ad| ad.id.clone()).collect(),
        );
        self.add_slot("header-centered", singleton_ids(&placements.header_centered));
        self.add_slot("footer-floating", singleton_ids(&placements.footer_floating));
        self.add_slot("footer-takeover", singleton_ids(&placements.footer_takeover));
        if !placements.is_empty() {
            self.status = "filled".to_string();
        }
    }

    fn add_slot(&mut self, placement: &str, ad_ids: Vec<String>) {
        self.slots.push(SlotLog {
            placement: placement.to_string(),
            filled: ad_ids.len(),
            ad_ids,
        });
    }
}

fn singleton_ids(slot: &Option<crate::model::ads::AdRecord>) -> Vec<String> {
    slot.iter().map(|ad| ad.id.clone()).collect()
}
