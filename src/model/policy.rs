// src/model/policy.rs

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Page whose explicit policy doubles as the fallback for pages
/// without an entry of their own.
pub const DEFAULT_PAGE: &str = "/";

static DEFAULT_POLICY: Lazy<PagePolicy> = Lazy::new(|| PagePolicy {
    banner_ads_enabled: true,
    header_centered_ad_enabled: true,
    footer_floating_ad_enabled: true,
    footer_takeover_ad_enabled: false,
    max_ads_per_page: 3,
    ad_frequency_hint: 2,
});

/// Per-route configuration of which placement types are allowed.
/// `ad_frequency_hint` is presentational and never read by matching.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PagePolicy {
    pub banner_ads_enabled: bool,
    pub header_centered_ad_enabled: bool,
    pub footer_floating_ad_enabled: bool,
    pub footer_takeover_ad_enabled: bool,
    /// Cap on the banner list. Enforced by the resolver.
    pub max_ads_per_page: usize,
    pub ad_frequency_hint: u32,
}

impl Default for PagePolicy {
    fn default() -> Self {
        DEFAULT_POLICY.clone()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PagePolicyPatch {
    pub banner_ads_enabled: Option<bool>,
    pub header_centered_ad_enabled: Option<bool>,
    pub footer_floating_ad_enabled: Option<bool>,
    pub footer_takeover_ad_enabled: Option<bool>,
    pub max_ads_per_page: Option<usize>,
    pub ad_frequency_hint: Option<u32>,
}

impl PagePolicy {
    pub fn apply(&mut self, patch: PagePolicyPatch) {
        if let Some(v) = patch.banner_ads_enabled {
            self.banner_ads_enabled = v;
        }
        if let Some(v) = patch.header_centered_ad_enabled {
            self.header_centered_ad_enabled = v;
        }
        if let Some(v) = patch.footer_floating_ad_enabled {
            self.footer_floating_ad_enabled = v;
        }
        if let Some(v) = patch.footer_takeover_ad_enabled {
            self.footer_takeover_ad_enabled = v;
        }
        if let Some(v) = patch.max_ads_per_page {
            self.max_ads_per_page = v;
        }
        if let Some(v) = patch.ad_frequency_hint {
            self.ad_frequency_hint = v;
        }
    }
}

/// Page path -> policy, with the `/` entry (then the built-in default)
/// as fallback. `get` never fails; unknown pages are not an error.
#[derive(Debug, Clone, Default)]
pub struct PagePolicyTable {
    policies: HashMap<String, PagePolicy>,
}

impl PagePolicyTable {
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    pub fn from_entries(entries: HashMap<String, PagePolicy>) -> Self {
        Self { policies: entries }
    }

    pub fn get(&self, page: &str) -> PagePolicy {
        self.policies
            .get(page)
            .or_else(|| self.policies.get(DEFAULT_PAGE))
            .cloned()
            .unwrap_or_default()
    }

    /// Creates the entry from the current fallback if absent, then
    /// merges the patch. Returns the resulting policy.
    pub fn update(&mut self, page: &str, patch: PagePolicyPatch) -> PagePolicy {
        let base = self.get(page);
        let entry = self.policies.entry(page.to_string()).or_insert(base);
        entry.apply(patch);
        entry.clone()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
