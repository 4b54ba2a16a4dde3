// src/model/adapters.rs

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;

use crate::model::ads::AdRecord;
use crate::model::policy::PagePolicy;

/// Source of the seed catalog and policy table loaded at boot.
pub trait ConfigAdapter: Send + Sync {
    fn get_ads(&self) -> Vec<AdRecord>;
    fn get_page_policies(&self) -> HashMap<String, PagePolicy>;
}

/// Reads seed data from JSON files. A missing or unparseable file
/// degrades to an empty catalog / table rather than failing the boot.
pub struct FileConfigAdapter {
    pub ads_file: String,
    pub policies_file: String,
}

impl FileConfigAdapter {
    pub fn new(ads_file: &str, policies_file: &str) -> Self {
        Self {
            ads_file: ads_file.to_string(),
            policies_file: policies_file.to_string(),
        }
    }

    fn read_json<T: DeserializeOwned + Default>(path: &str) -> T {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return T::default(),
        };
        serde_json::from_str(&content).unwrap_or_default()
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn get_ads(&self) -> Vec<AdRecord> {
        Self::read_json(&self.ads_file)
    }

    fn get_page_policies(&self) -> HashMap<String, PagePolicy> {
        Self::read_json(&self.policies_file)
    }
}
