// src/config/config_manager.rs

use std::sync::RwLock;

use crate::error::EngineError;
use crate::model::ads::{AdPatch, AdRecord};
use crate::model::catalog::AdCatalog;
use crate::model::context::ResolveContext;
use crate::model::policy::{PagePolicy, PagePolicyPatch, PagePolicyTable};
use crate::placement::dismissal::DismissalStore;
use crate::placement::resolver::{resolve, Placements};

/// Process-wide holder for the mutable inventory and policy state.
/// Resolve reads take shared locks; admin edits take exclusive locks.
/// Locks are only ever held across pure synchronous computation.
pub struct ConfigManager {
    catalog: RwLock<AdCatalog>,
    policies: RwLock<PagePolicyTable>,
}

impl ConfigManager {
    pub fn new(catalog: AdCatalog, policies: PagePolicyTable) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            policies: RwLock::new(policies),
        }
    }

    pub fn resolve(&self, dismissals: &DismissalStore, ctx: &ResolveContext) -> Placements {
        let catalog = self.catalog.read().unwrap();
        let policies = self.policies.read().unwrap();
        resolve(&catalog, &policies, dismissals, ctx)
    }

    pub fn list_ads(&self) -> Vec<AdRecord> {
        self.catalog.read().unwrap().list().to_vec()
    }

    pub fn get_ad(&self, id: &str) -> Option<AdRecord> {
        self.catalog.read().unwrap().get(id).cloned()
    }

    pub fn ad_count(&self) -> usize {
        self.catalog.read().unwrap().len()
    }

    pub fn add_ad(&self, record: AdRecord) -> Result<(), EngineError> {
        self.catalog.write().unwrap().add(record)
    }

    pub fn update_ad(&self, id: &str, patch: AdPatch) -> Result<(), EngineError> {
        self.catalog.write().unwrap().update(id, patch)
    }

    pub fn remove_ad(&self, id: &str) {
        self.catalog.write().unwrap().remove(id);
    }

    pub fn get_policy(&self, page: &str) -> PagePolicy {
        self.policies.read().unwrap().get(page)
    }

    pub fn update_policy(&self, page: &str, patch: PagePolicyPatch) -> PagePolicy {
        self.policies.write().unwrap().update(page, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ads::PlacementType;

    fn ad(id: &str) -> AdRecord {
        AdRecord {
            id: id.to_string(),
            placement_type: PlacementType::Banner,
            title: "Test".to_string(),
            subtitle: None,
            cta_label: "Go".to_string(),
            cta_link: "/".to_string(),
            urgent: false,
            auto_hide_after_seconds: None,
            show_after_delay_seconds: None,
            dismissible: true,
            conditions: None,
        }
    }

    #[test]
    fn admin_edits_round_trip_through_the_manager() {
        let manager = ConfigManager::new(AdCatalog::new(), PagePolicyTable::new());
        manager.add_ad(ad("a1")).unwrap();
        assert_eq!(manager.ad_count(), 1);
        assert!(manager.add_ad(ad("a1")).is_err());

        manager
            .update_ad(
                "a1",
                AdPatch {
                    title: Some("Patched".to_string()),
                    ..AdPatch::default()
                },
            )
            .unwrap();
        assert_eq!(manager.get_ad("a1").unwrap().title, "Patched");

        manager.remove_ad("a1");
        assert_eq!(manager.ad_count(), 0);
    }

    #[test]
    fn policy_edits_round_trip_through_the_manager() {
        let manager = ConfigManager::new(AdCatalog::new(), PagePolicyTable::new());
        let updated = manager.update_policy(
            "/pricing",
            PagePolicyPatch {
                banner_ads_enabled: Some(false),
                ..PagePolicyPatch::default()
            },
        );
        assert!(!updated.banner_ads_enabled);
        assert!(!manager.get_policy("/pricing").banner_ads_enabled);
    }
}
