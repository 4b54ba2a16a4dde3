// src/model/catalog.rs

use crate::error::EngineError;
use crate::model::ads::{AdPatch, AdRecord};

/// In-memory ad inventory. Order is insertion order and is meaningful:
/// singleton placements resolve to the first matching record.
///
/// Not persisted anywhere; admin edits are lost on restart. Known
/// limitation of the system, not something this layer fixes.
#[derive(Debug, Clone, Default)]
pub struct AdCatalog {
    ads: Vec<AdRecord>,
}

impl AdCatalog {
    pub fn new() -> Self {
        Self { ads: Vec::new() }
    }

    /// Build a catalog from pre-loaded records, rejecting duplicate ids.
    pub fn from_records(records: Vec<AdRecord>) -> Result<Self, EngineError> {
        let mut catalog = Self::new();
        for record in records {
            catalog.add(record)?;
        }
        Ok(catalog)
    }

    pub fn list(&self) -> &[AdRecord] {
        &self.ads
    }

    pub fn get(&self, id: &str) -> Option<&AdRecord> {
        self.ads.iter().find(|ad| ad.id == id)
    }

    pub fn add(&mut self, record: AdRecord) -> Result<(), EngineError> {
        if self.ads.iter().any(|ad| ad.id == record.id) {
            return Err(EngineError::DuplicateId(record.id));
        }
        self.ads.push(record);
        Ok(())
    }

    /// Removing an absent id is a no-op, not an error.
    pub fn remove(&mut self, id: &str) {
        self.ads.retain(|ad| ad.id != id);
    }

    pub fn update(&mut self, id: &str, patch: AdPatch) -> Result<(), EngineError> {
        match self.ads.iter_mut().find(|ad| ad.id == id) {
            Some(ad) => {
                ad.apply(patch);
                Ok(())
            }
            None => Err(EngineError::NotFound(id.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.ads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
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
    fn add_rejects_duplicate_ids() {
        let mut catalog = AdCatalog::new();
        catalog.add(ad("a1")).unwrap();
        let err = catalog.add(ad("a1")).unwrap_err();
        assert_eq!(err, EngineError::DuplicateId("a1".to_string()));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn remove_absent_id_is_a_noop() {
        let mut catalog = AdCatalog::new();
        catalog.add(ad("a1")).unwrap();
        catalog.remove("missing");
        assert_eq!(catalog.len(), 1);
        catalog.remove("a1");
        assert!(catalog.is_empty());
    }

    #[test]
    fn update_absent_id_fails() {
        let mut catalog = AdCatalog::new();
        let err = catalog.update("ghost", AdPatch::default()).unwrap_err();
        assert_eq!(err, EngineError::NotFound("ghost".to_string()));
    }

    #[test]
    fn update_merges_patch_into_existing_record() {
        let mut catalog = AdCatalog::new();
        catalog.add(ad("a1")).unwrap();
        catalog
            .update(
                "a1",
                AdPatch {
                    title: Some("Patched".to_string()),
                    ..AdPatch::default()
                },
            )
            .unwrap();
        let record = catalog.get("a1").unwrap();
        assert_eq!(record.title, "Patched");
        assert_eq!(record.cta_label, "Go");
    }

    #[test]
    fn list_preserves_insertion_order() {
        let mut catalog = AdCatalog::new();
        for id in ["b", "a", "c"] {
            catalog.add(ad(id)).unwrap();
        }
        let ids: Vec<&str> = catalog.list().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
