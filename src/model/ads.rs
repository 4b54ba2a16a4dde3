// src/model/ads.rs

use proptest::prelude::*;
use proptest::strategy::ValueTree;
use serde::{Deserialize, Serialize};

use crate::model::catalog::AdCatalog;

/// UI slot category an ad renders into.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementType {
    Banner,
    HeaderCentered,
    FooterFloating,
    FooterTakeover,
}

/// User classification used by condition matching.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Guest,
    Free,
    Premium,
    Enterprise,
}

impl UserType {
    /// The context carries the user type as a plain string so that
    /// unknown classifications fail conditions instead of erroring.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Guest => "guest",
            UserType::Free => "free",
            UserType::Premium => "premium",
            UserType::Enterprise => "enterprise",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// 0-11 morning, 12-17 afternoon, 18-23 evening.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// Targeting conditions. All present fields are ANDed; `exclude_pages`
/// wins over everything else. An ad without conditions matches every
/// context unconditionally.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdConditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_pages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<Vec<Weekday>>,
}

/// A promotional record with display content and placement rules.
/// Display fields and the timing hints are opaque to the engine; only
/// `id`, `placement_type`, `dismissible` and `conditions` drive it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdRecord {
    pub id: String,
    pub placement_type: PlacementType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub cta_label: String,
    pub cta_link: String,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_hide_after_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_after_delay_seconds: Option<u32>,
    #[serde(default = "default_dismissible")]
    pub dismissible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<AdConditions>,
}

fn default_dismissible() -> bool {
    true
}

/// Partial update for an existing ad. Absent fields keep their current
/// value; `conditions` can be replaced but not cleared through a patch.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdPatch {
    pub placement_type: Option<PlacementType>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cta_label: Option<String>,
    pub cta_link: Option<String>,
    pub urgent: Option<bool>,
    pub auto_hide_after_seconds: Option<u32>,
    pub show_after_delay_seconds: Option<u32>,
    pub dismissible: Option<bool>,
    pub conditions: Option<AdConditions>,
}

impl AdRecord {
    pub fn apply(&mut self, patch: AdPatch) {
        if let Some(v) = patch.placement_type {
            self.placement_type = v;
        }
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.subtitle {
            self.subtitle = Some(v);
        }
        if let Some(v) = patch.cta_label {
            self.cta_label = v;
        }
        if let Some(v) = patch.cta_link {
            self.cta_link = v;
        }
        if let Some(v) = patch.urgent {
            self.urgent = v;
        }
        if let Some(v) = patch.auto_hide_after_seconds {
            self.auto_hide_after_seconds = Some(v);
        }
        if let Some(v) = patch.show_after_delay_seconds {
            self.show_after_delay_seconds = Some(v);
        }
        if let Some(v) = patch.dismissible {
            self.dismissible = v;
        }
        if let Some(v) = patch.conditions {
            self.conditions = Some(v);
        }
    }
}

/// Generate a random but well-formed ad. The id is a placeholder and
/// gets assigned when the catalog is assembled.
fn generate_ad() -> impl Strategy<Value = AdRecord> {
    (
        "[A-Z][a-z]{4,11}",
        prop::sample::select(vec![
            PlacementType::Banner,
            PlacementType::HeaderCentered,
            PlacementType::FooterFloating,
            PlacementType::FooterTakeover,
        ]),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(generate_conditions()),
    )
        .prop_map(|(word, placement_type, urgent, dismissible, conditions)| AdRecord {
            id: String::new(),
            placement_type,
            title: format!("{} offer", word),
            subtitle: None,
            cta_label: "Learn more".to_string(),
            cta_link: "/pricing".to_string(),
            urgent,
            auto_hide_after_seconds: None,
            show_after_delay_seconds: None,
            dismissible,
            conditions,
        })
}

fn generate_conditions() -> impl Strategy<Value = AdConditions> {
    (
        prop::option::of(prop::sample::select(vec![
            UserType::Guest,
            UserType::Free,
            UserType::Premium,
            UserType::Enterprise,
        ])),
        prop::option::of(prop::sample::select(vec![
            TimeOfDay::Morning,
            TimeOfDay::Afternoon,
            TimeOfDay::Evening,
        ])),
    )
        .prop_map(|(user_type, time_of_day)| AdConditions {
            user_type,
            time_of_day,
            ..AdConditions::default()
        })
}

/// Generate 5~10 ads, guarantee at least one unconditioned banner so a
/// demo resolve always fills, then assign sequential ids.
fn generate_catalog() -> impl Strategy<Value = AdCatalog> {
    prop::collection::vec(generate_ad(), 5..10).prop_map(|mut ads| {
        let has_open_banner = ads
            .iter()
            .any(|ad| ad.placement_type == PlacementType::Banner && ad.conditions.is_none());
        if !has_open_banner {
            if let Some(first) = ads.first_mut() {
                first.placement_type = PlacementType::Banner;
                first.conditions = None;
            }
        }
        for (i, ad) in ads.iter_mut().enumerate() {
            ad.id = format!("ad-{}", i + 1);
        }
        let mut catalog = AdCatalog::new();
        for ad in ads {
            catalog.add(ad).expect("generated ids are unique");
        }
        catalog
    })
}

/// Build a randomized demo catalog and print what was generated.
pub fn init() -> AdCatalog {
    let mut runner = proptest::test_runner::TestRunner::default();
    let catalog = generate_catalog().new_tree(&mut runner).unwrap().current();

    println!("Generated demo catalog with {} ads", catalog.len());
    for ad in catalog.list() {
        println!(
            "id: {}, slot: {:?}, dismissible: {}, conditioned: {}",
            ad.id,
            ad.placement_type,
            ad.dismissible,
            ad.conditions.is_some()
        );
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(18), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Evening);
    }

    #[test]
    fn placement_type_serializes_kebab_case() {
        let json = serde_json::to_string(&PlacementType::HeaderCentered).unwrap();
        assert_eq!(json, "\"header-centered\"");
        let back: PlacementType = serde_json::from_str("\"footer-takeover\"").unwrap();
        assert_eq!(back, PlacementType::FooterTakeover);
    }

    #[test]
    fn ad_record_defaults_fill_in() {
        let raw = r#"{
            "id": "a1",
            "placementType": "banner",
            "title": "Hello",
            "ctaLabel": "Go",
            "ctaLink": "/"
        }"#;
        let ad: AdRecord = serde_json::from_str(raw).unwrap();
        assert!(ad.dismissible);
        assert!(!ad.urgent);
        assert!(ad.conditions.is_none());
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut ad: AdRecord = serde_json::from_str(
            r#"{"id":"a1","placementType":"banner","title":"Old","ctaLabel":"Go","ctaLink":"/"}"#,
        )
        .unwrap();
        ad.apply(AdPatch {
            title: Some("New".to_string()),
            urgent: Some(true),
            ..AdPatch::default()
        });
        assert_eq!(ad.title, "New");
        assert!(ad.urgent);
        assert_eq!(ad.cta_label, "Go");
        assert_eq!(ad.placement_type, PlacementType::Banner);
    }

    #[test]
    fn demo_catalog_always_contains_an_open_banner() {
        for _ in 0..5 {
            let catalog = init();
            assert!(catalog.list().iter().any(|ad| {
                ad.placement_type == PlacementType::Banner && ad.conditions.is_none()
            }));
        }
    }
}
