// src/placement/resolver.rs

use serde::Serialize;

use crate::model::ads::{AdRecord, PlacementType};
use crate::model::catalog::AdCatalog;
use crate::model::context::ResolveContext;
use crate::model::policy::{PagePolicy, PagePolicyTable};
use crate::placement::dismissal::DismissalStore;
use crate::placement::matcher::matches;

/// Grouped result of one page-view resolution, plus the effective
/// policy for the caller's informational use.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Placements {
    pub banner: Vec<AdRecord>,
    pub header_centered: Option<AdRecord>,
    pub footer_floating: Option<AdRecord>,
    pub footer_takeover: Option<AdRecord>,
    pub policy: PagePolicy,
}

impl Placements {
    pub fn is_empty(&self) -> bool {
        self.banner.is_empty()
            && self.header_centered.is_none()
            && self.footer_floating.is_none()
            && self.footer_takeover.is_none()
    }
}

/// Pure, synchronous resolution over in-memory state: policy lookup,
/// candidate filter (dismissals + conditions), group by slot. Singleton
/// slots take the first matching candidate in catalog order; the banner
/// list is capped at the policy's `max_ads_per_page`.
pub fn resolve(
    catalog: &AdCatalog,
    policies: &PagePolicyTable,
    dismissals: &DismissalStore,
    ctx: &ResolveContext,
) -> Placements {
    let policy = policies.get(&ctx.page);

    let candidates: Vec<&AdRecord> = catalog
        .list()
        .iter()
        .filter(|ad| !dismissals.is_dismissed(&ad.id) && matches(ad.conditions.as_ref(), ctx))
        .collect();

    let first = |slot: PlacementType, enabled: bool| -> Option<AdRecord> {
        if !enabled {
            return None;
        }
        candidates
            .iter()
            .find(|ad| ad.placement_type == slot)
            .map(|ad| (*ad).clone())
    };

    let banner = if policy.banner_ads_enabled {
        candidates
            .iter()
            .filter(|ad| ad.placement_type == PlacementType::Banner)
            .take(policy.max_ads_per_page)
            .map(|ad| (*ad).clone())
            .collect()
    } else {
        Vec::new()
    };

    Placements {
        banner,
        header_centered: first(PlacementType::HeaderCentered, policy.header_centered_ad_enabled),
        footer_floating: first(PlacementType::FooterFloating, policy.footer_floating_ad_enabled),
        footer_takeover: first(PlacementType::FooterTakeover, policy.footer_takeover_ad_enabled),
        policy,
    }
}
