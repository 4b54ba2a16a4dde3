// src/placement/matcher.rs

use chrono::{Datelike, Timelike};

use crate::model::ads::{AdConditions, TimeOfDay, Weekday};
use crate::model::context::ResolveContext;

/// Decides whether an ad's conditions admit the given context.
///
/// All present fields are ANDed. The checks are ordered for early
/// exit: exclusions first, then the cheap equality checks. Time-based
/// fields derive from `ctx.now` only, never from the wall clock.
pub fn matches(conditions: Option<&AdConditions>, ctx: &ResolveContext) -> bool {
    let Some(cond) = conditions else {
        return true;
    };

    if let Some(exclude) = &cond.exclude_pages {
        if exclude.iter().any(|p| p == &ctx.page) {
            return false;
        }
    }

    if let Some(pages) = &cond.pages {
        if !pages.iter().any(|p| p == &ctx.page) {
            return false;
        }
    }

    if let Some(required) = cond.user_type {
        if required.as_str() != ctx.user_type {
            return false;
        }
    }

    if let Some(required) = cond.time_of_day {
        if TimeOfDay::from_hour(ctx.now.hour()) != required {
            return false;
        }
    }

    if let Some(days) = &cond.day_of_week {
        let today = Weekday::from(ctx.now.weekday());
        if !days.contains(&today) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ads::UserType;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn ctx(page: &str, user_type: &str, rfc3339: &str) -> ResolveContext {
        ResolveContext {
            page: page.to_string(),
            user_type: user_type.to_string(),
            now: DateTime::parse_from_rfc3339(rfc3339).unwrap(),
        }
    }

    // 2024-01-01 was a Monday.
    const MONDAY_MORNING: &str = "2024-01-01T09:00:00+00:00";

    #[test]
    fn exclude_pages_short_circuits_before_pages() {
        let cond = AdConditions {
            pages: Some(vec!["/".to_string()]),
            exclude_pages: Some(vec!["/".to_string()]),
            ..AdConditions::default()
        };
        assert!(!matches(Some(&cond), &ctx("/", "guest", MONDAY_MORNING)));
    }

    #[test]
    fn pages_requires_membership() {
        let cond = AdConditions {
            pages: Some(vec!["/".to_string(), "/pricing".to_string()]),
            ..AdConditions::default()
        };
        assert!(matches(Some(&cond), &ctx("/pricing", "guest", MONDAY_MORNING)));
        assert!(!matches(Some(&cond), &ctx("/blog", "guest", MONDAY_MORNING)));
    }

    #[test]
    fn user_type_requires_exact_equality() {
        let cond = AdConditions {
            user_type: Some(UserType::Premium),
            ..AdConditions::default()
        };
        assert!(matches(Some(&cond), &ctx("/", "premium", MONDAY_MORNING)));
        assert!(!matches(Some(&cond), &ctx("/", "guest", MONDAY_MORNING)));
        // unknown classifications fail the condition, they never error
        assert!(!matches(Some(&cond), &ctx("/", "robot", MONDAY_MORNING)));
    }

    #[test]
    fn time_of_day_derives_from_injected_clock() {
        let cond = AdConditions {
            time_of_day: Some(TimeOfDay::Evening),
            ..AdConditions::default()
        };
        assert!(!matches(Some(&cond), &ctx("/", "guest", "2024-01-01T11:59:00+00:00")));
        assert!(!matches(Some(&cond), &ctx("/", "guest", "2024-01-01T17:59:00+00:00")));
        assert!(matches(Some(&cond), &ctx("/", "guest", "2024-01-01T18:00:00+00:00")));
        assert!(matches(Some(&cond), &ctx("/", "guest", "2024-01-01T23:30:00+00:00")));
    }

    #[test]
    fn day_of_week_requires_membership() {
        let cond = AdConditions {
            day_of_week: Some(vec![Weekday::Saturday, Weekday::Sunday]),
            ..AdConditions::default()
        };
        assert!(!matches(Some(&cond), &ctx("/", "guest", MONDAY_MORNING)));
        // 2024-01-06 was a Saturday
        assert!(matches(Some(&cond), &ctx("/", "guest", "2024-01-06T09:00:00+00:00")));
    }

    #[test]
    fn all_fields_are_anded() {
        let cond = AdConditions {
            pages: Some(vec!["/".to_string()]),
            user_type: Some(UserType::Guest),
            time_of_day: Some(TimeOfDay::Morning),
            day_of_week: Some(vec![Weekday::Monday]),
            ..AdConditions::default()
        };
        assert!(matches(Some(&cond), &ctx("/", "guest", MONDAY_MORNING)));
        assert!(!matches(Some(&cond), &ctx("/", "guest", "2024-01-01T14:00:00+00:00")));
    }

    proptest! {
        #[test]
        fn unconditioned_matches_every_context(
            page in "/[a-z]{0,10}",
            user_type in "[a-z]{1,10}",
            hour in 0u32..24,
            day in 1u32..28,
        ) {
            let now = Utc
                .with_ymd_and_hms(2024, 3, day, hour, 0, 0)
                .unwrap()
                .fixed_offset();
            let ctx = ResolveContext { page, user_type, now };
            prop_assert!(matches(None, &ctx));
        }

        #[test]
        fn excluded_page_never_matches(
            user_type in "[a-z]{1,10}",
            hour in 0u32..24,
        ) {
            let cond = AdConditions {
                exclude_pages: Some(vec!["/blocked".to_string()]),
                pages: Some(vec!["/blocked".to_string()]),
                ..AdConditions::default()
            };
            let now = Utc
                .with_ymd_and_hms(2024, 3, 5, hour, 0, 0)
                .unwrap()
                .fixed_offset();
            let ctx = ResolveContext {
                page: "/blocked".to_string(),
                user_type,
                now,
            };
            prop_assert!(!matches(Some(&cond), &ctx));
        }
    }
}
