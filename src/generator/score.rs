//! Priority and changefreq heuristics.
//!
//! | Item     | Priority                              | Changefreq        |
//! |----------|---------------------------------------|-------------------|
//! | post     | `clamp(1 - age/365, 0.1, 1.0)`        | from age          |
//! | page     | `[sitemap.priority] page` (0.8)       | from age          |
//! | term     | `[sitemap.priority] taxonomy` (0.5)   | weekly            |
//! | author   | `[sitemap.priority] author` (0.5)     | weekly            |

use crate::config::PriorityConfig;
use crate::core::{ChangeFreq, ItemKind};

pub const MIN_PRIORITY: f64 = 0.1;
pub const MAX_PRIORITY: f64 = 1.0;

/// Days over which a post's priority decays from 1.0 to the floor.
const DECAY_DAYS: f64 = 365.0;

/// Derives per-item crawler hints from its kind and age.
#[derive(Debug, Clone)]
pub struct Scorer {
    priorities: PriorityConfig,
}

impl Scorer {
    pub fn new(priorities: PriorityConfig) -> Self {
        Self { priorities }
    }

    pub fn priority(&self, kind: &ItemKind) -> f64 {
        match kind {
            ItemKind::Post { age_days } => age_priority(*age_days),
            ItemKind::Page { .. } => self.priorities.page,
            ItemKind::Term { .. } => self.priorities.taxonomy,
            ItemKind::Author => self.priorities.author,
        }
    }

    pub fn changefreq(&self, kind: &ItemKind) -> ChangeFreq {
        match kind.age_days() {
            Some(age_days) => age_changefreq(age_days),
            None => ChangeFreq::Weekly,
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(PriorityConfig::default())
    }
}

/// Linear decay over one year, bounded to `[MIN_PRIORITY, MAX_PRIORITY]`.
pub fn age_priority(age_days: f64) -> f64 {
    (MAX_PRIORITY - clamp_age(age_days) / DECAY_DAYS).clamp(MIN_PRIORITY, MAX_PRIORITY)
}

/// `<7d` daily, `<30d` weekly, `<365d` monthly, otherwise yearly.
pub fn age_changefreq(age_days: f64) -> ChangeFreq {
    let age = clamp_age(age_days);
    if age < 7.0 {
        ChangeFreq::Daily
    } else if age < 30.0 {
        ChangeFreq::Weekly
    } else if age < 365.0 {
        ChangeFreq::Monthly
    } else {
        ChangeFreq::Yearly
    }
}

/// Future-dated content (clock skew) counts as brand new; NaN too.
#[inline]
fn clamp_age(age_days: f64) -> f64 {
    age_days.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(age_days: f64) -> ItemKind {
        ItemKind::Post { age_days }
    }

    #[test]
    fn test_changefreq_thresholds() {
        assert_eq!(age_changefreq(6.0), ChangeFreq::Daily);
        assert_eq!(age_changefreq(29.0), ChangeFreq::Weekly);
        assert_eq!(age_changefreq(364.0), ChangeFreq::Monthly);
        assert_eq!(age_changefreq(400.0), ChangeFreq::Yearly);
    }

    #[test]
    fn test_changefreq_boundaries() {
        assert_eq!(age_changefreq(0.0), ChangeFreq::Daily);
        assert_eq!(age_changefreq(7.0), ChangeFreq::Weekly);
        assert_eq!(age_changefreq(30.0), ChangeFreq::Monthly);
        assert_eq!(age_changefreq(365.0), ChangeFreq::Yearly);
    }

    #[test]
    fn test_post_priority_decay() {
        assert!((age_priority(0.0) - 1.0).abs() < 1e-9);
        assert!((age_priority(182.5) - 0.5).abs() < 1e-9);
        assert!((age_priority(365.0) - MIN_PRIORITY).abs() < 1e-9);
        assert!((age_priority(10_000.0) - MIN_PRIORITY).abs() < 1e-9);
    }

    #[test]
    fn test_post_priority_monotonic_and_bounded() {
        let mut previous = f64::INFINITY;
        for day in 0..800 {
            let p = age_priority(f64::from(day) * 0.75);
            assert!((MIN_PRIORITY..=MAX_PRIORITY).contains(&p), "day {day}: {p}");
            assert!(p <= previous, "priority increased at day {day}");
            previous = p;
        }
    }

    #[test]
    fn test_future_dated_post() {
        assert!((age_priority(-30.0) - 1.0).abs() < 1e-9);
        assert_eq!(age_changefreq(-30.0), ChangeFreq::Daily);
        assert!((age_priority(f64::NAN) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_scorer_fixed_kinds() {
        let scorer = Scorer::default();
        assert!((scorer.priority(&ItemKind::Page { age_days: 900.0 }) - 0.8).abs() < 1e-9);
        assert!(
            (scorer.priority(&ItemKind::Term {
                taxonomy: "category".into()
            }) - 0.5)
                .abs()
                < 1e-9
        );
        assert!((scorer.priority(&ItemKind::Author) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_scorer_changefreq_by_kind() {
        let scorer = Scorer::default();
        assert_eq!(scorer.changefreq(&post(2.0)), ChangeFreq::Daily);
        assert_eq!(
            scorer.changefreq(&ItemKind::Page { age_days: 100.0 }),
            ChangeFreq::Monthly
        );
        assert_eq!(scorer.changefreq(&ItemKind::Author), ChangeFreq::Weekly);
        assert_eq!(
            scorer.changefreq(&ItemKind::Term {
                taxonomy: "post_tag".into()
            }),
            ChangeFreq::Weekly
        );
    }

    #[test]
    fn test_scorer_custom_priorities() {
        let scorer = Scorer::new(PriorityConfig {
            page: 0.6,
            taxonomy: 0.4,
            author: 0.3,
        });
        assert!((scorer.priority(&ItemKind::Page { age_days: 1.0 }) - 0.6).abs() < 1e-9);
        assert!((scorer.priority(&ItemKind::Author) - 0.3).abs() < 1e-9);
        // Posts ignore the fixed constants
        assert!((scorer.priority(&post(0.0)) - 1.0).abs() < 1e-9);
    }
}
