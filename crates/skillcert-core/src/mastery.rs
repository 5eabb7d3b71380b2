//! Category mastery tracking.
//!
//! Decides which category results currently count as passed given a
//! rolling validity window, and flags results that are about to lapse so
//! the front-end can warn the user before their rank drops.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::CategoryResult;

/// The validity and early-warning windows applied to pass records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasteryWindows {
    /// How long a pass counts toward points after it was achieved.
    pub validity: Duration,
    /// How close to expiry a valid pass is flagged as expiring soon.
    pub warning: Duration,
}

/// Where one category's latest pass currently stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStanding {
    /// Whether the latest pass is inside the validity window.
    pub valid_pass: bool,
    /// Valid, but within the warning window of expiring.
    pub expiring_soon: bool,
    /// Best score within the current window; withheld once expired.
    pub best_score: Option<f64>,
    pub last_passed_at: DateTime<Utc>,
}

/// Evaluate every pass record against the windows at one instant.
///
/// Categories with no pass on record are simply absent from the input and
/// therefore from the result — never reported as "expired with no
/// timestamp". Expired categories stay in the map (with the score
/// withheld) so callers can count "previously passed but currently
/// expired" for UI warnings.
pub fn evaluate(
    results: &[CategoryResult],
    now: DateTime<Utc>,
    windows: MasteryWindows,
) -> BTreeMap<u64, CategoryStanding> {
    let mut standings = BTreeMap::new();
    for result in results {
        let age = now - result.last_passed_at;
        let valid = age < windows.validity;
        let expiring = valid && (result.last_passed_at + windows.validity) - now < windows.warning;
        standings.insert(
            result.category_id,
            CategoryStanding {
                valid_pass: valid,
                expiring_soon: expiring,
                best_score: valid.then_some(result.best_score),
                last_passed_at: result.last_passed_at,
            },
        );
    }
    standings
}

/// Count of previously passed categories whose window has lapsed.
pub fn expired_count(standings: &BTreeMap<u64, CategoryStanding>) -> usize {
    standings.values().filter(|s| !s.valid_pass).count()
}

/// Category ids flagged as expiring soon, ascending.
pub fn expiring_soon(standings: &BTreeMap<u64, CategoryStanding>) -> Vec<u64> {
    standings
        .iter()
        .filter(|(_, s)| s.expiring_soon)
        .map(|(&id, _)| id)
        .collect()
}
