//! Certification points and progress rendering.
//!
//! Converts the mastery tracker's valid category scores into a point
//! total, an overall percentage, and the fixed 10-cell progress gauge the
//! front-end shows verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mastery::CategoryStanding;

/// Number of cells in the progress gauge.
pub const BAR_CELLS: u32 = 10;

const FILLED: char = '■';
const EMPTY: char = '□';

/// Aggregated certification progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Σ best score over currently valid categories, rounded once.
    pub points: u32,
    /// Share of the maximum achievable points, rounded, clamped to [0, 100].
    pub percent: u8,
    /// Rendered gauge, e.g. `[■■■□□□□□□□]`.
    pub bar: String,
}

/// Sum the valid categories' best scores into certification points and
/// derive the percentage and gauge.
///
/// Per-category scores are capped at 100 and summed as floats; the sum is
/// rounded once at the end so fractional scores cannot compound rounding
/// error. A zero maximum (no active categories) yields zero percent.
pub fn aggregate(standings: &BTreeMap<u64, CategoryStanding>, max_achievable: u32) -> Progress {
    let sum: f64 = standings
        .values()
        .filter_map(|s| s.best_score)
        .map(|score| score.clamp(0.0, 100.0))
        .sum();
    let points = sum.round() as u32;

    let percent = if max_achievable == 0 {
        0
    } else {
        ((f64::from(points) / f64::from(max_achievable)) * 100.0)
            .round()
            .clamp(0.0, 100.0) as u8
    };

    Progress {
        points,
        percent,
        bar: render_bar(percent),
    }
}

/// Render the 10-cell gauge for a percentage. The filled-cell count is
/// `round(percent / 10)` — rounding, not floor — clamped to [0, 10].
pub fn render_bar(percent: u8) -> String {
    let filled = ((f64::from(percent) / 10.0).round() as u32).min(BAR_CELLS);
    let mut bar = String::with_capacity(BAR_CELLS as usize + 2);
    bar.push('[');
    for cell in 0..BAR_CELLS {
        bar.push(if cell < filled { FILLED } else { EMPTY });
    }
    bar.push(']');
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn standing(best_score: Option<f64>) -> CategoryStanding {
        CategoryStanding {
            valid_pass: best_score.is_some(),
            expiring_soon: false,
            best_score,
            last_passed_at: Utc.with_ymd_and_hms(2026, 7, 20, 0, 0, 0).unwrap(),
        }
    }

    fn standings(scores: &[(u64, Option<f64>)]) -> BTreeMap<u64, CategoryStanding> {
        scores.iter().map(|&(id, s)| (id, standing(s))).collect()
    }

    #[test]
    fn fractional_scores_round_once_at_the_end() {
        // 92.5 + 57.5 of max 500: both fractions cancel in the sum.
        let progress = aggregate(&standings(&[(1, Some(92.5)), (3, Some(57.5))]), 500);
        assert_eq!(progress.points, 150);
        assert_eq!(progress.percent, 30);
        assert_eq!(progress.bar, "[■■■□□□□□□□]");
    }

    #[test]
    fn expired_categories_contribute_nothing() {
        let progress = aggregate(&standings(&[(1, Some(80.0)), (2, None)]), 200);
        assert_eq!(progress.points, 80);
        assert_eq!(progress.percent, 40);
    }

    #[test]
    fn zero_maximum_is_zero_percent() {
        let progress = aggregate(&standings(&[]), 0);
        assert_eq!(progress.points, 0);
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.bar, "[□□□□□□□□□□]");
    }

    #[test]
    fn per_category_scores_cap_at_100() {
        let progress = aggregate(&standings(&[(1, Some(140.0))]), 100);
        assert_eq!(progress.points, 100);
        assert_eq!(progress.percent, 100);
        assert_eq!(progress.bar, "[■■■■■■■■■■]");
    }

    #[test]
    fn raising_one_score_never_lowers_percent() {
        let mut previous = 0;
        for score in 0..=100 {
            let progress = aggregate(&standings(&[(1, Some(f64::from(score)))]), 300);
            assert!(progress.percent >= previous);
            previous = progress.percent;
        }
    }

    #[test]
    fn bar_fill_rounds_rather_than_floors() {
        assert_eq!(render_bar(5), "[■□□□□□□□□□]");
        assert_eq!(render_bar(4), "[□□□□□□□□□□]");
        assert_eq!(render_bar(95), "[■■■■■■■■■■]");
        assert_eq!(render_bar(94), "[■■■■■■■■■□]");
    }

    #[test]
    fn bar_fill_matches_rounding_for_every_percent() {
        for percent in 0u8..=100 {
            let bar = render_bar(percent);
            let filled = bar.chars().filter(|&c| c == '■').count() as u32;
            let expected = ((f64::from(percent) / 10.0).round() as u32).min(BAR_CELLS);
            assert_eq!(filled, expected, "percent {percent}");
            assert_eq!(bar.chars().count(), BAR_CELLS as usize + 2);
        }
    }
}
