//! Rank ladder resolution.
//!
//! A deployment configures its ladder as named tiers with thresholds
//! expressed as fractions of the maximum achievable points, so the same
//! named ranks stay meaningful as the active category set grows or
//! shrinks. The ladder is materialized into absolute point thresholds
//! whenever the maximum changes, validated fail-fast, and then resolved
//! against a user's point total.

use serde::{Deserialize, Serialize};

use crate::error::LadderError;
use crate::model::RankDefinition;

/// One configured tier: a name, an icon, and its threshold as a fraction
/// of the maximum achievable points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankTier {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub fraction: f64,
}

/// The externally configured ladder, before materialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankLadderSpec {
    pub tiers: Vec<RankTier>,
}

impl RankLadderSpec {
    /// Validate the configured tiers: non-empty, fractions inside [0, 1]
    /// and strictly increasing, first at 0, last at 1.
    pub fn validate(&self) -> Result<(), LadderError> {
        let first = self.tiers.first().ok_or(LadderError::Empty)?;
        for tier in &self.tiers {
            if !(0.0..=1.0).contains(&tier.fraction) {
                return Err(LadderError::FractionOutOfRange {
                    name: tier.name.clone(),
                    fraction: tier.fraction,
                });
            }
        }
        if first.fraction != 0.0 {
            return Err(LadderError::NonZeroFirst {
                name: first.name.clone(),
                min_points: (first.fraction * 100.0).round() as u32,
            });
        }
        for pair in self.tiers.windows(2) {
            if pair[1].fraction <= pair[0].fraction {
                return Err(LadderError::NotAscending {
                    prev: pair[0].name.clone(),
                    prev_points: (pair[0].fraction * 100.0).round() as u32,
                    next: pair[1].name.clone(),
                    next_points: (pair[1].fraction * 100.0).round() as u32,
                });
            }
        }
        let last = self.tiers.last().ok_or(LadderError::Empty)?;
        if last.fraction != 1.0 {
            return Err(LadderError::LastNotMax {
                name: last.name.clone(),
                fraction: last.fraction,
            });
        }
        Ok(())
    }

    /// Materialize absolute point thresholds for the current maximum.
    /// Must be re-run whenever `max_points` changes.
    pub fn materialize(&self, max_points: u32) -> Result<Vec<RankDefinition>, LadderError> {
        self.validate()?;
        let ladder: Vec<RankDefinition> = self
            .tiers
            .iter()
            .map(|tier| RankDefinition {
                name: tier.name.clone(),
                icon: tier.icon.clone(),
                min_points: (tier.fraction * f64::from(max_points)).round() as u32,
            })
            .collect();
        validate_ladder(&ladder)?;
        Ok(ladder)
    }
}

/// Validate a materialized ladder: non-empty, first threshold 0, strictly
/// ascending thresholds with no duplicates.
pub fn validate_ladder(ladder: &[RankDefinition]) -> Result<(), LadderError> {
    let first = ladder.first().ok_or(LadderError::Empty)?;
    if first.min_points != 0 {
        return Err(LadderError::NonZeroFirst {
            name: first.name.clone(),
            min_points: first.min_points,
        });
    }
    for pair in ladder.windows(2) {
        if pair[1].min_points <= pair[0].min_points {
            return Err(LadderError::NotAscending {
                prev: pair[0].name.clone(),
                prev_points: pair[0].min_points,
                next: pair[1].name.clone(),
                next_points: pair[1].min_points,
            });
        }
    }
    Ok(())
}

/// A resolved position on the ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankStanding {
    /// The highest entry whose threshold the points meet.
    pub current: RankDefinition,
    /// The entry immediately above, absent at the top.
    pub next: Option<RankDefinition>,
    /// Points still needed for the next entry, absent at the top.
    pub points_to_next: Option<u32>,
}

/// Resolve a point total against a validated ladder.
pub fn resolve(points: u32, ladder: &[RankDefinition]) -> Result<RankStanding, LadderError> {
    validate_ladder(ladder)?;

    // First entry whose threshold exceeds the points; current sits just below.
    let above = ladder.partition_point(|rank| rank.min_points <= points);
    let current = ladder[above - 1].clone();
    let next = ladder.get(above).cloned();
    let points_to_next = next.as_ref().map(|n| n.min_points.saturating_sub(points));

    Ok(RankStanding {
        current,
        next,
        points_to_next,
    })
}
