//! Core error taxonomy.
//!
//! Domain outcomes (category expired, quota shortfall, no rank change) are
//! never errors — they surface as fields on success results. These types
//! cover the cases that genuinely abort an operation.

use thiserror::Error;

/// Errors raised while assembling a test.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// No eligible questions exist for the requested scope. Surfaced as
    /// "cannot start test" — never an empty list masquerading as success.
    #[error("no questions available for the requested scope")]
    EmptyPool,

    /// The caller's cancellation signal fired before the repository reads
    /// were issued.
    #[error("test assembly cancelled")]
    Cancelled,

    /// A repository read failed. Infrastructure failures propagate
    /// unchanged to the caller.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Rank ladder configuration defects. These fail fast at load/evaluation
/// time rather than silently defaulting to "rank unknown".
#[derive(Debug, Error)]
pub enum LadderError {
    #[error("rank ladder is empty")]
    Empty,

    #[error("rank ladder must start at 0 points, first entry '{name}' requires {min_points}")]
    NonZeroFirst { name: String, min_points: u32 },

    #[error("rank ladder thresholds must be strictly increasing: '{prev}' ({prev_points}) followed by '{next}' ({next_points})")]
    NotAscending {
        prev: String,
        prev_points: u32,
        next: String,
        next_points: u32,
    },

    #[error("rank tier '{name}' has fraction {fraction} outside [0, 1]")]
    FractionOutOfRange { name: String, fraction: f64 },

    #[error("rank ladder must end at the maximum achievable points: last entry '{name}' has fraction {fraction}, expected 1")]
    LastNotMax { name: String, fraction: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembly_error_messages() {
        assert_eq!(
            AssemblyError::EmptyPool.to_string(),
            "no questions available for the requested scope"
        );
        assert_eq!(AssemblyError::Cancelled.to_string(), "test assembly cancelled");
    }

    #[test]
    fn ladder_error_messages_name_the_offender() {
        let err = LadderError::NotAscending {
            prev: "Практик".into(),
            prev_points: 96,
            next: "Новичок".into(),
            next_points: 0,
        };
        let msg = err.to_string();
        assert!(msg.contains("Практик"));
        assert!(msg.contains("96"));
    }
}
