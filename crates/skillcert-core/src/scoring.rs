//! Attempt scoring.
//!
//! Turns a finished presentation plus the user's chosen display labels
//! into a score. Every chosen label is resolved through the question's
//! shuffle map back to the canonical label before comparison — comparing
//! display labels directly would score against the wrong option.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Attempt, AttemptStatus, OptionLabel};

/// The result of scoring one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub attempt_id: Uuid,
    pub correct: usize,
    pub total: usize,
    pub score_percent: f64,
    pub passed: bool,
    pub status: AttemptStatus,
}

/// Score an attempt against the user's answers.
///
/// `answers` is aligned with the attempt's presentation order; `None`
/// marks a question the user never answered (timed out past it), which
/// counts as wrong. The passing threshold is inclusive: a score equal to
/// `passing_score_percent` passes.
pub fn score_attempt(
    attempt: &Attempt,
    answers: &[Option<OptionLabel>],
    passing_score_percent: f64,
) -> AttemptOutcome {
    let total = attempt.presented.len();
    let correct = attempt
        .presented
        .iter()
        .zip(answers.iter().chain(std::iter::repeat(&None)))
        .filter(|(presented, answer)| {
            answer
                .map(|chosen| presented.shuffled.resolve(chosen) == presented.question.correct)
                .unwrap_or(false)
        })
        .count();

    let score_percent = if total > 0 {
        correct as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    AttemptOutcome {
        attempt_id: attempt.id,
        correct,
        total,
        score_percent,
        passed: score_percent >= passing_score_percent,
        status: AttemptStatus::Completed,
    }
}
