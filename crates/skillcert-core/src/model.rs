//! Core data model types for skillcert.
//!
//! These are the fundamental types that the entire skillcert system uses
//! to represent questions, categories, attempts, and rank definitions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shuffle::ShuffledQuestion;

/// Question difficulty. Ordering is ascending (`Easy < Medium < Hard`),
/// which is what the assembler's grouped output relies on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties in ascending order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Canonical answer-option label. A question's options and its correct
/// answer are always addressed by canonical label; display-time labels
/// produced by the shuffler map back to these.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    /// All labels in display order.
    pub const ALL: [OptionLabel; 4] = [
        OptionLabel::A,
        OptionLabel::B,
        OptionLabel::C,
        OptionLabel::D,
    ];

    /// Position of this label in [`OptionLabel::ALL`].
    pub fn index(self) -> usize {
        match self {
            OptionLabel::A => 0,
            OptionLabel::B => 1,
            OptionLabel::C => 2,
            OptionLabel::D => 3,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionLabel::A => write!(f, "A"),
            OptionLabel::B => write!(f, "B"),
            OptionLabel::C => write!(f, "C"),
            OptionLabel::D => write!(f, "D"),
        }
    }
}

impl FromStr for OptionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(OptionLabel::A),
            "B" => Ok(OptionLabel::B),
            "C" => Ok(OptionLabel::C),
            "D" => Ok(OptionLabel::D),
            other => Err(format!("unknown option label: {other}")),
        }
    }
}

/// A single multiple-choice question from the question bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique question identifier.
    pub id: u64,
    /// The question text shown to the user.
    pub text: String,
    /// The four answer options, indexed by canonical label A–D.
    pub options: [String; 4],
    /// Canonical label of the correct option.
    pub correct: OptionLabel,
    /// Difficulty bucket used by the assembler's quota.
    pub difficulty: Difficulty,
    /// Categories this question belongs to (many-to-many).
    #[serde(default)]
    pub category_ids: Vec<u64>,
    /// Optional explanation shown after answering.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Date after which the question is considered outdated and excluded
    /// from assembly. `None` means the question never goes stale.
    #[serde(default)]
    pub relevance_until: Option<NaiveDate>,
    /// Inactive questions are excluded from assembly but kept for history.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Question {
    /// Text of the option behind a canonical label.
    pub fn option(&self, label: OptionLabel) -> &str {
        &self.options[label.index()]
    }

    /// Whether the question is still relevant as of the given date.
    pub fn is_current(&self, as_of: NaiveDate) -> bool {
        match self.relevance_until {
            Some(until) => until >= as_of,
            None => true,
        }
    }
}

/// A certification category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique category identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Only active categories count toward the maximum achievable points.
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Terminal and non-terminal states of a test attempt.
///
/// Lifecycle: `InProgress → {Completed | Cancelled | Expired}`. Only
/// `Completed` attempts with a category scope feed the mastery tracker;
/// the other terminal states are retained for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Completed,
    Cancelled,
    Expired,
}

/// A question as presented within one attempt: the bank question plus the
/// display-order shuffle drawn for this presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentedQuestion {
    pub question: Question,
    pub shuffled: ShuffledQuestion,
}

/// One test attempt by one user.
///
/// Created at test start, mutated only by the completion step, never
/// deleted. The presented questions are captured at start time so that
/// later edits to the bank cannot retroactively change scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    pub user_id: u64,
    /// `None` means the attempt spans all categories.
    pub category_id: Option<u64>,
    /// Questions in presentation order, with their shuffles.
    pub presented: Vec<PresentedQuestion>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub score_percent: Option<f64>,
    pub status: AttemptStatus,
}

impl Attempt {
    /// Begin a new attempt over the given presentation.
    pub fn start(
        user_id: u64,
        category_id: Option<u64>,
        presented: Vec<PresentedQuestion>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            category_id,
            presented,
            started_at: now,
            completed_at: None,
            score_percent: None,
            status: AttemptStatus::InProgress,
        }
    }
}

/// Per-(user, category) pass record: the best score achieved within the
/// current validity window and when the category was last passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category_id: u64,
    /// Best score percentage within the current validity window.
    pub best_score: f64,
    pub last_passed_at: DateTime<Utc>,
}

/// One materialized rung of the rank ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankDefinition {
    pub name: String,
    pub icon: String,
    /// Minimum certification points required for this rank.
    pub min_points: u32,
}

/// Per-difficulty question counts, used for both the assembler's target
/// quota and the actually drawn distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyQuota {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyQuota {
    pub fn get(&self, difficulty: Difficulty) -> usize {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn set(&mut self, difficulty: Difficulty, count: usize) {
        match difficulty {
            Difficulty::Easy => self.easy = count,
            Difficulty::Medium => self.medium = count,
            Difficulty::Hard => self.hard = count,
        }
    }

    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }
}
