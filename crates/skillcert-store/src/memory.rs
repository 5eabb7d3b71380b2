//! In-memory storage.
//!
//! Reference implementations of the storage seams. They define the exact
//! semantics a durable backend must reproduce — in particular the atomic
//! best-score upsert, whose read-modify-write happens under a single lock
//! so two concurrently finishing attempts cannot both win a stale race.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

use skillcert_core::model::{Attempt, Category, CategoryResult, Difficulty, Question};
use skillcert_core::parser::QuestionBank;
use skillcert_core::traits::{AttemptLog, CategoryResultStore, QuestionRepository};

/// Question bank held in memory.
pub struct InMemoryQuestionRepository {
    questions: Vec<Question>,
    categories: Vec<Category>,
    /// Relevance cutoff applied to `fetch`. `None` disables staleness
    /// filtering (useful in tests that do not care about dates).
    as_of: Option<NaiveDate>,
}

impl InMemoryQuestionRepository {
    pub fn new(questions: Vec<Question>, categories: Vec<Category>) -> Self {
        Self {
            questions,
            categories,
            as_of: None,
        }
    }

    /// Build from a parsed bank file.
    pub fn from_bank(bank: QuestionBank) -> Self {
        Self::new(bank.questions, bank.categories)
    }

    /// Filter outdated questions relative to this date.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn fetch(
        &self,
        category_id: Option<u64>,
        difficulty: Difficulty,
        active_only: bool,
    ) -> anyhow::Result<Vec<Question>> {
        Ok(self
            .questions
            .iter()
            .filter(|q| q.difficulty == difficulty)
            .filter(|q| !active_only || q.active)
            .filter(|q| category_id.map_or(true, |c| q.category_ids.contains(&c)))
            .filter(|q| self.as_of.map_or(true, |date| q.is_current(date)))
            .cloned()
            .collect())
    }

    async fn categories(&self, active_only: bool) -> anyhow::Result<Vec<Category>> {
        Ok(self
            .categories
            .iter()
            .filter(|c| !active_only || c.active)
            .cloned()
            .collect())
    }
}

/// Pass records held in memory, keyed by (user, category).
#[derive(Default)]
pub struct InMemoryCategoryResultStore {
    records: Mutex<HashMap<(u64, u64), CategoryResult>>,
}

impl InMemoryCategoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pass record directly, bypassing upsert semantics.
    pub fn seed(&self, user_id: u64, result: CategoryResult) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert((user_id, result.category_id), result);
    }
}

#[async_trait]
impl CategoryResultStore for InMemoryCategoryResultStore {
    async fn get_all(&self, user_id: u64) -> anyhow::Result<Vec<CategoryResult>> {
        let records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut all: Vec<CategoryResult> = records
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .map(|(_, record)| record.clone())
            .collect();
        all.sort_by_key(|r| r.category_id);
        Ok(all)
    }

    async fn upsert_if_better(
        &self,
        user_id: u64,
        category_id: u64,
        score: f64,
        now: DateTime<Utc>,
        validity_window: Duration,
    ) -> anyhow::Result<bool> {
        // Single lock over the read-modify-write: the best score within a
        // live window is monotonically non-decreasing.
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let advanced = match records.entry((user_id, category_id)) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(CategoryResult {
                    category_id,
                    best_score: score,
                    last_passed_at: now,
                });
                true
            }
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                if now - record.last_passed_at >= validity_window {
                    // The previous window lapsed: this pass starts a fresh
                    // one instead of blending with a stale best.
                    record.best_score = score;
                    record.last_passed_at = now;
                    true
                } else {
                    record.last_passed_at = now;
                    if score > record.best_score {
                        record.best_score = score;
                        true
                    } else {
                        // A concurrent write already holds an equal-or-better
                        // score; idempotent no-op.
                        false
                    }
                }
            }
        };
        Ok(advanced)
    }
}

/// Attempt audit log held in memory. Attempts are only ever inserted or
/// replaced by id, never deleted.
#[derive(Default)]
pub struct InMemoryAttemptLog {
    attempts: Mutex<Vec<Attempt>>,
}

impl InMemoryAttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AttemptLog for InMemoryAttemptLog {
    async fn record(&self, attempt: &Attempt) -> anyhow::Result<()> {
        let mut attempts = self
            .attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = attempts.iter_mut().find(|a| a.id == attempt.id) {
            *existing = attempt.clone();
        } else {
            attempts.push(attempt.clone());
        }
        Ok(())
    }

    async fn history(&self, user_id: u64, limit: usize) -> anyhow::Result<Vec<Attempt>> {
        let attempts = self
            .attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut history: Vec<Attempt> = attempts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        history.sort_by_key(|a| std::cmp::Reverse(a.started_at));
        history.truncate(limit);
        Ok(history)
    }
}
