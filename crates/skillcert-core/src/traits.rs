//! Core trait definitions for the storage and configuration seams.
//!
//! These traits are implemented by the `skillcert-store` crate (in-memory
//! and TOML-backed reference implementations) and by whatever durable
//! backend a deployment plugs in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::model::{Attempt, Category, CategoryResult, Difficulty, Question};
use crate::rank::RankLadderSpec;
use crate::settings::CertSettings;

// ---------------------------------------------------------------------------
// Question repository
// ---------------------------------------------------------------------------

/// Read access to the question bank.
///
/// Implementations must return fresh data on every call — the assembler
/// never caches question copies across tests, so that bank edits cannot
/// retroactively leak into an assembled presentation.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Eligible (non-outdated) questions for one difficulty, optionally
    /// scoped to a category.
    async fn fetch(
        &self,
        category_id: Option<u64>,
        difficulty: Difficulty,
        active_only: bool,
    ) -> anyhow::Result<Vec<Question>>;

    /// Known categories, optionally restricted to active ones.
    async fn categories(&self, active_only: bool) -> anyhow::Result<Vec<Category>>;
}

// ---------------------------------------------------------------------------
// Category result store
// ---------------------------------------------------------------------------

/// Read/write access to per-(user, category) pass records.
#[async_trait]
pub trait CategoryResultStore: Send + Sync {
    /// All pass records for a user.
    async fn get_all(&self, user_id: u64) -> anyhow::Result<Vec<CategoryResult>>;

    /// Record a passing score. Must be a single atomic read-modify-write
    /// keyed by (user, category): within a live validity window the stored
    /// best is monotonically non-decreasing, and a pass after the window
    /// has lapsed starts a fresh window with this score as its best.
    ///
    /// Returns `true` when the stored best advanced. A concurrent write
    /// that already recorded an equal-or-better score is an idempotent
    /// no-op: the timestamp still refreshes, the call returns `false`.
    async fn upsert_if_better(
        &self,
        user_id: u64,
        category_id: u64,
        score: f64,
        now: DateTime<Utc>,
        validity_window: Duration,
    ) -> anyhow::Result<bool>;
}

// ---------------------------------------------------------------------------
// Attempt log
// ---------------------------------------------------------------------------

/// Append/update access to the attempt audit log. Attempts are never
/// deleted; terminal-state updates overwrite by id.
#[async_trait]
pub trait AttemptLog: Send + Sync {
    /// Insert or replace an attempt by id.
    async fn record(&self, attempt: &Attempt) -> anyhow::Result<()>;

    /// Most recent attempts for a user, newest first.
    async fn history(&self, user_id: u64, limit: usize) -> anyhow::Result<Vec<Attempt>>;
}

// ---------------------------------------------------------------------------
// Hot-reloadable configuration sources
// ---------------------------------------------------------------------------

/// Source of the deployment's certification settings. `current()` may be
/// called often; the engine wraps it in a bounded-TTL cache.
pub trait SettingsSource: Send + Sync {
    fn current(&self) -> anyhow::Result<CertSettings>;
}

/// Source of the deployment's rank ladder, expressed as fractions of the
/// maximum achievable points so the named ranks stay meaningful as the
/// active category count changes.
pub trait LadderSource: Send + Sync {
    fn current(&self) -> anyhow::Result<RankLadderSpec>;
}

/// Fixed in-process settings, for tests and one-shot tools.
pub struct StaticSettings(pub CertSettings);

impl SettingsSource for StaticSettings {
    fn current(&self) -> anyhow::Result<CertSettings> {
        Ok(self.0.clone())
    }
}

/// Fixed in-process ladder, for tests and one-shot tools.
pub struct StaticLadder(pub RankLadderSpec);

impl LadderSource for StaticLadder {
    fn current(&self) -> anyhow::Result<RankLadderSpec> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// A cancellation signal owned by the caller (typically the transport
/// layer's request timeout). The core checks it before issuing repository
/// calls and aborts with a distinguishable error instead of returning a
/// partial result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_flips_once() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());

        let clone = token.clone();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn static_sources_return_their_value() {
        let settings = StaticSettings(CertSettings::default());
        assert_eq!(settings.current().unwrap(), CertSettings::default());
    }
}
