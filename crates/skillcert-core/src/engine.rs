//! Central certification engine.
//!
//! Wires the storage seams and hot-reloadable configuration together and
//! exposes the three entry points the front-end calls: starting a test,
//! completing an attempt, and rendering a profile summary. Each user's
//! evaluation is a strictly sequential pipeline; evaluations for
//! different users share nothing mutable and fan out freely.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assembler::{AssembledTest, TestAssembler};
use crate::error::{AssemblyError, LadderError};
use crate::mastery;
use crate::model::{
    Attempt, AttemptStatus, DifficultyQuota, OptionLabel, PresentedQuestion, RankDefinition,
};
use crate::progress;
use crate::rank::{self, RankLadderSpec};
use crate::scoring::{score_attempt, AttemptOutcome};
use crate::settings::{CertSettings, TtlCache};
use crate::shuffle::shuffle_question;
use crate::traits::{
    AttemptLog, CancelToken, CategoryResultStore, LadderSource, QuestionRepository, SettingsSource,
};

/// Engine construction options.
#[derive(Debug, Clone)]
pub struct CertEngineConfig {
    /// How long fetched settings and ladder config stay cached before the
    /// next read goes back to the source.
    pub config_ttl: StdDuration,
}

impl Default for CertEngineConfig {
    fn default() -> Self {
        Self {
            config_ttl: StdDuration::from_secs(60),
        }
    }
}

/// A freshly started attempt plus the assembly diagnostics the caller may
/// want to surface ("the test deviates from the ideal difficulty mix").
#[derive(Debug, Clone)]
pub struct AttemptDraw {
    pub attempt: Attempt,
    pub target: DifficultyQuota,
    pub actual: DifficultyQuota,
    pub fallback_used: bool,
}

/// Profile summary for the menu renderer: points, percentage, gauge, and
/// rank standing, all derived from the currently valid categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub certification_points: u32,
    pub max_achievable_points: u32,
    pub progress_percent: u8,
    pub progress_bar: String,
    pub rank: RankDefinition,
    pub next_rank: Option<RankDefinition>,
    pub points_to_next: Option<u32>,
    /// Categories currently counting toward points.
    pub passed_categories: usize,
    /// Category ids whose pass lapses within the warning window.
    pub expiring_soon: Vec<u64>,
    /// Previously passed categories whose window has lapsed.
    pub expired_categories: usize,
}

impl ProfileSummary {
    /// Serialize for handoff to the front-end renderer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The central certification engine.
pub struct CertEngine {
    questions: Arc<dyn QuestionRepository>,
    assembler: TestAssembler,
    results: Arc<dyn CategoryResultStore>,
    attempts: Arc<dyn AttemptLog>,
    settings: Arc<dyn SettingsSource>,
    ladder: Arc<dyn LadderSource>,
    settings_cache: TtlCache<CertSettings>,
    ladder_cache: TtlCache<RankLadderSpec>,
}

impl CertEngine {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        results: Arc<dyn CategoryResultStore>,
        attempts: Arc<dyn AttemptLog>,
        settings: Arc<dyn SettingsSource>,
        ladder: Arc<dyn LadderSource>,
        config: CertEngineConfig,
    ) -> Self {
        Self {
            assembler: TestAssembler::new(Arc::clone(&questions)),
            questions,
            results,
            attempts,
            settings,
            ladder,
            settings_cache: TtlCache::new(config.config_ttl),
            ladder_cache: TtlCache::new(config.config_ttl),
        }
    }

    fn settings(&self) -> Result<CertSettings> {
        self.settings_cache
            .get_or_refresh(|| self.settings.current())
    }

    /// The settings in effect right now, for callers that need the time
    /// limit or passing threshold up front. Served through the same
    /// bounded-TTL cache as the engine's own reads.
    pub fn current_settings(&self) -> Result<CertSettings> {
        self.settings()
    }

    fn ladder_spec(&self) -> Result<RankLadderSpec> {
        self.ladder_cache.get_or_refresh(|| self.ladder.current())
    }

    /// Assemble a balanced test without starting an attempt. Size defaults
    /// to the configured questions-per-test.
    pub async fn build_test<R>(
        &self,
        count: Option<usize>,
        category_id: Option<u64>,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> Result<AssembledTest, AssemblyError>
    where
        R: Rng + Send + ?Sized,
    {
        let count = match count {
            Some(count) => count,
            None => self.settings()?.questions_per_test,
        };
        self.assembler
            .build_test(count, category_id, rng, cancel)
            .await
    }

    /// Assemble a test, shuffle each question's options for presentation,
    /// and record the attempt as in-progress.
    pub async fn start_attempt<R>(
        &self,
        user_id: u64,
        category_id: Option<u64>,
        rng: &mut R,
        cancel: &CancelToken,
        now: DateTime<Utc>,
    ) -> Result<AttemptDraw, AssemblyError>
    where
        R: Rng + Send + ?Sized,
    {
        let test = self.build_test(None, category_id, rng, cancel).await?;

        let presented: Vec<PresentedQuestion> = test
            .questions
            .into_iter()
            .map(|question| {
                let shuffled = shuffle_question(&question, rng);
                PresentedQuestion { question, shuffled }
            })
            .collect();

        let attempt = Attempt::start(user_id, category_id, presented, now);
        self.attempts.record(&attempt).await?;

        tracing::info!(
            user_id,
            attempt_id = %attempt.id,
            questions = attempt.presented.len(),
            fallback = test.fallback_used,
            "attempt started"
        );

        Ok(AttemptDraw {
            attempt,
            target: test.target,
            actual: test.actual,
            fallback_used: test.fallback_used,
        })
    }

    /// Score a finished attempt, persist its terminal state, and record a
    /// passing category-scoped score against the user's pass history.
    pub async fn complete_attempt(
        &self,
        attempt: &mut Attempt,
        answers: &[Option<OptionLabel>],
        now: DateTime<Utc>,
    ) -> Result<AttemptOutcome> {
        let settings = self.settings()?;
        let outcome = score_attempt(attempt, answers, settings.passing_score_percent);

        attempt.status = AttemptStatus::Completed;
        attempt.completed_at = Some(now);
        attempt.score_percent = Some(outcome.score_percent);
        self.attempts
            .record(attempt)
            .await
            .context("failed to persist completed attempt")?;

        if outcome.passed {
            if let Some(category_id) = attempt.category_id {
                let advanced = self
                    .results
                    .upsert_if_better(
                        attempt.user_id,
                        category_id,
                        outcome.score_percent,
                        now,
                        settings.validity_window(),
                    )
                    .await
                    .context("failed to record category pass")?;
                tracing::info!(
                    user_id = attempt.user_id,
                    category_id,
                    score = outcome.score_percent,
                    advanced,
                    "category pass recorded"
                );
            }
        }

        Ok(outcome)
    }

    /// Abandon an in-progress attempt. Retained for audit, excluded from
    /// scoring.
    pub async fn abandon_attempt(
        &self,
        attempt: &mut Attempt,
        status: AttemptStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        debug_assert!(matches!(
            status,
            AttemptStatus::Cancelled | AttemptStatus::Expired
        ));
        attempt.status = status;
        attempt.completed_at = Some(now);
        self.attempts.record(attempt).await
    }

    /// Run the profile pipeline: mastery tracking, point aggregation, and
    /// rank resolution, in that order.
    pub async fn profile_summary(
        &self,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> Result<ProfileSummary> {
        let settings = self.settings()?;
        let ladder_spec = self.ladder_spec()?;

        // Two independent read-only fetches; merge order is fixed below.
        let (active_categories, results) = futures::try_join!(
            self.questions.categories(true),
            self.results.get_all(user_id),
        )
        .context("failed to load profile inputs")?;
        let max_achievable_points = (active_categories.len() as u32) * 100;

        let standings = mastery::evaluate(&results, now, settings.windows());
        let progress = progress::aggregate(&standings, max_achievable_points);

        let (current, next, points_to_next) = if max_achievable_points == 0 {
            // No active categories: nothing is achievable, so only the base
            // tier is meaningful.
            let base = ladder_spec.tiers.first().ok_or(LadderError::Empty)?;
            (
                RankDefinition {
                    name: base.name.clone(),
                    icon: base.icon.clone(),
                    min_points: 0,
                },
                None,
                None,
            )
        } else {
            let ladder = ladder_spec.materialize(max_achievable_points)?;
            let standing = rank::resolve(progress.points, &ladder)?;
            (standing.current, standing.next, standing.points_to_next)
        };

        let passed_categories = standings.values().filter(|s| s.valid_pass).count();

        Ok(ProfileSummary {
            certification_points: progress.points,
            max_achievable_points,
            progress_percent: progress.percent,
            progress_bar: progress.bar,
            rank: current,
            next_rank: next,
            points_to_next,
            passed_categories,
            expiring_soon: mastery::expiring_soon(&standings),
            expired_categories: mastery::expired_count(&standings),
        })
    }
}
