//! Deployment settings and the bounded-TTL read-through cache.
//!
//! Settings are never process-wide globals: a hot-reloadable source is
//! injected into the engine, which wraps it in a [`TtlCache`] so repeated
//! reads within one burst of requests do not hammer the backing store.

use std::sync::Mutex;
use std::time::{Duration as StdDuration, Instant};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::mastery::MasteryWindows;

/// Certification settings for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertSettings {
    /// Days a passed category keeps counting toward points.
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    /// Days before expiry at which a category is flagged expiring soon.
    #[serde(default = "default_warning_days")]
    pub warning_days: u32,
    /// Questions drawn per test.
    #[serde(default = "default_questions_per_test")]
    pub questions_per_test: usize,
    /// Time limit for one test.
    #[serde(default = "default_time_limit_minutes")]
    pub time_limit_minutes: u32,
    /// Inclusive passing threshold.
    #[serde(default = "default_passing_score_percent")]
    pub passing_score_percent: f64,
}

fn default_validity_days() -> u32 {
    30
}
fn default_warning_days() -> u32 {
    7
}
fn default_questions_per_test() -> usize {
    20
}
fn default_time_limit_minutes() -> u32 {
    15
}
fn default_passing_score_percent() -> f64 {
    80.0
}

impl Default for CertSettings {
    fn default() -> Self {
        Self {
            validity_days: default_validity_days(),
            warning_days: default_warning_days(),
            questions_per_test: default_questions_per_test(),
            time_limit_minutes: default_time_limit_minutes(),
            passing_score_percent: default_passing_score_percent(),
        }
    }
}

impl CertSettings {
    /// The mastery windows these settings imply.
    pub fn windows(&self) -> MasteryWindows {
        MasteryWindows {
            validity: Duration::days(i64::from(self.validity_days)),
            warning: Duration::days(i64::from(self.warning_days)),
        }
    }

    pub fn validity_window(&self) -> Duration {
        Duration::days(i64::from(self.validity_days))
    }
}

/// A bounded-TTL read-through cache for hot-reloadable configuration.
///
/// Holds the last fetched value for at most `ttl`; after that the next
/// read goes back to the source. A failed refresh propagates the error
/// and leaves the slot empty so the next read retries.
pub struct TtlCache<T: Clone> {
    ttl: StdDuration,
    slot: Mutex<Option<(Instant, T)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: StdDuration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached value if it is still fresh, otherwise refresh it
    /// through `fetch` and cache the result.
    pub fn get_or_refresh(
        &self,
        fetch: impl FnOnce() -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some((stored_at, value)) = slot.as_ref() {
            if stored_at.elapsed() < self.ttl {
                return Ok(value.clone());
            }
        }
        let fresh = fetch()?;
        *slot = Some((Instant::now(), fresh.clone()));
        Ok(fresh)
    }

    /// Drop the cached value; the next read refreshes.
    pub fn invalidate(&self) {
        *self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}
