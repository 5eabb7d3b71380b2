//! TOML-backed configuration sources.
//!
//! Settings and rank ladders live in files a deployment can edit without
//! redeploying: each `current()` call re-reads the file, and the engine's
//! bounded-TTL cache keeps the read rate sane. Parse failures surface as
//! [`StoreError::Corrupt`] so callers can tell a bad edit from an
//! unreachable disk.

use std::path::{Path, PathBuf};

use skillcert_core::parser;
use skillcert_core::rank::RankLadderSpec;
use skillcert_core::settings::CertSettings;
use skillcert_core::traits::{LadderSource, SettingsSource};

use crate::error::StoreError;
use crate::memory::InMemoryQuestionRepository;

/// Hot-reloadable settings file.
pub struct TomlSettingsSource {
    path: PathBuf,
}

impl TomlSettingsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsSource for TomlSettingsSource {
    fn current(&self) -> anyhow::Result<CertSettings> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            StoreError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;
        let settings: CertSettings = toml::from_str(&content)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))?;
        Ok(settings)
    }
}

/// Hot-reloadable rank ladder file. Validation happens at every reload, so
/// a broken edit fails fast instead of resolving to a wrong rank.
pub struct TomlLadderSource {
    path: PathBuf,
}

impl TomlLadderSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LadderSource for TomlLadderSource {
    fn current(&self) -> anyhow::Result<RankLadderSpec> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            StoreError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;
        let spec = parser::parse_ladder_str(&content, &self.path)
            .map_err(|e| StoreError::Corrupt(format!("{e:#}")))?;
        Ok(spec)
    }
}

/// Load a question bank file into an in-memory repository.
pub fn load_bank_repository(path: &Path) -> anyhow::Result<InMemoryQuestionRepository> {
    let bank = parser::parse_bank(path)?;
    tracing::debug!(
        bank = %bank.id,
        questions = bank.questions.len(),
        categories = bank.categories.len(),
        "question bank loaded"
    );
    Ok(InMemoryQuestionRepository::from_bank(bank))
}
