//! The `skillcert summary` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use skillcert_core::engine::{CertEngine, CertEngineConfig};
use skillcert_core::model::CategoryResult;
use skillcert_core::traits::{SettingsSource, StaticSettings};
use skillcert_store::file::{load_bank_repository, TomlLadderSource, TomlSettingsSource};
use skillcert_store::{InMemoryAttemptLog, InMemoryCategoryResultStore};

/// Results file: the user's pass records as exported from the deployment.
#[derive(Debug, Deserialize)]
struct TomlResultsFile {
    user: u64,
    #[serde(default)]
    results: Vec<TomlPassRecord>,
}

#[derive(Debug, Deserialize)]
struct TomlPassRecord {
    category: u64,
    best_score: f64,
    last_passed: String,
}

fn parse_results(path: &Path) -> Result<(u64, Vec<CategoryResult>)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read results file: {}", path.display()))?;
    let parsed: TomlResultsFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse results file: {}", path.display()))?;

    let records = parsed
        .results
        .into_iter()
        .map(|r| {
            let last_passed_at = DateTime::parse_from_rfc3339(&r.last_passed)
                .with_context(|| {
                    format!("category {}: bad timestamp '{}'", r.category, r.last_passed)
                })?
                .with_timezone(&Utc);
            Ok(CategoryResult {
                category_id: r.category,
                best_score: r.best_score,
                last_passed_at,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((parsed.user, records))
}

pub async fn execute(
    bank: PathBuf,
    ladder: PathBuf,
    results: PathBuf,
    settings: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let repository = load_bank_repository(&bank)?;
    let (user_id, records) = parse_results(&results)?;
    tracing::debug!(user_id, records = records.len(), "results file loaded");

    let result_store = InMemoryCategoryResultStore::new();
    for record in records {
        result_store.seed(user_id, record);
    }

    let settings_source: Arc<dyn SettingsSource> = match settings {
        Some(path) => Arc::new(TomlSettingsSource::new(path)),
        None => Arc::new(StaticSettings(Default::default())),
    };

    let engine = CertEngine::new(
        Arc::new(repository),
        Arc::new(result_store),
        Arc::new(InMemoryAttemptLog::new()),
        settings_source,
        Arc::new(TomlLadderSource::new(ladder)),
        CertEngineConfig::default(),
    );

    let summary = engine.profile_summary(user_id, Utc::now()).await?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => {
            println!(
                "Rank: {} {}   {} / {} points",
                summary.rank.icon,
                summary.rank.name,
                summary.certification_points,
                summary.max_achievable_points
            );
            println!(
                "Progress: {} {}%",
                summary.progress_bar, summary.progress_percent
            );
            if let (Some(next), Some(to_next)) = (&summary.next_rank, summary.points_to_next) {
                println!("Next rank: {} {} in {} points", next.icon, next.name, to_next);
            } else {
                println!("Top rank reached.");
            }
            println!(
                "Categories: {} passed, {} expiring soon, {} expired",
                summary.passed_categories,
                summary.expiring_soon.len(),
                summary.expired_categories
            );
        }
    }

    Ok(())
}
