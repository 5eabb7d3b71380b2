//! TOML question bank and ladder parsing.
//!
//! Loads question banks and rank ladders from TOML files and validates
//! them at load time, so malformed configuration fails fast instead of
//! surfacing mid-test.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Category, Difficulty, OptionLabel, Question};
use crate::rank::{RankLadderSpec, RankTier};

/// A parsed question bank: categories plus the questions linked to them.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    pub categories: Vec<Category>,
    pub questions: Vec<Question>,
}

/// Intermediate TOML structure for bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    categories: Vec<TomlCategory>,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TomlCategory {
    id: u64,
    name: String,
    #[serde(default = "default_true")]
    active: bool,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u64,
    text: String,
    options: Vec<String>,
    correct: String,
    difficulty: String,
    #[serde(default)]
    categories: Vec<u64>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    relevance_until: Option<String>,
    #[serde(default = "default_true")]
    active: bool,
}

fn default_true() -> bool {
    true
}

/// Parse a bank file from disk.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;
    parse_bank_str(&content, path)
}

/// Parse a bank from a TOML string (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let categories: Vec<Category> = parsed
        .categories
        .into_iter()
        .map(|c| Category {
            id: c.id,
            name: c.name,
            active: c.active,
        })
        .collect();

    let mut category_ids = HashSet::new();
    for category in &categories {
        if !category_ids.insert(category.id) {
            anyhow::bail!("duplicate category id {} in bank", category.id);
        }
    }

    let mut question_ids = HashSet::new();
    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            if !question_ids.insert(q.id) {
                anyhow::bail!("duplicate question id {}", q.id);
            }
            let options: [String; 4] = q
                .options
                .try_into()
                .map_err(|given: Vec<String>| {
                    anyhow::anyhow!("question {} has {} options, expected 4", q.id, given.len())
                })?;
            let correct: OptionLabel = q
                .correct
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;
            let difficulty: Difficulty = q
                .difficulty
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;
            for category in &q.categories {
                if !category_ids.contains(category) {
                    anyhow::bail!("question {} references unknown category {}", q.id, category);
                }
            }
            let relevance_until = q
                .relevance_until
                .map(|date| {
                    date.parse()
                        .with_context(|| format!("question {}: bad relevance date '{date}'", q.id))
                })
                .transpose()?;

            Ok(Question {
                id: q.id,
                text: q.text,
                options,
                correct,
                difficulty,
                category_ids: q.categories,
                explanation: q.explanation,
                relevance_until,
                active: q.active,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        categories,
        questions,
    })
}

/// Intermediate TOML structure for ladder files.
#[derive(Debug, Deserialize)]
struct TomlLadderFile {
    #[serde(default)]
    tiers: Vec<TomlTier>,
}

#[derive(Debug, Deserialize)]
struct TomlTier {
    name: String,
    #[serde(default)]
    icon: String,
    fraction: f64,
}

/// Parse and validate a ladder file from disk.
pub fn parse_ladder(path: &Path) -> Result<RankLadderSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rank ladder: {}", path.display()))?;
    parse_ladder_str(&content, path)
}

/// Parse and validate a ladder from a TOML string.
pub fn parse_ladder_str(content: &str, source_path: &Path) -> Result<RankLadderSpec> {
    let parsed: TomlLadderFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let spec = RankLadderSpec {
        tiers: parsed
            .tiers
            .into_iter()
            .map(|t| RankTier {
                name: t.name,
                icon: t.icon,
                fraction: t.fraction,
            })
            .collect(),
    };
    spec.validate()
        .with_context(|| format!("invalid rank ladder: {}", source_path.display()))?;
    Ok(spec)
}
