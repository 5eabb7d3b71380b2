//! The `skillcert validate` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;

use skillcert_core::model::Difficulty;
use skillcert_core::parser;

pub fn execute(bank: Option<PathBuf>, ladder: Option<PathBuf>) -> Result<()> {
    if bank.is_none() && ladder.is_none() {
        anyhow::bail!("nothing to validate: pass --bank and/or --ladder");
    }

    if let Some(path) = bank {
        let bank = parser::parse_bank(&path)?;
        let mut per_difficulty: HashMap<Difficulty, usize> = HashMap::new();
        for question in &bank.questions {
            *per_difficulty.entry(question.difficulty).or_default() += 1;
        }
        println!(
            "Bank '{}': {} categories, {} questions",
            bank.name,
            bank.categories.len(),
            bank.questions.len()
        );
        for difficulty in Difficulty::ALL {
            println!(
                "  {difficulty}: {}",
                per_difficulty.get(&difficulty).copied().unwrap_or(0)
            );
        }
    }

    if let Some(path) = ladder {
        let spec = parser::parse_ladder(&path)?;
        println!("Ladder: {} tiers", spec.tiers.len());
        for tier in &spec.tiers {
            println!("  {} {} at {:.0}%", tier.icon, tier.name, tier.fraction * 100.0);
        }
    }

    println!("All files valid.");
    Ok(())
}
