//! The `skillcert draw` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use skillcert_core::assembler::{interleave, TestAssembler};
use skillcert_core::model::Difficulty;
use skillcert_core::traits::CancelToken;
use skillcert_store::file::load_bank_repository;

pub async fn execute(
    bank: PathBuf,
    count: usize,
    category: Option<u64>,
    seed: Option<u64>,
    shuffle_groups: bool,
) -> Result<()> {
    let repository = load_bank_repository(&bank)?
        .with_as_of(chrono::Utc::now().date_naive());
    let assembler = TestAssembler::new(Arc::new(repository));

    let mut rng: StdRng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut test = assembler
        .build_test(count, category, &mut rng, &CancelToken::new())
        .await?;

    if shuffle_groups {
        interleave(&mut test.questions, &mut rng);
    }

    let mut table = Table::new();
    table.set_header(vec!["Difficulty", "Target", "Drawn"]);
    for difficulty in Difficulty::ALL {
        table.add_row(vec![
            Cell::new(difficulty),
            Cell::new(test.target.get(difficulty)),
            Cell::new(test.actual.get(difficulty)),
        ]);
    }
    table.add_row(vec![
        Cell::new("total"),
        Cell::new(test.target.total()),
        Cell::new(test.actual.total()),
    ]);
    println!("{table}");

    if test.fallback_used {
        println!("Note: one or more difficulty pools were short; the draw deviates from the ideal mix.");
    }

    println!();
    for (index, question) in test.questions.iter().enumerate() {
        println!(
            "{:>3}. [{}] #{} {}",
            index + 1,
            question.difficulty,
            question.id,
            question.text
        );
    }

    Ok(())
}
