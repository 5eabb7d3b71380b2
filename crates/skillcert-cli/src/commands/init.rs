//! The `skillcert init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    for (path, content) in [
        ("skillcert.toml", SAMPLE_SETTINGS),
        ("ladder.toml", SAMPLE_LADDER),
        ("bank.toml", EXAMPLE_BANK),
    ] {
        if std::path::Path::new(path).exists() {
            println!("{path} already exists, skipping.");
        } else {
            std::fs::write(path, content)?;
            println!("Created {path}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Fill bank.toml with your categories and questions");
    println!("  2. Run: skillcert validate --bank bank.toml --ladder ladder.toml");
    println!("  3. Run: skillcert draw --bank bank.toml --count 9");

    Ok(())
}

const SAMPLE_SETTINGS: &str = r#"# skillcert settings

validity_days = 30
warning_days = 7
questions_per_test = 20
time_limit_minutes = 15
passing_score_percent = 80.0
"#;

const SAMPLE_LADDER: &str = r#"# Rank ladder. Thresholds are fractions of the maximum achievable
# points (active categories x 100), so ranks keep their meaning as the
# category set changes. Tiers must start at 0.0 and end at 1.0, strictly
# increasing.

[[tiers]]
name = "Новичок"
icon = "🔰"
fraction = 0.0

[[tiers]]
name = "Практик"
icon = "📘"
fraction = 0.16

[[tiers]]
name = "Специалист"
icon = "⭐"
fraction = 0.36

[[tiers]]
name = "Мастер аттестации"
icon = "🎖"
fraction = 0.9

[[tiers]]
name = "Абсолют"
icon = "🏆"
fraction = 1.0
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example bank"

[[categories]]
id = 1
name = "Billing"

[[categories]]
id = 2
name = "Hardware"

[[questions]]
id = 1
text = "Which form starts a refund?"
options = ["F-1", "F-2", "F-3", "F-4"]
correct = "B"
difficulty = "easy"
categories = [1]
explanation = "F-2 covers refunds."

[[questions]]
id = 2
text = "Which port does HTTPS use by default?"
options = ["80", "443", "8080", "22"]
correct = "B"
difficulty = "medium"
categories = [2]

[[questions]]
id = 3
text = "Which document defines the escalation path for payment disputes?"
options = ["Runbook A", "Runbook B", "Policy 7", "Policy 9"]
correct = "C"
difficulty = "hard"
categories = [1]
"#;
