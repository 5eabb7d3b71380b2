//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn skillcert() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("skillcert").unwrap()
}

const BANK: &str = r#"[bank]
id = "test"
name = "Test bank"

[[categories]]
id = 1
name = "Billing"

[[questions]]
id = 1
text = "Easy one?"
options = ["a", "b", "c", "d"]
correct = "A"
difficulty = "easy"
categories = [1]

[[questions]]
id = 2
text = "Easy two?"
options = ["a", "b", "c", "d"]
correct = "B"
difficulty = "easy"
categories = [1]

[[questions]]
id = 3
text = "Medium one?"
options = ["a", "b", "c", "d"]
correct = "C"
difficulty = "medium"
categories = [1]

[[questions]]
id = 4
text = "Hard one?"
options = ["a", "b", "c", "d"]
correct = "D"
difficulty = "hard"
categories = [1]
"#;

const LADDER: &str = r#"
[[tiers]]
name = "Новичок"
icon = "🔰"
fraction = 0.0

[[tiers]]
name = "Практик"
icon = "📘"
fraction = 0.16

[[tiers]]
name = "Абсолют"
icon = "🏆"
fraction = 1.0
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn draw_reports_distribution_and_questions() {
    let dir = TempDir::new().unwrap();
    let bank = write(&dir, "bank.toml", BANK);

    skillcert()
        .arg("draw")
        .arg("--bank")
        .arg(&bank)
        .arg("--count")
        .arg("4")
        .arg("--seed")
        .arg("7")
        .assert()
        .success()
        .stdout(predicate::str::contains("Difficulty"))
        .stdout(predicate::str::contains("Easy one?").or(predicate::str::contains("Easy two?")))
        .stdout(predicate::str::contains("Hard one?"));
}

#[test]
fn draw_flags_a_short_pool() {
    let dir = TempDir::new().unwrap();
    let bank = write(&dir, "bank.toml", BANK);

    // 6 requested but only 4 exist: every pool runs dry.
    skillcert()
        .arg("draw")
        .arg("--bank")
        .arg(&bank)
        .arg("--count")
        .arg("6")
        .assert()
        .success()
        .stdout(predicate::str::contains("deviates from the ideal mix"));
}

#[test]
fn draw_on_empty_bank_fails() {
    let dir = TempDir::new().unwrap();
    let bank = write(
        &dir,
        "bank.toml",
        "[bank]\nid = \"empty\"\nname = \"Empty\"\n",
    );

    skillcert()
        .arg("draw")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no questions available"));
}

#[test]
fn validate_accepts_good_files() {
    let dir = TempDir::new().unwrap();
    let bank = write(&dir, "bank.toml", BANK);
    let ladder = write(&dir, "ladder.toml", LADDER);

    skillcert()
        .arg("validate")
        .arg("--bank")
        .arg(&bank)
        .arg("--ladder")
        .arg(&ladder)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 questions"))
        .stdout(predicate::str::contains("3 tiers"))
        .stdout(predicate::str::contains("All files valid"));
}

#[test]
fn validate_rejects_a_bad_ladder() {
    let dir = TempDir::new().unwrap();
    let ladder = write(
        &dir,
        "ladder.toml",
        "[[tiers]]\nname = \"Практик\"\nfraction = 0.16\n",
    );

    skillcert()
        .arg("validate")
        .arg("--ladder")
        .arg(&ladder)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_without_arguments_fails() {
    skillcert()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to validate"));
}

#[test]
fn summary_renders_rank_and_gauge() {
    let dir = TempDir::new().unwrap();
    let bank = write(&dir, "bank.toml", BANK);
    let ladder = write(&dir, "ladder.toml", LADDER);
    let now = chrono::Utc::now().to_rfc3339();
    let results = write(
        &dir,
        "results.toml",
        &format!(
            "user = 42\n\n[[results]]\ncategory = 1\nbest_score = 92.5\nlast_passed = \"{now}\"\n"
        ),
    );

    skillcert()
        .arg("summary")
        .arg("--bank")
        .arg(&bank)
        .arg("--ladder")
        .arg(&ladder)
        .arg("--results")
        .arg(&results)
        .assert()
        .success()
        .stdout(predicate::str::contains("Абсолют"))
        .stdout(predicate::str::contains("[■■■■■■■■■□]"))
        .stdout(predicate::str::contains("93 / 100"));
}

#[test]
fn summary_json_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    let bank = write(&dir, "bank.toml", BANK);
    let ladder = write(&dir, "ladder.toml", LADDER);
    let results = write(&dir, "results.toml", "user = 42\n");

    skillcert()
        .arg("summary")
        .arg("--bank")
        .arg(&bank)
        .arg("--ladder")
        .arg(&ladder)
        .arg("--results")
        .arg(&results)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"certification_points\": 0"))
        .stdout(predicate::str::contains("\"max_achievable_points\": 100"));
}

#[test]
fn init_creates_starter_files() {
    let dir = TempDir::new().unwrap();

    skillcert()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created skillcert.toml"))
        .stdout(predicate::str::contains("Created ladder.toml"))
        .stdout(predicate::str::contains("Created bank.toml"));

    // The starter files must pass their own validation.
    skillcert()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg("bank.toml")
        .arg("--ladder")
        .arg("ladder.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All files valid"));
}
