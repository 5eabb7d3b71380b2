//! skillcert-store — storage seam implementations.
//!
//! Implements the `QuestionRepository`, `CategoryResultStore`, and
//! `AttemptLog` traits in memory (reference semantics and test fixtures)
//! and the configuration sources against TOML files (hot-reloadable
//! settings and rank ladders).

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::{TomlLadderSource, TomlSettingsSource};
pub use memory::{InMemoryAttemptLog, InMemoryCategoryResultStore, InMemoryQuestionRepository};
