pub mod json_store;
pub mod schema;

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Learner-assigned proficiency tag. `Unseen` is never stored: it is what an
/// absent record reads as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MasteryStatus {
    #[default]
    Unseen,
    Green,
    Yellow,
    Red,
}

impl MasteryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MasteryStatus::Unseen => "unseen",
            MasteryStatus::Green => "green",
            MasteryStatus::Yellow => "yellow",
            MasteryStatus::Red => "red",
        }
    }

    /// Study sessions skip words the learner already marked as known.
    pub fn needs_practice(self) -> bool {
        self != MasteryStatus::Green
    }
}

impl fmt::Display for MasteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-word mastery persisted across sessions. Writes are idempotent.
pub trait MasteryStore {
    fn status(&self, word_id: &str) -> MasteryStatus;

    /// Persists immediately. Setting `Unseen` drops the record.
    fn set_status(&mut self, word_id: &str, status: MasteryStatus) -> Result<()>;

    fn clear_statuses(&mut self, word_ids: &[&str]) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryMasteryStore {
    statuses: HashMap<String, MasteryStatus>,
}

impl MemoryMasteryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

impl MasteryStore for MemoryMasteryStore {
    fn status(&self, word_id: &str) -> MasteryStatus {
        self.statuses.get(word_id).copied().unwrap_or_default()
    }

    fn set_status(&mut self, word_id: &str, status: MasteryStatus) -> Result<()> {
        if status == MasteryStatus::Unseen {
            self.statuses.remove(word_id);
        } else {
            self.statuses.insert(word_id.to_string(), status);
        }
        Ok(())
    }

    fn clear_statuses(&mut self, word_ids: &[&str]) -> Result<()> {
        for id in word_ids {
            self.statuses.remove(*id);
        }
        Ok(())
    }
}
