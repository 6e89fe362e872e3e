use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;

use crate::store::schema::{MasteryRecord, ProgressData};
use crate::store::{MasteryStatus, MasteryStore};

const PROGRESS_FILE: &str = "progress.json";

/// Mastery statuses kept in `progress.json` under the data directory. Every
/// mutation rewrites the whole file atomically.
pub struct JsonMasteryStore {
    base_dir: PathBuf,
    data: ProgressData,
}

impl JsonMasteryStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        let data = load_progress(&base_dir.join(PROGRESS_FILE));
        Ok(Self { base_dir, data })
    }

    pub fn data(&self) -> &ProgressData {
        &self.data
    }

    fn file_path(&self) -> PathBuf {
        self.base_dir.join(PROGRESS_FILE)
    }

    /// Writes `data` and only then adopts it, so a failed write leaves the
    /// in-memory marks matching the file.
    fn commit(&mut self, data: ProgressData) -> Result<()> {
        let path = self.file_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(&data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        tracing::debug!(path = %path.display(), records = data.words.len(), "progress saved");
        self.data = data;
        Ok(())
    }
}

/// A missing file is a fresh start. An unreadable or stale file is also
/// treated as empty so a bad write never locks the learner out.
fn load_progress(path: &Path) -> ProgressData {
    if !path.exists() {
        return ProgressData::default();
    }
    let parsed = fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|content| Ok(serde_json::from_str::<ProgressData>(&content)?));
    match parsed {
        Ok(data) if !data.needs_reset() => data,
        Ok(data) => {
            tracing::warn!(
                schema_version = data.schema_version,
                "progress file has an unknown schema version, starting fresh"
            );
            ProgressData::default()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "could not load progress: {e:#}");
            ProgressData::default()
        }
    }
}

impl MasteryStore for JsonMasteryStore {
    fn status(&self, word_id: &str) -> MasteryStatus {
        self.data
            .words
            .get(word_id)
            .map(|r| r.status)
            .unwrap_or_default()
    }

    fn set_status(&mut self, word_id: &str, status: MasteryStatus) -> Result<()> {
        let mut data = self.data.clone();
        if status == MasteryStatus::Unseen {
            data.words.remove(word_id);
        } else {
            data.words.insert(
                word_id.to_string(),
                MasteryRecord {
                    status,
                    updated_at: Utc::now(),
                },
            );
        }
        self.commit(data)
    }

    fn clear_statuses(&mut self, word_ids: &[&str]) -> Result<()> {
        let mut data = self.data.clone();
        for id in word_ids {
            data.words.remove(*id);
        }
        self.commit(data)
    }
}
