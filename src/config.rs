use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const MIN_SPEECH_RATE: f32 = 0.5;
const MAX_SPEECH_RATE: f32 = 2.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// External corpus file; the embedded corpus is used when unset.
    #[serde(default)]
    pub corpus_path: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_audio_enabled")]
    pub audio_enabled: bool,
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    #[serde(default = "default_speech_voice")]
    pub speech_voice: String,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocabdrill")
        .to_string_lossy()
        .to_string()
}
fn default_audio_enabled() -> bool {
    true
}
fn default_speech_command() -> String {
    "espeak-ng".to_string()
}
fn default_speech_voice() -> String {
    "es".to_string()
}
fn default_speech_rate() -> f32 {
    0.9
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: None,
            data_dir: default_data_dir(),
            audio_enabled: default_audio_enabled(),
            speech_command: default_speech_command(),
            speech_voice: default_speech_voice(),
            speech_rate: default_speech_rate(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocabdrill")
            .join("config.toml")
    }

    /// Clamp out-of-range values left by hand edits.
    pub fn validate(&mut self) {
        if !self.speech_rate.is_finite() {
            self.speech_rate = default_speech_rate();
        }
        self.speech_rate = self.speech_rate.clamp(MIN_SPEECH_RATE, MAX_SPEECH_RATE);
        if self.speech_command.trim().is_empty() {
            self.speech_command = default_speech_command();
        }
        if self.speech_voice.trim().is_empty() {
            self.speech_voice = default_speech_voice();
        }
        if self.corpus_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.corpus_path = None;
        }
    }
}
