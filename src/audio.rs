use std::process::{Child, Command, ExitStatus, Stdio};

use crate::config::Config;

/// espeak-ng's default speaking rate, in words per minute.
const BASE_WPM: f32 = 175.0;

/// Fire-and-forget pronunciation. A new call interrupts any playback still
/// running; failures are logged, never surfaced.
pub trait Speaker {
    fn speak(&mut self, text: &str);

    /// Blocks until the current playback, if any, has finished.
    fn finish(&mut self) {}
}

#[derive(Debug, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&mut self, text: &str) {
        tracing::trace!(text, "speech muted");
    }
}

/// Speaks through an external TTS program invoked as
/// `<program> -v <voice> -s <wpm> <text>`.
#[derive(Debug)]
pub struct CommandSpeaker {
    program: String,
    voice: String,
    wpm: u32,
    current: Option<Child>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, voice: impl Into<String>, rate: f32) -> Self {
        Self {
            program: program.into(),
            voice: voice.into(),
            wpm: (BASE_WPM * rate).round() as u32,
            current: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.speech_command.clone(),
            config.speech_voice.clone(),
            config.speech_rate,
        )
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    /// Stops the tracked playback. Returns its exit status when it was still
    /// running and had to be killed.
    fn cancel(&mut self) -> Option<ExitStatus> {
        let mut child = self.current.take()?;
        match child.try_wait() {
            Ok(Some(_)) => None,
            _ => {
                let _ = child.kill();
                child.wait().ok()
            }
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) {
        if self.cancel().is_some() {
            tracing::debug!("previous playback interrupted");
        }
        let spawned = Command::new(&self.program)
            .arg("-v")
            .arg(&self.voice)
            .arg("-s")
            .arg(self.wpm.to_string())
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self.current = Some(child),
            Err(e) => tracing::warn!(program = %self.program, "speech unavailable: {e}"),
        }
    }

    fn finish(&mut self) {
        let Some(mut child) = self.current.take() else {
            return;
        };
        if let Err(e) = child.wait() {
            tracing::warn!("speech did not finish cleanly: {e}");
        }
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Picks the configured speaker, or a silent one when audio is off.
pub fn speaker_for(config: &Config, muted: bool) -> Box<dyn Speaker> {
    if muted || !config.audio_enabled {
        Box::new(SilentSpeaker)
    } else {
        Box::new(CommandSpeaker::from_config(config))
    }
}
