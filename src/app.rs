use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::audio::{self, Speaker};
use crate::config::Config;
use crate::corpus::{TopicScope, Vocabulary, Word, WordRepository};
use crate::session::{QuizMode, SessionEngine, SessionReport, SessionStart};
use crate::store::json_store::JsonMasteryStore;
use crate::store::{MasteryStatus, MasteryStore, MemoryMasteryStore};
use crate::ui;

pub struct App {
    pub config: Config,
    pub vocab: Vocabulary,
    pub store: Box<dyn MasteryStore>,
    pub speaker: Box<dyn Speaker>,
    rng: SmallRng,
}

impl App {
    pub fn new(
        config: Config,
        vocab: Vocabulary,
        store: Box<dyn MasteryStore>,
        speaker: Box<dyn Speaker>,
        rng: SmallRng,
    ) -> Self {
        Self {
            config,
            vocab,
            store,
            speaker,
            rng,
        }
    }

    /// Wire up the real collaborators from `config`. A corpus that fails to
    /// load is fatal; an unusable data dir falls back to in-memory progress.
    pub fn from_config(config: Config, muted: bool, seed: Option<u64>) -> Result<Self> {
        let vocab = match config.corpus_path.as_deref() {
            Some(path) => Vocabulary::load_path(Path::new(path))
                .with_context(|| format!("could not load vocabulary from {path}"))?,
            None => Vocabulary::load_embedded().context("could not load built-in vocabulary")?,
        };

        let store: Box<dyn MasteryStore> =
            match JsonMasteryStore::with_base_dir(PathBuf::from(&config.data_dir)) {
                Ok(store) => Box::new(store),
                Err(e) => {
                    tracing::warn!(
                        data_dir = %config.data_dir,
                        "progress will not be saved: {e:#}"
                    );
                    Box::new(MemoryMasteryStore::new())
                }
            };

        let speaker = audio::speaker_for(&config, muted);
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(Self::new(config, vocab, store, speaker, rng))
    }

    /// Words for a unit/topic selection. Unknown ids are reported rather than
    /// silently giving an empty scope.
    pub fn scope(&self, unit_id: &str, topic: &TopicScope) -> Result<Vec<Rc<Word>>> {
        let Some(unit) = self.vocab.unit(unit_id) else {
            bail!("unknown unit `{unit_id}` (see `vocabdrill units`)");
        };
        if let TopicScope::Topic(topic_id) = topic {
            if unit.topic(topic_id).is_none() {
                bail!("unit `{unit_id}` has no topic `{topic_id}`");
            }
        }
        Ok(self.vocab.list_words(unit_id, topic))
    }

    pub fn mark(&mut self, word_id: &str, status: MasteryStatus) -> Result<()> {
        if self.vocab.word(word_id).is_none() {
            bail!("unknown word `{word_id}`");
        }
        self.store.set_status(word_id, status)
    }

    pub fn reset_scope(&mut self, words: &[Rc<Word>]) -> Result<()> {
        let ids: Vec<&str> = words.iter().map(|w| w.id.as_str()).collect();
        self.store.clear_statuses(&ids)?;
        tracing::info!(words = ids.len(), "mastery marks cleared");
        Ok(())
    }

    /// Run one interactive session. Returns `None` when there was nothing to
    /// practice.
    pub fn run_quiz<I: BufRead, O: Write>(
        &mut self,
        mode: QuizMode,
        words: &[Rc<Word>],
        input: &mut I,
        out: &mut O,
    ) -> Result<Option<SessionReport>> {
        let start = SessionEngine::start(mode, words, self.store.as_ref(), &mut self.rng);
        let mut engine = match start {
            SessionStart::Ready(engine) => engine,
            SessionStart::NothingToPractice => {
                match mode {
                    QuizMode::Study => writeln!(
                        out,
                        "Every word in this scope is marked green. Nothing to practice."
                    )?,
                    QuizMode::Test | QuizMode::Dictation => {
                        writeln!(out, "This scope has no words.")?
                    }
                }
                return Ok(None);
            }
        };

        ui::quiz::run(
            &mut engine,
            &self.vocab,
            self.speaker.as_mut(),
            &mut self.rng,
            input,
            out,
        )?;

        let report = engine.report(words);
        ui::render::report(out, &report)?;
        Ok(Some(report))
    }
}
