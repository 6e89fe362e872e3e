pub mod schema;
pub mod vocabulary;

use std::rc::Rc;

use rand::Rng;
use thiserror::Error;

pub use vocabulary::Vocabulary;

/// A single vocabulary entry. Immutable once the corpus is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    pub id: String,
    /// Foreign-language text the learner is drilling (Spanish).
    pub source: String,
    /// Learner's native-language gloss (Chinese).
    pub native: String,
    pub pos: String,
    pub unit_id: String,
    pub topic_id: String,
}

impl Word {
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Native => &self.native,
            Field::Source => &self.source,
        }
    }
}

/// Which side of a word pair an option list is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Native,
    Source,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopicScope {
    All,
    Topic(String),
}

impl TopicScope {
    /// `"all"` (any case) selects every topic of the unit.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("all") {
            TopicScope::All
        } else {
            TopicScope::Topic(raw.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("embedded corpus asset `{0}` is missing")]
    MissingAsset(&'static str),

    #[error("duplicate word id `{id}` in topic `{topic_id}`")]
    DuplicateWordId { id: String, topic_id: String },
}

/// Source of words and distractors for quiz sessions.
pub trait WordRepository {
    /// Words of a unit, in corpus order. Unknown unit or topic ids give an empty list.
    fn list_words(&self, unit_id: &str, topic: &TopicScope) -> Vec<Rc<Word>>;

    /// Up to `count` option texts taken from distinct words of the whole corpus,
    /// never from `word` itself.
    fn sample_distractors<R: Rng + ?Sized>(
        &self,
        word: &Word,
        count: usize,
        field: Field,
        rng: &mut R,
    ) -> Vec<String>;
}
