use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use rand::Rng;
use rand::seq::SliceRandom;
use rust_embed::RustEmbed;

use crate::corpus::schema::UnitData;
use crate::corpus::{CorpusError, Field, TopicScope, Word, WordRepository};

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

const EMBEDDED_CORPUS: &str = "vocab.json";

#[derive(Clone, Debug)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub words: Vec<Rc<Word>>,
}

#[derive(Clone, Debug)]
pub struct Unit {
    pub id: String,
    pub title: String,
    pub topics: Vec<Topic>,
}

impl Unit {
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn word_count(&self) -> usize {
        self.topics.iter().map(|t| t.words.len()).sum()
    }
}

/// The loaded word corpus, grouped by unit and topic, plus a flat list used
/// for distractor sampling.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    units: Vec<Unit>,
    words: Vec<Rc<Word>>,
}

impl Vocabulary {
    pub fn load_embedded() -> Result<Self, CorpusError> {
        let file = Assets::get(EMBEDDED_CORPUS).ok_or(CorpusError::MissingAsset(EMBEDDED_CORPUS))?;
        let units: Vec<UnitData> = serde_json::from_slice(&file.data)?;
        Self::from_units(units)
    }

    pub fn load_path(path: &Path) -> Result<Self, CorpusError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let units: Vec<UnitData> = serde_json::from_str(json)?;
        Self::from_units(units)
    }

    pub fn from_units(data: Vec<UnitData>) -> Result<Self, CorpusError> {
        let mut seen = HashSet::new();
        let mut words = Vec::new();
        let mut units = Vec::with_capacity(data.len());

        for unit in data {
            let mut topics = Vec::with_capacity(unit.topics.len());
            for topic in unit.topics {
                let mut topic_words = Vec::with_capacity(topic.words.len());
                for w in topic.words {
                    if !seen.insert(w.id.clone()) {
                        return Err(CorpusError::DuplicateWordId {
                            id: w.id,
                            topic_id: topic.id,
                        });
                    }
                    let word = Rc::new(Word {
                        id: w.id,
                        source: w.source,
                        native: w.native,
                        pos: w.pos,
                        unit_id: unit.id.clone(),
                        topic_id: topic.id.clone(),
                    });
                    words.push(Rc::clone(&word));
                    topic_words.push(word);
                }
                topics.push(Topic {
                    id: topic.id,
                    title: topic.title,
                    words: topic_words,
                });
            }
            units.push(Unit {
                id: unit.id,
                title: unit.title,
                topics,
            });
        }

        tracing::info!(units = units.len(), words = words.len(), "corpus loaded");
        Ok(Self { units, words })
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn word(&self, id: &str) -> Option<&Rc<Word>> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn words(&self) -> &[Rc<Word>] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordRepository for Vocabulary {
    fn list_words(&self, unit_id: &str, topic: &TopicScope) -> Vec<Rc<Word>> {
        let Some(unit) = self.unit(unit_id) else {
            return Vec::new();
        };
        match topic {
            TopicScope::All => unit
                .topics
                .iter()
                .flat_map(|t| t.words.iter().cloned())
                .collect(),
            TopicScope::Topic(id) => unit
                .topic(id)
                .map(|t| t.words.clone())
                .unwrap_or_default(),
        }
    }

    fn sample_distractors<R: Rng + ?Sized>(
        &self,
        word: &Word,
        count: usize,
        field: Field,
        rng: &mut R,
    ) -> Vec<String> {
        let answer = word.text(field);
        // Two words sharing a gloss would otherwise produce duplicate buttons.
        let mut pool: Vec<&str> = self
            .words
            .iter()
            .filter(|w| w.id != word.id)
            .map(|w| w.text(field))
            .filter(|text| *text != answer)
            .collect();
        pool.sort_unstable();
        pool.dedup();

        pool.choose_multiple(rng, count)
            .map(|text| text.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    const SMALL: &str = r#"[
        {"id": "u1", "title": "One", "topics": [
            {"id": "t1", "title": "A", "words": [
                {"id": "a", "es": "hola", "zh": "你好", "pos": "interj."},
                {"id": "b", "es": "adiós", "zh": "再见", "pos": "interj."}
            ]},
            {"id": "t2", "title": "B", "words": [
                {"id": "c", "es": "madre", "zh": "母亲", "pos": "n.f."}
            ]}
        ]},
        {"id": "u2", "title": "Two", "topics": [
            {"id": "t3", "title": "C", "words": [
                {"id": "d", "es": "tren", "zh": "火车", "pos": "n.m."},
                {"id": "e", "es": "coche", "zh": "汽车"}
            ]}
        ]}
    ]"#;

    #[test]
    fn embedded_corpus_loads() {
        let vocab = Vocabulary::load_embedded().unwrap();
        assert!(!vocab.is_empty());
        assert!(vocab.unit("u1").is_some());
        let total: usize = vocab.units().iter().map(Unit::word_count).sum();
        assert_eq!(total, vocab.len());
    }

    #[test]
    fn words_carry_unit_and_topic_ids() {
        let vocab = Vocabulary::from_json(SMALL).unwrap();
        let c = vocab.word("c").unwrap();
        assert_eq!(c.unit_id, "u1");
        assert_eq!(c.topic_id, "t2");
        // pos is optional in the data file
        assert_eq!(vocab.word("e").unwrap().pos, "");
    }

    #[test]
    fn list_words_all_topics_in_corpus_order() {
        let vocab = Vocabulary::from_json(SMALL).unwrap();
        let ids: Vec<String> = vocab
            .list_words("u1", &TopicScope::All)
            .iter()
            .map(|w| w.id.clone())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn list_words_single_topic() {
        let vocab = Vocabulary::from_json(SMALL).unwrap();
        let words = vocab.list_words("u1", &TopicScope::Topic("t2".to_string()));
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].source, "madre");
    }

    #[test]
    fn list_words_unknown_scope_is_empty() {
        let vocab = Vocabulary::from_json(SMALL).unwrap();
        assert!(vocab.list_words("nope", &TopicScope::All).is_empty());
        assert!(
            vocab
                .list_words("u1", &TopicScope::Topic("t3".to_string()))
                .is_empty()
        );
    }

    #[test]
    fn duplicate_word_ids_are_rejected() {
        let json = r#"[{"id": "u", "title": "U", "topics": [
            {"id": "t", "title": "T", "words": [
                {"id": "x", "es": "uno", "zh": "一"},
                {"id": "x", "es": "dos", "zh": "二"}
            ]}
        ]}]"#;
        let err = Vocabulary::from_json(json).unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateWordId { ref id, .. } if id == "x"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Vocabulary::from_json("{not json").unwrap_err();
        assert!(matches!(err, CorpusError::Parse(_)));
    }

    #[test]
    fn distractors_come_from_whole_corpus_and_exclude_answer() {
        let vocab = Vocabulary::from_json(SMALL).unwrap();
        let word = vocab.word("a").unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let picks = vocab.sample_distractors(word, 3, Field::Native, &mut rng);
            assert_eq!(picks.len(), 3);
            assert!(!picks.contains(&"你好".to_string()));
            let unique: HashSet<&String> = picks.iter().collect();
            assert_eq!(unique.len(), 3);
        }
    }

    #[test]
    fn distractor_shortfall_returns_what_is_available() {
        let json = r#"[{"id": "u", "title": "U", "topics": [
            {"id": "t", "title": "T", "words": [
                {"id": "x", "es": "uno", "zh": "一"},
                {"id": "y", "es": "dos", "zh": "二"}
            ]}
        ]}]"#;
        let vocab = Vocabulary::from_json(json).unwrap();
        let word = vocab.word("x").unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let picks = vocab.sample_distractors(word, 3, Field::Source, &mut rng);
        assert_eq!(picks, vec!["dos".to_string()]);
    }

    #[test]
    fn distractors_skip_words_sharing_the_answer_text() {
        let json = r#"[{"id": "u", "title": "U", "topics": [
            {"id": "t", "title": "T", "words": [
                {"id": "x", "es": "coche", "zh": "汽车"},
                {"id": "y", "es": "carro", "zh": "汽车"},
                {"id": "z", "es": "tren", "zh": "火车"}
            ]}
        ]}]"#;
        let vocab = Vocabulary::from_json(json).unwrap();
        let word = vocab.word("x").unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let picks = vocab.sample_distractors(word, 3, Field::Native, &mut rng);
        assert_eq!(picks, vec!["火车".to_string()]);
    }
}
