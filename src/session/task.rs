use std::fmt;
use std::rc::Rc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::corpus::{Field, Word, WordRepository};

/// Distractors requested for each multiple-choice question.
pub const DISTRACTOR_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Show the Spanish word, pick the native gloss.
    TargetToNative,
    /// Show the native gloss, pick the Spanish word.
    NativeToTarget,
    /// Show the native gloss, type the Spanish word.
    Spelling,
    /// Hear the Spanish word, pick the native gloss.
    AudioToNative,
    /// Hear the Spanish word, type it.
    AudioToSpelling,
}

impl TaskKind {
    pub const STUDY: [TaskKind; 3] = [
        TaskKind::TargetToNative,
        TaskKind::NativeToTarget,
        TaskKind::Spelling,
    ];

    pub const ALL: [TaskKind; 5] = [
        TaskKind::TargetToNative,
        TaskKind::NativeToTarget,
        TaskKind::Spelling,
        TaskKind::AudioToNative,
        TaskKind::AudioToSpelling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::TargetToNative => "target-to-native",
            TaskKind::NativeToTarget => "native-to-target",
            TaskKind::Spelling => "spelling",
            TaskKind::AudioToNative => "audio-to-native",
            TaskKind::AudioToSpelling => "audio-to-spelling",
        }
    }

    pub fn is_audio(self) -> bool {
        matches!(self, TaskKind::AudioToNative | TaskKind::AudioToSpelling)
    }

    pub fn input(self) -> InputKind {
        match self {
            TaskKind::Spelling | TaskKind::AudioToSpelling => InputKind::FreeText,
            _ => InputKind::Choice,
        }
    }

    /// The side of the word pair the learner has to produce.
    pub fn answer_field(self) -> Field {
        match self {
            TaskKind::TargetToNative | TaskKind::AudioToNative => Field::Native,
            _ => Field::Source,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Choice,
    FreeText,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Choice => f.write_str("multiple-choice"),
            InputKind::FreeText => f.write_str("free-text"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    Text(String),
    /// Nothing is shown; the caller plays `speak` through the audio player.
    Audio { speak: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerInput {
    Choice(Vec<String>),
    FreeText,
}

/// What the presentation layer renders for the front task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub kind: TaskKind,
    pub prompt: Prompt,
    pub input: AnswerInput,
}

#[derive(Clone, Debug)]
pub struct Task {
    pub word: Rc<Word>,
    pub kind: TaskKind,
    /// Correct answers so far; only dictation looks at it.
    pub attempts: u8,
}

impl Task {
    pub fn new(word: Rc<Word>, kind: TaskKind) -> Self {
        Self {
            word,
            kind,
            attempts: 0,
        }
    }

    pub fn expected_answer(&self) -> &str {
        self.word.text(self.kind.answer_field())
    }

    pub fn prompt(&self) -> Prompt {
        match self.kind {
            TaskKind::TargetToNative => Prompt::Text(self.word.source.clone()),
            TaskKind::NativeToTarget | TaskKind::Spelling => Prompt::Text(self.word.native.clone()),
            TaskKind::AudioToNative | TaskKind::AudioToSpelling => Prompt::Audio {
                speak: self.word.source.clone(),
            },
        }
    }

    pub fn present<W, R>(&self, repo: &W, rng: &mut R) -> Presentation
    where
        W: WordRepository + ?Sized,
        R: Rng + ?Sized,
    {
        let input = match self.kind.input() {
            InputKind::FreeText => AnswerInput::FreeText,
            InputKind::Choice => {
                let field = self.kind.answer_field();
                let mut options = repo.sample_distractors(&self.word, DISTRACTOR_COUNT, field, rng);
                options.push(self.expected_answer().to_string());
                options.shuffle(rng);
                AnswerInput::Choice(options)
            }
        };
        Presentation {
            kind: self.kind,
            prompt: self.prompt(),
            input,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::corpus::Vocabulary;

    fn vocab() -> Vocabulary {
        Vocabulary::from_json(
            r#"[{"id": "u", "title": "U", "topics": [{"id": "t", "title": "T", "words": [
                {"id": "a", "es": "hola", "zh": "你好"},
                {"id": "b", "es": "adiós", "zh": "再见"},
                {"id": "c", "es": "madre", "zh": "母亲"},
                {"id": "d", "es": "padre", "zh": "父亲"},
                {"id": "e", "es": "tren", "zh": "火车"}
            ]}]}]"#,
        )
        .unwrap()
    }

    #[test]
    fn prompt_and_input_follow_kind() {
        let v = vocab();
        let word = Rc::clone(v.word("a").unwrap());
        let cases = [
            (TaskKind::TargetToNative, Prompt::Text("hola".into()), InputKind::Choice, "你好"),
            (TaskKind::NativeToTarget, Prompt::Text("你好".into()), InputKind::Choice, "hola"),
            (TaskKind::Spelling, Prompt::Text("你好".into()), InputKind::FreeText, "hola"),
            (
                TaskKind::AudioToNative,
                Prompt::Audio { speak: "hola".into() },
                InputKind::Choice,
                "你好",
            ),
            (
                TaskKind::AudioToSpelling,
                Prompt::Audio { speak: "hola".into() },
                InputKind::FreeText,
                "hola",
            ),
        ];
        for (kind, prompt, input, expected) in cases {
            let task = Task::new(Rc::clone(&word), kind);
            assert_eq!(task.prompt(), prompt, "{kind}");
            assert_eq!(kind.input(), input, "{kind}");
            assert_eq!(task.expected_answer(), expected, "{kind}");
        }
    }

    #[test]
    fn choice_presentation_has_four_options_including_answer() {
        let v = vocab();
        let mut rng = SmallRng::seed_from_u64(11);
        let task = Task::new(Rc::clone(v.word("c").unwrap()), TaskKind::NativeToTarget);
        let presentation = task.present(&v, &mut rng);
        let AnswerInput::Choice(options) = presentation.input else {
            panic!("expected options");
        };
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|o| *o == "madre").count(), 1);
    }

    #[test]
    fn free_text_presentation_has_no_options() {
        let v = vocab();
        let mut rng = SmallRng::seed_from_u64(11);
        let task = Task::new(Rc::clone(v.word("c").unwrap()), TaskKind::AudioToSpelling);
        let presentation = task.present(&v, &mut rng);
        assert_eq!(presentation.input, AnswerInput::FreeText);
        assert_eq!(presentation.prompt, Prompt::Audio { speak: "madre".into() });
    }

    #[test]
    fn tiny_corpus_degrades_option_count() {
        let v = Vocabulary::from_json(
            r#"[{"id": "u", "title": "U", "topics": [{"id": "t", "title": "T", "words": [
                {"id": "a", "es": "hola", "zh": "你好"},
                {"id": "b", "es": "adiós", "zh": "再见"}
            ]}]}]"#,
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(2);
        let task = Task::new(Rc::clone(v.word("a").unwrap()), TaskKind::TargetToNative);
        let AnswerInput::Choice(options) = task.present(&v, &mut rng).input else {
            panic!("expected options");
        };
        assert_eq!(options.len(), 2);
        assert!(options.contains(&"你好".to_string()));
    }
}
