pub mod engine;
pub mod input;
pub mod result;
pub mod task;

use std::fmt;

use clap::ValueEnum;
use thiserror::Error;

pub use engine::{Evaluation, SessionEngine, SessionStart, SessionStats, Transition};
pub use input::Response;
pub use result::{MissedWord, SessionReport};
pub use task::{AnswerInput, InputKind, Presentation, Prompt, Task, TaskKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum QuizMode {
    /// Self-paced practice over words not yet marked green.
    Study,
    /// Every word, every question kind; a miss re-queues the full set.
    Test,
    /// Listen and spell, twice correct per word.
    Dictation,
}

impl QuizMode {
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Study => "study",
            QuizMode::Test => "test",
            QuizMode::Dictation => "dictation",
        }
    }

    /// Question kinds emitted per word when the queue is built.
    pub fn task_kinds(self) -> &'static [TaskKind] {
        match self {
            QuizMode::Study => &TaskKind::STUDY,
            QuizMode::Test => &TaskKind::ALL,
            QuizMode::Dictation => &[TaskKind::AudioToSpelling],
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("the session is over; no task is waiting for an answer")]
    SessionOver,

    #[error("{kind} expects a {expected} answer")]
    UnexpectedResponse { kind: TaskKind, expected: InputKind },
}
