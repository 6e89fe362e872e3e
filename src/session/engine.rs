use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::corpus::{Word, WordRepository};
use crate::session::input::{self, Response};
use crate::session::result::SessionReport;
use crate::session::task::{Presentation, Task, TaskKind};
use crate::session::{QuizMode, SessionError};
use crate::store::MasteryStore;

/// Correct dictation answers needed before a word retires.
pub const DICTATION_REPEATS: u8 = 2;

/// Per-session bookkeeping. Never persisted.
#[derive(Clone, Debug, Default)]
pub struct SessionStats {
    total_queued: usize,
    error_counts: HashMap<String, u32>,
    miss_order: Vec<String>,
}

impl SessionStats {
    fn new(total_queued: usize) -> Self {
        Self {
            total_queued,
            ..Self::default()
        }
    }

    /// Tasks ever scheduled, including expansions and dictation repeats.
    pub fn total_queued(&self) -> usize {
        self.total_queued
    }

    pub fn record_error(&mut self, word_id: &str) {
        let count = self.error_counts.entry(word_id.to_string()).or_insert(0);
        if *count == 0 {
            self.miss_order.push(word_id.to_string());
        }
        *count += 1;
    }

    pub fn errors_for(&self, word_id: &str) -> u32 {
        self.error_counts.get(word_id).copied().unwrap_or(0)
    }

    /// Distinct words with at least one miss.
    pub fn missed_words(&self) -> usize {
        self.miss_order.len()
    }

    /// `(word id, misses)` in the order words were first missed.
    pub fn error_counts(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.miss_order
            .iter()
            .map(|id| (id.as_str(), self.errors_for(id)))
    }
}

#[derive(Debug)]
pub enum SessionStart {
    Ready(SessionEngine),
    /// No eligible words in scope; the session was not started.
    NothingToPractice,
}

/// How the queue changed after an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Retired,
    /// Moved to the back; no new work was scheduled.
    Requeued,
    /// Moved to the back and counted as one more task of work.
    RepeatScheduled,
    /// Dropped and replaced by a fresh task of every kind at the back.
    Expanded { added: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: bool,
    pub expected: String,
    /// Source text of the word, for replaying pronunciation after a miss.
    pub spoken: String,
    pub transition: Transition,
    pub session_over: bool,
}

/// One quiz session: an ordered task queue plus its stats. Only the front
/// task is ever evaluated.
#[derive(Debug)]
pub struct SessionEngine {
    mode: QuizMode,
    queue: VecDeque<Task>,
    stats: SessionStats,
    ended_early: bool,
}

impl SessionEngine {
    pub fn start<M, R>(mode: QuizMode, words: &[Rc<Word>], mastery: &M, rng: &mut R) -> SessionStart
    where
        M: MasteryStore + ?Sized,
        R: Rng + ?Sized,
    {
        let eligible: Vec<&Rc<Word>> = match mode {
            QuizMode::Study => words
                .iter()
                .filter(|w| mastery.status(&w.id).needs_practice())
                .collect(),
            QuizMode::Test | QuizMode::Dictation => words.iter().collect(),
        };
        if eligible.is_empty() {
            tracing::info!(mode = %mode, scoped = words.len(), "nothing to practice");
            return SessionStart::NothingToPractice;
        }

        let mut tasks: Vec<Task> = eligible
            .iter()
            .flat_map(|word| {
                mode.task_kinds()
                    .iter()
                    .map(move |&kind| Task::new(Rc::clone(word), kind))
            })
            .collect();
        tasks.shuffle(rng);

        tracing::info!(
            mode = %mode,
            words = eligible.len(),
            tasks = tasks.len(),
            "session started"
        );
        SessionStart::Ready(Self {
            mode,
            stats: SessionStats::new(tasks.len()),
            queue: VecDeque::from(tasks),
            ended_early: false,
        })
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn current_task(&self) -> Option<&Task> {
        if self.ended_early {
            return None;
        }
        self.queue.front()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn total_queued(&self) -> usize {
        self.stats.total_queued
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Share of scheduled work already done, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.stats.total_queued;
        if total == 0 {
            return 0.0;
        }
        (total - self.queue.len()) as f64 / total as f64
    }

    pub fn is_over(&self) -> bool {
        self.ended_early || self.queue.is_empty()
    }

    pub fn ended_early(&self) -> bool {
        self.ended_early
    }

    /// Learner quit: the session is over with whatever stats it has.
    pub fn end_early(&mut self) {
        if !self.is_over() {
            tracing::info!(remaining = self.queue.len(), "session ended early");
            self.ended_early = true;
        }
    }

    /// Render data for the front task, with freshly sampled options.
    pub fn present<W, R>(&self, repo: &W, rng: &mut R) -> Option<Presentation>
    where
        W: WordRepository + ?Sized,
        R: Rng + ?Sized,
    {
        self.current_task().map(|task| task.present(repo, rng))
    }

    pub fn submit_answer(&mut self, response: &Response) -> Result<Evaluation, SessionError> {
        let task = self.current_task().ok_or(SessionError::SessionOver)?;
        let correct = input::check(task, response)?;
        let expected = task.expected_answer().to_string();
        let spoken = task.word.source.clone();

        let transition = if correct {
            self.on_correct()
        } else {
            self.on_incorrect()
        };

        Ok(Evaluation {
            correct,
            expected,
            spoken,
            transition,
            session_over: self.is_over(),
        })
    }

    fn on_correct(&mut self) -> Transition {
        match self.mode {
            QuizMode::Study | QuizMode::Test => self.retire_front(),
            QuizMode::Dictation => {
                let Some(task) = self.queue.front_mut() else {
                    return Transition::Retired;
                };
                task.attempts += 1;
                if task.attempts >= DICTATION_REPEATS {
                    self.retire_front()
                } else {
                    self.rotate_front(true)
                }
            }
        }
    }

    fn on_incorrect(&mut self) -> Transition {
        let Some(task) = self.queue.front() else {
            return Transition::Retired;
        };
        let word = Rc::clone(&task.word);
        self.stats.record_error(&word.id);

        match self.mode {
            QuizMode::Study => self.rotate_front(false),
            QuizMode::Dictation => self.rotate_front(true),
            QuizMode::Test => {
                self.queue.pop_front();
                for kind in TaskKind::ALL {
                    self.queue.push_back(Task::new(Rc::clone(&word), kind));
                }
                self.stats.total_queued += TaskKind::ALL.len();
                tracing::debug!(
                    word = %word.id,
                    queued = self.queue.len(),
                    total = self.stats.total_queued,
                    "miss expanded queue"
                );
                Transition::Expanded {
                    added: TaskKind::ALL.len(),
                }
            }
        }
    }

    fn retire_front(&mut self) -> Transition {
        if let Some(task) = self.queue.pop_front() {
            tracing::debug!(
                word = %task.word.id,
                kind = %task.kind,
                remaining = self.queue.len(),
                "task retired"
            );
        }
        if self.queue.is_empty() {
            tracing::info!(
                mode = %self.mode,
                total = self.stats.total_queued,
                missed = self.stats.missed_words(),
                "session complete"
            );
        }
        Transition::Retired
    }

    /// Front to back. `count_as_new` grows the total so progress reflects the
    /// extra repetition.
    fn rotate_front(&mut self, count_as_new: bool) -> Transition {
        if let Some(task) = self.queue.pop_front() {
            tracing::debug!(
                word = %task.word.id,
                kind = %task.kind,
                attempts = task.attempts,
                "task requeued"
            );
            self.queue.push_back(task);
        }
        if count_as_new {
            self.stats.total_queued += 1;
            Transition::RepeatScheduled
        } else {
            Transition::Requeued
        }
    }

    /// Final (or, after `end_early`, partial) report. `words` resolves error
    /// ids to display records.
    pub fn report(&self, words: &[Rc<Word>]) -> SessionReport {
        SessionReport::from_stats(
            self.mode,
            &self.stats,
            words,
            self.queue.len(),
            self.ended_early,
        )
    }
}
