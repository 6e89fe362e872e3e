use std::rc::Rc;

use crate::corpus::Word;
use crate::session::QuizMode;
use crate::session::engine::SessionStats;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissedWord {
    pub word: Rc<Word>,
    pub errors: u32,
}

#[derive(Clone, Debug)]
pub struct SessionReport {
    pub mode: QuizMode,
    /// Headline percentage, see [`headline_score`].
    pub score: u32,
    /// Most-missed first. Ties keep the order in which words were first missed.
    pub missed: Vec<MissedWord>,
    pub total_queued: usize,
    pub remaining: usize,
    pub ended_early: bool,
}

/// 100 minus 10 per distinct missed word, floored at 0. Counts per word do
/// not matter; existing users compare scores on this exact scale.
pub fn headline_score(missed_words: usize) -> u32 {
    let penalty = u32::try_from(missed_words)
        .unwrap_or(u32::MAX)
        .saturating_mul(10);
    100u32.saturating_sub(penalty)
}

impl SessionReport {
    pub fn from_stats(
        mode: QuizMode,
        stats: &SessionStats,
        words: &[Rc<Word>],
        remaining: usize,
        ended_early: bool,
    ) -> Self {
        let mut missed: Vec<MissedWord> = stats
            .error_counts()
            .filter_map(|(id, errors)| {
                words.iter().find(|w| w.id == id).map(|word| MissedWord {
                    word: Rc::clone(word),
                    errors,
                })
            })
            .collect();
        // stable: equal counts stay in first-miss order
        missed.sort_by(|a, b| b.errors.cmp(&a.errors));

        Self {
            mode,
            score: headline_score(stats.missed_words()),
            missed,
            total_queued: stats.total_queued(),
            remaining,
            ended_early,
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.missed.is_empty()
    }
}
