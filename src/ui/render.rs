use std::io::{self, Write};
use std::rc::Rc;

use crate::corpus::{Vocabulary, Word};
use crate::session::SessionReport;
use crate::store::MasteryStore;

pub fn units<W: Write>(out: &mut W, vocab: &Vocabulary) -> io::Result<()> {
    for unit in vocab.units() {
        writeln!(out, "{}  {} ({} words)", unit.id, unit.title, unit.word_count())?;
        for topic in &unit.topics {
            writeln!(out, "    {}  {} ({})", topic.id, topic.title, topic.words.len())?;
        }
    }
    Ok(())
}

/// Word cards for a scope with their mastery tag, headed by the number of
/// words a study session would pick up.
pub fn cards<W, M>(out: &mut W, words: &[Rc<Word>], store: &M) -> io::Result<()>
where
    W: Write,
    M: MasteryStore + ?Sized,
{
    let to_practice = words
        .iter()
        .filter(|w| store.status(&w.id).needs_practice())
        .count();
    writeln!(out, "To practice: {to_practice} of {} words", words.len())?;
    for word in words {
        writeln!(
            out,
            "  {:<12} {:<18} {:<10} {:<10} [{}]",
            word.id,
            word.source,
            word.pos,
            word.native,
            store.status(&word.id)
        )?;
    }
    Ok(())
}

pub fn report<W: Write>(out: &mut W, report: &SessionReport) -> io::Result<()> {
    writeln!(out)?;
    if report.ended_early {
        writeln!(
            out,
            "Session ended early ({} of {} tasks left).",
            report.remaining, report.total_queued
        )?;
    } else {
        writeln!(out, "Done!")?;
    }
    writeln!(out, "Score: {}%", report.score)?;

    if report.is_perfect() {
        writeln!(out, "No mistakes. Great work!")?;
        return Ok(());
    }
    writeln!(out, "Missed words:")?;
    for missed in &report.missed {
        let times = if missed.errors == 1 { "time" } else { "times" };
        writeln!(
            out,
            "  {:<18} {:<10} missed {} {times}",
            missed.word.source, missed.word.native, missed.errors
        )?;
    }
    Ok(())
}
