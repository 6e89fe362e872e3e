use std::io::{BufRead, Write};

use anyhow::Result;
use rand::Rng;

use crate::audio::Speaker;
use crate::corpus::WordRepository;
use crate::session::{AnswerInput, Presentation, Prompt, Response, SessionEngine, TaskKind};
use crate::ui::progress_bar::ProgressBar;

const QUIT: &str = ":q";
const REPLAY: &str = ":r";
const BAR_WIDTH: usize = 20;

enum Reply {
    Answer(Response),
    Quit,
}

/// Drive `engine` from line input until the queue is empty, the learner
/// types `:q`, or input runs out.
pub fn run<W, R, I, O>(
    engine: &mut SessionEngine,
    repo: &W,
    speaker: &mut dyn Speaker,
    rng: &mut R,
    input: &mut I,
    out: &mut O,
) -> Result<()>
where
    W: WordRepository + ?Sized,
    R: Rng + ?Sized,
    I: BufRead,
    O: Write,
{
    writeln!(
        out,
        "Starting a {} session. Type {QUIT} to stop, {REPLAY} to replay audio.",
        engine.mode()
    )?;
    while let Some(presentation) = engine.present(repo, rng) {
        show(out, engine, &presentation, speaker)?;

        let response = match read_reply(&presentation, speaker, input, out)? {
            Reply::Answer(response) => response,
            Reply::Quit => {
                engine.end_early();
                break;
            }
        };

        let eval = engine.submit_answer(&response)?;
        if eval.correct {
            writeln!(out, "  Correct!")?;
        } else {
            writeln!(out, "  Wrong. Answer: {}", eval.expected)?;
            // let the pronunciation play out before the next prompt speaks
            speaker.speak(&eval.spoken);
            speaker.finish();
        }
    }
    Ok(())
}

fn show<O: Write>(
    out: &mut O,
    engine: &SessionEngine,
    presentation: &Presentation,
    speaker: &mut dyn Speaker,
) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{} {}",
        ProgressBar::new(engine.progress(), BAR_WIDTH).render(),
        instruction(presentation.kind)
    )?;
    match &presentation.prompt {
        Prompt::Text(text) => writeln!(out, "  {text}")?,
        Prompt::Audio { speak } => {
            speaker.speak(speak);
            writeln!(out, "  (listen)")?;
        }
    }
    if let AnswerInput::Choice(options) = &presentation.input {
        for (i, option) in options.iter().enumerate() {
            writeln!(out, "  {}) {option}", i + 1)?;
        }
    }
    Ok(())
}

fn instruction(kind: TaskKind) -> &'static str {
    match kind {
        TaskKind::TargetToNative => "Pick the meaning:",
        TaskKind::NativeToTarget => "Pick the Spanish word:",
        TaskKind::Spelling => "Spell it in Spanish:",
        TaskKind::AudioToNative => "Pick the meaning of what you hear:",
        TaskKind::AudioToSpelling => "Write what you hear:",
    }
}

fn read_reply<I: BufRead, O: Write>(
    presentation: &Presentation,
    speaker: &mut dyn Speaker,
    input: &mut I,
    out: &mut O,
) -> Result<Reply> {
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Reply::Quit);
        }
        let line = line.trim_end_matches(['\r', '\n']);

        match line.trim() {
            QUIT => return Ok(Reply::Quit),
            REPLAY => {
                if let Prompt::Audio { speak } = &presentation.prompt {
                    speaker.speak(speak);
                }
                continue;
            }
            _ => {}
        }

        match &presentation.input {
            AnswerInput::FreeText => return Ok(Reply::Answer(Response::Text(line.to_string()))),
            AnswerInput::Choice(options) => match pick_option(options, line.trim()) {
                Some(choice) => return Ok(Reply::Answer(Response::Choice(choice))),
                None => writeln!(out, "  Enter a number from 1 to {}.", options.len())?,
            },
        }
    }
}

/// Options can be picked by number or by typing the option text.
fn pick_option(options: &[String], typed: &str) -> Option<String> {
    if let Some(option) = options.iter().find(|o| o.as_str() == typed) {
        return Some(option.clone());
    }
    let index: usize = typed.parse().ok()?;
    index
        .checked_sub(1)
        .and_then(|i| options.get(i))
        .cloned()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::corpus::{TopicScope, Vocabulary};
    use crate::session::{QuizMode, SessionStart};
    use crate::store::MemoryMasteryStore;

    #[derive(Default)]
    struct RecordingSpeaker {
        log: Vec<String>,
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&mut self, text: &str) {
            self.log.push(format!("speak {text}"));
        }

        fn finish(&mut self) {
            self.log.push("finish".to_string());
        }
    }

    const TWO_WORDS: &str = r#"[{"id": "u1", "title": "U", "topics": [
        {"id": "t1", "title": "T", "words": [
            {"id": "a", "es": "hola", "zh": "你好"},
            {"id": "b", "es": "adiós", "zh": "再见"}
        ]}
    ]}]"#;

    fn dictation(input: &str) -> (SessionEngine, RecordingSpeaker, String) {
        let vocab = Vocabulary::from_json(TWO_WORDS).unwrap();
        let words = vocab.list_words("u1", &TopicScope::All);
        let mut rng = SmallRng::seed_from_u64(11);
        let store = MemoryMasteryStore::new();
        let start = SessionEngine::start(QuizMode::Dictation, &words, &store, &mut rng);
        let SessionStart::Ready(mut engine) = start else {
            panic!("expected a session");
        };
        let mut speaker = RecordingSpeaker::default();
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        run(&mut engine, &vocab, &mut speaker, &mut rng, &mut input, &mut out).unwrap();
        (engine, speaker, String::from_utf8(out).unwrap())
    }

    #[test]
    fn miss_pronunciation_finishes_before_next_prompt() {
        let (engine, speaker, out) = dictation("zzz\n:q\n");
        assert!(engine.ended_early());
        assert!(out.contains("Wrong. Answer:"));

        // prompt, feedback, wait, next prompt
        assert_eq!(speaker.log.len(), 4, "{:?}", speaker.log);
        assert_eq!(speaker.log[0], speaker.log[1]);
        assert_eq!(speaker.log[2], "finish");
        assert!(speaker.log[3].starts_with("speak "));
    }

    #[test]
    fn quitting_without_a_miss_never_waits() {
        let (_, speaker, out) = dictation("");
        assert!(out.contains("Starting a dictation session."));
        assert!(!speaker.log.iter().any(|entry| entry == "finish"));
    }

    fn options() -> Vec<String> {
        vec!["你好".to_string(), "再见".to_string(), "谢谢".to_string()]
    }

    #[test]
    fn pick_by_number() {
        assert_eq!(pick_option(&options(), "2"), Some("再见".to_string()));
    }

    #[test]
    fn pick_by_text() {
        assert_eq!(pick_option(&options(), "谢谢"), Some("谢谢".to_string()));
    }

    #[test]
    fn out_of_range_or_garbage_picks_nothing() {
        assert_eq!(pick_option(&options(), "0"), None);
        assert_eq!(pick_option(&options(), "4"), None);
        assert_eq!(pick_option(&options(), "abc"), None);
        assert_eq!(pick_option(&options(), ""), None);
    }
}
