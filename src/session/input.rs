use icu_normalizer::ComposingNormalizerBorrowed;

use crate::session::SessionError;
use crate::session::task::{InputKind, Task};

/// A learner's answer to the front task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// Text of the chosen option.
    Choice(String),
    Text(String),
}

impl Response {
    pub fn input_kind(&self) -> InputKind {
        match self {
            Response::Choice(_) => InputKind::Choice,
            Response::Text(_) => InputKind::FreeText,
        }
    }
}

/// Free-text comparison: surrounding whitespace on the input is ignored,
/// case is folded, and both sides are NFC-normalized so a decomposed accent
/// still matches.
pub fn spelling_matches(input: &str, expected: &str) -> bool {
    fold(input.trim()) == fold(expected)
}

fn fold(text: &str) -> String {
    ComposingNormalizerBorrowed::new_nfc()
        .normalize(text)
        .to_lowercase()
}

/// Judge `response` against `task`. Fails without judging when the response
/// modality does not fit the task kind.
pub fn check(task: &Task, response: &Response) -> Result<bool, SessionError> {
    let expected = task.kind.input();
    if response.input_kind() != expected {
        return Err(SessionError::UnexpectedResponse {
            kind: task.kind,
            expected,
        });
    }
    Ok(match response {
        Response::Choice(chosen) => chosen == task.expected_answer(),
        Response::Text(typed) => spelling_matches(typed, task.expected_answer()),
    })
}
