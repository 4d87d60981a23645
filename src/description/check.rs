use itertools::Itertools;
use tracing::info;

use crate::prelude::*;

use super::diagnostic::Reporter;

/// Outcome of checking a single word from an `Accept:` or `Reject:` section against
/// the parsed automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCheck {
    /// The word, each `char` is one symbol.
    pub word: String,
    /// Whether the word was listed under `Accept:` (true) or `Reject:` (false).
    pub expected: bool,
    /// Whether the automaton actually accepts the word.
    pub actual: bool,
}

impl WordCheck {
    /// Returns true if the automaton classifies the word as expected.
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Runs every word of `accept` and `reject` on the deterministic automaton `aut`. Words
/// are checked in sorted order, accepted ones first. Mismatches are reported, they never
/// make the parse fail.
pub(crate) fn self_check(
    aut: &Automaton,
    accept: Option<&Set<String>>,
    reject: Option<&Set<String>>,
    reporter: &mut Reporter,
) -> Vec<WordCheck> {
    debug_assert!(aut.is_deterministic());

    let expectations = accept
        .into_iter()
        .flat_map(|words| words.iter().sorted().map(|w| (w, true)))
        .chain(
            reject
                .into_iter()
                .flat_map(|words| words.iter().sorted().map(|w| (w, false))),
        );

    let mut out = vec![];
    for (word, expected) in expectations {
        let check = WordCheck {
            word: word.clone(),
            expected,
            actual: aut.accepts_word(word),
        };
        if check.passed() {
            info!(
                "correctly {} \"{word}\"",
                if expected { "accepts" } else { "rejects" }
            );
        } else {
            reporter.note(
                None,
                Problem::SelfCheckMismatch {
                    word: word.clone(),
                    expected,
                },
            );
        }
        out.push(check);
    }
    out
}
