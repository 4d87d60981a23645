use crate::prelude::*;

/// The reserved token that denotes an epsilon transition in the textual format.
pub const LAMBDA: &str = "lambda";

/// The label of a transition. Either an ordinary symbol from the alphabet or the
/// epsilon label, which can be taken without consuming any input.
///
/// Symbols order before [`Label::Epsilon`], so sorting a collection of labels
/// puts `lambda` last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// A symbol of the alphabet.
    Symbol(Symbol),
    /// The epsilon label, written as `lambda`.
    Epsilon,
}

impl Label {
    /// Returns true if and only if `self` is the epsilon label.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Gives back the underlying symbol, or `None` for the epsilon label.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Label::Symbol(sym) => Some(sym),
            Label::Epsilon => None,
        }
    }

    /// The textual form of the label, `lambda` for epsilon.
    pub fn as_str(&self) -> &str {
        match self {
            Label::Symbol(sym) => sym,
            Label::Epsilon => LAMBDA,
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        if value == LAMBDA {
            Label::Epsilon
        } else {
            Label::Symbol(value.to_string())
        }
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        if value == LAMBDA {
            Label::Epsilon
        } else {
            Label::Symbol(value)
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Show for Label {
    fn show(&self) -> String {
        self.as_str().to_string()
    }
}

/// Key of the transition relation, a source state together with the label of the
/// outgoing transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionKey {
    /// The state the transition leaves from.
    pub source: State,
    /// The label of the transition.
    pub label: Label,
}

impl TransitionKey {
    /// Creates a new key from a source state and a label.
    pub fn new<S: Into<State>, L: Into<Label>>(source: S, label: L) -> Self {
        Self {
            source: source.into(),
            label: label.into(),
        }
    }
}

impl Show for TransitionKey {
    fn show(&self) -> String {
        format!("({}, {})", self.source, self.label)
    }
}
