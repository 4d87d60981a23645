use crate::prelude::*;

/// The headers that open a section of a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    /// `Sigma:`, lists the alphabet.
    Sigma,
    /// `States:`, lists the states with their attributes.
    States,
    /// `Transitions:`, lists the transition relation.
    Transitions,
    /// `Accept:`, lists words that must be accepted. Lenient mode only.
    Accept,
    /// `Reject:`, lists words that must be rejected. Lenient mode only.
    Reject,
}

impl Header {
    /// The header as it appears in a description.
    pub fn as_str(&self) -> &'static str {
        match self {
            Header::Sigma => "Sigma:",
            Header::States => "States:",
            Header::Transitions => "Transitions:",
            Header::Accept => "Accept:",
            Header::Reject => "Reject:",
        }
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line of a description with comments removed, classified by what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Open(Header),
    End,
    Content(&'a str),
}

impl<'a> Line<'a> {
    /// Classifies an already trimmed, non-empty line. `Accept:` and `Reject:` are only
    /// headers in lenient mode, in strict mode they are ordinary content.
    pub fn classify(text: &'a str, mode: Mode) -> Self {
        match text {
            "Sigma:" => Line::Open(Header::Sigma),
            "States:" => Line::Open(Header::States),
            "Transitions:" => Line::Open(Header::Transitions),
            "End" => Line::End,
            "Accept:" if mode == Mode::Lenient => Line::Open(Header::Accept),
            "Reject:" if mode == Mode::Lenient => Line::Open(Header::Reject),
            _ => Line::Content(text),
        }
    }
}

/// What has been collected from the `States:` section.
#[derive(Debug, Clone, Default)]
pub(crate) struct StateDecls {
    pub names: Set<State>,
    pub finals: Set<State>,
    pub initial: Option<State>,
}

/// What has been collected from the `Transitions:` section. Next to the relation itself,
/// this remembers for every state and symbol the first line on which a transition
/// required it.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransitionDecls {
    pub relation: Map<TransitionKey, Set<State>>,
    pub required_states: Map<State, usize>,
    pub required_symbols: Map<Symbol, usize>,
}

impl TransitionDecls {
    pub fn insert(&mut self, source: &str, symbol: &str, target: &str, line: usize) {
        let label = Label::from(symbol);
        if let Label::Symbol(sym) = &label {
            self.required_symbols.entry(sym.clone()).or_insert(line);
        }
        self.required_states
            .entry(source.to_string())
            .or_insert(line);
        self.required_states
            .entry(target.to_string())
            .or_insert(line);
        self.relation
            .entry(TransitionKey::new(source, label))
            .or_default()
            .insert(target.to_string());
    }
}

/// The section that is currently open, owning the accumulator it fills. While a section is
/// closed, its accumulator is parked in [`Sections`].
#[derive(Debug, Clone, Default)]
pub(crate) enum Cursor {
    #[default]
    Idle,
    Sigma(Set<Symbol>),
    States(StateDecls),
    Transitions(TransitionDecls),
    Accept(Set<String>),
    Reject(Set<String>),
}

impl Cursor {
    pub fn header(&self) -> Option<Header> {
        match self {
            Cursor::Idle => None,
            Cursor::Sigma(_) => Some(Header::Sigma),
            Cursor::States(_) => Some(Header::States),
            Cursor::Transitions(_) => Some(Header::Transitions),
            Cursor::Accept(_) => Some(Header::Accept),
            Cursor::Reject(_) => Some(Header::Reject),
        }
    }
}

/// Accumulators of all sections that are not currently open. A slot is `None` as long as
/// the corresponding section has never been opened.
#[derive(Debug, Clone, Default)]
pub(crate) struct Sections {
    pub sigma: Option<Set<Symbol>>,
    pub states: Option<StateDecls>,
    pub transitions: Option<TransitionDecls>,
    pub accept: Option<Set<String>>,
    pub reject: Option<Set<String>>,
}

impl Sections {
    /// Returns true if a section with the given header has been opened and closed before.
    pub fn seen(&self, header: Header) -> bool {
        match header {
            Header::Sigma => self.sigma.is_some(),
            Header::States => self.states.is_some(),
            Header::Transitions => self.transitions.is_some(),
            Header::Accept => self.accept.is_some(),
            Header::Reject => self.reject.is_some(),
        }
    }

    /// Stores the accumulator of a section that is no longer open.
    pub fn park(&mut self, cursor: Cursor) {
        match cursor {
            Cursor::Idle => {}
            Cursor::Sigma(acc) => self.sigma = Some(acc),
            Cursor::States(acc) => self.states = Some(acc),
            Cursor::Transitions(acc) => self.transitions = Some(acc),
            Cursor::Accept(acc) => self.accept = Some(acc),
            Cursor::Reject(acc) => self.reject = Some(acc),
        }
    }

    /// Takes out the accumulator for `header` so it can be filled, starting from an empty one
    /// if the section has not been seen.
    pub fn open(&mut self, header: Header) -> Cursor {
        match header {
            Header::Sigma => Cursor::Sigma(self.sigma.take().unwrap_or_default()),
            Header::States => Cursor::States(self.states.take().unwrap_or_default()),
            Header::Transitions => {
                Cursor::Transitions(self.transitions.take().unwrap_or_default())
            }
            Header::Accept => Cursor::Accept(self.accept.take().unwrap_or_default()),
            Header::Reject => Cursor::Reject(self.reject.take().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_and_reject_are_lenient_only() {
        assert_eq!(
            Line::classify("Accept:", Mode::Lenient),
            Line::Open(Header::Accept)
        );
        assert_eq!(
            Line::classify("Accept:", Mode::Strict),
            Line::Content("Accept:")
        );
        assert_eq!(Line::classify("End", Mode::Strict), Line::End);
        assert_eq!(Line::classify("sigma:", Mode::Lenient), Line::Content("sigma:"));
    }

    #[test]
    fn reopening_keeps_accumulator() {
        let mut sections = Sections::default();
        assert!(!sections.seen(Header::Sigma));
        let mut cursor = sections.open(Header::Sigma);
        if let Cursor::Sigma(letters) = &mut cursor {
            letters.insert("a".to_string());
        }
        sections.park(cursor);
        assert!(sections.seen(Header::Sigma));

        match sections.open(Header::Sigma) {
            Cursor::Sigma(letters) => assert!(letters.contains("a")),
            other => panic!("expected sigma, got {:?}", other.header()),
        }
    }

    #[test]
    fn first_requiring_line_is_kept() {
        let mut decls = TransitionDecls::default();
        decls.insert("q0", "a", "q1", 3);
        decls.insert("q1", "a", "q0", 5);
        decls.insert("q1", "lambda", "q2", 6);
        assert_eq!(decls.required_states["q0"], 3);
        assert_eq!(decls.required_states["q1"], 3);
        assert_eq!(decls.required_states["q2"], 6);
        assert_eq!(decls.required_symbols["a"], 3);
        assert!(!decls.required_symbols.contains_key(LAMBDA));
        assert_eq!(decls.relation.len(), 3);
    }
}
