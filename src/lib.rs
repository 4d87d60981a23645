//! Library for reading finite automata from a small line-oriented text format and running words on them.
//!
//! A description consists of sections, each opened by a header and closed by `End`. The `Sigma:` section lists the symbols of the alphabet, one per line. The `States:` section lists the states, where each state may carry the attributes `S` (it is the initial state) and `F` (it is final). The `Transitions:` section lists triples `source, symbol, target`, where the symbol `lambda` denotes an epsilon transition. Everything following a `#` is a comment.
//!
//! ```text
//! Sigma:
//!     a
//!     b
//! End
//! States:
//!     q0, S
//!     q1, F
//! End
//! Transitions:
//!     q0, a, q1
//!     q1, b, q0
//! End
//! ```
//!
//! The central entry point is [`parse`] (and its variants [`parse_str`] and [`description::parse_reader`]), which consumes lines of text and produces a [`Description`]. Parsing is governed by [`ParseOptions`]: in strict mode every anomaly in the input is an error and no automaton is produced, in lenient mode most anomalies are reported as warnings and repaired locally. Lenient mode additionally understands `Accept:` and `Reject:` sections listing words that the automaton is checked against right after parsing.
//!
//! The parsed [`Automaton`] is a plain value which can be queried for determinism and the presence of epsilon transitions, and which offers deterministic, nondeterministic and epsilon-aware execution steps. The crate does not determinize, minimize or compare automata.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use fa_text::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{Automaton, AutomatonBuilder, BuildError, Label, TransitionKey, LAMBDA},
        description::{
            parse, parse_reader, parse_str, Category, Description, Diagnostic, Header, Mode,
            ParseError, ParseOptions, Problem, ReadError, Role, Severity, WordCheck,
        },
        Map, Set, Show, State, Symbol,
    };
}

/// Defines the automaton model together with its execution primitives.
pub mod automaton;
pub use automaton::Automaton;

/// Parsing of textual automaton descriptions.
pub mod description;
pub use description::{parse, parse_str, Description, ParseOptions};

use itertools::Itertools;

/// States are identified by their name.
pub type State = String;
/// Symbols of the alphabet are identified by their name.
pub type Symbol = String;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Helper trait which can be used to display states, sets of states and such.
pub trait Show {
    /// Returns a human readable representation of `self`. For a state this is simply its name,
    /// for a set of states it should be something like `{q0, q1}`.
    fn show(&self) -> String;
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

impl<S: Show + Ord> Show for Set<S> {
    /// Elements are sorted, so equal sets are always shown the same way.
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().sorted().map(|x| x.show()).join(", "))
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!("[{}]", self.iter().map(|x| x.show()).join(", "))
    }
}
