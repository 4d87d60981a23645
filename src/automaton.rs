use std::collections::VecDeque;

use tracing::trace;

use crate::prelude::*;

mod label;
pub use label::{Label, TransitionKey, LAMBDA};

mod builder;
pub use builder::{AutomatonBuilder, BuildError};

#[cfg(feature = "render")]
mod table;

/// A finite automaton over named states and symbols. It consists of a set of states, an alphabet,
/// a transition relation that maps a [`TransitionKey`] (a state together with a [`Label`]) to a
/// set of destination states, a set of final states and precisely one initial state.
///
/// The relation may map a key to multiple destinations and it may contain transitions labeled
/// with [`Label::Epsilon`]. Whether an automaton can be used with the deterministic operations
/// is decided by [`Automaton::is_deterministic`], callers should check it before relying on
/// [`Automaton::step_deterministic`], [`Automaton::run`] or [`Automaton::accepts_word`].
///
/// An automaton is never modified after it has been constructed, either through the
/// [`AutomatonBuilder`] or by parsing a [`crate::Description`].
///
/// # Example
/// ```
/// use fa_text::prelude::*;
///
/// let aut = Automaton::builder()
///     .with_states(["q0", "q1"])
///     .with_symbols(["a"])
///     .with_transitions([("q0", "a", "q1")])
///     .with_finals(["q1"])
///     .with_initial("q0")
///     .build()
///     .unwrap();
/// assert!(aut.is_deterministic());
/// assert!(aut.accepts_word("a"));
/// assert!(!aut.accepts_word("aa"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    states: Set<State>,
    alphabet: Set<Symbol>,
    transitions: Map<TransitionKey, Set<State>>,
    finals: Set<State>,
    initial: State,
}

impl Automaton {
    /// Creates an [`AutomatonBuilder`] with no states, symbols or transitions.
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::default()
    }

    /// Assembles an automaton from parts that have already been validated.
    pub(crate) fn from_parts(
        states: Set<State>,
        alphabet: Set<Symbol>,
        transitions: Map<TransitionKey, Set<State>>,
        finals: Set<State>,
        initial: State,
    ) -> Self {
        debug_assert!(states.contains(&initial));
        debug_assert!(finals.is_subset(&states));
        debug_assert!(transitions.iter().all(|(key, targets)| {
            states.contains(&key.source)
                && key.label.symbol().map_or(true, |sym| alphabet.contains(sym))
                && targets.is_subset(&states)
        }));
        Self {
            states,
            alphabet,
            transitions,
            finals,
            initial,
        }
    }

    /// The set of all states.
    pub fn states(&self) -> &Set<State> {
        &self.states
    }

    /// The alphabet. It never contains [`LAMBDA`].
    pub fn alphabet(&self) -> &Set<Symbol> {
        &self.alphabet
    }

    /// The transition relation.
    pub fn transitions(&self) -> &Map<TransitionKey, Set<State>> {
        &self.transitions
    }

    /// The set of final states.
    pub fn final_states(&self) -> &Set<State> {
        &self.finals
    }

    /// The designated initial state.
    pub fn initial(&self) -> &State {
        &self.initial
    }

    /// Returns true if `state` is final.
    pub fn is_final(&self, state: &str) -> bool {
        self.finals.contains(state)
    }

    /// Number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Gives the destinations that can be reached from `state` with a single transition
    /// labeled `label`, or `None` if there is no such transition.
    pub fn successors(&self, state: &str, label: &Label) -> Option<&Set<State>> {
        self.transitions
            .get(&TransitionKey::new(state, label.clone()))
    }

    /// Returns true if and only if no transition is labeled with epsilon and every key of the
    /// transition relation maps to precisely one destination.
    pub fn is_deterministic(&self) -> bool {
        self.transitions
            .iter()
            .all(|(key, targets)| !key.label.is_epsilon() && targets.len() == 1)
    }

    /// Returns true if some transition is labeled with epsilon.
    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.keys().any(|key| key.label.is_epsilon())
    }

    /// Looks up the destination of the transition from `state` on `symbol`. If no such transition
    /// exists, `None` is returned. On a nondeterministic automaton some arbitrary destination is
    /// picked, so this should only be relied on if [`Self::is_deterministic`] holds.
    pub fn step_deterministic(&self, state: &str, symbol: &str) -> Option<&State> {
        self.successors(state, &Label::from(symbol))?.iter().next()
    }

    /// Computes the union of all destinations reached from any state in `states` on `symbol`.
    /// Epsilon transitions are ignored, so passing [`LAMBDA`] as symbol gives an empty set.
    pub fn step_nondeterministic(&self, states: &Set<State>, symbol: &str) -> Set<State> {
        let label = Label::from(symbol);
        if label.is_epsilon() {
            return Set::default();
        }
        states
            .iter()
            .filter_map(|q| self.successors(q, &label))
            .flatten()
            .cloned()
            .collect()
    }

    /// Computes the epsilon closure of `states`, that is the smallest superset of `states` that
    /// is closed under taking epsilon transitions.
    pub fn epsilon_closure(&self, states: &Set<State>) -> Set<State> {
        let mut closure = states.clone();
        let mut queue: VecDeque<&State> = states.iter().collect();

        while let Some(q) = queue.pop_front() {
            let Some(targets) = self.successors(q, &Label::Epsilon) else {
                continue;
            };
            for target in targets {
                if closure.insert(target.clone()) {
                    queue.push_back(target);
                }
            }
        }
        closure
    }

    /// Performs a step that takes epsilon transitions into account. The given `states` are first
    /// closed under epsilon transitions. If `symbol` is [`LAMBDA`], this closure is returned.
    /// Otherwise the closure is advanced on `symbol` and the result is closed once more, so that
    /// epsilon transitions before and after each consumed symbol are taken.
    pub fn step_with_epsilon(&self, states: &Set<State>, symbol: &str) -> Set<State> {
        let closure = self.epsilon_closure(states);
        if symbol == LAMBDA {
            return closure;
        }
        self.epsilon_closure(&self.step_nondeterministic(&closure, symbol))
    }

    /// Runs the given sequence of symbols deterministically from the initial state and returns
    /// the state that is reached. If some symbol has no outgoing transition, the run is stuck,
    /// the remaining symbols are not read and `None` is returned.
    pub fn run<I, S>(&self, symbols: I) -> Option<&State>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        symbols
            .into_iter()
            .enumerate()
            .try_fold(&self.initial, |state, (pos, sym)| {
                let next = self.step_deterministic(state, sym.as_ref());
                if next.is_none() {
                    trace!(
                        "run is stuck in {state} on symbol {} at position {pos}",
                        sym.as_ref()
                    );
                }
                next
            })
    }

    /// Decides whether the word given as a sequence of symbols is accepted, meaning the
    /// deterministic run on it does not get stuck and ends in a final state.
    pub fn accepts<I, S>(&self, symbols: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(symbols).is_some_and(|q| self.finals.contains(q))
    }

    /// Same as [`Self::accepts`], but every `char` of `word` is read as one symbol.
    pub fn accepts_word(&self, word: &str) -> bool {
        self.accepts(
            word.char_indices()
                .map(|(pos, c)| &word[pos..pos + c.len_utf8()]),
        )
    }
}

impl std::fmt::Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "States: {}", self.states.show())?;
        writeln!(f, "Sigma: {}", self.alphabet.show())?;
        writeln!(f, "Final states: {}", self.finals.show())?;
        writeln!(f, "Initial state: {}", self.initial)?;
        #[cfg(feature = "render")]
        write!(f, "{}", self.transition_table())?;
        #[cfg(not(feature = "render"))]
        {
            use itertools::Itertools;
            for (key, targets) in self.transitions.iter().sorted_by(|l, r| l.0.cmp(r.0)) {
                writeln!(f, "{} -> {}", key.show(), targets.show())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn set<const N: usize>(states: [&str; N]) -> Set<State> {
        states.into_iter().map(String::from).collect()
    }

    fn minimal_dfa() -> Automaton {
        Automaton::builder()
            .with_states(["q0", "q1"])
            .with_symbols(["a"])
            .with_transitions([("q0", "a", "q1")])
            .with_finals(["q1"])
            .with_initial("q0")
            .build()
            .unwrap()
    }

    #[test]
    fn minimal_dfa_classification() {
        let dfa = minimal_dfa();
        assert!(dfa.is_deterministic());
        assert!(!dfa.has_epsilon_transitions());
        assert!(dfa.accepts_word("a"));
        assert!(!dfa.accepts_word(""));
        assert!(!dfa.accepts_word("aa"));
        assert!(!dfa.accepts_word("b"));
    }

    #[test_log::test]
    fn stuck_run_stops_reading() {
        let dfa = minimal_dfa();
        assert_eq!(dfa.run(["a"]), Some(&"q1".to_string()));
        assert_eq!(dfa.run(Vec::<String>::new()), Some(&"q0".to_string()));
        assert_eq!(dfa.step_deterministic("q1", "a"), None);
        assert_eq!(dfa.run(["a", "a", "a"]), None);

        // once stuck, later symbols are never looked at
        let mut read = 0;
        let word = ["a", "a", "a", "a"].into_iter().inspect(|_| read += 1);
        assert_eq!(dfa.run(word), None);
        assert_eq!(read, 2);
    }

    #[test]
    fn multi_character_symbols() {
        let dfa = Automaton::builder()
            .with_states(["even", "odd"])
            .with_symbols(["tick", "tock"])
            .with_transitions([
                ("even", "tick", "odd"),
                ("odd", "tick", "even"),
                ("even", "tock", "even"),
                ("odd", "tock", "odd"),
            ])
            .with_finals(["even"])
            .with_initial("even")
            .build()
            .unwrap();
        assert!(dfa.accepts(["tick", "tock", "tick"]));
        assert!(!dfa.accepts(["tick", "tock"]));
        assert!(!dfa.accepts(["t"]));
    }

    #[test]
    fn nondeterminism_is_detected() {
        let nfa = Automaton::builder()
            .with_states(["q0", "q1"])
            .with_symbols(["a"])
            .with_transitions([("q0", "a", "q1"), ("q0", "a", "q0")])
            .with_finals(["q1"])
            .with_initial("q0")
            .build()
            .unwrap();
        assert!(!nfa.is_deterministic());
        assert!(!nfa.has_epsilon_transitions());
        assert_eq!(
            nfa.step_nondeterministic(&set(["q0"]), "a"),
            set(["q0", "q1"])
        );
        assert_eq!(nfa.step_nondeterministic(&set(["q1"]), "a"), set([]));
        assert_eq!(
            nfa.step_nondeterministic(&set(["q0", "q1"]), "a"),
            set(["q0", "q1"])
        );
    }

    fn epsilon_chain() -> Automaton {
        Automaton::builder()
            .with_states(["q0", "q1", "q2"])
            .with_symbols(["a"])
            .with_transitions([("q0", "lambda", "q1"), ("q1", "a", "q2")])
            .with_finals(["q2"])
            .with_initial("q0")
            .build()
            .unwrap()
    }

    #[test]
    fn epsilon_chain_step() {
        let nfa = epsilon_chain();
        assert!(nfa.has_epsilon_transitions());
        assert!(!nfa.is_deterministic());
        assert_eq!(nfa.step_with_epsilon(&set(["q0"]), "a"), set(["q2"]));
        assert_eq!(
            nfa.step_with_epsilon(&set(["q0"]), "lambda"),
            set(["q0", "q1"])
        );
        // plain steps never follow epsilon transitions
        assert_eq!(nfa.step_nondeterministic(&set(["q0"]), "a"), set([]));
        assert_eq!(nfa.step_nondeterministic(&set(["q0"]), "lambda"), set([]));
    }

    #[test]
    fn epsilon_closure_after_symbol() {
        let nfa = Automaton::builder()
            .with_states(["p", "q", "r", "s", "t"])
            .with_symbols(["a", "b"])
            .with_transitions([
                ("p", "lambda", "q"),
                ("q", "lambda", "p"),
                ("q", "a", "r"),
                ("r", "lambda", "s"),
                ("s", "lambda", "t"),
                ("t", "b", "p"),
            ])
            .with_finals(["t"])
            .with_initial("p")
            .build()
            .unwrap();
        assert_eq!(nfa.epsilon_closure(&set(["p"])), set(["p", "q"]));
        assert_eq!(nfa.step_with_epsilon(&set(["p"]), "a"), set(["r", "s", "t"]));
        let after = nfa.step_with_epsilon(&set(["p"]), "a");
        assert_eq!(nfa.step_with_epsilon(&after, "b"), set(["p", "q"]));
        assert_eq!(nfa.step_with_epsilon(&set(["s"]), "a"), set([]));
    }

    #[test]
    fn epsilon_closure_is_idempotent() {
        let nfa = epsilon_chain();
        for start in [set(["q0"]), set(["q1"]), set(["q0", "q2"]), set([])] {
            let closed = nfa.step_with_epsilon(&start, "lambda");
            assert_eq!(nfa.step_with_epsilon(&closed, "lambda"), closed);
            assert_eq!(nfa.epsilon_closure(&closed), closed);
        }
    }

    #[test]
    fn display_lists_components() {
        let shown = minimal_dfa().to_string();
        assert!(shown.contains("States: {q0, q1}"));
        assert!(shown.contains("Sigma: {a}"));
        assert!(shown.contains("Initial state: q0"));
    }
}
