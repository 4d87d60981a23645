use thiserror::Error;

use crate::prelude::*;

/// Errors that prevent an [`AutomatonBuilder`] from producing an [`Automaton`].
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum BuildError {
    #[error("no initial state was given")]
    MissingInitialState,
    #[error("state `{0}` is used but was never declared")]
    UndeclaredState(State),
    #[error("symbol `{0}` is used but was never declared")]
    UndeclaredSymbol(Symbol),
    #[error("`{}` is reserved for epsilon transitions and cannot be a symbol", LAMBDA)]
    ReservedSymbol,
}

/// Helper struct for constructing an [`Automaton`] programmatically. States and symbols must be
/// declared explicitly, [`AutomatonBuilder::build`] verifies that every state and symbol that is
/// used by a transition, the final states or the initial state has been declared.
///
/// # Example
/// ```
/// use fa_text::prelude::*;
///
/// let nfa = Automaton::builder()
///     .with_states(["q0", "q1", "q2"])
///     .with_symbols(["a"])
///     .with_transitions([("q0", "lambda", "q1"), ("q1", "a", "q2")])
///     .with_finals(["q2"])
///     .with_initial("q0")
///     .build()
///     .unwrap();
/// assert!(nfa.has_epsilon_transitions());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    states: Set<State>,
    alphabet: Set<Symbol>,
    transitions: Map<TransitionKey, Set<State>>,
    finals: Set<State>,
    initial: Option<State>,
}

impl AutomatonBuilder {
    /// Declares the given states.
    pub fn with_states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<State>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Declares the given symbols.
    pub fn with_symbols<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Symbol>,
    {
        self.alphabet.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Adds transitions given as triples `(source, label, target)`. A label `lambda` denotes
    /// an epsilon transition. Adding two transitions with the same source and label but
    /// different targets makes the automaton nondeterministic.
    pub fn with_transitions<I, S, L, T>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (S, L, T)>,
        S: Into<State>,
        L: Into<Label>,
        T: Into<State>,
    {
        for (source, label, target) in transitions {
            self.transitions
                .entry(TransitionKey::new(source, label))
                .or_default()
                .insert(target.into());
        }
        self
    }

    /// Marks the given states as final.
    pub fn with_finals<I>(mut self, finals: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<State>,
    {
        self.finals.extend(finals.into_iter().map(Into::into));
        self
    }

    /// Sets the initial state, replacing any previously set one.
    pub fn with_initial<S: Into<State>>(mut self, initial: S) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Verifies that everything that is referenced has been declared and produces the automaton.
    pub fn build(self) -> Result<Automaton, BuildError> {
        if self.alphabet.contains(LAMBDA) {
            return Err(BuildError::ReservedSymbol);
        }
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let declared = |q: &State| {
            if self.states.contains(q) {
                Ok(())
            } else {
                Err(BuildError::UndeclaredState(q.clone()))
            }
        };

        declared(&initial)?;
        for q in &self.finals {
            declared(q)?;
        }
        for (key, targets) in &self.transitions {
            declared(&key.source)?;
            if let Some(sym) = key.label.symbol() {
                if !self.alphabet.contains(sym) {
                    return Err(BuildError::UndeclaredSymbol(sym.to_string()));
                }
            }
            for q in targets {
                declared(q)?;
            }
        }

        Ok(Automaton::from_parts(
            self.states,
            self.alphabet,
            self.transitions,
            self.finals,
            initial,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undeclared_references() {
        let base = || {
            Automaton::builder()
                .with_states(["q0"])
                .with_symbols(["a"])
                .with_initial("q0")
        };
        assert!(base().build().is_ok());
        assert_eq!(
            base().with_transitions([("q0", "a", "q1")]).build(),
            Err(BuildError::UndeclaredState("q1".into()))
        );
        assert_eq!(
            base().with_transitions([("q0", "b", "q0")]).build(),
            Err(BuildError::UndeclaredSymbol("b".into()))
        );
        assert_eq!(
            base().with_finals(["q2"]).build(),
            Err(BuildError::UndeclaredState("q2".into()))
        );
        assert!(base().with_transitions([("q0", "lambda", "q0")]).build().is_ok());
    }

    #[test]
    fn initial_state_is_required() {
        let missing = AutomatonBuilder::default().with_states(["q0"]).build();
        assert_eq!(missing, Err(BuildError::MissingInitialState));
        let undeclared = AutomatonBuilder::default().with_initial("q0").build();
        assert_eq!(undeclared, Err(BuildError::UndeclaredState("q0".into())));
    }

    #[test]
    fn lambda_cannot_be_declared() {
        let result = Automaton::builder()
            .with_states(["q0"])
            .with_symbols(["lambda"])
            .with_initial("q0")
            .build();
        assert_eq!(result, Err(BuildError::ReservedSymbol));
    }
}
