use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::prelude::*;

impl Automaton {
    /// Returns a string representation of the transition table. There is one row per state and one
    /// column per symbol, with an additional `lambda` column if epsilon transitions are present.
    /// The initial state is prefixed with `→` and final states are suffixed with `*`.
    pub fn transition_table(&self) -> String {
        let mut labels = self
            .alphabet()
            .iter()
            .map(|sym| Label::Symbol(sym.clone()))
            .sorted()
            .collect_vec();
        if self.has_epsilon_transitions() {
            labels.push(Label::Epsilon);
        }

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(labels.iter().map(|l| l.to_string())),
        );
        for state in self.states().iter().sorted() {
            let mut row = vec![self.decorate_state(state)];
            for label in &labels {
                match self.successors(state, label) {
                    Some(targets) => row.push(targets.show()),
                    None => row.push("-".to_string()),
                }
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }

    fn decorate_state(&self, state: &State) -> String {
        let mut out = state.to_string();
        if self.is_final(state) {
            out = format!("{}*", out.bold());
        }
        if state == self.initial() {
            out = format!("{}{}", "→".green(), out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn table_has_row_per_state() {
        let nfa = Automaton::builder()
            .with_states(["q0", "q1", "q2"])
            .with_symbols(["b", "a"])
            .with_transitions([("q0", "lambda", "q1"), ("q1", "a", "q2"), ("q1", "a", "q0")])
            .with_finals(["q2"])
            .with_initial("q0")
            .build()
            .unwrap();
        let table = nfa.transition_table();
        println!("{table}");

        let header = table.lines().nth(1).unwrap();
        let (a, b, lambda) = (
            header.find(" a ").unwrap(),
            header.find(" b ").unwrap(),
            header.find("lambda").unwrap(),
        );
        assert!(a < b && b < lambda);
        assert!(table.contains("{q0, q2}"));
        assert!(table.contains("{q1}"));
        assert_eq!(table.lines().filter(|l| l.contains("q1")).count(), 2);
    }
}
