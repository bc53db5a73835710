use std::fmt;

use crate::Automaton;

/// Helper to render an automaton in Graphviz DOT format.
pub struct AutomatonDot<'a> {
    automaton: &'a Automaton,
}

impl<'a> AutomatonDot<'a> {
    /// Creates a new AutomatonDot Display for the given automaton.
    pub fn new(automaton: &'a Automaton) -> Self {
        Self { automaton }
    }
}

impl fmt::Display for AutomatonDot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph automaton {{")?;

        writeln!(f, "  rankdir=LR;")?;
        writeln!(f, "  node [fontname=\"DejaVu Sans\"];")?;
        writeln!(f, "  edge [fontname=\"DejaVu Sans\", arrowsize=0.9];")?;

        // Accepting states are drawn with a double border.
        for state in self.automaton.states() {
            let shape = if state.is_accepting() { "doublecircle" } else { "circle" };
            writeln!(f, "  s{} [label=\"{}\", shape={}];", state.id(), state.label(), shape)?;
        }

        for state in self.automaton.states() {
            for transition in state.transitions() {
                writeln!(
                    f,
                    "  s{} -> s{} [label=\"{}\"];",
                    state.id(),
                    transition.to,
                    transition.label
                )?;
            }
        }

        // Emit a small incoming arrow to the start state.
        if self.automaton.num_of_states() > 0 {
            writeln!(f, "  init [shape=point, width=0.05, label=\"\"];")?;
            writeln!(f, "  init -> s{} [arrowsize=0.6];", Automaton::START)?;
        }

        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::Symbol;

    use super::*;

    #[test]
    fn test_dot_output() {
        let mut automaton = Automaton::new();
        let start = automaton.add_state(false);
        let end = automaton.add_state(true);
        automaton.add_transition(start, Symbol::Char('a'), end);

        let dot = AutomatonDot::new(&automaton).to_string();

        assert!(dot.starts_with("digraph automaton {"));
        assert!(dot.contains("s0 [label=\"1\", shape=circle];"));
        assert!(dot.contains("s1 [label=\"2\", shape=doublecircle];"));
        assert!(dot.contains("s0 -> s1 [label=\"a\"];"));
        assert!(dot.contains("init -> s0"));
        assert!(dot.trim_end().ends_with('}'));
    }
}
