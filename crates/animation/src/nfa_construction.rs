use log::debug;
use log::info;

use favis_automata::Automaton;
use favis_automata::StateId;
use favis_automata::Symbol;
use favis_syntax::RegexTree;

use crate::Animation;
use crate::Frame;
use crate::Highlight;

const TITLE: &str = "NFA";

/// One pending expansion: the sub-expression that will replace the pending
/// edge between the two states.
struct ExpansionTask<'a> {
    from: StateId,
    to: StateId,
    node: &'a RegexTree,
    /// Whether finishing this task can close a repeatable sub-pattern that
    /// is still open, marking its end state as the loop entry.
    marks_loop_entry: bool,
}

/// Builds a nondeterministic automaton from an expression tree, one
/// construction rule at a time.
///
/// The expansion is driven by an explicit stack of pending tasks rather than
/// recursion so that every step emits its frames in a fixed order: first the
/// frame announcing the edge about to be expanded, then the frame showing
/// the applied rule. Child expansions follow with the left branch first.
pub struct NfaConstruction {
    automaton: Automaton,
    frames: Vec<Frame>,
}

impl NfaConstruction {
    pub fn new(tree: &RegexTree) -> Self {
        let mut automaton = Automaton::new();
        let mut frames = Vec::new();

        let start = automaton.add_state_at(false, 0, tree.y_span(), 0);
        let end = automaton.add_state_at(true, tree.x_span() + 1, tree.y_span(), 0);
        automaton.add_pending_transition(start, tree.to_string(), end);

        frames.push(Frame::snapshot(
            &automaton,
            TITLE,
            "Creates the starting and accepting states, connected by the whole expression.",
        ));

        let mut tasks = vec![ExpansionTask {
            from: start,
            to: end,
            node: tree,
            marks_loop_entry: false,
        }];

        // The number of repeatable sub-patterns whose entry state has not
        // been found yet.
        let mut open_loops = 0usize;

        while let Some(task) = tasks.pop() {
            debug!("Expanding {} between states {} and {}", task.node, task.from, task.to);

            let mut about = Frame::snapshot(&automaton, TITLE, "The highlighted edge is going to be expanded next.");
            about.highlight_edges_between(task.from, task.to, Highlight::Yellow);
            frames.push(about);

            if task.marks_loop_entry && open_loops > 0 && matches!(task.node, RegexTree::Literal(_)) {
                automaton.state_mut(task.to).mark_loop_entry();
                open_loops -= 1;
            }

            let removed = automaton.remove_pending_transition(task.from, task.to);
            debug_assert!(removed, "every task owns a pending edge");

            match task.node {
                RegexTree::Literal(c) => {
                    automaton.add_transition(task.from, Symbol::Char(*c), task.to);

                    let mut frame = Frame::snapshot(
                        &automaton,
                        TITLE,
                        &format!("Replaces the edge with a transition for the character '{c}'."),
                    );
                    frame.highlight_edges_between(task.from, task.to, Highlight::Yellow);
                    frames.push(frame);
                }
                RegexTree::Empty => {
                    automaton.add_transition(task.from, Symbol::Epsilon, task.to);

                    let mut frame = Frame::snapshot(
                        &automaton,
                        TITLE,
                        "Replaces the edge with an epsilon transition, which consumes no input.",
                    );
                    frame.highlight_edges_between(task.from, task.to, Highlight::Yellow);
                    frames.push(frame);
                }
                RegexTree::Concat(left, right) => {
                    let from_state = automaton.state(task.from);
                    let (x, y, y_limit) = (from_state.x(), from_state.y(), from_state.y_limit());

                    let mid = automaton.add_state_at(false, x + 1 + left.x_span(), y, y_limit);
                    automaton.add_pending_transition(task.from, left.to_string(), mid);
                    automaton.add_pending_transition(mid, right.to_string(), task.to);

                    let mut frame = Frame::snapshot(
                        &automaton,
                        TITLE,
                        "Concatenation: an intermediate state splits the edge into its two parts.",
                    );
                    frame.highlight_state(mid, Highlight::Yellow);
                    frame.highlight_edges_between(task.from, mid, Highlight::Yellow);
                    frame.highlight_edges_between(mid, task.to, Highlight::Yellow);
                    frames.push(frame);

                    tasks.push(ExpansionTask {
                        from: mid,
                        to: task.to,
                        node: right.as_ref(),
                        marks_loop_entry: false,
                    });
                    tasks.push(ExpansionTask {
                        from: task.from,
                        to: mid,
                        node: left.as_ref(),
                        marks_loop_entry: true,
                    });
                }
                RegexTree::Alternation(left, right) => {
                    // A repeated alternation introduces one more loop to
                    // close, one for each branch.
                    if open_loops > 0 {
                        open_loops += 1;
                    }

                    let from_state = automaton.state(task.from);
                    let (x, y, y_limit) = (from_state.x(), from_state.y(), from_state.y_limit());
                    let branch_span = left.x_span().max(right.x_span());

                    let upper_y = left.y_span() + y_limit;
                    let upper_enter = automaton.add_state_at(false, x + 1, upper_y, y_limit);
                    let upper_exit = automaton.add_state_at(false, x + 2 + branch_span, upper_y, y_limit);

                    let lower_y = y + right.y_span() + 1;
                    let lower_enter = automaton.add_state_at(false, x + 1, lower_y, y + 1);
                    let lower_exit = automaton.add_state_at(false, x + 2 + branch_span, lower_y, y + 1);

                    automaton.add_transition(task.from, Symbol::Epsilon, upper_enter);
                    automaton.add_transition(upper_exit, Symbol::Epsilon, task.to);
                    automaton.add_pending_transition(upper_enter, left.to_string(), upper_exit);
                    automaton.add_transition(task.from, Symbol::Epsilon, lower_enter);
                    automaton.add_transition(lower_exit, Symbol::Epsilon, task.to);
                    automaton.add_pending_transition(lower_enter, right.to_string(), lower_exit);

                    let mut frame = Frame::snapshot(
                        &automaton,
                        TITLE,
                        "Alternation: two parallel branches connect the states, one for each alternative.",
                    );
                    for state in [upper_enter, upper_exit, lower_enter, lower_exit] {
                        frame.highlight_state(state, Highlight::Yellow);
                    }
                    frame.highlight_edges_between(task.from, upper_enter, Highlight::Yellow);
                    frame.highlight_edges_between(upper_exit, task.to, Highlight::Yellow);
                    frame.highlight_edges_between(upper_enter, upper_exit, Highlight::Yellow);
                    frame.highlight_edges_between(task.from, lower_enter, Highlight::Yellow);
                    frame.highlight_edges_between(lower_exit, task.to, Highlight::Yellow);
                    frame.highlight_edges_between(lower_enter, lower_exit, Highlight::Yellow);
                    frames.push(frame);

                    tasks.push(ExpansionTask {
                        from: lower_enter,
                        to: lower_exit,
                        node: right.as_ref(),
                        marks_loop_entry: true,
                    });
                    tasks.push(ExpansionTask {
                        from: upper_enter,
                        to: upper_exit,
                        node: left.as_ref(),
                        marks_loop_entry: true,
                    });
                }
                RegexTree::Star(inner) => {
                    let from_state = automaton.state(task.from);
                    let (x, y, y_limit) = (from_state.x(), from_state.y(), from_state.y_limit());

                    let enter = automaton.add_state_at(false, x + 1, y, y_limit);
                    let exit = automaton.add_state_at(false, x + inner.x_span() + 2, y, y_limit);

                    automaton.add_transition(exit, Symbol::Epsilon, task.to);
                    automaton.add_transition(task.from, Symbol::Epsilon, enter);
                    automaton.add_pending_transition(enter, inner.to_string(), exit);
                    automaton.add_transition(task.from, Symbol::Epsilon, exit);
                    automaton.add_transition(exit, Symbol::Epsilon, task.from);

                    // A repeated section that is more than a single character
                    // opens a loop; its entry state is found later.
                    if !matches!(inner.as_ref(), RegexTree::Literal(_)) {
                        automaton.state_mut(exit).mark_loop_exit();
                        open_loops += 1;
                    }

                    let mut frame = Frame::snapshot(
                        &automaton,
                        TITLE,
                        "Repetition: the section can be skipped or repeated through the epsilon transitions.",
                    );
                    frame.highlight_state(enter, Highlight::Yellow);
                    frame.highlight_state(exit, Highlight::Yellow);
                    frame.highlight_edges_between(exit, task.to, Highlight::Yellow);
                    frame.highlight_edges_between(task.from, enter, Highlight::Yellow);
                    frame.highlight_edges_between(enter, exit, Highlight::Yellow);
                    frame.highlight_edges_between(task.from, exit, Highlight::Yellow);
                    frame.highlight_edges_between(exit, task.from, Highlight::Yellow);
                    frames.push(frame);

                    tasks.push(ExpansionTask {
                        from: enter,
                        to: exit,
                        node: inner.as_ref(),
                        marks_loop_entry: false,
                    });
                }
            }
        }

        debug_assert!(!automaton.has_pending_transitions(), "all pending edges are expanded");

        frames.push(Frame::snapshot(&automaton, TITLE, "The final NFA."));

        info!(
            "Constructed NFA with {} states and {} transitions in {} frames",
            automaton.num_of_states(),
            automaton.num_of_transitions(),
            frames.len()
        );

        Self { automaton, frames }
    }

    /// The finished nondeterministic automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }
}

impl Animation for NfaConstruction {
    fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use favis_automata::TransitionLabel;
    use favis_syntax::parse;
    use test_log::test;

    use super::*;

    fn construct(regex: &str) -> NfaConstruction {
        NfaConstruction::new(&parse(regex))
    }

    #[test]
    fn test_frame_and_state_counts() {
        for (regex, frames, states) in [
            ("a", 4, 2),
            ("ab", 8, 3),
            ("a*", 6, 4),
            ("a|b", 8, 6),
            ("ab*|c*", 16, 11),
            ("a*b*", 12, 7),
            ("a*b*|cd*|ef*g", 36, 22),
            ("", 4, 2),
        ] {
            let nfa = construct(regex);
            assert_eq!(nfa.frame_count(), frames, "frame count of {regex:?}");
            assert_eq!(nfa.automaton().num_of_states(), states, "state count of {regex:?}");
            assert!(!nfa.automaton().has_pending_transitions(), "pending edges left in {regex:?}");
        }
    }

    #[test]
    fn test_single_character() {
        let nfa = construct("a");
        let automaton = nfa.automaton();

        assert_eq!(automaton.num_of_states(), 2);
        let edges = automaton.state(0).transitions();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, 1);
        assert_eq!(edges[0].label, TransitionLabel::Symbol(Symbol::Char('a')));
        assert!(automaton.state(1).is_accepting());
    }

    #[test]
    fn test_star_topology() {
        // States: start, accept, enter, exit. The exit state cycles back to
        // the section start, and the skip edge jumps from the section start
        // to the exit state.
        let nfa = construct("a*");
        let automaton = nfa.automaton();

        let start_edges: Vec<(StateId, bool)> = automaton
            .state(0)
            .transitions()
            .iter()
            .map(|t| (t.to, t.label == TransitionLabel::Symbol(Symbol::Epsilon)))
            .collect();
        assert_eq!(start_edges, vec![(2, true), (3, true)]);

        let exit_edges: Vec<(StateId, bool)> = automaton
            .state(3)
            .transitions()
            .iter()
            .map(|t| (t.to, t.label == TransitionLabel::Symbol(Symbol::Epsilon)))
            .collect();
        assert_eq!(exit_edges, vec![(1, true), (0, true)]);

        assert_eq!(
            automaton.state(2).transitions()[0].label,
            TransitionLabel::Symbol(Symbol::Char('a'))
        );
    }

    #[test]
    fn test_alternation_coordinates() {
        let nfa = construct("a|b");
        let automaton = nfa.automaton();

        let positions: Vec<(i32, i32)> = automaton.states().map(|state| (state.x(), state.y())).collect();
        assert_eq!(positions, vec![(0, 1), (3, 1), (1, 0), (2, 0), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_frame_order_for_literal() {
        let nfa = construct("a");
        let frames = nfa.frames();

        assert_eq!(frames.len(), 4);

        // The second frame announces the pending edge with a highlight, the
        // third shows the character transition.
        assert!(frames[1].transitions().iter().any(|t| t.highlight == Highlight::Yellow));
        assert_eq!(
            frames[2].transitions()[0].label,
            TransitionLabel::Symbol(Symbol::Char('a'))
        );
        assert!(frames[3].transitions().iter().all(|t| t.highlight == Highlight::Normal));
    }

    #[test]
    fn test_loop_bookkeeping() {
        // A repeated group that is more than one character marks the exit of
        // the section, and the end of its first expanded character marks the
        // entry.
        let nfa = construct("(ab)*");
        let automaton = nfa.automaton();

        // States: 0 start, 1 accept, 2 enter, 3 exit, 4 concat middle.
        assert!(automaton.state(3).is_loop_exit());
        assert!(automaton.state(4).is_loop_entry());
        assert!(!automaton.state(0).is_loop_entry());

        // A star over a single character needs no loop bookkeeping.
        let plain = construct("a*");
        assert!(plain.automaton().states().all(|state| !state.is_loop_exit() && !state.is_loop_entry()));
    }

    #[test]
    fn test_empty_expression() {
        let nfa = construct("");
        let automaton = nfa.automaton();

        assert_eq!(automaton.num_of_states(), 2);
        assert_eq!(
            automaton.state(0).transitions()[0].label,
            TransitionLabel::Symbol(Symbol::Epsilon)
        );
        assert!(automaton.alphabet().is_empty());
    }

    /// The number of nodes in the expression tree.
    fn node_count(tree: &RegexTree) -> usize {
        match tree {
            RegexTree::Literal(_) | RegexTree::Empty => 1,
            RegexTree::Concat(left, right) | RegexTree::Alternation(left, right) => {
                1 + node_count(left) + node_count(right)
            }
            RegexTree::Star(inner) => 1 + node_count(inner),
        }
    }

    /// The number of states each rule adds beyond the initial two.
    fn added_states(tree: &RegexTree) -> usize {
        match tree {
            RegexTree::Literal(_) | RegexTree::Empty => 0,
            RegexTree::Concat(left, right) => 1 + added_states(left) + added_states(right),
            RegexTree::Alternation(left, right) => 4 + added_states(left) + added_states(right),
            RegexTree::Star(inner) => 2 + added_states(inner),
        }
    }

    #[test]
    fn test_random_construction_sizes() {
        use favis_syntax::random_regex_tree;
        use favis_utilities::random_test;

        // Every node produces an announce frame and a rule frame, on top of
        // the initial and final snapshots.
        random_test(100, |rng| {
            let tree = random_regex_tree(rng, 4);
            let nfa = NfaConstruction::new(&tree);

            assert_eq!(nfa.frame_count(), 2 + 2 * node_count(&tree), "frames of {tree}");
            assert_eq!(
                nfa.automaton().num_of_states(),
                2 + added_states(&tree),
                "states of {tree}"
            );
            assert!(!nfa.automaton().has_pending_transitions());

            let states = nfa.automaton().num_of_states();
            for state in nfa.automaton().states() {
                for transition in state.transitions() {
                    assert!(transition.to < states, "dangling transition in {tree}");
                }
            }
        });
    }
}
