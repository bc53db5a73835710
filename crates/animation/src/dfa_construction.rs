use itertools::Itertools;
use log::debug;
use log::info;

use favis_automata::Automaton;
use favis_automata::StateClosure;
use favis_automata::StateId;
use favis_automata::Symbol;
use favis_automata::TransitionLabel;

use crate::Animation;
use crate::Frame;
use crate::Highlight;

const TITLE: &str = "DFA";

/// Determinises a nondeterministic automaton with the subset construction.
///
/// Every deterministic state covers a union of epsilon closures of the
/// input automaton. Each frame pairs the input automaton, with the covered
/// closure highlighted, above the deterministic automaton built so far.
/// Unions are only merged back into an earlier state when that state was
/// recorded as the entry of a repeatable section, so equal unions discovered
/// elsewhere become distinct states.
pub struct DfaConstruction {
    automaton: Automaton,
    frames: Vec<Frame>,
    final_dfa_frame: Frame,
}

impl DfaConstruction {
    pub fn new(nfa: &Automaton) -> Self {
        let mut builder = SubsetBuilder {
            nfa,
            nfa_base: Frame::snapshot(nfa, TITLE, ""),
            closures: nfa.epsilon_closures(),
            alphabet: nfa.alphabet().iter().copied().collect(),
            dfa: Automaton::new(),
            dfa_sets: Vec::new(),
            knots: Vec::new(),
            nfa_track: Vec::new(),
            dfa_track: Vec::new(),
            closure_labels: Vec::new(),
        };

        let start_closure = &builder.closures[Automaton::START];
        let accepting = start_closure.is_accepting();
        let members = start_closure.members().to_vec();

        let start = builder.dfa.add_state(accepting);
        builder.dfa_sets.push(members);
        builder.push_label(start);

        let nfa_frame = builder.closure_panel(start);
        let dfa_frame = builder.dfa_panel("Start of the construction: DFA state 1 covers the closure of the NFA start state.");
        builder.push_pair(nfa_frame, dfa_frame);

        builder.construct(start);

        let nfa_frame = builder.nfa_base.clone();
        let dfa_frame = builder.dfa_panel("The final DFA.");
        builder.push_pair(nfa_frame, dfa_frame);

        builder.finish()
    }

    /// The finished deterministic automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// The deterministic automaton on its own, laid out and without closure
    /// labels. Word simulations start from this frame.
    pub fn final_dfa_frame(&self) -> &Frame {
        &self.final_dfa_frame
    }
}

impl Animation for DfaConstruction {
    fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// State of the subset construction, producing the two frame tracks that are
/// combined into one image per step.
struct SubsetBuilder<'a> {
    nfa: &'a Automaton,
    /// Unhighlighted snapshot of the input automaton, the upper panel of
    /// every frame.
    nfa_base: Frame,
    closures: Vec<StateClosure>,
    /// The characters of the input alphabet in ascending order.
    alphabet: Vec<char>,
    dfa: Automaton,
    /// The union of closure members each deterministic state covers.
    dfa_sets: Vec<Vec<StateId>>,
    /// The recorded loop entry states with the set they cover. Only these
    /// are candidates for merging a rediscovered union.
    knots: Vec<(StateId, Vec<StateId>)>,
    nfa_track: Vec<Frame>,
    dfa_track: Vec<Frame>,
    closure_labels: Vec<String>,
}

impl SubsetBuilder<'_> {
    /// Expands the outgoing transitions of the given deterministic state,
    /// recursing into every newly discovered state.
    fn construct(&mut self, state: StateId) {
        let members = self.dfa_sets[state].clone();
        debug!("Constructing DFA state {} covering {:?}", state, members);

        // A set containing the entry of a repeatable section is recorded
        // once, so later unions can close the loop back into this state.
        let recorded = self.knots.iter().any(|(_, set)| *set == members);
        if !recorded && members.iter().any(|&member| self.nfa.state(member).is_loop_entry()) {
            self.dfa.state_mut(state).mark_loop_entry();
            self.knots.push((state, members.clone()));
        }

        for index in 0..self.alphabet.len() {
            let symbol = self.alphabet[index];

            // The union of the closures reachable over this character from
            // any covered member.
            let mut in_union = vec![false; self.nfa.num_of_states()];
            let mut traversed: Vec<(StateId, StateId)> = Vec::new();
            for &member in &self.dfa_sets[state] {
                for transition in self.nfa.state(member).transitions() {
                    if transition.label.char() == Some(symbol) {
                        traversed.push((member, transition.to));
                        for &reached in self.closures[transition.to].members() {
                            in_union[reached] = true;
                        }
                    }
                }
            }

            let union: Vec<StateId> = in_union
                .iter()
                .enumerate()
                .filter_map(|(member, &included)| if included { Some(member) } else { None })
                .collect();

            if union.is_empty() {
                continue;
            }

            let nfa_frame = self.closure_panel(state);
            let mut dfa_frame =
                self.dfa_panel(&format!("Checking the transitions for '{symbol}' from DFA state {}.", state + 1));
            dfa_frame.highlight_state(state, Highlight::Yellow);
            self.push_pair(nfa_frame, dfa_frame);

            let closes_loop = self.dfa_sets[state]
                .iter()
                .any(|&member| self.nfa.state(member).is_loop_exit());
            let knot_target = if closes_loop {
                self.knots.iter().find(|(_, set)| *set == union).map(|&(knot, _)| knot)
            } else {
                None
            };

            if union == self.dfa_sets[state] {
                self.dfa.add_transition(state, Symbol::Char(symbol), state);

                let text = format!(
                    "Every NFA transition for '{symbol}' stays inside the same closure, so DFA state {} gets a self loop.",
                    state + 1
                );
                self.push_transition_pair(state, state, symbol, &traversed, &text);
            } else if let Some(target) = knot_target {
                self.dfa.add_transition(state, Symbol::Char(symbol), target);
                self.dfa.state_mut(state).mark_loop_exit();
                self.dfa.state_mut(state).add_loop_target(target);

                let text = format!(
                    "The reachable closure is already covered by DFA state {}, closing the loop back into it.",
                    target + 1
                );
                self.push_transition_pair(state, target, symbol, &traversed, &text);
            } else {
                let accepting = union.iter().any(|&member| self.nfa.state(member).is_accepting());
                let target = self.dfa.add_state(accepting);
                self.dfa_sets.push(union);
                self.push_label(target);
                self.dfa.add_transition(state, Symbol::Char(symbol), target);

                let text = format!("The reachable closures form a new DFA state {}.", target + 1);
                self.push_transition_pair(state, target, symbol, &traversed, &text);

                self.construct(target);
            }
        }
    }

    /// The upper panel: the input automaton with the covered closure members
    /// highlighted.
    fn closure_panel(&self, state: StateId) -> Frame {
        let mut frame = self.nfa_base.clone();
        for &member in &self.dfa_sets[state] {
            frame.highlight_state(member, Highlight::Yellow);
        }

        frame
    }

    /// The lower panel: a snapshot of the deterministic automaton built so
    /// far.
    fn dfa_panel(&self, text: &str) -> Frame {
        Frame::snapshot(&self.dfa, TITLE, text)
    }

    /// Records the closure annotation of a new deterministic state, with all
    /// identifiers one based for display.
    fn push_label(&mut self, state: StateId) {
        let members = self.dfa_sets[state].iter().map(|member| member + 1).join(", ");
        self.closure_labels.push(format!("{}: {{ {} }}", state + 1, members));
    }

    fn push_pair(&mut self, nfa_frame: Frame, mut dfa_frame: Frame) {
        dfa_frame.closure_labels = self.closure_labels.clone();
        self.nfa_track.push(nfa_frame);
        self.dfa_track.push(dfa_frame);
    }

    /// Emits the pair showing a freshly added transition: the traversed
    /// character edges in the upper panel and the new edge in the lower one.
    fn push_transition_pair(
        &mut self,
        from: StateId,
        to: StateId,
        symbol: char,
        traversed: &[(StateId, StateId)],
        text: &str,
    ) {
        let label = TransitionLabel::Symbol(Symbol::Char(symbol));

        let mut nfa_frame = self.closure_panel(from);
        for &(source, target) in traversed {
            nfa_frame.highlight_edge(source, target, &label, Highlight::Yellow);
        }

        let mut dfa_frame = self.dfa_panel(text);
        dfa_frame.highlight_state(from, Highlight::Yellow);
        dfa_frame.highlight_edge(from, to, &label, Highlight::Yellow);

        self.push_pair(nfa_frame, dfa_frame);
    }

    /// Lays out the deterministic automaton and merges the two tracks into
    /// the combined frames.
    fn finish(mut self) -> DfaConstruction {
        debug_assert_eq!(self.nfa_track.len(), self.dfa_track.len(), "the frame tracks stay aligned");

        self.dfa.assign_coordinates();
        for frame in &mut self.dfa_track {
            frame.apply_coordinates(&self.dfa);
        }

        let mut final_dfa_frame = self
            .dfa_track
            .last()
            .expect("the construction emits at least the start pair")
            .clone();
        final_dfa_frame.labels_visible = false;

        // The lower panel is drawn below the input automaton with fresh
        // identifiers, leaving an empty row between the two.
        let id_offset = self.nfa.num_of_states();
        let y_offset = self.nfa.states().map(|state| state.y()).max().unwrap_or(0) + 2;

        let frames: Vec<Frame> = self
            .nfa_track
            .iter()
            .zip(&self.dfa_track)
            .map(|(nfa_frame, dfa_frame)| combine(nfa_frame, dfa_frame, id_offset, y_offset))
            .collect();

        info!(
            "Constructed DFA with {} states and {} transitions in {} frames",
            self.dfa.num_of_states(),
            self.dfa.num_of_transitions(),
            frames.len()
        );

        DfaConstruction {
            automaton: self.dfa,
            frames,
            final_dfa_frame,
        }
    }
}

/// Stacks the two panels of a step into a single frame, with the lower panel
/// shifted past the given offsets.
fn combine(nfa_frame: &Frame, dfa_frame: &Frame, id_offset: usize, y_offset: i32) -> Frame {
    let mut states = nfa_frame.states.clone();
    for state in &dfa_frame.states {
        let mut moved = state.clone();
        moved.id += id_offset;
        moved.y += y_offset;
        states.push(moved);
    }

    let mut transitions = nfa_frame.transitions.clone();
    for transition in &dfa_frame.transitions {
        let mut moved = transition.clone();
        moved.from += id_offset;
        moved.to += id_offset;
        transitions.push(moved);
    }

    Frame {
        title: dfa_frame.title.clone(),
        text: dfa_frame.text.clone(),
        states,
        transitions,
        progress: None,
        closure_labels: dfa_frame.closure_labels.clone(),
        labels_visible: true,
    }
}

#[cfg(test)]
mod tests {
    use favis_syntax::parse;
    use test_log::test;

    use crate::NfaConstruction;

    use super::*;

    fn construct(regex: &str) -> DfaConstruction {
        DfaConstruction::new(NfaConstruction::new(&parse(regex)).automaton())
    }

    #[test]
    fn test_frame_and_state_counts() {
        for (regex, frames, states) in [
            ("a", 4, 2),
            ("ab", 6, 3),
            ("a*", 4, 1),
            ("a|b", 6, 3),
            ("ab*|c*", 10, 3),
            ("a*b*", 8, 2),
            ("a*b*|cd*|ef*g", 24, 7),
            ("", 2, 1),
            ("(ab)*", 8, 3),
        ] {
            let dfa = construct(regex);
            assert_eq!(dfa.frame_count(), frames, "frame count of {regex:?}");
            assert_eq!(dfa.automaton().num_of_states(), states, "state count of {regex:?}");
        }
    }

    #[test]
    fn test_self_loop() {
        let dfa = construct("a*");
        let automaton = dfa.automaton();

        assert_eq!(automaton.num_of_states(), 1);
        assert!(automaton.state(0).is_accepting());

        let edges = automaton.state(0).transitions();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, 0);
        assert_eq!(edges[0].label.char(), Some('a'));
    }

    #[test]
    fn test_closure_labels() {
        let dfa = construct("a|b");

        assert_eq!(
            dfa.last_frame().closure_labels(),
            &["1: { 1, 3, 5 }".to_string(), "2: { 2, 4 }".to_string(), "3: { 2, 6 }".to_string()]
        );
        assert!(dfa.last_frame().labels_visible());
    }

    #[test]
    fn test_knot_closes_repeated_group() {
        // Determinising (ab)* merges the union rediscovered after reading
        // "ab" back into the recorded entry state instead of growing
        // forever.
        let dfa = construct("(ab)*");
        let automaton = dfa.automaton();

        assert_eq!(automaton.num_of_states(), 3);
        assert!(automaton.state(1).is_loop_entry());
        assert!(automaton.state(2).is_loop_exit());
        assert!(automaton.state(2).has_loop_target(1));

        let edges: Vec<(StateId, StateId, Option<char>)> = automaton
            .states()
            .flat_map(|state| {
                state
                    .transitions()
                    .iter()
                    .map(|transition| (state.id(), transition.to, transition.label.char()))
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(edges, vec![(0, 1, Some('a')), (1, 2, Some('b')), (2, 1, Some('a'))]);
    }

    #[test]
    fn test_equal_unions_stay_distinct_without_loop() {
        // The deliberate under merge: two branches of the big expression
        // cover the same union, yet only a loop exit may fold back.
        let dfa = construct("a*b*|cd*|ef*g");
        let automaton = dfa.automaton();

        assert_eq!(automaton.num_of_states(), 7);
        assert_eq!(automaton.num_of_transitions(), 11);
    }

    #[test]
    fn test_combined_panels() {
        let dfa = construct("a");
        let frame = dfa.last_frame();

        // Two input states above, two deterministic states below with
        // shifted identifiers.
        assert_eq!(frame.states().len(), 4);
        assert_eq!(frame.states()[2].id, 2);
        assert_eq!(frame.states()[2].y, 2);
        assert!(frame.states()[2].initial);

        let edges: Vec<(StateId, StateId)> = frame
            .transitions()
            .iter()
            .map(|transition| (transition.from, transition.to))
            .collect();
        assert_eq!(edges, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_final_dfa_frame() {
        let dfa = construct("a|b");
        let frame = dfa.final_dfa_frame();

        assert_eq!(frame.states().len(), 3);
        assert!(!frame.labels_visible());
        assert!(frame.states()[0].initial);

        // The layout places the root before its two successor rows.
        let positions: Vec<(i32, i32)> = frame.states().iter().map(|state| (state.x, state.y)).collect();
        assert_eq!(positions, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_empty_expression() {
        let dfa = construct("");

        assert_eq!(dfa.frame_count(), 2);
        assert_eq!(dfa.automaton().num_of_states(), 1);
        assert!(dfa.automaton().state(0).is_accepting());
        assert_eq!(dfa.automaton().num_of_transitions(), 0);
    }
}
