use std::collections::VecDeque;

use favis_automata::Automaton;
use favis_automata::StateId;
use favis_automata::TransitionLabel;

/// The highlight color of a state or transition within a frame.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Highlight {
    #[default]
    Normal,
    /// A failed or rejecting element.
    Red,
    /// The element currently being considered.
    Yellow,
    /// A followed or accepting element.
    Green,
}

/// The visual record of a state inside a frame, decoupled from the live
/// automaton it was copied from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameState {
    pub id: StateId,
    pub label: String,
    pub accepting: bool,
    pub initial: bool,
    pub x: i32,
    pub y: i32,
    pub highlight: Highlight,
}

/// The visual record of a transition inside a frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameTransition {
    pub from: StateId,
    pub to: StateId,
    pub label: TransitionLabel,
    pub highlight: Highlight,
}

/// The four part progress line of a word simulation: the input consumed so
/// far, the character under consideration, the character that failed to
/// match and the untouched remainder.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProgressText {
    pub consumed: String,
    pub checking: String,
    pub failed: String,
    pub remaining: String,
}

/// One immutable snapshot of an automaton during construction or simulation.
///
/// A frame owns deep copies of the states and transitions it shows and never
/// aliases live engine state; mutating a later frame cannot change an
/// earlier one. The transition list is ordered by a breadth-first walk from
/// the start state, which is also the order the word simulator scans.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) states: Vec<FrameState>,
    pub(crate) transitions: Vec<FrameTransition>,
    pub(crate) progress: Option<ProgressText>,
    pub(crate) closure_labels: Vec<String>,
    pub(crate) labels_visible: bool,
}

impl Frame {
    /// Takes an unhighlighted snapshot of the automaton in breadth-first
    /// order from the start state.
    pub fn snapshot(automaton: &Automaton, title: &str, text: &str) -> Self {
        let mut states = Vec::new();
        let mut transitions = Vec::new();
        let mut visited = vec![false; automaton.num_of_states()];
        let mut queue = VecDeque::new();

        if automaton.num_of_states() > 0 {
            queue.push_back(Automaton::START);
        }

        while let Some(id) = queue.pop_front() {
            if visited[id] {
                continue;
            }
            visited[id] = true;

            let state = automaton.state(id);
            states.push(FrameState {
                id,
                label: state.label().to_string(),
                accepting: state.is_accepting(),
                initial: id == Automaton::START,
                x: state.x(),
                y: state.y(),
                highlight: Highlight::Normal,
            });

            for transition in state.transitions() {
                transitions.push(FrameTransition {
                    from: id,
                    to: transition.to,
                    label: transition.label.clone(),
                    highlight: Highlight::Normal,
                });
                queue.push_back(transition.to);
            }
        }

        Self {
            title: title.to_string(),
            text: text.to_string(),
            states,
            transitions,
            progress: None,
            closure_labels: Vec::new(),
            labels_visible: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The narrative text describing this construction step.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn states(&self) -> &[FrameState] {
        &self.states
    }

    pub fn transitions(&self) -> &[FrameTransition] {
        &self.transitions
    }

    /// The progress line of a word simulation frame.
    pub fn progress(&self) -> Option<&ProgressText> {
        self.progress.as_ref()
    }

    /// The closure labels collected so far, one per deterministic state.
    pub fn closure_labels(&self) -> &[String] {
        &self.closure_labels
    }

    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    pub(crate) fn state_label(&self, id: StateId) -> &str {
        &self
            .states
            .iter()
            .find(|state| state.id == id)
            .expect("the state is part of this frame")
            .label
    }

    pub(crate) fn highlight_state(&mut self, id: StateId, highlight: Highlight) {
        let state = self
            .states
            .iter_mut()
            .find(|state| state.id == id)
            .expect("the state is part of this frame");
        state.highlight = highlight;
    }

    /// Highlights every transition between the two states.
    pub(crate) fn highlight_edges_between(&mut self, from: StateId, to: StateId, highlight: Highlight) {
        for transition in &mut self.transitions {
            if transition.from == from && transition.to == to {
                transition.highlight = highlight;
            }
        }
    }

    /// Highlights the transition at the given index.
    pub(crate) fn highlight_edge_at(&mut self, index: usize, highlight: Highlight) {
        self.transitions[index].highlight = highlight;
    }

    /// Highlights the first transition matching the given endpoints and
    /// label.
    pub(crate) fn highlight_edge(&mut self, from: StateId, to: StateId, label: &TransitionLabel, highlight: Highlight) {
        if let Some(transition) = self
            .transitions
            .iter_mut()
            .find(|transition| transition.from == from && transition.to == to && transition.label == *label)
        {
            transition.highlight = highlight;
        }
    }

    /// Copies the state coordinates from the given automaton, which must be
    /// the one this frame was snapshot from.
    pub(crate) fn apply_coordinates(&mut self, automaton: &Automaton) {
        for state in &mut self.states {
            let source = automaton.state(state.id);
            state.x = source.x();
            state.y = source.y();
        }
    }
}

/// Common interface of the frame producing constructions.
pub trait Animation {
    /// The frames in emission order.
    fn frames(&self) -> &[Frame];

    /// The number of emitted frames.
    fn frame_count(&self) -> usize {
        self.frames().len()
    }

    /// The last emitted frame.
    fn last_frame(&self) -> &Frame {
        self.frames().last().expect("every construction emits at least one frame")
    }
}

#[cfg(test)]
mod tests {
    use favis_automata::Symbol;
    use test_log::test;

    use super::*;

    fn chain_automaton() -> Automaton {
        let mut automaton = Automaton::new();
        let start = automaton.add_state(false);
        let end = automaton.add_state(true);
        let mid = automaton.add_state(false);

        automaton.add_transition(start, Symbol::Char('a'), mid);
        automaton.add_transition(mid, Symbol::Char('b'), end);

        automaton
    }

    #[test]
    fn test_snapshot_breadth_first_order() {
        let automaton = chain_automaton();
        let frame = Frame::snapshot(&automaton, "NFA", "text");

        // States in breadth-first order from the start state: 0, then its
        // successor 2, then 1.
        let ids: Vec<StateId> = frame.states().iter().map(|state| state.id).collect();
        assert_eq!(ids, vec![0, 2, 1]);

        let edges: Vec<(StateId, StateId)> = frame
            .transitions()
            .iter()
            .map(|transition| (transition.from, transition.to))
            .collect();
        assert_eq!(edges, vec![(0, 2), (2, 1)]);

        assert!(frame.states()[0].initial);
        assert!(!frame.states()[1].initial);
    }

    #[test]
    fn test_frames_are_independent() {
        let automaton = chain_automaton();
        let frame = Frame::snapshot(&automaton, "NFA", "text");

        let mut copy = frame.clone();
        copy.highlight_state(0, Highlight::Green);
        copy.highlight_edges_between(0, 2, Highlight::Yellow);

        assert_eq!(frame.states()[0].highlight, Highlight::Normal);
        assert_eq!(frame.transitions()[0].highlight, Highlight::Normal);
        assert_ne!(frame, copy);
    }

    #[test]
    fn test_highlight_edge_matches_label() {
        let mut automaton = chain_automaton();
        automaton.add_transition(0, Symbol::Char('c'), 2);

        let mut frame = Frame::snapshot(&automaton, "NFA", "text");
        frame.highlight_edge(0, 2, &TransitionLabel::Symbol(Symbol::Char('c')), Highlight::Yellow);

        assert_eq!(frame.transitions()[0].highlight, Highlight::Normal);
        assert_eq!(frame.transitions()[1].highlight, Highlight::Yellow);
    }
}
