use std::collections::BTreeSet;
use std::fmt;

use crate::Symbol;

/// The index of a state within its automaton.
pub type StateId = usize;

/// The label of a transition. During construction an edge can stand in for a
/// sub-expression that is not expanded yet; such pending edges carry the
/// canonical form of that sub-expression and must all be replaced before the
/// construction finishes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransitionLabel {
    Symbol(Symbol),
    Pending(String),
}

impl TransitionLabel {
    /// Returns the alphabet character of a concrete transition, or `None`
    /// for epsilon and pending edges.
    pub fn char(&self) -> Option<char> {
        match self {
            TransitionLabel::Symbol(symbol) => symbol.char(),
            TransitionLabel::Pending(_) => None,
        }
    }

    /// Returns true if this is a pending sub-expression edge.
    pub fn is_pending(&self) -> bool {
        matches!(self, TransitionLabel::Pending(_))
    }
}

impl fmt::Display for TransitionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionLabel::Symbol(symbol) => write!(f, "{symbol}"),
            TransitionLabel::Pending(name) => write!(f, "{name}"),
        }
    }
}

/// A directed edge to another state. The source is the state owning the
/// transition, the destination is a non-owning index into the automaton.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    pub to: StateId,
    pub label: TransitionLabel,
}

/// A single automaton state.
///
/// The transition list keeps insertion order; the frame snapshots, the
/// simulator scan and the layout pass all depend on that order. The loop
/// bookkeeping records which states enter and leave repeatable sub-patterns
/// so that determinisation can tie loops back and the layout pass can skip
/// the resulting back edges.
#[derive(Clone, Debug)]
pub struct State {
    id: StateId,
    accepting: bool,
    label: String,
    x: i32,
    y: i32,
    y_limit: i32,
    transitions: Vec<Transition>,
    loop_entry: bool,
    loop_exit: bool,
    loop_targets: BTreeSet<StateId>,
}

impl State {
    pub(crate) fn new(id: StateId, accepting: bool) -> Self {
        Self {
            id,
            accepting,
            // States are displayed one-based.
            label: (id + 1).to_string(),
            x: 0,
            y: 0,
            y_limit: 0,
            transitions: Vec::new(),
            loop_entry: false,
            loop_exit: false,
            loop_targets: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// The upper row bound for constructions nested above this state's row.
    pub fn y_limit(&self) -> i32 {
        self.y_limit
    }

    /// Places the state on the layout grid.
    pub fn set_position(&mut self, x: i32, y: i32, y_limit: i32) {
        self.x = x;
        self.y = y;
        self.y_limit = y_limit;
    }

    pub(crate) fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    pub(crate) fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    /// The outgoing transitions in insertion order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub(crate) fn push_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub(crate) fn remove_pending(&mut self, to: StateId) -> bool {
        let position = self
            .transitions
            .iter()
            .position(|transition| transition.to == to && transition.label.is_pending());

        match position {
            Some(index) => {
                self.transitions.remove(index);
                true
            }
            None => false,
        }
    }

    /// Marks this state as the entry of a repeatable sub-pattern.
    pub fn mark_loop_entry(&mut self) {
        self.loop_entry = true;
    }

    /// Marks this state as the exit of a repeatable sub-pattern.
    pub fn mark_loop_exit(&mut self) {
        self.loop_exit = true;
    }

    pub fn is_loop_entry(&self) -> bool {
        self.loop_entry
    }

    pub fn is_loop_exit(&self) -> bool {
        self.loop_exit
    }

    /// Records that this exit state loops back to the given entry state.
    pub fn add_loop_target(&mut self, target: StateId) {
        self.loop_targets.insert(target);
    }

    pub fn has_loop_target(&self, target: StateId) -> bool {
        self.loop_targets.contains(&target)
    }
}
