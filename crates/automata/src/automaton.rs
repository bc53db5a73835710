use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use log::debug;

use crate::State;
use crate::StateId;
use crate::Symbol;
use crate::Transition;
use crate::TransitionLabel;

/// A finite automaton over single character symbols.
///
/// States live in a dense arena and are addressed by their [`StateId`];
/// identifiers are assigned in creation order and are never reused. The
/// alphabet is collected automatically from the added transitions.
#[derive(Clone, Debug, Default)]
pub struct Automaton {
    states: Vec<State>,
    alphabet: BTreeSet<char>,
}

impl Automaton {
    /// The start state of every automaton.
    pub const START: StateId = 0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state and returns its identifier.
    pub fn add_state(&mut self, accepting: bool) -> StateId {
        let id = self.states.len();
        self.states.push(State::new(id, accepting));
        id
    }

    /// Adds a state at the given grid position and returns its identifier.
    pub fn add_state_at(&mut self, accepting: bool, x: i32, y: i32, y_limit: i32) -> StateId {
        let id = self.add_state(accepting);
        self.states[id].set_position(x, y, y_limit);
        id
    }

    /// Adds a transition labelled with the given symbol. A character symbol
    /// is recorded into the alphabet.
    pub fn add_transition(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        debug_assert!(to < self.states.len(), "transition to unknown state {to}");

        if let Symbol::Char(c) = symbol {
            self.alphabet.insert(c);
        }

        self.states[from].push_transition(Transition {
            to,
            label: TransitionLabel::Symbol(symbol),
        });
    }

    /// Adds a pending edge carrying the canonical form of a sub-expression
    /// that still has to be expanded between the two states.
    pub fn add_pending_transition(&mut self, from: StateId, name: String, to: StateId) {
        debug_assert!(to < self.states.len(), "transition to unknown state {to}");

        self.states[from].push_transition(Transition {
            to,
            label: TransitionLabel::Pending(name),
        });
    }

    /// Removes the pending edge between the two states. Returns false if no
    /// such edge exists.
    pub fn remove_pending_transition(&mut self, from: StateId, to: StateId) -> bool {
        self.states[from].remove_pending(to)
    }

    /// Returns true if any state still has a pending edge.
    pub fn has_pending_transitions(&self) -> bool {
        self.states
            .iter()
            .any(|state| state.transitions().iter().any(|transition| transition.label.is_pending()))
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id]
    }

    pub fn num_of_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_of_transitions(&self) -> usize {
        self.states.iter().map(|state| state.transitions().len()).sum()
    }

    /// Iterates over the states in identifier order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// The characters appearing on transitions, in ascending order.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// Assigns grid coordinates to all states reachable over the spanning
    /// tree of the transition relation.
    ///
    /// Self loops are not part of the spanning tree, and neither are the
    /// recorded loop back edges from an exit state to an entry state it
    /// already loops to. For automata produced by determinisation the
    /// remaining edges form a tree rooted in the start state.
    pub fn assign_coordinates(&mut self) {
        if self.states.is_empty() {
            return;
        }

        self.assign_y(Self::START, 0);
        self.assign_x(Self::START, 0);

        debug!("Assigned coordinates to {} states", self.states.len());
    }

    /// The successors that are part of the layout spanning tree.
    fn layout_children(&self, id: StateId) -> Vec<StateId> {
        let state = &self.states[id];

        state
            .transitions()
            .iter()
            .filter(|transition| {
                transition.to != id
                    && !(state.is_loop_exit()
                        && self.states[transition.to].is_loop_entry()
                        && state.has_loop_target(transition.to))
            })
            .map(|transition| transition.to)
            .collect()
    }

    /// Places leaves on consecutive rows and centres every inner state on
    /// the rows taken by its subtree. Returns the next free row.
    fn assign_y(&mut self, id: StateId, mut row: i32) -> i32 {
        let children = self.layout_children(id);

        if children.is_empty() {
            self.states[id].set_y(row);
            return row + 1;
        }

        let upper = row;
        for child in children {
            row = self.assign_y(child, row);
        }

        self.states[id].set_y((row - 1 - upper) / 2 + upper);
        row
    }

    fn assign_x(&mut self, id: StateId, depth: i32) {
        self.states[id].set_x(depth);

        for child in self.layout_children(id) {
            self.assign_x(child, depth + 1);
        }
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Automaton with {} states, {} transitions and alphabet {{{}}}",
            self.num_of_states(),
            self.num_of_transitions(),
            self.alphabet.iter().join(", ")
        )
    }
}
