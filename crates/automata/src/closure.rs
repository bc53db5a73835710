use log::debug;

use crate::Automaton;
use crate::StateId;
use crate::Symbol;
use crate::TransitionLabel;

/// The epsilon closure of a single state: all states reachable using only
/// epsilon transitions, including the state itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateClosure {
    members: Vec<StateId>,
    accepting: bool,
}

impl StateClosure {
    /// The member states in ascending identifier order.
    pub fn members(&self) -> &[StateId] {
        &self.members
    }

    /// Returns true if any member is an accepting state.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.members.binary_search(&id).is_ok()
    }
}

impl Automaton {
    /// Computes the epsilon closure of every state, indexed by state
    /// identifier.
    pub fn epsilon_closures(&self) -> Vec<StateClosure> {
        // The one step closures: every state together with its direct
        // epsilon successors.
        let mut one_step: Vec<Vec<StateId>> = Vec::with_capacity(self.num_of_states());
        for state in self.states() {
            let mut members = vec![state.id()];
            for transition in state.transitions() {
                if transition.label == TransitionLabel::Symbol(Symbol::Epsilon) {
                    members.push(transition.to);
                }
            }

            one_step.push(members);
        }

        // Saturate each closure over the one step sets with a worklist.
        let mut closures = Vec::with_capacity(self.num_of_states());
        for id in 0..self.num_of_states() {
            let mut in_closure = vec![false; self.num_of_states()];
            let mut worklist: Vec<StateId> = Vec::new();

            for &member in &one_step[id] {
                if !in_closure[member] {
                    in_closure[member] = true;
                    worklist.push(member);
                }
            }

            while let Some(current) = worklist.pop() {
                for &member in &one_step[current] {
                    if !in_closure[member] {
                        in_closure[member] = true;
                        worklist.push(member);
                    }
                }
            }

            let members: Vec<StateId> = in_closure
                .iter()
                .enumerate()
                .filter_map(|(member, &included)| if included { Some(member) } else { None })
                .collect();
            let accepting = members.iter().any(|&member| self.state(member).is_accepting());

            closures.push(StateClosure { members, accepting });
        }

        debug!("Computed epsilon closures for {} states", closures.len());

        closures
    }
}
