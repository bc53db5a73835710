use log::info;
use thiserror::Error;

use favis_syntax::is_well_formed;
use favis_syntax::parse;

use crate::DfaConstruction;
use crate::NfaConstruction;
use crate::WordSimulation;

#[derive(Error, Debug)]
pub enum AnimateError {
    #[error("The expression {0:?} is not well-formed")]
    MalformedExpression(String),
}

/// The construction animations derived from one regular expression.
pub struct RegexAnimations {
    nfa: NfaConstruction,
    dfa: DfaConstruction,
}

impl RegexAnimations {
    /// The nondeterministic automaton construction.
    pub fn nfa(&self) -> &NfaConstruction {
        &self.nfa
    }

    /// The determinisation of the nondeterministic automaton.
    pub fn dfa(&self) -> &DfaConstruction {
        &self.dfa
    }

    /// Runs a word against the deterministic automaton. The underlying
    /// frame is not consumed, so any number of words can be simulated.
    pub fn simulate(&self, word: &str) -> WordSimulation {
        WordSimulation::new(self.dfa.final_dfa_frame(), word)
    }
}

/// Builds the construction animations for the given expression.
///
/// The expression must pass the well-formedness check; everything after the
/// check is total and deterministic, so equal inputs produce equal frames.
pub fn animate(regex: &str) -> Result<RegexAnimations, AnimateError> {
    if !is_well_formed(regex) {
        return Err(AnimateError::MalformedExpression(regex.to_string()));
    }

    let tree = parse(regex);
    info!("Animating {regex:?}, parsed as {tree}");

    let nfa = NfaConstruction::new(&tree);
    let dfa = DfaConstruction::new(nfa.automaton());

    Ok(RegexAnimations { nfa, dfa })
}
