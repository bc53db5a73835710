use log::info;

use favis_automata::Automaton;
use favis_automata::StateId;

use crate::Animation;
use crate::Frame;
use crate::Highlight;
use crate::ProgressText;

const TITLE: &str = "Testing a word";

/// Runs a word through a deterministic automaton frame, one transition
/// check at a time.
///
/// The run scans the transitions of the frame in order. Every transition
/// leaving the current state is checked against the next character of the
/// word: a match turns it green and moves the run, a mismatch turns it red
/// and the scan continues. Highlights accumulate over the run, so the final
/// frame shows the whole path taken. The input frame is never modified,
/// which keeps it reusable for further words.
pub struct WordSimulation {
    frames: Vec<Frame>,
    accepted: bool,
}

impl WordSimulation {
    pub fn new(base: &Frame, word: &str) -> Self {
        let chars: Vec<char> = word.chars().collect();

        let mut working = base.clone();
        working.title = TITLE.to_string();
        working.text = "The initial graph.".to_string();
        working.progress = Some(ProgressText {
            remaining: word.to_string(),
            ..Default::default()
        });

        let mut frames = vec![working.clone()];

        let mut current = Automaton::START;
        let mut cursor = 0;
        let mut index = 0;

        while index < working.transitions.len() && cursor < chars.len() {
            let edge = &working.transitions[index];
            let from = edge.from;
            let to = edge.to;
            let label = edge.label.char();

            if from == current {
                if let Some(symbol) = label {
                    let checking = chars[cursor];
                    let from_label = working.state_label(from).to_string();

                    working.highlight_edge_at(index, Highlight::Yellow);
                    working.text = format!(
                        "Checking the transition for '{symbol}' from state {from_label} against the next character '{checking}'."
                    );
                    working.progress = Some(ProgressText {
                        consumed: collect(&chars[..cursor]),
                        checking: checking.to_string(),
                        remaining: collect(&chars[cursor + 1..]),
                        ..Default::default()
                    });
                    frames.push(working.clone());

                    if symbol == checking {
                        let to_label = working.state_label(to).to_string();

                        working.highlight_edge_at(index, Highlight::Green);
                        working.text =
                            format!("The character '{checking}' matches: the run follows the transition to state {to_label}.");
                        working.progress = Some(ProgressText {
                            consumed: collect(&chars[..cursor + 1]),
                            remaining: collect(&chars[cursor + 1..]),
                            ..Default::default()
                        });
                        frames.push(working.clone());

                        current = to;
                        cursor += 1;
                        index = 0;
                        continue;
                    }

                    working.highlight_edge_at(index, Highlight::Red);
                    working.text = format!("The character '{checking}' does not match '{symbol}', so this transition is not followed.");
                    working.progress = Some(ProgressText {
                        consumed: collect(&chars[..cursor]),
                        failed: checking.to_string(),
                        remaining: collect(&chars[cursor + 1..]),
                        ..Default::default()
                    });
                    frames.push(working.clone());
                }
            }

            index += 1;
        }

        let label = working.state_label(current).to_string();
        let mut accepted = false;

        if cursor >= chars.len() {
            let accepting = current_state_accepting(&working, current);

            if accepting {
                accepted = true;
                working.highlight_state(current, Highlight::Green);
                working.text = format!("The word is accepted: the run ends in accepting state {label}.");
            } else {
                working.highlight_state(current, Highlight::Red);
                working.text = format!("The word is not accepted: the run ends in state {label}, which is not accepting.");
            }

            working.progress = Some(ProgressText {
                consumed: collect(&chars),
                ..Default::default()
            });
        } else {
            let failed = chars[cursor];

            working.highlight_state(current, Highlight::Red);
            working.text = format!("No transition for '{failed}' leaves state {label}: the word is not accepted.");
            working.progress = Some(ProgressText {
                consumed: collect(&chars[..cursor]),
                failed: failed.to_string(),
                remaining: collect(&chars[cursor + 1..]),
                ..Default::default()
            });
        }

        frames.push(working);

        info!("Simulated word {word:?} in {} frames: accepted = {accepted}", frames.len());

        Self { frames, accepted }
    }

    /// Whether the word belongs to the language of the automaton.
    pub fn accepted(&self) -> bool {
        self.accepted
    }
}

impl Animation for WordSimulation {
    fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

fn current_state_accepting(frame: &Frame, current: StateId) -> bool {
    frame
        .states
        .iter()
        .find(|state| state.id == current)
        .expect("the run stays on states of the frame")
        .accepting
}
