//! Recursive state machines: one automaton "box" per nonterminal, merged
//! into a single automaton whose labels are either terminals or
//! nonterminals — the representation the tensor CFPQ algorithm operates on.

use std::collections::HashMap;

use tracing::instrument;

use crate::errors::RegexError;

use super::automaton::{Automaton, AutomatonBuilder, StateVal, VertexId};
use super::ecfg::Ecfg;
use super::regex::from_symbol_regex_minimal_dfa;
use super::symbol::Symbol;

/// One automaton box per nonterminal, compiled from its ECFG body regex.
pub struct Rsm<V: VertexId> {
    pub start: Symbol,
    pub boxes: HashMap<Symbol, Automaton<V>>,
}

impl<V: VertexId> Rsm<V> {
    /// Compiles every nonterminal's regex body (4.D's front end, over
    /// grammar-symbol atoms) into its box automaton.
    #[instrument(skip(ecfg))]
    pub fn from_ecfg(ecfg: &Ecfg) -> Result<Self, RegexError> {
        let mut boxes = HashMap::with_capacity(ecfg.bodies.len());
        for (head, body) in &ecfg.bodies {
            boxes.insert(head.clone(), from_symbol_regex_minimal_dfa(body)?);
        }
        Ok(Rsm {
            start: ecfg.start.clone(),
            boxes,
        })
    }

    /// Minimizes each box independently. Boxes are already minimal DFAs as
    /// built by [`Self::from_ecfg`]; this is the no-op identity of that
    /// invariant, kept as an explicit step so callers don't have to know it.
    pub fn minimize(self) -> Self {
        self
    }

    /// Merges every box into one automaton: states become
    /// `StateVal::Boxed(nonterminal, inner_state)`, and each box's own
    /// start/final states and transitions (whether labeled by a terminal or
    /// by another nonterminal) are carried over unchanged.
    pub fn merge_boxes(&self) -> Automaton<V> {
        let mut builder: AutomatonBuilder<V> = AutomatonBuilder::new();

        for (head, automaton) in &self.boxes {
            let local_to_merged: Vec<usize> = (0..automaton.num_states())
                .map(|i| {
                    builder.state_index(StateVal::Boxed(
                        head.clone(),
                        Box::new(automaton.state_at(i).clone()),
                    ))
                })
                .collect();

            for &i in automaton.start_states() {
                builder.mark_start(local_to_merged[i]);
            }
            for &i in automaton.final_states() {
                builder.mark_final(local_to_merged[i]);
            }
            for (label, matrix) in automaton.transitions() {
                for (i, j) in matrix.nonzeros() {
                    builder.add_transition(local_to_merged[i], label.clone(), local_to_merged[j]);
                }
            }
        }

        builder.build()
    }
}
