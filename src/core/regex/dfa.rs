use std::collections::{BTreeSet, HashMap, VecDeque};

use indexmap::IndexSet;

use crate::core::symbol::Symbol;

use super::nfa::{EdgeLabel, Nfa, StateId};

/// A complete-or-partial deterministic automaton over [`Symbol`]s. Missing
/// transitions are absent from `trans`, not routed to a dead state — callers
/// that need totality (none of ours do) would add one explicitly.
#[derive(Debug, Clone)]
pub struct Dfa {
    pub num_states: usize,
    pub start: StateId,
    pub accepts: BTreeSet<StateId>,
    pub alphabet: Vec<Symbol>,
    pub trans: HashMap<(StateId, Symbol), StateId>,
}

impl Dfa {
    pub fn step(&self, state: StateId, sym: &Symbol) -> Option<StateId> {
        self.trans.get(&(state, sym.clone())).copied()
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepts.contains(&state)
    }
}

fn epsilon_closure(nfa: &Nfa, seeds: &BTreeSet<StateId>) -> BTreeSet<StateId> {
    let mut closure: BTreeSet<StateId> = seeds.clone();
    let mut stack: Vec<StateId> = seeds.iter().copied().collect();
    while let Some(state) = stack.pop() {
        for tr in nfa.transitions(state) {
            if tr.label == EdgeLabel::Eps && closure.insert(tr.to) {
                stack.push(tr.to);
            }
        }
    }
    closure
}

fn move_on(nfa: &Nfa, states: &BTreeSet<StateId>, sym: &Symbol) -> BTreeSet<StateId> {
    let mut out = BTreeSet::new();
    for &state in states {
        for tr in nfa.transitions(state) {
            if let EdgeLabel::Sym(s) = &tr.label {
                if s == sym {
                    out.insert(tr.to);
                }
            }
        }
    }
    out
}

/// Determinizes an [`Nfa`] via the classic subset construction. States of
/// the returned DFA are numbered in discovery order starting from the
/// epsilon-closure of the NFA start state.
pub fn determinize(nfa: &Nfa) -> Dfa {
    let alphabet = nfa.alphabet();
    let start_set = epsilon_closure(nfa, &BTreeSet::from([nfa.start]));

    let mut subsets: IndexSet<BTreeSet<StateId>> = IndexSet::new();
    subsets.insert(start_set.clone());

    let mut trans = HashMap::new();
    let mut queue = VecDeque::new();
    queue.push_back(start_set);

    while let Some(current) = queue.pop_front() {
        let current_id = subsets.get_index_of(&current).expect("enqueued subset must be indexed") as StateId;
        for sym in &alphabet {
            let moved = move_on(nfa, &current, sym);
            if moved.is_empty() {
                continue;
            }
            let target = epsilon_closure(nfa, &moved);
            let (target_id, is_new) = match subsets.get_index_of(&target) {
                Some(idx) => (idx as StateId, false),
                None => {
                    subsets.insert(target.clone());
                    ((subsets.len() - 1) as StateId, true)
                }
            };
            trans.insert((current_id, sym.clone()), target_id);
            if is_new {
                queue.push_back(target);
            }
        }
    }

    let nfa_accepts: BTreeSet<StateId> = nfa.accepts.iter().copied().collect();
    let accepts = subsets
        .iter()
        .enumerate()
        .filter(|(_, subset)| subset.intersection(&nfa_accepts).next().is_some())
        .map(|(idx, _)| idx as StateId)
        .collect();

    Dfa {
        num_states: subsets.len(),
        start: 0,
        accepts,
        alphabet,
        trans,
    }
}
