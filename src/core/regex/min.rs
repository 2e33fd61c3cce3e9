use std::collections::{HashMap, HashSet};

use crate::core::symbol::Symbol;

use super::dfa::Dfa;
use super::nfa::StateId;

/// Minimizes a [`Dfa`] by Hopcroft-style partition refinement: states start
/// split into accepting/non-accepting blocks, then repeatedly split further
/// whenever two states in the same block disagree on which block a symbol
/// leads to (including "no transition", its own class).
pub fn minimize(dfa: &Dfa) -> Dfa {
    let mut partition: Vec<HashSet<StateId>> = split_by_acceptance(dfa);

    loop {
        let class_of = class_index(&partition);
        let mut refined: Vec<HashSet<StateId>> = Vec::new();
        let mut changed = false;

        for block in &partition {
            let mut groups: HashMap<Vec<Option<usize>>, HashSet<StateId>> = HashMap::new();
            for &state in block {
                let signature: Vec<Option<usize>> = dfa
                    .alphabet
                    .iter()
                    .map(|sym| dfa.step(state, sym).map(|target| class_of[&target]))
                    .collect();
                groups.entry(signature).or_default().insert(state);
            }
            if groups.len() > 1 {
                changed = true;
            }
            refined.extend(groups.into_values());
        }

        partition = refined;
        if !changed {
            break;
        }
    }

    build_minimized(dfa, &partition)
}

fn split_by_acceptance(dfa: &Dfa) -> Vec<HashSet<StateId>> {
    let mut accepting = HashSet::new();
    let mut rejecting = HashSet::new();
    for state in 0..dfa.num_states as StateId {
        if dfa.is_accepting(state) {
            accepting.insert(state);
        } else {
            rejecting.insert(state);
        }
    }
    [accepting, rejecting]
        .into_iter()
        .filter(|block| !block.is_empty())
        .collect()
}

fn class_index(partition: &[HashSet<StateId>]) -> HashMap<StateId, usize> {
    let mut map = HashMap::new();
    for (idx, block) in partition.iter().enumerate() {
        for &state in block {
            map.insert(state, idx);
        }
    }
    map
}

fn build_minimized(dfa: &Dfa, partition: &[HashSet<StateId>]) -> Dfa {
    let class_of = class_index(partition);
    let start = class_of[&dfa.start] as StateId;

    let accepts = partition
        .iter()
        .enumerate()
        .filter(|(_, block)| block.iter().any(|s| dfa.is_accepting(*s)))
        .map(|(idx, _)| idx as StateId)
        .collect();

    let mut trans: HashMap<(StateId, Symbol), StateId> = HashMap::new();
    for (idx, block) in partition.iter().enumerate() {
        let representative = *block.iter().next().expect("blocks are non-empty");
        for sym in &dfa.alphabet {
            if let Some(target) = dfa.step(representative, sym) {
                trans.insert((idx as StateId, sym.clone()), class_of[&target]);
            }
        }
    }

    Dfa {
        num_states: partition.len(),
        start,
        accepts,
        alphabet: dfa.alphabet.clone(),
        trans,
    }
}
