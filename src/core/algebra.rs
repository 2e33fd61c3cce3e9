use std::collections::HashSet;

use super::automaton::{Automaton, StateVal, VertexId};
use super::bool_matrix::BoolMatrix;
use super::symbol::Symbol;

/// Product construction: `intersect(A, B)` accepts the language
/// `L(A) ∩ L(B)`.
///
/// Restricted to labels shared by both alphabets — for each shared label
/// `a`, the product transition matrix is `kron(δ_A[a], δ_B[a])`. Product
/// states are pairs `(q_A, q_B)` at canonical index `i_A * |Q_B| + i_B`, and
/// a product state is start/final iff both components are.
pub fn intersect<V: VertexId>(a: &Automaton<V>, b: &Automaton<V>) -> Automaton<V> {
    let na = a.num_states();
    let nb = b.num_states();

    let shared: Vec<&Symbol> = a.labels().filter(|l| b.transitions_for(l).is_some()).collect();

    let mut states = Vec::with_capacity(na * nb);
    let mut start = HashSet::new();
    let mut finish = HashSet::new();
    for ia in 0..na {
        for ib in 0..nb {
            let idx = ia * nb + ib;
            debug_assert_eq!(idx, states.len());
            states.push(StateVal::Pair(
                Box::new(a.state_at(ia).clone()),
                Box::new(b.state_at(ib).clone()),
            ));
            if a.is_start(ia) && b.is_start(ib) {
                start.insert(idx);
            }
            if a.is_final(ia) && b.is_final(ib) {
                finish.insert(idx);
            }
        }
    }

    let mut transitions = std::collections::HashMap::new();
    for label in shared {
        let ma = a.transitions_for(label).unwrap();
        let mb = b.transitions_for(label).unwrap();
        transitions.insert(label.clone(), ma.kron(mb));
    }

    super::automaton::assemble(states, start, finish, transitions)
}

/// The label-agnostic adjacency of `a`: the elementwise OR of every label's
/// transition matrix. An automaton with no labels has 0x0 adjacency.
pub fn adjacency<V: VertexId>(a: &Automaton<V>) -> BoolMatrix {
    let mut labels = a.labels();
    let Some(first) = labels.next() else {
        return BoolMatrix::zeros(0, 0);
    };
    let mut acc = a.transitions_for(first).unwrap().clone();
    for label in labels {
        acc.or_assign(a.transitions_for(label).unwrap());
    }
    acc
}

/// Transitive closure of `a`'s label-agnostic adjacency, via repeated
/// `c = c + c @ c` until `nnz` stops growing. Self-loops encoding ε are never
/// inferred here; the caller must have introduced them already.
pub fn transitive_closure<V: VertexId>(a: &Automaton<V>) -> BoolMatrix {
    let n = a.num_states();
    let adj = adjacency(a);
    if adj.rows() == 0 {
        return BoolMatrix::zeros(n, n);
    }
    adj.transitive_closure()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::automaton::AutomatonBuilder;

    fn cycle_plus_tail() -> Automaton<u32> {
        // 0 -a-> 1 -a-> 2 -a-> 0, 3 -a-> 2, all states start+final for the
        // purpose of testing transitive_closure directly.
        let mut b: AutomatonBuilder<u32> = AutomatonBuilder::new();
        for v in 0..4u32 {
            let i = b.state_index(StateVal::Vertex(v));
            b.mark_start(i);
            b.mark_final(i);
        }
        b.add_transition(0, Symbol::new("a"), 1);
        b.add_transition(1, Symbol::new("a"), 2);
        b.add_transition(2, Symbol::new("a"), 0);
        b.add_transition(3, Symbol::new("a"), 2);
        b.build()
    }

    #[test]
    fn transitive_closure_matches_spec_fixture() {
        let a = cycle_plus_tail();
        let tc = transitive_closure(&a);
        for i in 0..4 {
            for j in 0..3 {
                assert!(tc.get(i, j));
            }
            assert!(!tc.get(i, 3));
        }
    }

    #[test]
    fn adjacency_of_labelless_automaton_is_0x0() {
        let a: Automaton<u32> = Automaton::empty();
        let adj = adjacency(&a);
        assert_eq!((adj.rows(), adj.cols()), (0, 0));
    }

    #[test]
    fn intersect_with_self_preserves_language() {
        let a = cycle_plus_tail();
        let prod = intersect(&a, &a);
        // every (i,i) diagonal pair is reachable/start/final exactly as in a
        assert_eq!(prod.start_states().len(), a.start_states().len());
        assert_eq!(prod.final_states().len(), a.final_states().len());
    }

    #[test]
    fn intersect_is_commutative_on_reachable_pair_counts() {
        let a = cycle_plus_tail();
        let mut other: AutomatonBuilder<u32> = AutomatonBuilder::new();
        for v in 0..2u32 {
            let i = other.state_index(StateVal::Vertex(v));
            other.mark_start(i);
            other.mark_final(i);
        }
        other.add_transition(0, Symbol::new("a"), 1);
        let b = other.build();

        let ab = intersect(&a, &b);
        let ba = intersect(&b, &a);
        assert_eq!(ab.num_states(), ba.num_states());
        assert_eq!(ab.start_states().len(), ba.start_states().len());
    }
}
