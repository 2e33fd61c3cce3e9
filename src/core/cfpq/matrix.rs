//! Matrix-based CFPQ: one boolean matrix per nonterminal, closed under the
//! grammar's binary productions via `M_A <- M_A | (M_B @ M_C)`.

use std::collections::{BTreeSet, HashMap};

use tracing::instrument;

use crate::core::automaton::VertexId;
use crate::core::bool_matrix::BoolMatrix;
use crate::core::grammar::Wcnf;
use crate::core::graph::Graph;
use crate::core::symbol::Symbol;

/// Computes every `(u, A, v)` such that nonterminal `A` derives a word
/// labeling some path `u -> v` in `graph`, via per-nonterminal boolean
/// matrices iterated to a fixed point.
#[instrument(skip(graph, wcnf))]
pub fn eval<V: VertexId + Ord>(graph: &Graph<V>, wcnf: &Wcnf) -> BTreeSet<(V, Symbol, V)> {
    let vertices = graph.vertices();
    let n = vertices.len();
    let index: HashMap<&V, usize> = vertices.iter().enumerate().map(|(i, v)| (v, i)).collect();

    let mut matrices: HashMap<Symbol, BoolMatrix> = HashMap::new();

    for head in &wcnf.epsilon {
        let m = matrices.entry(head.clone()).or_insert_with(|| BoolMatrix::zeros(n, n));
        for i in 0..n {
            m.set(i, i);
        }
    }

    for (u, label, v) in graph.edges() {
        for (head, terminal) in &wcnf.terminal {
            if terminal == label {
                let m = matrices.entry(head.clone()).or_insert_with(|| BoolMatrix::zeros(n, n));
                m.set(index[u], index[v]);
            }
        }
    }

    for head in wcnf.binary.iter().map(|(a, _, _)| a) {
        matrices.entry(head.clone()).or_insert_with(|| BoolMatrix::zeros(n, n));
    }

    loop {
        let mut changed = false;
        for (a, b, c) in &wcnf.binary {
            let mb = matrices.get(b).cloned().unwrap_or_else(|| BoolMatrix::zeros(n, n));
            let mc = matrices.get(c).cloned().unwrap_or_else(|| BoolMatrix::zeros(n, n));
            let product = mb.matmul(&mc);
            let ma = matrices.get_mut(a).expect("seeded above for every binary head");
            let before = ma.nnz();
            ma.or_assign(&product);
            if ma.nnz() != before {
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut result = BTreeSet::new();
    for (head, m) in &matrices {
        for (i, j) in m.nonzeros() {
            result.insert((vertices[i].clone(), head.clone(), vertices[j].clone()));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grammar::{to_wcnf, Cfg};

    #[test]
    fn bamboo_s_eps_reaches_every_vertex_reflexively() {
        let cfg = Cfg::from_text("S -> epsilon").unwrap();
        let wcnf = to_wcnf(&cfg);
        let mut g: Graph<u32> = Graph::new();
        g.add_edge(0, Symbol::new("a"), 1);
        g.add_vertex(2);
        let r = eval(&g, &wcnf);
        for v in [0u32, 1, 2] {
            assert!(r.contains(&(v, Symbol::new("S"), v)));
        }
    }

    #[test]
    fn empty_graph_yields_no_triples_for_a_non_nullable_start() {
        let cfg = Cfg::from_text("S -> a").unwrap();
        let wcnf = to_wcnf(&cfg);
        let g: Graph<u32> = Graph::new();
        assert!(eval(&g, &wcnf).is_empty());
    }

    #[test]
    fn dyck_like_bracket_matching_matches_hellings() {
        let cfg = Cfg::from_text("S -> a S b\nS -> a b").unwrap();
        let wcnf = to_wcnf(&cfg);
        let mut g: Graph<u32> = Graph::new();
        g.add_edge(0, Symbol::new("a"), 1);
        g.add_edge(1, Symbol::new("a"), 2);
        g.add_edge(2, Symbol::new("b"), 3);
        g.add_edge(3, Symbol::new("b"), 4);
        let r = eval(&g, &wcnf);
        assert!(r.contains(&(1, Symbol::new("S"), 3)));
        assert!(r.contains(&(0, Symbol::new("S"), 4)));
    }
}
