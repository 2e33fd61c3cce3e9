//! Hellings' algorithm: a worklist of reachability triples `(u, A, v)`,
//! closed under the grammar's binary productions.

use std::collections::{BTreeSet, VecDeque};

use tracing::instrument;

use crate::core::automaton::VertexId;
use crate::core::grammar::Wcnf;
use crate::core::graph::Graph;
use crate::core::symbol::Symbol;

/// Computes every `(u, A, v)` such that nonterminal `A` derives a word
/// labeling some path `u -> v` in `graph`, under Hellings' worklist
/// algorithm.
#[instrument(skip(graph, wcnf))]
pub fn eval<V: VertexId + Ord>(graph: &Graph<V>, wcnf: &Wcnf) -> BTreeSet<(V, Symbol, V)> {
    let mut r: BTreeSet<(V, Symbol, V)> = BTreeSet::new();
    let mut worklist: VecDeque<(V, Symbol, V)> = VecDeque::new();

    for v in graph.vertices() {
        for head in &wcnf.epsilon {
            let triple = (v.clone(), head.clone(), v.clone());
            if r.insert(triple.clone()) {
                worklist.push_back(triple);
            }
        }
    }

    for (u, label, v) in graph.edges() {
        for (head, terminal) in &wcnf.terminal {
            if terminal == label {
                let triple = (u.clone(), head.clone(), v.clone());
                if r.insert(triple.clone()) {
                    worklist.push_back(triple);
                }
            }
        }
    }

    while let Some((u, b, w)) = worklist.pop_front() {
        // (u, B, w) combined with an existing (w, C, v): A -> B C
        let right_matches: Vec<(Symbol, V)> = r
            .iter()
            .filter(|(ru, _, _)| *ru == w)
            .map(|(_, c, v)| (c.clone(), v.clone()))
            .collect();
        for (c, v) in right_matches {
            for (a, left, right) in &wcnf.binary {
                if *left == b && *right == c {
                    let triple = (u.clone(), a.clone(), v.clone());
                    if r.insert(triple.clone()) {
                        worklist.push_back(triple);
                    }
                }
            }
        }

        // an existing (v, C, u) combined with (u, B, w): A -> C B
        let left_matches: Vec<(V, Symbol)> = r
            .iter()
            .filter(|(_, _, rv)| *rv == u)
            .map(|(v, c, _)| (v.clone(), c.clone()))
            .collect();
        for (v, c) in left_matches {
            for (a, left, right) in &wcnf.binary {
                if *left == c && *right == b {
                    let triple = (v.clone(), a.clone(), w.clone());
                    if r.insert(triple.clone()) {
                        worklist.push_back(triple);
                    }
                }
            }
        }
    }

    r
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
        assert!(r.contains(&(0, Symbol::new("S"), 0)));
        assert!(r.contains(&(1, Symbol::new("S"), 1)));
        assert!(r.contains(&(2, Symbol::new("S"), 2)));
    }

    #[test]
    fn empty_graph_yields_no_triples_for_a_non_nullable_start() {
        let cfg = Cfg::from_text("S -> a").unwrap();
        let wcnf = to_wcnf(&cfg);
        let g: Graph<u32> = Graph::new();
        assert!(eval(&g, &wcnf).is_empty());
    }

    #[test]
    fn dyck_like_bracket_matching() {
        // S -> a S b | a b
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
