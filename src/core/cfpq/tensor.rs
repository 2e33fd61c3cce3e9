//! Tensor CFPQ: intersect the RSM's merged-box automaton with a graph
//! automaton that gains new nonterminal-labeled transitions every time a
//! closure path witnesses a derivation, until no more appear.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::instrument;

use crate::core::algebra::{intersect, transitive_closure};
use crate::core::automaton::{assemble, Automaton, StateVal, VertexId};
use crate::core::bool_matrix::BoolMatrix;
use crate::core::ecfg::Ecfg;
use crate::core::grammar::Cfg;
use crate::core::graph::Graph;
use crate::core::rsm::Rsm;
use crate::core::symbol::Symbol;
use crate::errors::RegexError;

fn rebuild_graph_automaton<V: VertexId>(
    states: &[StateVal<V>],
    start: &HashSet<usize>,
    finish: &HashSet<usize>,
    matrices: &HashMap<Symbol, BoolMatrix>,
) -> Automaton<V> {
    assemble(states.to_vec(), start.clone(), finish.clone(), matrices.clone())
}

/// Computes every `(u, X, v)` such that nonterminal `X` derives a word
/// labeling some path `u -> v` in `graph`, via repeated intersection of the
/// merged RSM with a graph automaton that accretes nonterminal-labeled
/// transitions as derivations are discovered.
#[instrument(skip(graph, cfg))]
pub fn eval<V: VertexId + Ord>(graph: &Graph<V>, cfg: &Cfg) -> Result<BTreeSet<(V, Symbol, V)>, RegexError> {
    let ecfg = Ecfg::from_cfg(cfg);
    let rsm: Rsm<V> = Rsm::from_ecfg(&ecfg)?.minimize();
    let rsm_bm = rsm.merge_boxes();

    let graph_automaton = graph.to_automaton(None, None);
    let n = graph_automaton.num_states();
    let states: Vec<StateVal<V>> = (0..n).map(|i| graph_automaton.state_at(i).clone()).collect();
    let start: HashSet<usize> = graph_automaton.start_states().clone();
    let finish: HashSet<usize> = graph_automaton.final_states().clone();

    let mut matrices: HashMap<Symbol, BoolMatrix> = graph_automaton.transitions().clone();

    for nullable in cfg.nullable_nonterminals() {
        let m = matrices.entry(nullable).or_insert_with(|| BoolMatrix::zeros(n, n));
        for i in 0..n {
            m.set(i, i);
        }
    }

    loop {
        let graph_bm = rebuild_graph_automaton(&states, &start, &finish, &matrices);
        let product = intersect(&rsm_bm, &graph_bm);
        let tc = transitive_closure(&product);

        let mut new_entries: Vec<(Symbol, usize, usize)> = Vec::new();
        for (i_from, i_to) in tc.nonzeros() {
            let (rsm_from, graph_from) = (i_from / n, i_from % n);
            let (rsm_to, graph_to) = (i_to / n, i_to % n);

            if !rsm_bm.is_start(rsm_from) || !rsm_bm.is_final(rsm_to) {
                continue;
            }
            let Some((nonterminal, _)) = rsm_bm.state_at(rsm_from).as_boxed() else {
                continue;
            };
            new_entries.push((nonterminal.clone(), graph_from, graph_to));
        }

        let mut changed = false;
        for (nonterminal, i, j) in new_entries {
            let m = matrices.entry(nonterminal).or_insert_with(|| BoolMatrix::zeros(n, n));
            if !m.get(i, j) {
                m.set(i, j);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut result = BTreeSet::new();
    for nonterminal in cfg.nonterminals() {
        let Some(m) = matrices.get(&nonterminal) else {
            continue;
        };
        for (i, j) in m.nonzeros() {
            let u = states[i].as_vertex().expect("graph automaton states are always Vertex");
            let v = states[j].as_vertex().expect("graph automaton states are always Vertex");
            result.insert((u.clone(), nonterminal.clone(), v.clone()));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bamboo_s_eps_reaches_every_vertex_reflexively() {
        let cfg = Cfg::from_text("S -> epsilon").unwrap();
        let mut g: Graph<u32> = Graph::new();
        g.add_edge(0, Symbol::new("a"), 1);
        g.add_vertex(2);
        let r = eval(&g, &cfg).unwrap();
        for v in [0u32, 1, 2] {
            assert!(r.contains(&(v, Symbol::new("S"), v)));
        }
    }

    #[test]
    fn empty_graph_yields_no_triples_for_a_non_nullable_start() {
        let cfg = Cfg::from_text("S -> a").unwrap();
        let g: Graph<u32> = Graph::new();
        assert!(eval(&g, &cfg).unwrap().is_empty());
    }

    #[test]
    fn dyck_like_bracket_matching_matches_hellings() {
        let cfg = Cfg::from_text("S -> a S b\nS -> a b").unwrap();
        let mut g: Graph<u32> = Graph::new();
        g.add_edge(0, Symbol::new("a"), 1);
        g.add_edge(1, Symbol::new("a"), 2);
        g.add_edge(2, Symbol::new("b"), 3);
        g.add_edge(3, Symbol::new("b"), 4);
        let r = eval(&g, &cfg).unwrap();
        assert!(r.contains(&(1, Symbol::new("S"), 3)));
        assert!(r.contains(&(0, Symbol::new("S"), 4)));
    }
}
