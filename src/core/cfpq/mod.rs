//! Context-free path query engines: three independent algorithms
//! ([`hellings`], [`matrix`], [`tensor`]) computing the same `(u, X, v)`
//! triple set, and a shared top-level filter projecting it to `(u, v)`
//! pairs for the query's start symbol and node restrictions.

pub mod hellings;
pub mod matrix;
pub mod tensor;

use std::collections::{BTreeSet, HashSet};

use tracing::instrument;

use crate::errors::EngineError;

use super::automaton::VertexId;
use super::grammar::{to_wcnf, Cfg};
use super::graph::Graph;
use super::symbol::Symbol;

/// Selects which CFPQ algorithm backs [`eval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Hellings,
    Matrix,
    Tensor,
}

impl Algorithm {
    pub fn parse(name: &str) -> Result<Self, EngineError> {
        match name {
            "hellings" => Ok(Algorithm::Hellings),
            "matrix" => Ok(Algorithm::Matrix),
            "tensor" => Ok(Algorithm::Tensor),
            other => Err(EngineError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Evaluates a context-free path query: returns every `(u, v)` such that
/// `u` is a start vertex, `v` is a final vertex, and `start_symbol` derives a
/// word labeling some path `u -> v`. `start_symbol` is the nonterminal the
/// result is filtered by; it need not be `cfg.start` — querying reachability
/// for a non-start nonterminal is meaningful on its own.
#[instrument(skip(graph, cfg), fields(?algorithm))]
pub fn eval<V: VertexId + Ord>(
    graph: &Graph<V>,
    cfg: &Cfg,
    algorithm: Algorithm,
    start_symbol: &Symbol,
    start_nodes: Option<&HashSet<V>>,
    final_nodes: Option<&HashSet<V>>,
) -> Result<BTreeSet<(V, V)>, EngineError> {
    let triples = match algorithm {
        Algorithm::Hellings => {
            let wcnf = to_wcnf(cfg);
            hellings::eval(graph, &wcnf)
        }
        Algorithm::Matrix => {
            let wcnf = to_wcnf(cfg);
            matrix::eval(graph, &wcnf)
        }
        Algorithm::Tensor => tensor::eval(graph, cfg).map_err(EngineError::BadRegex)?,
    };

    let pairs = triples
        .into_iter()
        .filter(|(u, x, v)| {
            x == start_symbol
                && start_nodes.is_none_or(|s| s.contains(u))
                && final_nodes.is_none_or(|s| s.contains(v))
        })
        .map(|(u, _, v)| (u, v))
        .collect();
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol::Symbol;

    fn bamboo() -> Graph<u32> {
        let mut g = Graph::new();
        g.add_edge(0, Symbol::new("a"), 1);
        g.add_vertex(2);
        g
    }

    #[test]
    fn every_algorithm_agrees_on_epsilon_start_symbol() {
        let cfg = Cfg::from_text("S -> epsilon").unwrap();
        let g = bamboo();
        for algo in [Algorithm::Hellings, Algorithm::Matrix, Algorithm::Tensor] {
            let result = eval(&g, &cfg, algo, &Symbol::new("S"), None, None).unwrap();
            assert_eq!(result, BTreeSet::from([(0, 0), (1, 1), (2, 2)]), "algorithm {algo:?} disagreed");
        }
    }

    #[test]
    fn unknown_algorithm_name_is_rejected() {
        assert!(Algorithm::parse("bogus").is_err());
    }

    #[test]
    fn empty_graph_has_no_matches_for_any_algorithm() {
        let cfg = Cfg::from_text("S -> a").unwrap();
        let g: Graph<u32> = Graph::new();
        for algo in [Algorithm::Hellings, Algorithm::Matrix, Algorithm::Tensor] {
            assert!(eval(&g, &cfg, algo, &Symbol::new("S"), None, None).unwrap().is_empty());
        }
    }

    #[test]
    fn filtering_by_a_non_start_nonterminal_is_supported() {
        let cfg = Cfg::from_text("S -> A B\nA -> a\nB -> b").unwrap();
        let mut g: Graph<u32> = Graph::new();
        g.add_edge(0, Symbol::new("a"), 1);
        g.add_edge(1, Symbol::new("b"), 2);
        let result = eval(&g, &cfg, Algorithm::Hellings, &Symbol::new("A"), None, None).unwrap();
        assert_eq!(result, BTreeSet::from([(0, 1)]));
    }
}
