//! Boolean-matrix engine for regular path queries (RPQ) and context-free
//! path queries (CFPQ) over edge-labeled directed multigraphs.
//!
//! The engine represents a graph and every automaton derived from it (a
//! query regex's DFA, a recursive state machine's merged boxes, ...) as a
//! small set of states plus one boolean adjacency matrix per label. RPQ and
//! CFPQ evaluation are boolean-matrix algebra over that representation: see
//! [`core`] for the individual building blocks, and the functions below for
//! the public entry points.

pub mod core;
pub mod errors;

use std::collections::{BTreeSet, HashSet};

use tracing::instrument;

use crate::core::automaton::VertexId;
use crate::core::cfpq::Algorithm;
use crate::core::grammar::Cfg;
use crate::core::graph::Graph;
use crate::core::symbol::Symbol;
use crate::errors::EngineError;

/// Evaluates a regular path query via the tensor/intersection algorithm:
/// every `(u, v)` reachable in `graph` along a path whose edge-label word
/// matches `pattern`, restricted to `starts`/`finals` when given.
#[instrument(skip(graph, pattern), fields(pattern))]
pub fn rpq_intersection<V: VertexId + Ord>(
    pattern: &str,
    graph: &Graph<V>,
    starts: Option<&HashSet<V>>,
    finals: Option<&HashSet<V>>,
) -> Result<BTreeSet<(V, V)>, EngineError> {
    core::rpq::eval(graph, pattern, starts, finals).map_err(EngineError::BadRegex)
}

/// Evaluates a regular path query via the multi-source BFS-front algorithm.
/// `separated_sources = false` merges all sources into one result set of
/// reached vertices; `true` keeps each source's reached vertices apart as
/// `(source, target)` pairs.
#[instrument(skip(graph, pattern), fields(pattern, separated_sources))]
pub fn rpq_bfs<V: VertexId + Ord>(
    pattern: &str,
    graph: &Graph<V>,
    starts: Option<&HashSet<V>>,
    finals: Option<&HashSet<V>>,
    separated_sources: bool,
) -> Result<BfsResult<V>, EngineError> {
    if separated_sources {
        let pairs = core::bfs::eval_separated(graph, pattern, starts, finals).map_err(EngineError::BadRegex)?;
        Ok(BfsResult::Separated(pairs))
    } else {
        let vertices = core::bfs::eval_joint(graph, pattern, starts, finals).map_err(EngineError::BadRegex)?;
        Ok(BfsResult::Joint(vertices))
    }
}

/// The result of [`rpq_bfs`]: a flat vertex set in joint mode, or
/// `(source, target)` pairs in separated mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BfsResult<V: VertexId + Ord> {
    Joint(BTreeSet<V>),
    Separated(BTreeSet<(V, V)>),
}

/// Evaluates a context-free path query: every `(u, v)` such that
/// `start_symbol` (default `"S"`, independent of `cfg`'s own start symbol)
/// derives a word labeling a path `u -> v` in `graph`, restricted to
/// `starts`/`finals` when given.
#[instrument(skip(graph, cfg_text), fields(algorithm))]
pub fn cfpq<V: VertexId + Ord>(
    cfg_text: &str,
    graph: &Graph<V>,
    algorithm: &str,
    starts: Option<&HashSet<V>>,
    finals: Option<&HashSet<V>>,
    start_symbol: Option<&str>,
) -> Result<BTreeSet<(V, V)>, EngineError> {
    let cfg = Cfg::from_text(cfg_text).map_err(EngineError::BadGrammar)?;
    let algorithm = Algorithm::parse(algorithm)?;
    let start_symbol = Symbol::new(start_symbol.unwrap_or("S"));
    core::cfpq::eval(graph, &cfg, algorithm, &start_symbol, starts, finals)
}
