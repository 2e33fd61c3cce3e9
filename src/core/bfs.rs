//! Multi-source RPQ via a "front" matrix propagated through a direct-sum of
//! the query automaton and the graph automaton, rather than through the
//! full product automaton used by [`super::rpq`]. Cheaper when there are
//! many sources, at the cost of tracking only forward reachability.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::instrument;

use crate::errors::RegexError;

use super::automaton::{Automaton, VertexId};
use super::bool_matrix::BoolMatrix;
use super::graph::Graph;
use super::regex::from_regex_minimal_dfa;
use super::symbol::Symbol;

/// Builds the `(k+n) x (k+n)` direct-sum matrix for every label shared by
/// the query DFA and the graph automaton: top-left block is the DFA's
/// transition matrix for that label, bottom-right is the graph's.
fn direct_sum_matrices<V: VertexId>(
    dfa_r: &Automaton<V>,
    graph: &Automaton<V>,
) -> HashMap<Symbol, BoolMatrix> {
    let mut out = HashMap::new();
    for label in dfa_r.labels() {
        if let Some(graph_block) = graph.transitions_for(label) {
            let dfa_block = dfa_r.transitions_for(label).expect("label came from dfa_r.labels()");
            out.insert(label.clone(), BoolMatrix::block_diag(&[dfa_block.clone(), graph_block.clone()]));
        }
    }
    out
}

/// Applies one round of `front @ M` for every shared-label matrix, folding
/// each resulting `step` back into `k x (k+n)`-row form per the BFS-front
/// transform rule, and ORs the result into `out`.
fn step_and_transform(
    front: &BoolMatrix,
    direct_sum: &HashMap<Symbol, BoolMatrix>,
    k: usize,
    joint: bool,
    out: &mut BoolMatrix,
) {
    for matrix in direct_sum.values() {
        let step = front.matmul(matrix);
        for row in 0..step.rows() {
            for &col in step.row(row) {
                if col >= k {
                    continue;
                }
                let output_row = if joint { col } else { (row / k) * k + col };
                out.set(output_row, col);
                for &tail_col in step.row(row) {
                    if tail_col >= k {
                        out.set(output_row, tail_col);
                    }
                }
            }
        }
    }
}

fn run_front<V: VertexId>(
    graph_automaton: &Automaton<V>,
    dfa_r: &Automaton<V>,
    sources: &[usize],
    joint: bool,
) -> BoolMatrix {
    let k = dfa_r.num_states();
    let n = graph_automaton.num_states();
    let direct_sum = direct_sum_matrices(dfa_r, graph_automaton);

    let rows = if joint { k } else { sources.len() * k };
    let mut front = BoolMatrix::zeros(rows, k + n);

    if joint {
        for i in 0..k {
            front.set(i, i);
        }
        for &s in sources {
            for i in 0..k {
                front.set(i, k + s);
            }
        }
    } else {
        for (src_idx, &s) in sources.iter().enumerate() {
            for i in 0..k {
                let row = src_idx * k + i;
                front.set(row, i);
                front.set(row, k + s);
            }
        }
    }

    loop {
        let before = front.nnz();
        let mut derived = BoolMatrix::zeros(rows, k + n);
        step_and_transform(&front, &direct_sum, k, joint, &mut derived);
        front = front.or(&derived);
        if front.nnz() == before {
            break;
        }
    }

    front
}

fn start_state_indices<V: VertexId>(graph_automaton: &Automaton<V>) -> Vec<usize> {
    let mut sources: Vec<usize> = graph_automaton.start_states().iter().copied().collect();
    sources.sort_unstable();
    sources
}

/// BFS-front RPQ in joint mode: a single front row set shared by every
/// source, returning the graph vertices reachable (from any source) along a
/// path whose label word matches `pattern` and which ends in a final state.
#[instrument(skip(graph, pattern), fields(pattern))]
pub fn eval_joint<V: VertexId + Ord>(
    graph: &Graph<V>,
    pattern: &str,
    start: Option<&HashSet<V>>,
    finish: Option<&HashSet<V>>,
) -> Result<BTreeSet<V>, RegexError> {
    let graph_automaton = graph.to_automaton(start, finish);
    let dfa_r = from_regex_minimal_dfa(pattern)?;
    let k = dfa_r.num_states();
    let n = graph_automaton.num_states();
    let sources = start_state_indices(&graph_automaton);

    let front = run_front(&graph_automaton, &dfa_r, &sources, true);

    let mut result = BTreeSet::new();
    for row in 0..k {
        if !dfa_r.is_final(row) {
            continue;
        }
        for &col in front.row(row) {
            if col < k {
                continue;
            }
            let graph_local = col - k;
            if graph_local < n && graph_automaton.is_final(graph_local) {
                let vertex = graph_automaton
                    .state_at(graph_local)
                    .as_vertex()
                    .expect("graph automaton states are always Vertex");
                result.insert(vertex.clone());
            }
        }
    }
    Ok(result)
}

/// BFS-front RPQ in separated-sources mode: one block of front rows per
/// graph start vertex, returning `(source, target)` pairs rather than bare
/// targets.
#[instrument(skip(graph, pattern), fields(pattern))]
pub fn eval_separated<V: VertexId + Ord>(
    graph: &Graph<V>,
    pattern: &str,
    start: Option<&HashSet<V>>,
    finish: Option<&HashSet<V>>,
) -> Result<BTreeSet<(V, V)>, RegexError> {
    let graph_automaton = graph.to_automaton(start, finish);
    let dfa_r = from_regex_minimal_dfa(pattern)?;
    let k = dfa_r.num_states();
    let n = graph_automaton.num_states();
    let sources = start_state_indices(&graph_automaton);

    if sources.is_empty() || k == 0 {
        return Ok(BTreeSet::new());
    }

    let front = run_front(&graph_automaton, &dfa_r, &sources, false);

    let mut result = BTreeSet::new();
    for (src_idx, &source_local) in sources.iter().enumerate() {
        for i in 0..k {
            if !dfa_r.is_final(i) {
                continue;
            }
            let row = src_idx * k + i;
            for &col in front.row(row) {
                if col < k {
                    continue;
                }
                let graph_local = col - k;
                if graph_local < n && graph_automaton.is_final(graph_local) {
                    let source_vertex = graph_automaton
                        .state_at(source_local)
                        .as_vertex()
                        .expect("graph automaton states are always Vertex");
                    let target_vertex = graph_automaton
                        .state_at(graph_local)
                        .as_vertex()
                        .expect("graph automaton states are always Vertex");
                    result.insert((source_vertex.clone(), target_vertex.clone()));
                }
            }
        }
    }
    Ok(result)
}
