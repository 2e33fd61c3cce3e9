//! Regular path queries via automaton intersection: build a DFA for the
//! query regex, intersect it with the graph's automaton, take the
//! transitive closure of the intersection, and project back onto graph
//! vertices.

use std::collections::BTreeSet;

use tracing::instrument;

use crate::errors::RegexError;

use super::algebra::{intersect, transitive_closure};
use super::automaton::VertexId;
use super::graph::Graph;
use super::regex::from_regex_minimal_dfa;

/// Evaluates a regular path query: returns every `(source, target)` vertex
/// pair connected by a path whose edge-label word matches `pattern`.
#[instrument(skip(graph, pattern), fields(pattern))]
pub fn eval<V: VertexId + Ord>(
    graph: &Graph<V>,
    pattern: &str,
    start: Option<&std::collections::HashSet<V>>,
    finish: Option<&std::collections::HashSet<V>>,
) -> Result<BTreeSet<(V, V)>, RegexError> {
    let graph_automaton = graph.to_automaton(start, finish);
    let query_automaton = from_regex_minimal_dfa(pattern)?;

    let product = intersect(&graph_automaton, &query_automaton);
    let closure = transitive_closure(&product);

    let mut pairs = BTreeSet::new();
    for &p in product.start_states() {
        for &q in product.final_states() {
            if !closure.get(p, q) {
                continue;
            }
            let state = product.state_at(p);
            let source = state.first().as_vertex().expect("product state is a Pair of Vertex states");
            let state_q = product.state_at(q);
            let target = state_q.first().as_vertex().expect("product state is a Pair of Vertex states");
            pairs.insert((source.clone(), target.clone()));
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol::Symbol;

    fn sample_graph() -> Graph<u32> {
        let mut g = Graph::new();
        g.add_edge(0, Symbol::new("a"), 1);
        g.add_edge(0, Symbol::new("f"), 1);
        g.add_edge(1, Symbol::new("b"), 2);
        g.add_edge(1, Symbol::new("d"), 2);
        g
    }

    #[test]
    fn alternation_query_matches_expected_pairs() {
        let g = sample_graph();
        let result = eval(&g, "(a|f).(b|d)", None, None).unwrap();
        assert_eq!(result, BTreeSet::from([(0, 2)]));
    }

    #[test]
    fn star_query_on_a_cycle() {
        let mut g: Graph<u32> = Graph::new();
        g.add_edge(0, Symbol::new("a"), 1);
        g.add_edge(1, Symbol::new("b"), 0);
        g.add_edge(1, Symbol::new("a"), 1);
        let result = eval(&g, "(a|b)(aa)*", None, None).unwrap();
        assert!(result.contains(&(0, 1)));
    }

    #[test]
    fn empty_graph_has_no_matches() {
        let g: Graph<u32> = Graph::new();
        let result = eval(&g, "a*", None, None).unwrap();
        assert!(result.is_empty());
    }
}
