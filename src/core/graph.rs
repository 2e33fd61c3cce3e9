use std::collections::HashSet;

use super::automaton::{Automaton, AutomatonBuilder, StateVal, VertexId};
use super::symbol::Symbol;

/// A directed, edge-labeled multigraph on opaque vertex ids.
///
/// This is the boundary representation: callers build one from
/// `(source, label, target)` triples, optionally naming explicit start/final
/// vertex sets, and hand it to the RPQ/CFPQ engines.
#[derive(Clone, Debug, Default)]
pub struct Graph<V: VertexId> {
    edges: Vec<(V, Symbol, V)>,
    vertices: Vec<V>,
}

impl<V: VertexId> Graph<V> {
    pub fn new() -> Self {
        Graph {
            edges: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Adds an edge `from --label--> to`, registering both endpoints as
    /// vertices if not already known.
    pub fn add_edge(&mut self, from: V, label: impl Into<Symbol>, to: V) -> &mut Self {
        self.register_vertex(from.clone());
        self.register_vertex(to.clone());
        self.edges.push((from, label.into(), to));
        self
    }

    /// Ensures `v` is counted among this graph's vertices even if it has no
    /// incident edges.
    pub fn add_vertex(&mut self, v: V) -> &mut Self {
        self.register_vertex(v);
        self
    }

    fn register_vertex(&mut self, v: V) {
        if !self.vertices.contains(&v) {
            self.vertices.push(v);
        }
    }

    pub fn edges(&self) -> &[(V, Symbol, V)] {
        &self.edges
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Builds the NFA boolean decomposition of this graph: one state per
    /// vertex, one transition per edge. `start`/`final` default to the full
    /// vertex set when not given — the spec's
    /// `start_nodes=None ≡ start_nodes=V` equivalence.
    pub fn to_automaton(
        &self,
        start: Option<&HashSet<V>>,
        finish: Option<&HashSet<V>>,
    ) -> Automaton<V> {
        let mut builder: AutomatonBuilder<V> = AutomatonBuilder::new();
        for v in &self.vertices {
            let i = builder.state_index(StateVal::Vertex(v.clone()));
            let is_start = start.is_none_or(|s| s.contains(v));
            let is_final = finish.is_none_or(|s| s.contains(v));
            if is_start {
                builder.mark_start(i);
            }
            if is_final {
                builder.mark_final(i);
            }
        }
        for (from, label, to) in &self.edges {
            let fi = builder.state_index(StateVal::Vertex(from.clone()));
            let ti = builder.state_index(StateVal::Vertex(to.clone()));
            builder.add_transition(fi, label.clone(), ti);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_has_no_vertices_or_edges() {
        let g: Graph<u32> = Graph::new();
        assert!(g.is_empty());
        assert!(g.edges().is_empty());
    }

    #[test]
    fn default_start_final_is_all_vertices() {
        let mut g: Graph<u32> = Graph::new();
        g.add_edge(0, "a", 1);
        let nfa = g.to_automaton(None, None);
        assert_eq!(nfa.start_states().len(), 2);
        assert_eq!(nfa.final_states().len(), 2);
    }

    #[test]
    fn explicit_start_final_restrict_marking() {
        let mut g: Graph<u32> = Graph::new();
        g.add_edge(0, "a", 1);
        let start: HashSet<u32> = [0].into_iter().collect();
        let finish: HashSet<u32> = [1].into_iter().collect();
        let nfa = g.to_automaton(Some(&start), Some(&finish));
        assert_eq!(nfa.start_states().len(), 1);
        assert_eq!(nfa.final_states().len(), 1);
    }
}
