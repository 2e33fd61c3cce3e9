use std::collections::{BTreeSet, HashSet};

use pathquery::core::graph::Graph;
use pathquery::core::symbol::Symbol;
use pathquery::{rpq_bfs, BfsResult};

#[test]
fn joint_mode_reaches_every_vertex_under_star_closure() {
    let mut g: Graph<u32> = Graph::new();
    g.add_edge(0, Symbol::new("a"), 1);
    g.add_edge(1, Symbol::new("b"), 2);
    g.add_edge(2, Symbol::new("a"), 0);

    let result = rpq_bfs("(a|b)*", &g, None, None, false).unwrap();
    assert_eq!(result, BfsResult::Joint(BTreeSet::from([0, 1, 2])));
}

#[test]
fn separated_mode_keeps_each_source_apart() {
    let mut g: Graph<u32> = Graph::new();
    g.add_edge(0, Symbol::new("a"), 1);
    g.add_edge(0, Symbol::new("b"), 2);
    g.add_edge(1, Symbol::new("b"), 2);
    g.add_edge(2, Symbol::new("c"), 2);

    let start: HashSet<u32> = [0, 1].into_iter().collect();
    let finish: HashSet<u32> = [2].into_iter().collect();
    let result = rpq_bfs("a.b*", &g, Some(&start), Some(&finish), true).unwrap();
    let BfsResult::Separated(pairs) = result else {
        panic!("expected separated-mode result");
    };
    assert_eq!(pairs, BTreeSet::from([(0, 2), (1, 2)]));
}

#[test]
fn restricted_start_set_excludes_other_vertices_as_sources() {
    let mut g: Graph<u32> = Graph::new();
    g.add_edge(0, Symbol::new("a"), 1);
    g.add_edge(1, Symbol::new("a"), 2);

    let start: HashSet<u32> = [0].into_iter().collect();
    let result = rpq_bfs("a*", &g, Some(&start), None, false).unwrap();
    assert_eq!(result, BfsResult::Joint(BTreeSet::from([0, 1, 2])));
}

#[test]
fn no_matching_path_yields_empty_result() {
    let mut g: Graph<u32> = Graph::new();
    g.add_edge(0, Symbol::new("x"), 1);

    let result = rpq_bfs("y", &g, None, None, false).unwrap();
    assert_eq!(result, BfsResult::Joint(BTreeSet::new()));
}
