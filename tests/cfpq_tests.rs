use std::collections::BTreeSet;

use pathquery::core::graph::Graph;
use pathquery::core::symbol::Symbol;
use pathquery::cfpq;

fn dyck_graph() -> Graph<u32> {
    let mut g = Graph::new();
    g.add_edge(0, Symbol::new("a"), 1);
    g.add_edge(1, Symbol::new("a"), 2);
    g.add_edge(2, Symbol::new("b"), 3);
    g.add_edge(3, Symbol::new("b"), 4);
    g
}

#[test]
fn all_three_algorithms_agree_on_bracket_matching() {
    let g = dyck_graph();
    let grammar = "S -> a S b\nS -> a b";
    for algo in ["hellings", "matrix", "tensor"] {
        let result = cfpq(grammar, &g, algo, None, None, None).unwrap();
        assert!(result.contains(&(1, 3)), "algorithm {algo} missed (1,3)");
        assert!(result.contains(&(0, 4)), "algorithm {algo} missed (0,4)");
        assert!(!result.contains(&(1, 4)), "algorithm {algo} spuriously matched (1,4)");
    }
}

#[test]
fn epsilon_start_matches_every_vertex_reflexively() {
    let mut g: Graph<u32> = Graph::new();
    g.add_vertex(0);
    g.add_vertex(1);
    for algo in ["hellings", "matrix", "tensor"] {
        let result = cfpq("S -> epsilon", &g, algo, None, None, None).unwrap();
        assert_eq!(result, BTreeSet::from([(0, 0), (1, 1)]), "algorithm {algo} disagreed");
    }
}

#[test]
fn empty_graph_yields_no_matches() {
    let g: Graph<u32> = Graph::new();
    for algo in ["hellings", "matrix", "tensor"] {
        let result = cfpq("S -> a", &g, algo, None, None, None).unwrap();
        assert!(result.is_empty(), "algorithm {algo} should have found nothing");
    }
}

#[test]
fn start_and_final_node_restrictions_are_applied() {
    let g = dyck_graph();
    let grammar = "S -> a S b\nS -> a b";
    let start: std::collections::HashSet<u32> = [0].into_iter().collect();
    let result = cfpq(grammar, &g, "hellings", Some(&start), None, None).unwrap();
    assert_eq!(result, BTreeSet::from([(0, 4)]));
}

#[test]
fn start_symbol_can_target_a_non_start_nonterminal() {
    let mut g: Graph<u32> = Graph::new();
    g.add_edge(0, Symbol::new("a"), 1);
    g.add_edge(1, Symbol::new("b"), 2);
    let grammar = "S -> A B\nA -> a\nB -> b";
    let result = cfpq(grammar, &g, "hellings", None, None, Some("B")).unwrap();
    assert_eq!(result, BTreeSet::from([(1, 2)]));
}
