use pathquery::core::ecfg::Ecfg;
use pathquery::core::grammar::Cfg;
use pathquery::core::rsm::Rsm;
use pathquery::core::symbol::Symbol;

#[test]
fn ecfg_from_cfg_builds_one_body_per_head() {
    let cfg = Cfg::from_text("S -> A B\nA -> a\nA -> epsilon\nB -> b").unwrap();
    let ecfg = Ecfg::from_cfg(&cfg);
    assert_eq!(ecfg.bodies.len(), 3);
    assert!(ecfg.bodies[&Symbol::new("A")].contains('|'));
}

#[test]
fn ecfg_from_text_round_trips_through_rsm() {
    let ecfg = Ecfg::from_text("S -> a S b | epsilon").unwrap();
    let rsm: Rsm<u32> = Rsm::from_ecfg(&ecfg).unwrap();
    assert_eq!(rsm.boxes.len(), 1);
    let merged = rsm.minimize().merge_boxes();
    assert!(merged.num_states() > 0);
}

#[test]
fn merged_rsm_exposes_both_terminal_and_nonterminal_labels() {
    let cfg = Cfg::from_text("S -> A B\nA -> a\nB -> b").unwrap();
    let ecfg = Ecfg::from_cfg(&cfg);
    let rsm: Rsm<u32> = Rsm::from_ecfg(&ecfg).unwrap();
    let merged = rsm.merge_boxes();
    let labels: Vec<_> = merged.labels().collect();
    assert!(labels.iter().any(|l| !l.looks_like_nonterminal()));
}
