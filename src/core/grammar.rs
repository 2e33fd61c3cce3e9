//! Context-free grammar loading and normalization to Weak Chomsky Normal
//! Form (WCNF): every production body is ε, a single terminal, or exactly
//! two nonterminals.

use std::collections::{HashMap, HashSet};

use tracing::instrument;

use crate::errors::GrammarError;

use super::symbol::Symbol;

/// A single grammar production `head -> body`. An empty `body` denotes ε.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub head: Symbol,
    pub body: Vec<Symbol>,
}

/// A context-free grammar: a start symbol and a flat list of productions.
#[derive(Debug, Clone)]
pub struct Cfg {
    pub start: Symbol,
    pub productions: Vec<Production>,
}

impl Cfg {
    pub fn new(start: Symbol, productions: Vec<Production>) -> Self {
        Cfg { start, productions }
    }

    /// Parses `Head -> sym1 sym2 ...` lines (blank lines and `#`-prefixed
    /// comments ignored). `epsilon`, `ε`, or an empty body after `->` denote
    /// the empty production. The head of the first production becomes the
    /// start symbol.
    #[instrument(skip(text))]
    pub fn from_text(text: &str) -> Result<Self, GrammarError> {
        let mut productions = Vec::new();
        let mut start = None;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((head_str, body_str)) = line.split_once("->") else {
                return Err(GrammarError::MalformedProduction {
                    line: line.to_string(),
                });
            };
            let head_str = head_str.trim();
            if head_str.is_empty() {
                return Err(GrammarError::EmptyHead {
                    line: line.to_string(),
                });
            }
            let head = Symbol::new(head_str);
            if start.is_none() {
                start = Some(head.clone());
            }

            let body: Vec<Symbol> = body_str
                .split_whitespace()
                .filter(|tok| *tok != "epsilon" && *tok != "ε")
                .map(Symbol::new)
                .collect();

            productions.push(Production { head, body });
        }

        let start = start.ok_or_else(|| GrammarError::MalformedProduction {
            line: text.to_string(),
        })?;
        Ok(Cfg::new(start, productions))
    }

    pub fn nonterminals(&self) -> HashSet<Symbol> {
        let mut set: HashSet<Symbol> = self.productions.iter().map(|p| p.head.clone()).collect();
        set.insert(self.start.clone());
        set
    }

    /// Nonterminals that derive ε, directly or transitively through other
    /// nullable nonterminals.
    pub fn nullable_nonterminals(&self) -> HashSet<Symbol> {
        let nonterminals = self.nonterminals();
        let mut nullable: HashSet<Symbol> = HashSet::new();
        loop {
            let mut changed = false;
            for p in &self.productions {
                if nullable.contains(&p.head) {
                    continue;
                }
                let derives_eps = p
                    .body
                    .iter()
                    .all(|s| nonterminals.contains(s) && nullable.contains(s));
                if p.body.is_empty() || derives_eps {
                    nullable.insert(p.head.clone());
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        nullable
    }
}

/// A grammar already known to be in Weak Chomsky Normal Form, with
/// productions partitioned by body length.
#[derive(Debug, Clone)]
pub struct Wcnf {
    pub start: Symbol,
    pub epsilon: Vec<Symbol>,
    pub terminal: Vec<(Symbol, Symbol)>,
    pub binary: Vec<(Symbol, Symbol, Symbol)>,
}

/// Normalizes `cfg` to WCNF: eliminates unit productions, drops useless
/// symbols, isolates terminals behind fresh nonterminals, and binarizes
/// bodies of length >= 3.
#[instrument(skip(cfg))]
pub fn to_wcnf(cfg: &Cfg) -> Wcnf {
    let unit_free = eliminate_unit_productions(cfg);
    let reduced = remove_useless_symbols(&unit_free, &cfg.start);
    let isolated = isolate_terminals(&reduced);
    let binarized = binarize(&isolated);

    let mut epsilon = Vec::new();
    let mut terminal = Vec::new();
    let mut binary = Vec::new();
    for p in binarized {
        match p.body.len() {
            0 => epsilon.push(p.head),
            1 => terminal.push((p.head, p.body[0].clone())),
            2 => binary.push((p.head, p.body[0].clone(), p.body[1].clone())),
            _ => unreachable!("binarize guarantees bodies of length <= 2"),
        }
    }

    Wcnf {
        start: cfg.start.clone(),
        epsilon,
        terminal,
        binary,
    }
}

fn is_nonterminal(sym: &Symbol, nonterminals: &HashSet<Symbol>) -> bool {
    nonterminals.contains(sym)
}

/// Replaces `A -> B` (B a nonterminal) by copying every production of `B`
/// into `A`, following unit chains transitively.
fn eliminate_unit_productions(cfg: &Cfg) -> Vec<Production> {
    let nonterminals = cfg.nonterminals();
    let mut by_head: HashMap<Symbol, Vec<Production>> = HashMap::new();
    for p in &cfg.productions {
        by_head.entry(p.head.clone()).or_default().push(p.clone());
    }

    let mut out = Vec::new();
    for head in nonterminals.iter() {
        let mut seen_units: HashSet<Symbol> = HashSet::new();
        let mut stack = vec![head.clone()];
        while let Some(current) = stack.pop() {
            for p in by_head.get(&current).into_iter().flatten() {
                if p.body.len() == 1 && is_nonterminal(&p.body[0], &nonterminals) {
                    let target = &p.body[0];
                    if seen_units.insert(target.clone()) {
                        stack.push(target.clone());
                    }
                } else {
                    out.push(Production {
                        head: head.clone(),
                        body: p.body.clone(),
                    });
                }
            }
        }
    }
    out
}

/// Drops nonterminals that can never derive a terminal string (non-generating)
/// and nonterminals unreachable from the start symbol.
fn remove_useless_symbols(productions: &[Production], start: &Symbol) -> Vec<Production> {
    let nonterminals: HashSet<Symbol> = productions.iter().map(|p| p.head.clone()).collect();

    let mut generating: HashSet<Symbol> = HashSet::new();
    loop {
        let mut changed = false;
        for p in productions {
            if generating.contains(&p.head) {
                continue;
            }
            let generates = p
                .body
                .iter()
                .all(|s| !nonterminals.contains(s) || generating.contains(s));
            if generates {
                generating.insert(p.head.clone());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    let generating_productions: Vec<Production> = productions
        .iter()
        .filter(|p| generating.contains(&p.head) && p.body.iter().all(|s| !nonterminals.contains(s) || generating.contains(s)))
        .cloned()
        .collect();

    let mut reachable: HashSet<Symbol> = HashSet::from([start.clone()]);
    let mut stack = vec![start.clone()];
    while let Some(current) = stack.pop() {
        for p in &generating_productions {
            if p.head != current {
                continue;
            }
            for s in &p.body {
                if nonterminals.contains(s) && reachable.insert(s.clone()) {
                    stack.push(s.clone());
                }
            }
        }
    }

    generating_productions
        .into_iter()
        .filter(|p| reachable.contains(&p.head))
        .collect()
}

/// Introduces `T_a -> a` for every terminal `a` appearing alongside other
/// symbols in a body, and substitutes `a` with `T_a` in place.
fn isolate_terminals(productions: &[Production]) -> Vec<Production> {
    let nonterminals: HashSet<Symbol> = productions.iter().map(|p| p.head.clone()).collect();
    let mut fresh: HashMap<Symbol, Symbol> = HashMap::new();
    let mut out = Vec::new();

    for p in productions {
        if p.body.len() <= 1 {
            out.push(p.clone());
            continue;
        }
        let body = p
            .body
            .iter()
            .map(|s| {
                if nonterminals.contains(s) {
                    s.clone()
                } else {
                    fresh
                        .entry(s.clone())
                        .or_insert_with(|| Symbol::new(format!("T_{s}")))
                        .clone()
                }
            })
            .collect();
        out.push(Production {
            head: p.head.clone(),
            body,
        });
    }

    for (terminal, fresh_nonterm) in fresh {
        out.push(Production {
            head: fresh_nonterm,
            body: vec![terminal],
        });
    }
    out
}

/// Decomposes bodies of length >= 3 into a chain of binary productions using
/// fresh nonterminals `head__1`, `head__2`, ....
fn binarize(productions: &[Production]) -> Vec<Production> {
    let mut out = Vec::new();
    for p in productions {
        if p.body.len() <= 2 {
            out.push(p.clone());
            continue;
        }
        let mut current_head = p.head.clone();
        let mut rest = &p.body[..];
        let mut counter = 0;
        while rest.len() > 2 {
            let fresh = Symbol::new(format!("{}__{}", p.head, counter));
            counter += 1;
            out.push(Production {
                head: current_head,
                body: vec![rest[0].clone(), fresh.clone()],
            });
            current_head = fresh;
            rest = &rest[1..];
        }
        out.push(Production {
            head: current_head,
            body: rest.to_vec(),
        });
    }
    out
}
