use std::collections::HashSet;
use std::fmt::Debug;

use crate::core::symbol::Symbol;

use super::ast::Ast;

/// State id local to a single NFA/DFA build; unrelated to any graph vertex.
pub type StateId = u32;

/// A transition label inside the Thompson-construction scaffolding. Unlike
/// the matrix-form `Automaton`, epsilon here is a genuine transition kind,
/// not an absence — subset construction needs to walk ε-closures before the
/// result is lowered into the ε-free boolean-matrix representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeLabel {
    Eps,
    Sym(Symbol),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub to: StateId,
    pub label: EdgeLabel,
}

/// A Thompson-constructed nondeterministic automaton over an alphabet of
/// [`Symbol`]s.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub start: StateId,
    pub accepts: Vec<StateId>,
    pub adjacency: Vec<Vec<Transition>>,
}

impl Nfa {
    pub fn num_states(&self) -> usize {
        self.adjacency.len()
    }

    pub fn transitions(&self, state: StateId) -> &[Transition] {
        &self.adjacency[state as usize]
    }

    /// The alphabet used in this NFA, sorted for deterministic iteration.
    pub fn alphabet(&self) -> Vec<Symbol> {
        let mut syms: HashSet<Symbol> = HashSet::new();
        for row in &self.adjacency {
            for tr in row {
                if let EdgeLabel::Sym(s) = &tr.label {
                    syms.insert(s.clone());
                }
            }
        }
        let mut syms: Vec<Symbol> = syms.into_iter().collect();
        syms.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        syms
    }
}

/// Builds an [`Nfa`] from a regex [`Ast`] via Thompson's construction. `A`
/// can be a `char` (query patterns) or a [`Symbol`] (grammar bodies) — both
/// convert into the single [`Symbol`] alphabet transitions are labeled with.
pub fn build_nfa<A>(ast: &Ast<A>) -> Nfa
where
    A: Clone + Into<Symbol> + PartialEq + Eq + Debug,
{
    let mut builder = Builder::default();
    let fragment = builder.build(ast);
    builder.finalize(fragment.start, fragment.accepts)
}

#[derive(Clone, Debug)]
struct Fragment {
    start: StateId,
    accepts: Vec<StateId>,
}

#[derive(Default)]
struct Builder {
    adjacency: Vec<Vec<Transition>>,
}

impl Builder {
    fn new_state(&mut self) -> StateId {
        let id = self.adjacency.len() as StateId;
        self.adjacency.push(Vec::new());
        id
    }

    fn add_edge(&mut self, from: StateId, to: StateId, label: EdgeLabel) {
        self.adjacency[from as usize].push(Transition { to, label });
    }

    fn build<A>(&mut self, ast: &Ast<A>) -> Fragment
    where
        A: Clone + Into<Symbol> + PartialEq + Eq + Debug,
    {
        match ast {
            Ast::Epsilon => self.build_epsilon(),
            Ast::Atom(a) => self.build_atom(a.clone().into()),
            Ast::Concat(lhs, rhs) => self.build_concat(lhs, rhs),
            Ast::Alt(lhs, rhs) => self.build_alternation(lhs, rhs),
            Ast::Star(inner) => self.build_star(inner),
            Ast::Plus(inner) => self.build_plus(inner),
            Ast::Opt(inner) => self.build_opt(inner),
        }
    }

    fn build_epsilon(&mut self) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.add_edge(start, accept, EdgeLabel::Eps);
        Fragment {
            start,
            accepts: vec![accept],
        }
    }

    fn build_atom(&mut self, sym: Symbol) -> Fragment {
        let start = self.new_state();
        let accept = self.new_state();
        self.add_edge(start, accept, EdgeLabel::Sym(sym));
        Fragment {
            start,
            accepts: vec![accept],
        }
    }

    fn build_concat<A>(&mut self, lhs: &Ast<A>, rhs: &Ast<A>) -> Fragment
    where
        A: Clone + Into<Symbol> + PartialEq + Eq + Debug,
    {
        let left = self.build(lhs);
        let right = self.build(rhs);
        for accept in &left.accepts {
            self.add_edge(*accept, right.start, EdgeLabel::Eps);
        }
        Fragment {
            start: left.start,
            accepts: right.accepts,
        }
    }

    fn build_alternation<A>(&mut self, lhs: &Ast<A>, rhs: &Ast<A>) -> Fragment
    where
        A: Clone + Into<Symbol> + PartialEq + Eq + Debug,
    {
        let left = self.build(lhs);
        let right = self.build(rhs);
        let start = self.new_state();
        let accept = self.new_state();
        self.add_edge(start, left.start, EdgeLabel::Eps);
        self.add_edge(start, right.start, EdgeLabel::Eps);
        for state in left.accepts.iter().chain(right.accepts.iter()) {
            self.add_edge(*state, accept, EdgeLabel::Eps);
        }
        Fragment {
            start,
            accepts: vec![accept],
        }
    }

    fn build_star<A>(&mut self, inner: &Ast<A>) -> Fragment
    where
        A: Clone + Into<Symbol> + PartialEq + Eq + Debug,
    {
        let frag = self.build(inner);
        let start = self.new_state();
        let accept = self.new_state();
        self.add_edge(start, frag.start, EdgeLabel::Eps);
        self.add_edge(start, accept, EdgeLabel::Eps);
        for state in frag.accepts {
            self.add_edge(state, frag.start, EdgeLabel::Eps);
            self.add_edge(state, accept, EdgeLabel::Eps);
        }
        Fragment {
            start,
            accepts: vec![accept],
        }
    }

    fn build_plus<A>(&mut self, inner: &Ast<A>) -> Fragment
    where
        A: Clone + Into<Symbol> + PartialEq + Eq + Debug,
    {
        let frag = self.build(inner);
        let accept = self.new_state();
        for state in &frag.accepts {
            self.add_edge(*state, frag.start, EdgeLabel::Eps);
            self.add_edge(*state, accept, EdgeLabel::Eps);
        }
        Fragment {
            start: frag.start,
            accepts: vec![accept],
        }
    }

    fn build_opt<A>(&mut self, inner: &Ast<A>) -> Fragment
    where
        A: Clone + Into<Symbol> + PartialEq + Eq + Debug,
    {
        let frag = self.build(inner);
        let start = self.new_state();
        let accept = self.new_state();
        self.add_edge(start, frag.start, EdgeLabel::Eps);
        self.add_edge(start, accept, EdgeLabel::Eps);
        for state in frag.accepts {
            self.add_edge(state, accept, EdgeLabel::Eps);
        }
        Fragment {
            start,
            accepts: vec![accept],
        }
    }

    fn finalize(self, start: StateId, accepts: Vec<StateId>) -> Nfa {
        let mut accepts = accepts;
        accepts.sort_unstable();
        accepts.dedup();
        Nfa {
            start,
            accepts,
            adjacency: self.adjacency,
        }
    }
}
