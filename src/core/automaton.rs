use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

use super::bool_matrix::BoolMatrix;
use super::symbol::Symbol;

/// Bound shared by every vertex id type this crate works with. Vertex
/// identity is whatever the caller provides — it just has to be comparable
/// and hashable.
pub trait VertexId: Clone + Eq + Hash + fmt::Debug {}
impl<T: Clone + Eq + Hash + fmt::Debug> VertexId for T {}

/// The opaque payload carried by an automaton state.
///
/// This is the tagged sum the spec calls for: an original graph vertex, a
/// synthetic id minted while building a regex/RSM automaton, a pair produced
/// by a product construction, or a `(nonterminal, inner-state)` pair
/// produced by merging RSM boxes. Keeping all four cases in one enum (rather
/// than one generic parameter per automaton "kind") is what lets `intersect`
/// and `merge_boxes` combine automata whose states come from different
/// construction steps without a second type parameter.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum StateVal<V: VertexId> {
    /// An original graph vertex.
    Vertex(V),
    /// A synthetic state minted while building a regex DFA or an RSM box.
    Synthetic(u32),
    /// A product state, e.g. from `intersect`.
    Pair(Box<StateVal<V>>, Box<StateVal<V>>),
    /// An RSM-merged state: `(nonterminal, inner state)`.
    Boxed(Symbol, Box<StateVal<V>>),
}

impl<V: VertexId> fmt::Debug for StateVal<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateVal::Vertex(v) => write!(f, "{v:?}"),
            StateVal::Synthetic(id) => write!(f, "q{id}"),
            StateVal::Pair(a, b) => write!(f, "({a:?}, {b:?})"),
            StateVal::Boxed(sym, inner) => write!(f, "{sym}[{inner:?}]"),
        }
    }
}

impl<V: VertexId> StateVal<V> {
    /// Projects a product or boxed state back to its first/inner component.
    /// Panics on an atomic state, since projection is only meaningful after
    /// a product construction.
    pub fn first(&self) -> &StateVal<V> {
        match self {
            StateVal::Pair(a, _) => a,
            other => other,
        }
    }

    pub fn second(&self) -> &StateVal<V> {
        match self {
            StateVal::Pair(_, b) => b,
            other => other,
        }
    }

    /// If this is a `Vertex`, returns the wrapped id.
    pub fn as_vertex(&self) -> Option<&V> {
        match self {
            StateVal::Vertex(v) => Some(v),
            _ => None,
        }
    }

    /// If this is a `Boxed` state, returns the nonterminal and the inner state.
    pub fn as_boxed(&self) -> Option<(&Symbol, &StateVal<V>)> {
        match self {
            StateVal::Boxed(sym, inner) => Some((sym, inner)),
            _ => None,
        }
    }
}

/// A finite automaton represented as states plus a per-label boolean
/// adjacency matrix: `Q`, `Σ_A`, `δ : Σ_A -> BoolMatrix(|Q|x|Q|)`, `S`, `F`.
///
/// State indices are stable for the automaton's lifetime; every mutating
/// operation in this crate (intersection, closure, RSM merge, ...) builds and
/// returns a fresh `Automaton` rather than mutating one in place.
#[derive(Clone)]
pub struct Automaton<V: VertexId> {
    states: Vec<StateVal<V>>,
    index: IndexMap<StateVal<V>, usize>,
    start: HashSet<usize>,
    finish: HashSet<usize>,
    transitions: HashMap<Symbol, BoolMatrix>,
}

impl<V: VertexId> Automaton<V> {
    /// An automaton with no states and no transitions.
    pub fn empty() -> Self {
        Automaton {
            states: Vec::new(),
            index: IndexMap::new(),
            start: HashSet::new(),
            finish: HashSet::new(),
            transitions: HashMap::new(),
        }
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn state_at(&self, i: usize) -> &StateVal<V> {
        &self.states[i]
    }

    pub fn index_of(&self, state: &StateVal<V>) -> Option<usize> {
        self.index.get(state).copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = &Symbol> {
        self.transitions.keys()
    }

    pub fn transitions_for(&self, label: &Symbol) -> Option<&BoolMatrix> {
        self.transitions.get(label)
    }

    pub fn transitions(&self) -> &HashMap<Symbol, BoolMatrix> {
        &self.transitions
    }

    pub fn start_states(&self) -> &HashSet<usize> {
        &self.start
    }

    pub fn final_states(&self) -> &HashSet<usize> {
        &self.finish
    }

    pub fn is_start(&self, i: usize) -> bool {
        self.start.contains(&i)
    }

    pub fn is_final(&self, i: usize) -> bool {
        self.finish.contains(&i)
    }
}

/// Incrementally builds an [`Automaton`], growing its boolean matrices as new
/// states are discovered. Every FA builder in this crate (graph-to-NFA,
/// regex-to-DFA, RSM box merge) goes through this type.
pub struct AutomatonBuilder<V: VertexId> {
    states: Vec<StateVal<V>>,
    index: IndexMap<StateVal<V>, usize>,
    start: HashSet<usize>,
    finish: HashSet<usize>,
    transitions: HashMap<Symbol, Vec<(usize, usize)>>,
}

impl<V: VertexId> Default for AutomatonBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: VertexId> AutomatonBuilder<V> {
    pub fn new() -> Self {
        AutomatonBuilder {
            states: Vec::new(),
            index: IndexMap::new(),
            start: HashSet::new(),
            finish: HashSet::new(),
            transitions: HashMap::new(),
        }
    }

    /// Returns the stable index for `state`, allocating one if it has not
    /// been seen before.
    pub fn state_index(&mut self, state: StateVal<V>) -> usize {
        if let Some(&i) = self.index.get(&state) {
            return i;
        }
        let i = self.states.len();
        self.index.insert(state.clone(), i);
        self.states.push(state);
        i
    }

    pub fn mark_start(&mut self, i: usize) {
        self.start.insert(i);
    }

    pub fn mark_final(&mut self, i: usize) {
        self.finish.insert(i);
    }

    pub fn add_transition(&mut self, from: usize, label: Symbol, to: usize) {
        self.transitions.entry(label).or_default().push((from, to));
    }

    /// Finalizes the builder into an immutable [`Automaton`], materializing
    /// one boolean matrix per label now that the full state count is known.
    pub fn build(self) -> Automaton<V> {
        let n = self.states.len();
        let mut transitions = HashMap::with_capacity(self.transitions.len());
        for (label, edges) in self.transitions {
            let mut m = BoolMatrix::zeros(n, n);
            for (from, to) in edges {
                m.set(from, to);
            }
            transitions.insert(label, m);
        }
        Automaton {
            states: self.states,
            index: self.index,
            start: self.start,
            finish: self.finish,
            transitions,
        }
    }
}

/// Assembles an [`Automaton`] directly from precomputed parts. Used by
/// algebra operations (`intersect`) that already know the full state list
/// and per-label matrices up front and so have no need for the incremental
/// [`AutomatonBuilder`].
pub(crate) fn assemble<V: VertexId>(
    states: Vec<StateVal<V>>,
    start: HashSet<usize>,
    finish: HashSet<usize>,
    transitions: HashMap<Symbol, BoolMatrix>,
) -> Automaton<V> {
    let mut index = IndexMap::with_capacity(states.len());
    for (i, s) in states.iter().enumerate() {
        index.insert(s.clone(), i);
    }
    Automaton {
        states,
        index,
        start,
        finish,
        transitions,
    }
}
