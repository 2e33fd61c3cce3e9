//! Regex front end: lexer, Pratt parser, Thompson construction, subset
//! construction and Hopcroft minimization, generalized over an atom type so
//! it serves both character-level query patterns and whitespace-delimited
//! grammar-body patterns (ECFG production bodies).

pub mod ast;
pub mod dfa;
pub mod lexer;
pub mod min;
pub mod nfa;
pub mod parser;
pub mod tokens;

use tracing::instrument;

use crate::errors::RegexError;

use self::dfa::{determinize, Dfa};
use self::min::minimize;
use self::nfa::build_nfa;

use super::automaton::{Automaton, AutomatonBuilder, StateVal, VertexId};

/// Builds the minimal DFA, as an [`Automaton`], recognizing the language of
/// a character-level regex pattern. Used as the query side of the
/// tensor/intersection RPQ algorithm.
#[instrument(skip(pattern), fields(pattern))]
pub fn from_regex_minimal_dfa<V: VertexId>(pattern: &str) -> Result<Automaton<V>, RegexError> {
    let tokens = lexer::lex_chars(pattern)?;
    let ast = parser::parse(&tokens)?;
    let nfa = build_nfa(&ast);
    let dfa = minimize(&determinize(&nfa));
    Ok(lower_dfa(&dfa))
}

/// Builds the minimal DFA, as an [`Automaton`], recognizing the language of
/// a whitespace-delimited grammar-symbol regex (an ECFG production body).
#[instrument(skip(pattern), fields(pattern))]
pub fn from_symbol_regex_minimal_dfa<V: VertexId>(pattern: &str) -> Result<Automaton<V>, RegexError> {
    let tokens = lexer::lex_symbols(pattern)?;
    let ast = parser::parse(&tokens)?;
    let nfa = build_nfa(&ast);
    let dfa = minimize(&determinize(&nfa));
    Ok(lower_dfa(&dfa))
}

/// Lowers a DFA (epsilon-free, total-or-partial transition function) into
/// the boolean-matrix [`Automaton`] representation, tagging every DFA state
/// as [`StateVal::Synthetic`].
fn lower_dfa<V: VertexId>(dfa: &Dfa) -> Automaton<V> {
    let mut builder: AutomatonBuilder<V> = AutomatonBuilder::new();
    let indices: Vec<usize> = (0..dfa.num_states as u32)
        .map(|id| builder.state_index(StateVal::Synthetic(id)))
        .collect();

    builder.mark_start(indices[dfa.start as usize]);
    for &accept in &dfa.accepts {
        builder.mark_final(indices[accept as usize]);
    }

    for (&(from, ref sym), &to) in &dfa.trans {
        builder.add_transition(indices[from as usize], sym.clone(), indices[to as usize]);
    }

    builder.build()
}
