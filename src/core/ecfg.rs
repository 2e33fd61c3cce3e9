//! Extended context-free grammars: one regular-expression body per
//! nonterminal, built either from a [`Cfg`] (unioning bodies sharing a head)
//! or loaded directly as `"Head -> regex"` text.

use std::collections::HashMap;

use tracing::instrument;

use crate::errors::GrammarError;

use super::grammar::Cfg;
use super::symbol::Symbol;

/// An ECFG production: `head -> regex`, where `regex` is a whitespace-atom
/// pattern over grammar symbols (parsed lazily by [`super::regex::lexer::lex_symbols`]).
#[derive(Debug, Clone)]
pub struct Ecfg {
    pub start: Symbol,
    pub bodies: HashMap<Symbol, String>,
}

impl Ecfg {
    /// Unions every CFG production sharing a head into one regex body,
    /// joined with `|`. A production's body symbols are space-joined; an
    /// empty body contributes the literal `ε` alternative.
    #[instrument(skip(cfg))]
    pub fn from_cfg(cfg: &Cfg) -> Self {
        let mut alternatives: HashMap<Symbol, Vec<String>> = HashMap::new();
        for p in &cfg.productions {
            let alt = if p.body.is_empty() {
                "ε".to_string()
            } else {
                p.body
                    .iter()
                    .map(Symbol::as_str)
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            alternatives.entry(p.head.clone()).or_default().push(alt);
        }

        let bodies = alternatives
            .into_iter()
            .map(|(head, alts)| {
                let joined = alts
                    .into_iter()
                    .map(|a| format!("({a})"))
                    .collect::<Vec<_>>()
                    .join("|");
                (head, joined)
            })
            .collect();

        Ecfg {
            start: cfg.start.clone(),
            bodies,
        }
    }

    /// Parses `"Head -> regex"` lines directly; the first head becomes the
    /// start symbol.
    #[instrument(skip(text))]
    pub fn from_text(text: &str) -> Result<Self, GrammarError> {
        let mut bodies = HashMap::new();
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
            bodies.insert(head, body_str.trim().to_string());
        }

        let start = start.ok_or_else(|| GrammarError::MalformedProduction {
            line: text.to_string(),
        })?;
        Ok(Ecfg { start, bodies })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cfg_unions_alternatives_sharing_a_head() {
        let cfg = Cfg::from_text("S -> a\nS -> b").unwrap();
        let ecfg = Ecfg::from_cfg(&cfg);
        let body = &ecfg.bodies[&Symbol::new("S")];
        assert!(body.contains('|'));
        assert!(body.contains('a') && body.contains('b'));
    }

    #[test]
    fn from_cfg_represents_empty_body_as_epsilon() {
        let cfg = Cfg::from_text("S -> epsilon").unwrap();
        let ecfg = Ecfg::from_cfg(&cfg);
        assert!(ecfg.bodies[&Symbol::new("S")].contains('ε'));
    }

    #[test]
    fn from_text_reads_head_arrow_regex_lines() {
        let ecfg = Ecfg::from_text("S -> A B | C").unwrap();
        assert_eq!(ecfg.start, Symbol::new("S"));
        assert_eq!(ecfg.bodies[&Symbol::new("S")], "A B | C");
    }
}
