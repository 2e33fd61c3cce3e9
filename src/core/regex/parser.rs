use std::fmt::Debug;

use crate::errors::{ParseError, ParseErrorKind};

use super::ast::Ast;
use super::tokens::{Token, TokenKind};

/// Converts a token stream into an [`Ast`] using a Pratt-style
/// recursive-descent parser for regular expressions. Works identically over
/// character atoms and grammar-symbol atoms, since precedence (`|` loosest,
/// implicit concatenation next, postfix `*`/`+`/`?` tightest) doesn't depend
/// on what an atom is.
pub fn parse<A: Clone + PartialEq + Eq + Debug>(tokens: &[Token<A>]) -> Result<Ast<A>, ParseError> {
    let mut parser = Parser::new(tokens);
    let ast = parser.parse_regex()?;
    parser.expect(&TokenKind::Eos)?;
    Ok(ast)
}

struct Parser<'a, A: Clone + PartialEq + Eq + Debug> {
    tokens: &'a [Token<A>],
    pos: usize,
}

impl<'a, A: Clone + PartialEq + Eq + Debug> Parser<'a, A> {
    fn new(tokens: &'a [Token<A>]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_regex(&mut self) -> Result<Ast<A>, ParseError> {
        self.parse_alt()
    }

    /// Parses an alternation (`lhs | rhs`).
    fn parse_alt(&mut self) -> Result<Ast<A>, ParseError> {
        let mut node = self.parse_concat()?;
        while self.matches(&TokenKind::Or) {
            let rhs = self.parse_concat()?;
            node = Ast::alt(node, rhs);
        }
        Ok(node)
    }

    /// Parses implicit concatenation of atoms.
    fn parse_concat(&mut self) -> Result<Ast<A>, ParseError> {
        let mut nodes = Vec::new();
        while self.can_start_atom() {
            nodes.push(self.parse_repeat()?);
        }
        match nodes.len() {
            0 => {
                if matches!(
                    self.peek_kind(),
                    Some(TokenKind::Star | TokenKind::Plus | TokenKind::QMark)
                ) {
                    Err(self.error_here(ParseErrorKind::MisplacedPostfix))
                } else {
                    Err(self.error_here(ParseErrorKind::EmptyAlternative))
                }
            }
            1 => Ok(nodes.remove(0)),
            _ => Ok(chain_concat(nodes)),
        }
    }

    /// Parses an atom followed by any number of postfix repetition operators.
    fn parse_repeat(&mut self) -> Result<Ast<A>, ParseError> {
        let mut node = self.parse_atom()?;
        loop {
            if self.matches(&TokenKind::Star) {
                node = Ast::star(node);
            } else if self.matches(&TokenKind::Plus) {
                node = Ast::plus(node);
            } else if self.matches(&TokenKind::QMark) {
                node = Ast::opt(node);
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn parse_atom(&mut self) -> Result<Ast<A>, ParseError> {
        match self.peek_kind().cloned() {
            Some(TokenKind::Atom(a)) => {
                self.pos += 1;
                Ok(Ast::Atom(a))
            }
            Some(TokenKind::Eps) => {
                self.pos += 1;
                Ok(Ast::Epsilon)
            }
            Some(TokenKind::LParen) => {
                self.pos += 1;
                let inner = self.parse_alt()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            Some(TokenKind::Eos) | None => Err(self.error_here(ParseErrorKind::UnexpectedEos)),
            Some(other) => Err(self.error_at_token(&other)),
        }
    }

    fn can_start_atom(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(TokenKind::Atom(_) | TokenKind::Eps | TokenKind::LParen)
        )
    }

    fn matches(&mut self, kind: &TokenKind<A>) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind<A>) -> Result<(), ParseError> {
        if self.matches(kind) {
            Ok(())
        } else if matches!(kind, TokenKind::RParen) {
            Err(self.error_here(ParseErrorKind::MissingRParen))
        } else {
            Err(self.error_here(ParseErrorKind::UnexpectedEos))
        }
    }

    fn peek_kind(&self) -> Option<&TokenKind<A>> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn current_column(&self) -> usize {
        self.tokens.get(self.pos).map(|t| t.pos).unwrap_or(0)
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.current_column(), kind)
    }

    fn error_at_token(&self, kind: &TokenKind<A>) -> ParseError {
        ParseError::new(
            self.current_column(),
            ParseErrorKind::UnexpectedToken {
                found: format!("{kind:?}"),
            },
        )
    }
}

fn chain_concat<A: Clone + PartialEq + Eq + Debug>(mut nodes: Vec<Ast<A>>) -> Ast<A> {
    let mut iter = nodes.drain(..);
    let first = iter.next().expect("chain_concat requires at least one node");
    iter.fold(first, Ast::concat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::regex::lexer::lex_chars;

    fn ast_of(pattern: &str) -> Ast<char> {
        let tokens = lex_chars(pattern).unwrap();
        parse(&tokens).unwrap()
    }

    #[test]
    fn concatenation_binds_tighter_than_alternation() {
        // a|bc* groups as a|(b(c*))
        let ast = ast_of("a|bc*");
        assert_eq!(
            ast,
            Ast::alt(
                Ast::Atom('a'),
                Ast::concat(Ast::Atom('b'), Ast::star(Ast::Atom('c')))
            )
        );
    }

    #[test]
    fn unbalanced_parens_is_missing_rparen() {
        let tokens = lex_chars("(a").unwrap();
        let err = parse(&tokens).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingRParen);
    }

    #[test]
    fn misplaced_postfix_is_detected() {
        let tokens = lex_chars("*a").unwrap();
        let err = parse(&tokens).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MisplacedPostfix);
    }

    #[test]
    fn empty_alternative_is_detected() {
        let tokens = lex_chars("a|").unwrap();
        let err = parse(&tokens).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyAlternative);
    }
}
