use crate::core::symbol::Symbol;
use crate::errors::LexError;

use super::tokens::{Token, TokenKind};

/// Lexes a character-level regex pattern (the surface query language for
/// RPQs) into a token stream. `\` escapes the following character; `\e`
/// lexes to the explicit epsilon marker. `.` is pyformlang-style explicit
/// concatenation: it emits no token of its own, since the parser already
/// concatenates adjacent atoms by juxtaposition.
///
/// # Examples
///
/// ```
/// use pathquery::core::regex::lexer::lex_chars;
/// use pathquery::core::regex::tokens::TokenKind;
///
/// let tokens = lex_chars("a.b").unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::Atom('a'));
/// assert_eq!(tokens[1].kind, TokenKind::Atom('b'));
/// ```
pub fn lex_chars(input: &str) -> Result<Vec<Token<char>>, LexError> {
    let mut tokens = Vec::new();
    let mut iter = input.char_indices().peekable();

    while let Some((idx, ch)) = iter.next() {
        let column = idx + 1;
        let kind = match ch {
            '\\' => {
                let (_, next) = iter
                    .next()
                    .ok_or_else(|| LexError::new(column, "dangling escape"))?;
                if next == 'e' {
                    TokenKind::Eps
                } else {
                    TokenKind::Atom(next)
                }
            }
            '$' => TokenKind::Eps,
            '|' => TokenKind::Or,
            '*' => TokenKind::Star,
            '+' => TokenKind::Plus,
            '?' => TokenKind::QMark,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '.' => continue,
            c if c.is_whitespace() => continue,
            _ => TokenKind::Atom(ch),
        };
        tokens.push(Token::new(kind, column));
    }

    tokens.push(Token::new(TokenKind::Eos, input.len() + 1));
    Ok(tokens)
}

/// Lexes a grammar-body regex (ECFG production right-hand side) where atoms
/// are whole whitespace-delimited grammar symbols rather than characters, and
/// `ε`/`$`/`epsilon` denote the empty word.
///
/// # Examples
///
/// ```
/// use pathquery::core::regex::lexer::lex_symbols;
/// use pathquery::core::regex::tokens::TokenKind;
/// use pathquery::core::symbol::Symbol;
///
/// let tokens = lex_symbols("A b | C").unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::Atom(Symbol::new("A")));
/// assert_eq!(tokens[2].kind, TokenKind::Or);
/// ```
pub fn lex_symbols(input: &str) -> Result<Vec<Token<Symbol>>, LexError> {
    let mut tokens = Vec::new();
    let mut iter = input.char_indices().peekable();

    while let Some((idx, ch)) = iter.next() {
        let column = idx + 1;
        match ch {
            '|' => tokens.push(Token::new(TokenKind::Or, column)),
            '*' => tokens.push(Token::new(TokenKind::Star, column)),
            '+' => tokens.push(Token::new(TokenKind::Plus, column)),
            '?' => tokens.push(Token::new(TokenKind::QMark, column)),
            '(' => tokens.push(Token::new(TokenKind::LParen, column)),
            ')' => tokens.push(Token::new(TokenKind::RParen, column)),
            c if c.is_whitespace() => continue,
            _ => {
                let mut word = String::new();
                word.push(ch);
                while let Some(&(_, next)) = iter.peek() {
                    if next.is_whitespace() || "|*+?()".contains(next) {
                        break;
                    }
                    word.push(next);
                    iter.next();
                }
                let kind = if word == "ε" || word == "$" || word == "epsilon" {
                    TokenKind::Eps
                } else {
                    TokenKind::Atom(Symbol::new(word))
                };
                tokens.push(Token::new(kind, column));
            }
        }
    }

    tokens.push(Token::new(TokenKind::Eos, input.len() + 1));
    Ok(tokens)
}
