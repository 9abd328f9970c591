//! JSON tokenizer.
//!
//! The [`Tokenizer`] turns a [`CharSource`] into [`Token`]s for both deserialization
//! strategies. It works without a parser mode flag: a value after `:` is read up to the
//! next `,` or `}`, while anything else that is not structural is an array element read up
//! to the next `,` or `]`. When the closing `}` or `]` ends such a fragment it is kept in
//! a one-character pushback slot and handed out by the next call, so the enclosing object
//! or array loop still sees its terminator.
//!
//! Commas never surface as tokens.
//!
//! ```rust
//! use schema_json::lexer::{Token, Tokenizer};
//! use schema_json::source::StrSource;
//!
//! let mut tokenizer = Tokenizer::new(StrSource::new(r#"{"speed":160}"#));
//! assert_eq!(tokenizer.next_token().unwrap(), Token::OpenObject);
//! assert_eq!(tokenizer.next_token().unwrap(), Token::QuotedText("\"speed\"".into()));
//! assert_eq!(tokenizer.next_token().unwrap(), Token::RawFragment("160".into()));
//! assert_eq!(tokenizer.next_token().unwrap(), Token::CloseObject);
//! assert_eq!(tokenizer.next_token().unwrap(), Token::EndOfStream);
//! ```

use crate::source::CharSource;
use crate::{Error, Result};
use std::fmt;

pub(crate) const OPEN_OBJECT: char = '{';
pub(crate) const CLOSE_OBJECT: char = '}';
pub(crate) const OPEN_ARRAY: char = '[';
pub(crate) const CLOSE_ARRAY: char = ']';
pub(crate) const QUOTE: char = '"';
pub(crate) const COMMA: char = ',';
pub(crate) const COLON: char = ':';

/// Lexical units produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Left brace `{`
    OpenObject,
    /// Right brace `}`
    CloseObject,
    /// Left bracket `[`
    OpenArray,
    /// Right bracket `]`
    CloseArray,
    /// Quoted literal, delimiting quotes included
    QuotedText(String),
    /// Unquoted scalar text, or the full text of a value that follows `:`
    RawFragment(String),
    /// End of input, also reported when the input ends inside a literal
    EndOfStream,
}

impl Token {
    /// Returns `true` for tokens that open an object or an array.
    #[inline]
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Token::OpenObject | Token::OpenArray)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenObject => f.write_str("'{'"),
            Token::CloseObject => f.write_str("'}'"),
            Token::OpenArray => f.write_str("'['"),
            Token::CloseArray => f.write_str("']'"),
            Token::QuotedText(text) | Token::RawFragment(text) => write!(f, "{:?}", text.trim()),
            Token::EndOfStream => f.write_str("end of input"),
        }
    }
}

#[inline]
fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Nesting depth accepted when no other limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Pull tokenizer with one character of pushback.
///
/// A tokenizer is owned by a single deserialization call; the pushback slot, the current
/// nesting depth and the truncation flag are part of its state and are never shared.
pub struct Tokenizer<S> {
    source: S,
    pushback: Option<char>,
    depth: usize,
    max_depth: usize,
    truncated: bool,
}

impl<S: CharSource> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Self::with_max_depth(source, DEFAULT_MAX_DEPTH)
    }

    /// Creates a tokenizer that rejects objects and arrays nested deeper than `max_depth`.
    pub fn with_max_depth(source: S, max_depth: usize) -> Self {
        Tokenizer {
            source,
            pushback: None,
            depth: 0,
            max_depth,
            truncated: false,
        }
    }

    /// Returns `true` once the input has ended inside a literal or an unterminated fragment.
    ///
    /// The [`Token::EndOfStream`] reported in that case is not a clean end of input.
    #[inline]
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Reads the next token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSyntax`](crate::Error::InvalidSyntax) when an opening brace
    /// or bracket exceeds the nesting limit, and the source's error when it fails. Other
    /// malformed input shows up as unexpected tokens, including [`Token::EndOfStream`] in
    /// the middle of a literal.
    pub fn next_token(&mut self) -> Result<Token> {
        let token = self.scan()?;
        match token {
            Token::OpenObject | Token::OpenArray => {
                if self.depth >= self.max_depth {
                    return Err(Error::syntax(&format!(
                        "document nested deeper than {} levels",
                        self.max_depth
                    )));
                }
                self.depth += 1;
            }
            Token::CloseObject | Token::CloseArray => {
                self.depth = self.depth.saturating_sub(1);
            }
            _ => {}
        }
        Ok(token)
    }

    fn scan(&mut self) -> Result<Token> {
        if let Some(ch) = self.pushback.take() {
            return Ok(match ch {
                CLOSE_OBJECT => Token::CloseObject,
                CLOSE_ARRAY => Token::CloseArray,
                other => Token::RawFragment(other.to_string()),
            });
        }

        loop {
            let ch = match self.skip_space()? {
                Some(COMMA) => continue,
                Some(ch) => ch,
                None => return Ok(Token::EndOfStream),
            };
            return match ch {
                OPEN_OBJECT => Ok(Token::OpenObject),
                CLOSE_OBJECT => Ok(Token::CloseObject),
                OPEN_ARRAY => Ok(Token::OpenArray),
                CLOSE_ARRAY => Ok(Token::CloseArray),
                QUOTE => self.quoted(),
                COLON => self.member_value(),
                first => self.element(first),
            };
        }
    }

    fn skip_space(&mut self) -> Result<Option<char>> {
        while let Some(ch) = self.source.next_char()? {
            if !is_space(ch) {
                return Ok(Some(ch));
            }
        }
        Ok(None)
    }

    /// Reads a quoted literal whose opening quote was already consumed.
    fn quoted(&mut self) -> Result<Token> {
        let mut text = String::with_capacity(16);
        text.push(QUOTE);
        loop {
            match self.source.next_char()? {
                Some(QUOTE) => {
                    text.push(QUOTE);
                    return Ok(Token::QuotedText(text));
                }
                Some(ch) => text.push(ch),
                None => return Ok(self.truncate()),
            }
        }
    }

    /// Reads the value after a `:`.
    ///
    /// Objects and arrays are reported by their opening token; anything else is read up to
    /// the `,` or `}` that ends the member, ignoring separators inside quotes.
    fn member_value(&mut self) -> Result<Token> {
        let first = match self.skip_space()? {
            Some(OPEN_OBJECT) => return Ok(Token::OpenObject),
            Some(OPEN_ARRAY) => return Ok(Token::OpenArray),
            Some(ch) => ch,
            None => return Ok(self.truncate()),
        };

        let mut text = String::with_capacity(16);
        let mut in_quotes = false;
        let mut next = Some(first);
        while let Some(ch) = next {
            if ch == QUOTE {
                in_quotes = !in_quotes;
            } else if !in_quotes && (ch == COMMA || ch == CLOSE_OBJECT) {
                if ch == CLOSE_OBJECT {
                    self.pushback = Some(ch);
                }
                return Ok(Token::RawFragment(text));
            }
            text.push(ch);
            next = self.source.next_char()?;
        }
        Ok(self.truncate())
    }

    /// Reads an unquoted array element up to the next `,` or `]`.
    fn element(&mut self, first: char) -> Result<Token> {
        let mut text = String::with_capacity(8);
        text.push(first);
        loop {
            match self.source.next_char()? {
                Some(COMMA) => return Ok(Token::RawFragment(text)),
                Some(CLOSE_ARRAY) => {
                    self.pushback = Some(CLOSE_ARRAY);
                    return Ok(Token::RawFragment(text));
                }
                Some(ch) => text.push(ch),
                None => return Ok(self.truncate()),
            }
        }
    }

    fn truncate(&mut self) -> Token {
        self.truncated = true;
        Token::EndOfStream
    }
}
