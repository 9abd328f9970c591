//! Configuration options for JSON encoding and decoding.
//!
//! - [`JsonOptions`]: main configuration struct
//! - [`Strategy`]: which deserializer materializes a document
//!
//! ## Examples
//!
//! ```rust
//! use schema_json::{schema, to_string_with_options, from_str_with_options, JsonOptions, Strategy};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! schema!(Point { x: i32, y: i32 });
//!
//! let json = to_string_with_options(&Point { x: 1, y: 2 }, JsonOptions::pretty()).unwrap();
//! assert_eq!(json, "{\n  \"x\": 1,\n  \"y\": 2\n}");
//!
//! let options = JsonOptions::new().with_strategy(Strategy::Sax);
//! let point: Point = from_str_with_options(&json, options).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```

use crate::lexer::DEFAULT_MAX_DEPTH;

/// Materialization strategy used when reading a document.
///
/// Both strategies accept the same documents and report the same error kinds.
///
/// - **Dom**: parses the whole document into a [`DomNode`](crate::DomNode) tree, then
///   builds the target value from it
/// - **Sax**: builds the target value while reading tokens, without an intermediate tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Dom,
    Sax,
}

impl Strategy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Strategy::Dom => "dom",
            Strategy::Sax => "sax",
        }
    }
}

/// Configuration options for JSON output and input.
///
/// # Examples
///
/// ```rust
/// use schema_json::{JsonOptions, Strategy};
///
/// // Compact output, DOM input
/// let options = JsonOptions::new();
///
/// // Pretty-printed with 4-space indentation, streaming input
/// let options = JsonOptions::pretty()
///     .with_indent(4)
///     .with_strategy(Strategy::Sax);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug)]
pub struct JsonOptions {
    pub indent: usize,
    pub pretty: bool,
    pub strategy: Strategy,
    /// Deepest nesting of objects and arrays accepted when reading.
    pub max_depth: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            indent: 2,
            pretty: false,
            strategy: Strategy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl JsonOptions {
    /// Creates default options (compact output, 2-space indent, DOM strategy).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schema_json::{JsonOptions, Strategy};
    ///
    /// let options = JsonOptions::new();
    /// assert_eq!(options.indent, 2);
    /// assert!(!options.pretty);
    /// assert_eq!(options.strategy, Strategy::Dom);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for output with newlines and indentation.
    #[must_use]
    pub fn pretty() -> Self {
        JsonOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Default is 2. Only affects pretty-printed output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the nesting limit for reading.
    ///
    /// Documents that nest objects and arrays deeper fail with
    /// [`Error::InvalidSyntax`](crate::Error::InvalidSyntax) under both strategies.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = JsonOptions::default();
        assert_eq!(options.indent, 2);
        assert!(!options.pretty);
        assert_eq!(options.strategy, Strategy::Dom);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_builder_chain() {
        let options = JsonOptions::pretty()
            .with_indent(0)
            .with_strategy(Strategy::Sax)
            .with_max_depth(8);
        assert!(options.pretty);
        assert_eq!(options.indent, 0);
        assert_eq!(options.strategy.as_str(), "sax");
        assert_eq!(options.max_depth, 8);
    }
}
