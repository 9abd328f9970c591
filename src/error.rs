//! Error types for schema-driven JSON serialization and deserialization.
//!
//! The taxonomy separates what went wrong from where the input came from:
//!
//! - **Syntax errors**: structural problems such as a missing `}` or `]`, a document that
//!   does not start with `{` or `[`, or a field name the target schema does not define
//! - **Value errors**: a token whose text cannot be coerced to the target kind, or a value
//!   whose shape does not match the target type
//! - **Construction errors**: a composite type without zero-argument construction, or a field
//!   that cannot be read or written
//! - **I/O errors**: file or stream failures, never reported as syntax or value errors
//!
//! Tokens carry no position information, so messages describe the offending token or field
//! rather than a line and column.
//!
//! ## Examples
//!
//! ```rust
//! use schema_json::{from_str, Error};
//!
//! let result: Result<Vec<i32>, Error> = from_str("[1,2,3");
//! assert!(matches!(result, Err(Error::InvalidSyntax(_))));
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding JSON.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Structural error in the document
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),

    /// Token text that cannot be converted to the target type
    #[error("Invalid value {found:?}: expected {expected}")]
    InvalidValue { expected: String, found: String },

    /// Composite type that cannot be constructed without arguments
    #[error("Type {0} has no zero-argument constructor")]
    DefaultConstructor(String),

    /// Field that cannot be read or written
    #[error("Field {field:?} of {type_name} is not accessible: {reason}")]
    UnaccessibleField {
        type_name: String,
        field: String,
        reason: String,
    },

    /// Type outside the codec's supported shapes
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schema_json::Error;
    ///
    /// let err = Error::syntax("'}' expected");
    /// assert_eq!(err.to_string(), "Invalid syntax: '}' expected");
    /// ```
    pub fn syntax(msg: &str) -> Self {
        Error::InvalidSyntax(msg.to_string())
    }

    /// Creates a value error for text that does not fit the expected type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schema_json::Error;
    ///
    /// let err = Error::invalid_value("i32", "fast");
    /// assert!(err.to_string().contains("expected i32"));
    /// ```
    pub fn invalid_value(expected: impl fmt::Display, found: &str) -> Self {
        Error::InvalidValue {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn default_constructor(type_name: &str) -> Self {
        Error::DefaultConstructor(type_name.to_string())
    }

    pub fn unaccessible_field(type_name: &str, field: &str, reason: &str) -> Self {
        Error::UnaccessibleField {
            type_name: type_name.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an unsupported type error for collections and maps.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for structural errors.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Error::InvalidSyntax(_))
    }

    /// Returns `true` for errors raised while reading or writing the underlying stream.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
