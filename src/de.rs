//! Deserialization core shared by the DOM and SAX strategies.
//!
//! ## Overview
//!
//! A [`Deserializer`] reads a document from a [`CharSource`] against a [`TypeDescriptor`]
//! and produces a typed [`Value`]. Two implementations exist:
//!
//! - [`DomDeserializer`](crate::DomDeserializer): parses the whole document into a tree,
//!   then builds the value from the tree
//! - [`SaxDeserializer`](crate::SaxDeserializer): builds the value while reading tokens
//!
//! Both read structure through the helpers in this module, so they accept the same documents
//! and raise the same kind of error for the same defect.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use schema_json::{schema, from_str};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
//! struct Data { x: i32, y: i32 }
//!
//! schema!(Data { x: i32, y: i32 });
//!
//! let data: Data = from_str(r#"{"x":1,"y":2}"#).unwrap();
//! assert_eq!(data, Data { x: 1, y: 2 });
//! ```
//!
//! The strategies can also be driven directly:
//!
//! ```rust
//! use schema_json::de::Deserializer;
//! use schema_json::source::StrSource;
//! use schema_json::SaxDeserializer;
//!
//! let matrix: Vec<Vec<i32>> = SaxDeserializer::new()
//!     .deserialize(StrSource::new("[[1,2],[3]]"))
//!     .unwrap();
//! assert_eq!(matrix, vec![vec![1, 2], vec![3]]);
//! ```

use crate::coerce::unquote;
use crate::lexer::{Token, Tokenizer};
use crate::schema::{CompositeDescriptor, FieldDescriptor, Schema, TypeDescriptor};
use crate::source::CharSource;
use crate::{Error, Record, Result, Value};
use serde::de::DeserializeOwned;

/// A strategy that materializes documents against a type descriptor.
pub trait Deserializer {
    /// Reads one document and builds a value of the target type.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSyntax`] for structural defects and unknown field names
    /// - [`Error::InvalidValue`] when a token does not fit its target type
    /// - [`Error::DefaultConstructor`] and [`Error::UnaccessibleField`] when a composite
    ///   cannot be built
    /// - [`Error::UnsupportedType`] when the target is a collection or map
    /// - [`Error::Io`] when the source fails
    fn deserialize_value<S: CharSource>(
        &mut self,
        source: S,
        target: &TypeDescriptor,
    ) -> Result<Value>;

    /// Reads one document into a `T`.
    fn deserialize<T, S>(&mut self, source: S) -> Result<T>
    where
        Self: Sized,
        T: Schema + DeserializeOwned,
        S: CharSource,
    {
        let target = T::descriptor();
        let value = self.deserialize_value(source, &target)?;
        crate::from_value(value)
    }
}

/// Rejects targets that cannot be a document root.
pub(crate) fn check_root(target: &TypeDescriptor) -> Result<()> {
    if target.is_unsupported() {
        return Err(Error::unsupported_type(&format!(
            "{} cannot be read as a document",
            target
        )));
    }
    Ok(())
}

/// Error for a root whose value came out absent.
pub(crate) fn absent_root(target: &TypeDescriptor) -> Error {
    Error::unsupported_type(&format!("{} cannot be read as a document", target))
}

/// Reads the first token and checks that it opens an object or an array.
pub(crate) fn document_start<S: CharSource>(tokenizer: &mut Tokenizer<S>) -> Result<Token> {
    let token = tokenizer.next_token()?;
    if token.is_open() {
        Ok(token)
    } else {
        Err(Error::syntax("document must start with '{' or '['"))
    }
}

/// Checks that nothing but separators follows the root value.
pub(crate) fn document_end<S: CharSource>(tokenizer: &mut Tokenizer<S>) -> Result<()> {
    match tokenizer.next_token()? {
        Token::EndOfStream if tokenizer.is_truncated() => Err(Error::syntax(
            "unterminated text after the end of the document",
        )),
        Token::EndOfStream => Ok(()),
        other => Err(Error::syntax(&format!(
            "unexpected {} after the end of the document",
            other
        ))),
    }
}

/// Reads the key of the next object member; `None` at the closing `}`.
pub(crate) fn next_member<S: CharSource>(tokenizer: &mut Tokenizer<S>) -> Result<Option<String>> {
    match tokenizer.next_token()? {
        Token::CloseObject => Ok(None),
        Token::QuotedText(text) => Ok(Some(unquote(&text).to_string())),
        Token::EndOfStream => Err(Error::syntax("'}' expected")),
        other => Err(Error::syntax(&format!("field name expected, found {}", other))),
    }
}

/// Reads the value token of the member named `field`.
pub(crate) fn next_value<S: CharSource>(tokenizer: &mut Tokenizer<S>, field: &str) -> Result<Token> {
    match tokenizer.next_token()? {
        Token::EndOfStream => Err(Error::syntax("'}' expected")),
        Token::RawFragment(text) if text.trim().is_empty() => Err(missing_value(field)),
        Token::CloseObject | Token::CloseArray => Err(missing_value(field)),
        token => Ok(token),
    }
}

fn missing_value(field: &str) -> Error {
    Error::syntax(&format!("value expected for field {:?}", field))
}

/// Reads the next array element token; `None` at the closing `]`.
pub(crate) fn next_element<S: CharSource>(tokenizer: &mut Tokenizer<S>) -> Result<Option<Token>> {
    match tokenizer.next_token()? {
        Token::CloseArray => Ok(None),
        Token::EndOfStream | Token::CloseObject => Err(Error::syntax("']' expected")),
        token => Ok(Some(token)),
    }
}

/// Error for an object or array met where `target` cannot hold it.
pub(crate) fn mismatch(target: &TypeDescriptor, found: &str) -> Error {
    Error::invalid_value(target, found)
}

/// Stores a member value into an instance record.
///
/// An absent value leaves the constructed default in place.
pub(crate) fn assign(
    record: &mut Record,
    composite: &CompositeDescriptor,
    field: &FieldDescriptor,
    value: Option<Value>,
) -> Result<()> {
    let value = match value {
        Some(value) => value,
        None => return Ok(()),
    };
    if !field.is_writable() {
        return Err(Error::unaccessible_field(
            composite.type_name(),
            field.name(),
            "field is read-only",
        ));
    }
    match record.get_mut(field.name()) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(Error::unaccessible_field(
            composite.type_name(),
            field.name(),
            "constructed instance has no such field",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Access;
    use crate::source::StrSource;
    use serde::Serialize;
    use std::collections::HashMap;

    #[derive(Serialize, Default)]
    struct Car {
        model: String,
        id: u32,
    }

    fn car() -> CompositeDescriptor {
        CompositeDescriptor::of::<Car>("Car")
            .field::<String>("model")
            .with_field(FieldDescriptor::new::<u32>("id").with_access(Access::ReadOnly))
            .field::<i32>("colour")
    }

    fn tokenizer(input: &str) -> Tokenizer<StrSource<'_>> {
        Tokenizer::new(StrSource::new(input))
    }

    #[test]
    fn test_document_start() {
        assert_eq!(document_start(&mut tokenizer(" [1]")).unwrap(), Token::OpenArray);
        assert!(document_start(&mut tokenizer("1")).unwrap_err().is_syntax());
        assert!(document_start(&mut tokenizer("\"x\"")).unwrap_err().is_syntax());
        assert!(document_start(&mut tokenizer("")).unwrap_err().is_syntax());
    }

    #[test]
    fn test_document_end() {
        assert!(document_end(&mut tokenizer(" ,\n")).is_ok());
        let err = document_end(&mut tokenizer("}")).unwrap_err();
        assert!(err.to_string().contains("'}'"));

        for trailing in [" x", " \"x", " 3", " :1"] {
            let err = document_end(&mut tokenizer(trailing)).unwrap_err();
            assert!(err.is_syntax(), "{:?}", trailing);
            assert!(err.to_string().contains("unterminated"), "{:?}", trailing);
        }
    }

    #[test]
    fn test_members() {
        let mut tokens = tokenizer(r#""model":"BMW"}"#);
        assert_eq!(next_member(&mut tokens).unwrap(), Some("model".to_string()));
        assert_eq!(
            next_value(&mut tokens, "model").unwrap(),
            Token::RawFragment("\"BMW\"".to_string())
        );
        assert_eq!(next_member(&mut tokens).unwrap(), None);
        assert!(next_member(&mut tokens).unwrap_err().to_string().contains("'}' expected"));
    }

    #[test]
    fn test_missing_member_value() {
        let err = next_value(&mut tokenizer(":}"), "model").unwrap_err();
        assert!(err.is_syntax());
        assert!(err.to_string().contains("model"));
        assert!(next_value(&mut tokenizer("}"), "model").unwrap_err().is_syntax());
        assert!(next_member(&mut tokenizer("[")).unwrap_err().is_syntax());
    }

    #[test]
    fn test_elements() {
        let mut tokens = tokenizer("1]");
        assert_eq!(
            next_element(&mut tokens).unwrap(),
            Some(Token::RawFragment("1".to_string()))
        );
        assert_eq!(next_element(&mut tokens).unwrap(), None);
        assert!(next_element(&mut tokenizer("}")).unwrap_err().is_syntax());
        assert!(next_element(&mut tokenizer("")).unwrap_err().is_syntax());
    }

    #[test]
    fn test_assign() {
        let composite = car();
        let mut record = composite.instantiate().unwrap();

        let model = composite.resolve("model").unwrap();
        assign(&mut record, &composite, model, Some(Value::from("BMW"))).unwrap();
        assign(&mut record, &composite, model, None).unwrap();
        assert_eq!(record.get("model"), Some(&Value::from("BMW")));

        let id = composite.resolve("id").unwrap();
        assert!(matches!(
            assign(&mut record, &composite, id, Some(Value::from(1u32))),
            Err(Error::UnaccessibleField { .. })
        ));

        let colour = composite.resolve("colour").unwrap();
        assert!(matches!(
            assign(&mut record, &composite, colour, Some(Value::from(1))),
            Err(Error::UnaccessibleField { .. })
        ));
    }

    #[test]
    fn test_root_kinds() {
        assert!(check_root(&Vec::<i32>::descriptor()).is_ok());
        assert!(matches!(
            check_root(&HashMap::<String, i32>::descriptor()),
            Err(Error::UnsupportedType(_))
        ));
    }
}
