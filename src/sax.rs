//! Single-pass streaming deserialization.
//!
//! The [`SaxDeserializer`] builds the target value while tokens arrive: an object is
//! instantiated when its `{` is read and each member is assigned as soon as its value is
//! complete. No tree is kept. Values bound for collection or map fields are skipped without
//! being materialized.

use crate::coerce::coerce;
use crate::de::{self, Deserializer};
use crate::lexer::{Token, Tokenizer, DEFAULT_MAX_DEPTH};
use crate::schema::{CompositeDescriptor, TypeDescriptor, TypeKind};
use crate::source::CharSource;
use crate::{Error, Result, Value};

/// The streaming deserializer.
///
/// Objects and arrays may nest up to [`DEFAULT_MAX_DEPTH`] levels unless another limit is
/// set with [`SaxDeserializer::with_max_depth`].
#[derive(Debug, Clone, Copy)]
pub struct SaxDeserializer {
    max_depth: usize,
}

impl Default for SaxDeserializer {
    fn default() -> Self {
        SaxDeserializer {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SaxDeserializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Deserializer for SaxDeserializer {
    fn deserialize_value<S: CharSource>(
        &mut self,
        source: S,
        target: &TypeDescriptor,
    ) -> Result<Value> {
        de::check_root(target)?;
        let mut tokenizer = Tokenizer::with_max_depth(source, self.max_depth);
        let first = de::document_start(&mut tokenizer)?;
        let value = read_value(&mut tokenizer, first, target)?;
        de::document_end(&mut tokenizer)?;
        value.ok_or_else(|| de::absent_root(target))
    }
}

fn read_value<S: CharSource>(
    tokenizer: &mut Tokenizer<S>,
    token: Token,
    target: &TypeDescriptor,
) -> Result<Option<Value>> {
    match (token, target.kind()) {
        (Token::QuotedText(raw) | Token::RawFragment(raw), _) => coerce(&raw, target),
        (token, TypeKind::Unsupported(_)) if token.is_open() => {
            skip(tokenizer, token)?;
            Ok(None)
        }
        (Token::OpenObject, TypeKind::Composite(composite)) => {
            read_object(tokenizer, composite).map(Some)
        }
        (Token::OpenArray, TypeKind::Array(element)) => read_array(tokenizer, element),
        (Token::OpenObject, _) => Err(de::mismatch(target, "object")),
        (Token::OpenArray, _) => Err(de::mismatch(target, "array")),
        (other, _) => Err(Error::syntax(&format!("value expected, found {}", other))),
    }
}

fn read_object<S: CharSource>(
    tokenizer: &mut Tokenizer<S>,
    composite: &CompositeDescriptor,
) -> Result<Value> {
    let mut record = composite.instantiate()?;
    while let Some(name) = de::next_member(tokenizer)? {
        let field = composite.resolve(&name)?;
        let token = de::next_value(tokenizer, &name)?;
        let value = read_value(tokenizer, token, field.ty())?;
        de::assign(&mut record, composite, field, value)?;
    }
    Ok(Value::Object(record))
}

fn read_array<S: CharSource>(
    tokenizer: &mut Tokenizer<S>,
    element: &TypeDescriptor,
) -> Result<Option<Value>> {
    let mut values = Some(Vec::new());
    while let Some(token) = de::next_element(tokenizer)? {
        match read_value(tokenizer, token, element)? {
            Some(value) => {
                if let Some(values) = values.as_mut() {
                    values.push(value);
                }
            }
            None => values = None,
        }
    }
    Ok(values.map(Value::Array))
}

/// Consumes the rest of the object or array opened by `opening`.
///
/// Structure is checked exactly as when reading, so a skipped value cannot hide a defect.
fn skip<S: CharSource>(tokenizer: &mut Tokenizer<S>, opening: Token) -> Result<()> {
    log::trace!("skipping {} value", opening);
    let mut open = vec![opening];
    while let Some(frame) = open.last() {
        let in_object = *frame == Token::OpenObject;
        let next = if in_object {
            match de::next_member(tokenizer)? {
                Some(field) => Some(de::next_value(tokenizer, &field)?),
                None => None,
            }
        } else {
            de::next_element(tokenizer)?
        };
        match next {
            Some(token) if token.is_open() => open.push(token),
            Some(_) => {}
            None => {
                open.pop();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::source::StrSource;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize, Default)]
    struct Garage {
        name: String,
        tags: BTreeMap<String, String>,
        spots: Vec<u8>,
    }

    impl Schema for Garage {
        fn descriptor() -> TypeDescriptor {
            CompositeDescriptor::of::<Garage>("Garage")
                .field::<String>("name")
                .field::<BTreeMap<String, String>>("tags")
                .field::<Vec<u8>>("spots")
                .into_descriptor()
        }
    }

    fn read(input: &str) -> Result<Value> {
        SaxDeserializer::new().deserialize_value(StrSource::new(input), &Garage::descriptor())
    }

    #[test]
    fn test_reads_members_in_one_pass() {
        let value = read(r#"{"spots":[1,2],"name":"North"}"#).unwrap();
        let record = value.as_object().unwrap();
        assert_eq!(record.get("name"), Some(&Value::from("North")));
        assert_eq!(
            record.get("spots"),
            Some(&Value::Array(vec![Value::from(1u8), Value::from(2u8)]))
        );
    }

    #[test]
    fn test_skips_unsupported_values() {
        let value = read(r#"{"tags":{"a":{"b":[1,[2]]},"c":"d"},"name":"North"}"#).unwrap();
        let record = value.as_object().unwrap();
        assert_eq!(record.get("tags"), Some(&Value::Object(crate::Record::new())));
        assert_eq!(record.get("name"), Some(&Value::from("North")));
    }

    #[test]
    fn test_skip_still_checks_structure() {
        assert!(read(r#"{"tags":{"a":[1}}"#).unwrap_err().is_syntax());
        assert!(read(r#"{"tags":{"a":1"#).unwrap_err().is_syntax());
    }

    #[test]
    fn test_errors() {
        assert!(read(r#"{"name":"North""#).unwrap_err().is_syntax());
        assert!(read(r#"{"owner":"me"}"#).unwrap_err().is_syntax());
        assert!(read(r#"{"name":"North"} []"#).unwrap_err().is_syntax());
        assert!(matches!(
            read(r#"{"spots":[300]}"#),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            read(r#"{"name":{}}"#),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(read("[]"), Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn test_null_for_nullable_array() {
        let value = SaxDeserializer::new()
            .deserialize_value(StrSource::new("[null,[1]]"), &Vec::<Option<Vec<i32>>>::descriptor())
            .unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Null, Value::Array(vec![Value::from(1)])])
        );
    }
}
