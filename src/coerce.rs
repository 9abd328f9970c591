//! Conversion of raw token text into typed values.
//!
//! Both deserializers hand the text of a non-composite token to [`coerce`] together with
//! the type the value is being read into. Text targets take the token verbatim minus its
//! surrounding quotes; there is no escape processing. Every other scalar kind ignores
//! whitespace and parses the kind's literal form.

use crate::lexer::QUOTE;
use crate::schema::{ScalarKind, TypeDescriptor, TypeKind};
use crate::{Error, Number, Result, Value};
use std::str::FromStr;

pub(crate) const NULL_LITERAL: &str = "null";

/// Strips one pair of surrounding double quotes, if present.
#[must_use]
pub fn unquote(text: &str) -> &str {
    text.strip_prefix(QUOTE)
        .and_then(|rest| rest.strip_suffix(QUOTE))
        .unwrap_or(text)
}

/// Converts raw token text to a value of the target type.
///
/// Returns `Ok(None)` for collection and map targets: their values are left unset rather
/// than rejected.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] when the text is not a literal of the target kind, when
/// `null` meets a non-nullable target, or when a scalar token meets an array or composite
/// target.
///
/// # Examples
///
/// ```rust
/// use schema_json::coerce::coerce;
/// use schema_json::{Number, Schema, Value};
///
/// assert_eq!(coerce(" 160 ", &i32::descriptor()).unwrap(), Some(Value::Number(Number::Integer(160))));
/// assert_eq!(coerce("null", &Option::<i32>::descriptor()).unwrap(), Some(Value::Null));
/// assert!(coerce("null", &i32::descriptor()).is_err());
/// ```
pub fn coerce(text: &str, target: &TypeDescriptor) -> Result<Option<Value>> {
    let kind = match target.kind() {
        TypeKind::Unsupported(_) => return Ok(None),
        TypeKind::Scalar(ScalarKind::Text) => {
            let trimmed = text.trim();
            if target.is_nullable() && trimmed == NULL_LITERAL {
                return Ok(Some(Value::Null));
            }
            return Ok(Some(Value::String(unquote(trimmed).to_string())));
        }
        TypeKind::Scalar(kind) => Some(*kind),
        TypeKind::Array(_) | TypeKind::Composite(_) => None,
    };

    let compact: String = text.split_whitespace().collect();
    if compact == NULL_LITERAL {
        return if target.is_nullable() {
            Ok(Some(Value::Null))
        } else {
            Err(Error::invalid_value(target, NULL_LITERAL))
        };
    }

    match kind {
        Some(kind) => parse_scalar(text.trim(), &compact, kind).map(Some),
        None => Err(Error::invalid_value(target, text.trim())),
    }
}

fn parse_scalar(trimmed: &str, compact: &str, kind: ScalarKind) -> Result<Value> {
    let invalid = || Error::invalid_value(kind.name(), trimmed);
    let value = match kind {
        ScalarKind::Text => Value::String(unquote(trimmed).to_string()),
        ScalarKind::Bool => Value::Bool(literal(compact, kind, trimmed)?),
        ScalarKind::Char => {
            let mut chars = unquote(trimmed).chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Value::Char(ch),
                _ => return Err(invalid()),
            }
        }
        ScalarKind::I8 => Value::from(literal::<i8>(compact, kind, trimmed)?),
        ScalarKind::I16 => Value::from(literal::<i16>(compact, kind, trimmed)?),
        ScalarKind::I32 => Value::from(literal::<i32>(compact, kind, trimmed)?),
        ScalarKind::I64 => Value::from(literal::<i64>(compact, kind, trimmed)?),
        ScalarKind::U8 => Value::from(literal::<u8>(compact, kind, trimmed)?),
        ScalarKind::U16 => Value::from(literal::<u16>(compact, kind, trimmed)?),
        ScalarKind::U32 => Value::from(literal::<u32>(compact, kind, trimmed)?),
        ScalarKind::U64 => Value::from(literal::<u64>(compact, kind, trimmed)?),
        ScalarKind::F32 => {
            Value::Number(Number::Float(f64::from(literal::<f32>(compact, kind, trimmed)?)))
        }
        ScalarKind::F64 => Value::Number(Number::Float(literal(compact, kind, trimmed)?)),
    };
    Ok(value)
}

fn literal<T: FromStr>(compact: &str, kind: ScalarKind, trimmed: &str) -> Result<T> {
    compact
        .parse()
        .map_err(|_| Error::invalid_value(kind.name(), trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CompositeDescriptor, Schema};
    use std::collections::HashMap;

    fn ok<T: Schema>(text: &str) -> Value {
        coerce(text, &T::descriptor()).unwrap().unwrap()
    }

    fn err<T: Schema>(text: &str) -> Error {
        coerce(text, &T::descriptor()).unwrap_err()
    }

    #[test]
    fn test_text() {
        assert_eq!(ok::<String>("\"BMW\""), Value::from("BMW"));
        assert_eq!(ok::<String>("  \"BMW\"\n"), Value::from("BMW"));
        assert_eq!(ok::<String>("\" padded \""), Value::from(" padded "));
        assert_eq!(ok::<String>("\"\""), Value::from(""));
        assert_eq!(ok::<String>("bare"), Value::from("bare"));
        assert_eq!(ok::<String>("null"), Value::from("null"));
        assert_eq!(ok::<Option<String>>("null"), Value::Null);
        assert_eq!(ok::<Option<String>>("\"null\""), Value::from("null"));
    }

    #[test]
    fn test_integers() {
        assert_eq!(ok::<i32>("160"), Value::Number(Number::Integer(160)));
        assert_eq!(ok::<i32>(" -16 0 "), Value::Number(Number::Integer(-160)));
        assert_eq!(ok::<u64>("18446744073709551615"), Value::from(u64::MAX));
        assert_eq!(ok::<i8>("-128"), Value::Number(Number::Integer(-128)));

        assert!(matches!(err::<i32>("fast"), Error::InvalidValue { .. }));
        assert!(matches!(err::<u8>("256"), Error::InvalidValue { .. }));
        assert!(matches!(err::<u32>("-1"), Error::InvalidValue { .. }));
        assert!(matches!(err::<i64>("1.5"), Error::InvalidValue { .. }));
    }

    #[test]
    fn test_floats() {
        assert_eq!(ok::<f64>("9.45"), Value::Number(Number::Float(9.45)));
        assert_eq!(ok::<f64>("-2"), Value::Number(Number::Float(-2.0)));
        assert_eq!(
            ok::<f32>("3.14"),
            Value::Number(Number::Float(f64::from(3.14f32)))
        );
        assert!(matches!(err::<f64>("1.2.3"), Error::InvalidValue { .. }));
    }

    #[test]
    fn test_bool_and_char() {
        assert_eq!(ok::<bool>("true"), Value::Bool(true));
        assert_eq!(ok::<bool>(" false\n"), Value::Bool(false));
        assert!(matches!(err::<bool>("yes"), Error::InvalidValue { .. }));

        assert_eq!(ok::<char>("\"x\""), Value::Char('x'));
        assert_eq!(ok::<char>("\" \""), Value::Char(' '));
        assert_eq!(ok::<char>("y"), Value::Char('y'));
        assert!(matches!(err::<char>("\"xy\""), Error::InvalidValue { .. }));
    }

    #[test]
    fn test_null_only_for_nullable() {
        assert_eq!(ok::<Option<i32>>("null"), Value::Null);
        assert_eq!(ok::<Option<i32>>(" null "), Value::Null);
        assert_eq!(ok::<Option<i32>>("5"), Value::Number(Number::Integer(5)));
        assert_eq!(ok::<Option<Vec<i32>>>("null"), Value::Null);

        let err = err::<i32>("null");
        assert!(err.to_string().contains("expected i32"));
        assert!(matches!(self::err::<Vec<i32>>("null"), Error::InvalidValue { .. }));
    }

    #[test]
    fn test_scalar_text_against_composite() {
        let target = CompositeDescriptor::new("Owner").into_descriptor();
        assert!(matches!(
            coerce("5", &target).unwrap_err(),
            Error::InvalidValue { expected, .. } if expected == "Owner"
        ));
        assert_eq!(coerce("null", &target.nullable()).unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_unsupported_targets_are_absent() {
        assert_eq!(
            coerce("anything", &HashMap::<String, i32>::descriptor()).unwrap(),
            None
        );
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a\""), "a");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("a\""), "a\"");
        assert_eq!(unquote("\"\"a\"\""), "\"a\"");
    }
}
