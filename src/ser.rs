//! JSON serialization.
//!
//! Serialization happens in two steps. The value is first converted to a [`Value`] graph
//! through serde with [`ValueSerializer`]; the [`Serializer`] then writes that graph as JSON,
//! walking it alongside the type's [`TypeDescriptor`]. The descriptor decides field order,
//! the key written for each field and the literal form of each scalar.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use schema_json::{schema, to_string, to_string_pretty};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Default)]
//! struct Data { x: i32, y: i32 }
//!
//! schema!(Data { x: i32, y: i32 });
//!
//! let data = Data { x: 1, y: 2 };
//! assert_eq!(to_string(&data).unwrap(), r#"{"x":1,"y":2}"#);
//!
//! let pretty = to_string_pretty(&data).unwrap();
//! assert!(pretty.contains("\n  \"y\": 2"));
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use schema_json::{JsonOptions, Serializer};
//!
//! let mut serializer = Serializer::new(JsonOptions::new());
//! serializer.serialize(&vec![vec![1.5f32], vec![]]).unwrap();
//! assert_eq!(serializer.into_inner(), "[[1.5],[]]");
//! ```

use crate::lexer::{CLOSE_ARRAY, CLOSE_OBJECT, COLON, COMMA, OPEN_ARRAY, OPEN_OBJECT, QUOTE};
use crate::schema::{CompositeDescriptor, ScalarKind, Schema, TypeDescriptor, TypeKind};
use crate::{Error, JsonOptions, Number, Record, Result, Value};
use serde::{ser, Serialize};

/// The JSON serializer.
///
/// Writes values implementing both `Serialize` and [`Schema`] into a string buffer.
/// Created via [`Serializer::new`] with customizable options.
pub struct Serializer {
    output: String,
    options: JsonOptions,
}

impl Serializer {
    #[must_use]
    pub fn new(options: JsonOptions) -> Self {
        Serializer {
            output: String::new(),
            options,
        }
    }

    /// Consumes the serializer and returns the output.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends the JSON text of `value` to the output.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedType`] if the type or one of its fields is a collection or map
    /// - [`Error::UnaccessibleField`] if a declared field is write-only or missing from the
    ///   serialized instance
    /// - [`Error::InvalidValue`] if the serialized instance does not have the declared shape
    pub fn serialize<T: Serialize + Schema + ?Sized>(&mut self, value: &T) -> Result<()> {
        let target = T::descriptor();
        let value = crate::to_value(value)?;
        self.write_value(&value, &target, 0)
    }

    /// Writes an already converted value against its descriptor.
    ///
    /// # Errors
    ///
    /// See [`Serializer::serialize`].
    pub fn write_value(&mut self, value: &Value, target: &TypeDescriptor, depth: usize) -> Result<()> {
        match target.kind() {
            TypeKind::Unsupported(_) => Err(Error::unsupported_type(&format!(
                "{} cannot be written as JSON",
                target
            ))),
            _ if value.is_null() => {
                self.output.push_str("null");
                Ok(())
            }
            TypeKind::Composite(composite) => match value {
                Value::Object(record) => self.write_object(record, composite, depth),
                other => Err(Error::invalid_value(target, other.type_name())),
            },
            TypeKind::Array(element) => match value {
                Value::Array(elements) => self.write_array(elements, element, depth),
                other => Err(Error::invalid_value(target, other.type_name())),
            },
            TypeKind::Scalar(kind) => self.write_scalar(value, *kind, target),
        }
    }

    fn write_object(
        &mut self,
        record: &Record,
        composite: &CompositeDescriptor,
        depth: usize,
    ) -> Result<()> {
        self.output.push(OPEN_OBJECT);
        for (i, field) in composite.fields().iter().enumerate() {
            if !field.is_readable() {
                return Err(Error::unaccessible_field(
                    composite.type_name(),
                    field.name(),
                    "field is write-only",
                ));
            }
            let value = record.get(field.name()).ok_or_else(|| {
                Error::unaccessible_field(
                    composite.type_name(),
                    field.name(),
                    "serialized instance has no such field",
                )
            })?;
            if i > 0 {
                self.output.push(COMMA);
            }
            self.newline(depth + 1);
            self.write_quoted(field.json_name());
            self.output.push(COLON);
            if self.options.pretty {
                self.output.push(' ');
            }
            self.write_value(value, field.ty(), depth + 1)?;
        }
        if !composite.fields().is_empty() {
            self.newline(depth);
        }
        self.output.push(CLOSE_OBJECT);
        Ok(())
    }

    fn write_array(&mut self, elements: &[Value], element: &TypeDescriptor, depth: usize) -> Result<()> {
        self.output.push(OPEN_ARRAY);
        for (i, value) in elements.iter().enumerate() {
            if i > 0 {
                self.output.push(COMMA);
            }
            self.newline(depth + 1);
            self.write_value(value, element, depth + 1)?;
        }
        if !elements.is_empty() {
            self.newline(depth);
        }
        self.output.push(CLOSE_ARRAY);
        Ok(())
    }

    fn write_scalar(&mut self, value: &Value, kind: ScalarKind, target: &TypeDescriptor) -> Result<()> {
        if !fits(kind, value) {
            return Err(Error::invalid_value(target, &scalar_form(value)));
        }
        match value {
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Number(Number::Float(f)) if kind == ScalarKind::F32 => {
                let narrow = *f as f32;
                if narrow.is_finite() {
                    self.output.push_str(&narrow.to_string());
                } else {
                    self.output.push_str("null");
                }
            }
            Value::Number(Number::Float(f)) if !f.is_finite() => self.output.push_str("null"),
            Value::Number(n) => self.output.push_str(&n.to_string()),
            Value::Char(c) => {
                let mut buf = [0; 4];
                self.write_quoted(c.encode_utf8(&mut buf));
            }
            Value::String(s) => self.write_quoted(s),
            other => return Err(Error::invalid_value(target, other.type_name())),
        }
        Ok(())
    }

    fn write_quoted(&mut self, text: &str) {
        self.output.push(QUOTE);
        self.output.push_str(text);
        self.output.push(QUOTE);
    }

    fn newline(&mut self, depth: usize) {
        if self.options.pretty {
            self.output.push('\n');
            self.output.push_str(&" ".repeat(depth * self.options.indent));
        }
    }
}

/// Whether `value` is written in a form that reads back as `kind`.
fn fits(kind: ScalarKind, value: &Value) -> bool {
    match (kind, value) {
        (ScalarKind::Text, Value::String(_) | Value::Char(_))
        | (ScalarKind::Bool, Value::Bool(_))
        | (ScalarKind::Char, Value::Char(_))
        | (ScalarKind::F32 | ScalarKind::F64, Value::Number(_)) => true,
        (_, Value::Number(n)) => integer_fits(kind, n),
        _ => false,
    }
}

fn integer_fits(kind: ScalarKind, n: &Number) -> bool {
    let signed = n.as_i64();
    let unsigned = n.as_u64();
    match kind {
        ScalarKind::I8 => signed.is_some_and(|v| i8::try_from(v).is_ok()),
        ScalarKind::I16 => signed.is_some_and(|v| i16::try_from(v).is_ok()),
        ScalarKind::I32 => signed.is_some_and(|v| i32::try_from(v).is_ok()),
        ScalarKind::I64 => signed.is_some(),
        ScalarKind::U8 => unsigned.is_some_and(|v| u8::try_from(v).is_ok()),
        ScalarKind::U16 => unsigned.is_some_and(|v| u16::try_from(v).is_ok()),
        ScalarKind::U32 => unsigned.is_some_and(|v| u32::try_from(v).is_ok()),
        ScalarKind::U64 => unsigned.is_some(),
        _ => false,
    }
}

fn scalar_form(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        other => other.type_name().to_string(),
    }
}

/// A serde serializer producing a [`Value`] graph.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: Record,
    current_key: Option<String>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(v.iter().map(|&b| Value::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type("newtype variants"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec> {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Err(Error::unsupported_type("struct variants"))
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(crate::to_value(value)?);
        Ok(())
    }
}

impl SerializeMap {
    fn new(capacity: usize) -> Self {
        SerializeMap {
            map: Record::with_capacity(capacity),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = match crate::to_value(key)? {
            Value::String(s) => s,
            Value::Char(c) => c.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(Error::custom(format!(
                    "map key must be a scalar, found {}",
                    other.type_name()
                )))
            }
        };
        self.current_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, crate::to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), crate::to_value(value)?);
        Ok(())
    }

    fn skip_field(&mut self, key: &'static str) -> Result<()> {
        self.map.insert(key.to_string(), Value::Null);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), crate::to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}
