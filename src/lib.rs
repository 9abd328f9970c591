//! # schema_json
//!
//! A schema-driven JSON codec. Documents are read and written against a runtime description
//! of the target type rather than as untyped JSON values.
//!
//! ## How it works
//!
//! Every target type implements [`Schema`], which returns its [`TypeDescriptor`]: a scalar
//! kind, an array of some element type, or a composite with named fields and optional aliases.
//! Reading a document tokenizes the input, constructs a typed [`Value`] graph against that
//! descriptor and finally hands the graph to serde to produce the Rust value.
//!
//! Two strategies materialize documents, selected through [`JsonOptions`]:
//!
//! - **DOM** (default): parse into a [`DomNode`] tree first, then build the value
//! - **SAX**: build the value in a single pass over the tokens
//!
//! Both accept the same documents and report the same kinds of errors.
//!
//! ## Key Features
//!
//! - **Typed reading**: every scalar is checked against the declared kind, with range checks
//!   for each integer width
//! - **Field aliases**: a field may declare an alternate JSON key
//! - **Defaults for missing fields**: composites start from `Default::default()`
//! - **Multi-dimensional arrays**: arrays nest to any depth
//! - **Serde Compatible**: target types use ordinary `#[derive(Serialize, Deserialize)]`
//!
//! Collections other than `Vec` and arrays, and maps, are outside the supported shapes: a
//! field of such a type is left at its default when reading and rejected when writing.
//! String contents are taken verbatim; escape sequences are not interpreted.
//!
//! ## Quick Start
//!
//! ```rust
//! use schema_json::{schema, from_str, to_string};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Default, PartialEq, Debug)]
//! #[serde(rename_all = "camelCase")]
//! struct Car {
//!     model: String,
//!     max_speed: i32,
//! }
//!
//! schema!(Car { model: String, "maxSpeed": i32 });
//!
//! let car = Car { model: "BMW".to_string(), max_speed: 160 };
//!
//! let json = to_string(&car).unwrap();
//! assert_eq!(json, r#"{"model":"BMW","maxSpeed":160}"#);
//!
//! let car_back: Car = from_str(&json).unwrap();
//! assert_eq!(car, car_back);
//! ```
//!
//! ### Choosing a strategy
//!
//! ```rust
//! use schema_json::{from_str_with_options, JsonOptions, Strategy};
//!
//! let options = JsonOptions::new().with_strategy(Strategy::Sax);
//! let matrix: Vec<Vec<f64>> = from_str_with_options("[[1.5, 2], [3]]", options).unwrap();
//! assert_eq!(matrix, vec![vec![1.5, 2.0], vec![3.0]]);
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Malformed input is reported as an [`Error`], never a panic
//! - Each call owns its tokenizer state; nothing is shared between calls

pub mod coerce;
pub mod de;
pub mod dom;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod options;
pub mod sax;
pub mod schema;
pub mod ser;
pub mod source;
pub mod value;

pub use de::Deserializer;
pub use dom::{DomDeserializer, DomNode};
pub use error::{Error, Result};
pub use map::Record;
pub use options::{JsonOptions, Strategy};
pub use sax::SaxDeserializer;
pub use schema::{
    Access, CompositeDescriptor, FieldDescriptor, ScalarKind, Schema, TypeDescriptor, TypeKind,
};
pub use ser::{Serializer, ValueSerializer};
pub use value::{Number, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use source::{CharSource, ReaderSource, StrSource};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Serialize any `T: Serialize + Schema` to a JSON string.
///
/// # Examples
///
/// ```rust
/// use schema_json::to_string;
///
/// let json = to_string(&vec![Some(1), None]).unwrap();
/// assert_eq!(json, "[1,null]");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized (e.g., map or collection fields).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize + Schema,
{
    to_string_with_options(value, JsonOptions::default())
}

/// Serialize any `T: Serialize + Schema` to a pretty-printed JSON string.
///
/// # Examples
///
/// ```rust
/// use schema_json::to_string_pretty;
///
/// let json = to_string_pretty(&vec![vec![1, 2]]).unwrap();
/// assert_eq!(json, "[\n  [\n    1,\n    2\n  ]\n]");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize + Schema,
{
    to_string_with_options(value, JsonOptions::pretty())
}

/// Serialize any `T: Serialize + Schema` to a JSON string with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: JsonOptions) -> Result<String>
where
    T: ?Sized + Serialize + Schema,
{
    log::debug!("serializing {}", std::any::type_name::<T>());
    let mut serializer = Serializer::new(options);
    serializer.serialize(value)?;
    Ok(serializer.into_inner())
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use schema_json::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error for enum variants carrying data and for non-scalar map keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Convert a [`Value`] into any `T: Deserialize`.
///
/// # Errors
///
/// Returns [`Error::Custom`] if the value does not have the shape `T` expects.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(value)
}

/// Serialize any `T: Serialize + Schema` to a writer as JSON.
///
/// # Examples
///
/// ```rust
/// use schema_json::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &[1u8, 2, 3]).unwrap();
/// assert_eq!(buffer, b"[1,2,3]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize + Schema,
{
    to_writer_with_options(writer, value, JsonOptions::default())
}

/// Serialize any `T: Serialize + Schema` to a writer as JSON with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: JsonOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize + Schema,
{
    let json = to_string_with_options(value, options)?;
    writer.write_all(json.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Serialize any `T: Serialize + Schema` into a file, replacing its contents.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written, and the serialization
/// errors of [`to_string`] otherwise. The file is not touched when serialization fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_file<P, T>(path: P, value: &T) -> Result<()>
where
    P: AsRef<Path>,
    T: ?Sized + Serialize + Schema,
{
    to_file_with_options(path, value, JsonOptions::default())
}

/// Serialize any `T: Serialize + Schema` into a file with custom options.
///
/// # Errors
///
/// See [`to_file`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_file_with_options<P, T>(path: P, value: &T, options: JsonOptions) -> Result<()>
where
    P: AsRef<Path>,
    T: ?Sized + Serialize + Schema,
{
    let json = to_string_with_options(value, options)?;
    log::debug!("writing {} bytes to {}", json.len(), path.as_ref().display());
    std::fs::write(path, json)?;
    Ok(())
}

/// Deserialize an instance of type `T` from a string of JSON text.
///
/// # Examples
///
/// ```rust
/// use schema_json::from_str;
///
/// let numbers: Vec<u16> = from_str("[1, 2, 3]").unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if the input is not well-formed, does not fit type `T`, or `T` cannot be
/// constructed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: Schema + DeserializeOwned,
{
    from_str_with_options(s, JsonOptions::default())
}

/// Deserialize an instance of type `T` from a string using the strategy in `options`.
///
/// # Errors
///
/// See [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: JsonOptions) -> Result<T>
where
    T: Schema + DeserializeOwned,
{
    deserialize_with(StrSource::new(s), &options)
}

/// Deserialize an instance of type `T` from an I/O stream of JSON.
///
/// # Examples
///
/// ```rust
/// use schema_json::from_reader;
/// use std::io::Cursor;
///
/// let flags: Vec<bool> = from_reader(Cursor::new(b"[true,false]")).unwrap();
/// assert_eq!(flags, vec![true, false]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails or the stream is not UTF-8, and the errors of
/// [`from_str`] otherwise.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: Schema + DeserializeOwned,
{
    from_reader_with_options(reader, JsonOptions::default())
}

/// Deserialize an instance of type `T` from an I/O stream using the strategy in `options`.
///
/// # Errors
///
/// See [`from_reader`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R, T>(reader: R, options: JsonOptions) -> Result<T>
where
    R: io::Read,
    T: Schema + DeserializeOwned,
{
    deserialize_with(ReaderSource::new(BufReader::new(reader)), &options)
}

/// Deserialize an instance of type `T` from bytes of JSON text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, and the errors of [`from_str`]
/// otherwise.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: Schema + DeserializeOwned,
{
    from_slice_with_options(v, JsonOptions::default())
}

/// Deserialize an instance of type `T` from bytes using the strategy in `options`.
///
/// # Errors
///
/// See [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<T>(v: &[u8], options: JsonOptions) -> Result<T>
where
    T: Schema + DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str_with_options(s, options)
}

/// Deserialize an instance of type `T` from a JSON file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, and the errors of
/// [`from_str`] otherwise.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_file<P, T>(path: P) -> Result<T>
where
    P: AsRef<Path>,
    T: Schema + DeserializeOwned,
{
    from_file_with_options(path, JsonOptions::default())
}

/// Deserialize an instance of type `T` from a JSON file using the strategy in `options`.
///
/// # Errors
///
/// See [`from_file`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_file_with_options<P, T>(path: P, options: JsonOptions) -> Result<T>
where
    P: AsRef<Path>,
    T: Schema + DeserializeOwned,
{
    log::debug!("reading {}", path.as_ref().display());
    let file = File::open(path)?;
    from_reader_with_options(file, options)
}

fn deserialize_with<T, S>(source: S, options: &JsonOptions) -> Result<T>
where
    T: Schema + DeserializeOwned,
    S: CharSource,
{
    log::debug!(
        "deserializing {} with the {} strategy",
        std::any::type_name::<T>(),
        options.strategy.as_str()
    );
    match options.strategy {
        Strategy::Dom => DomDeserializer::new()
            .with_max_depth(options.max_depth)
            .deserialize(source),
        Strategy::Sax => SaxDeserializer::new()
            .with_max_depth(options.max_depth)
            .deserialize(source),
    }
}
