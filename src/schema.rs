//! Type descriptors: the schema a document is read and written against.
//!
//! Every target type describes its shape once through the [`Schema`] trait. A
//! [`TypeDescriptor`] is either a scalar, an array of some element type, a composite with
//! ordered named fields, or one of the kinds the codec deliberately leaves alone
//! (collections and maps).
//!
//! ## Composite types
//!
//! Structs usually implement [`Schema`] with the [`schema!`](crate::schema!) macro. When
//! serde renames fields, or a field needs an alias or restricted access, the descriptor is
//! written out with the [`CompositeDescriptor`] builder:
//!
//! ```rust
//! use schema_json::{CompositeDescriptor, Schema, TypeDescriptor};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Default)]
//! #[serde(rename_all = "camelCase")]
//! struct Car {
//!     model: String,
//!     max_speed: i32,
//! }
//!
//! impl Schema for Car {
//!     fn descriptor() -> TypeDescriptor {
//!         CompositeDescriptor::of::<Car>("Car")
//!             .aliased_field::<String>("model", "mark")
//!             .field::<i32>("maxSpeed")
//!             .into_descriptor()
//!     }
//! }
//!
//! let car = Car::descriptor();
//! let composite = car.as_composite().unwrap();
//! assert_eq!(composite.resolve("mark").unwrap().name(), "model");
//! ```

use crate::{Error, Record, Result, Value};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Scalar kinds a token can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Text,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Text => "text",
            ScalarKind::Bool => "bool",
            ScalarKind::Char => "char",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, ScalarKind::Text | ScalarKind::Bool | ScalarKind::Char)
    }
}

/// Kinds the codec reads as absent and refuses to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unsupported {
    Collection,
    Map,
}

/// The shape part of a [`TypeDescriptor`].
#[derive(Debug, Clone)]
pub enum TypeKind {
    Scalar(ScalarKind),
    Array(Box<TypeDescriptor>),
    Composite(Arc<CompositeDescriptor>),
    Unsupported(Unsupported),
}

/// Runtime description of a target type.
///
/// `nullable` is set for `Option<T>`; only nullable targets accept the `null` literal.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    kind: TypeKind,
    nullable: bool,
}

impl TypeDescriptor {
    #[must_use]
    pub const fn scalar(kind: ScalarKind) -> Self {
        TypeDescriptor {
            kind: TypeKind::Scalar(kind),
            nullable: false,
        }
    }

    #[must_use]
    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor {
            kind: TypeKind::Array(Box::new(element)),
            nullable: false,
        }
    }

    #[must_use]
    pub fn composite(composite: CompositeDescriptor) -> Self {
        TypeDescriptor {
            kind: TypeKind::Composite(Arc::new(composite)),
            nullable: false,
        }
    }

    #[must_use]
    pub const fn unsupported(kind: Unsupported) -> Self {
        TypeDescriptor {
            kind: TypeKind::Unsupported(kind),
            nullable: false,
        }
    }

    /// Marks the type as accepting `null`.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self.kind {
            TypeKind::Scalar(kind) => Some(kind),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_composite(&self) -> Option<&CompositeDescriptor> {
        match &self.kind {
            TypeKind::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, TypeKind::Unsupported(_))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("optional ")?;
        }
        match &self.kind {
            TypeKind::Scalar(kind) => f.write_str(kind.name()),
            TypeKind::Array(element) => write!(f, "array of {}", element),
            TypeKind::Composite(composite) => f.write_str(composite.type_name()),
            TypeKind::Unsupported(Unsupported::Collection) => f.write_str("collection"),
            TypeKind::Unsupported(Unsupported::Map) => f.write_str("map"),
        }
    }
}

/// Which directions of a field the codec may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    ReadWrite,
    /// Written to JSON but never assigned from it
    ReadOnly,
    /// Assigned from JSON but never written to it
    WriteOnly,
}

/// One named field of a composite.
///
/// The field's own descriptor is produced on first use, which keeps recursive types such
/// as `struct Node { next: Option<Box<Node>> }` describable.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    alias: Option<String>,
    describe: fn() -> TypeDescriptor,
    ty: OnceLock<TypeDescriptor>,
    access: Access,
}

impl FieldDescriptor {
    /// Declares a field named as the serialized form of `T` names it.
    #[must_use]
    pub fn new<T: Schema + ?Sized>(name: &str) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            alias: None,
            describe: T::descriptor,
            ty: OnceLock::new(),
            access: Access::default(),
        }
    }

    /// Sets the key used in JSON instead of the field name.
    #[must_use]
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The key written to JSON: the alias when declared, otherwise the name.
    #[inline]
    #[must_use]
    pub fn json_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn ty(&self) -> &TypeDescriptor {
        self.ty.get_or_init(self.describe)
    }

    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.access != Access::WriteOnly
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.access != Access::ReadOnly
    }
}

/// Descriptor of a type with named fields.
#[derive(Debug, Clone)]
pub struct CompositeDescriptor {
    type_name: String,
    fields: Vec<FieldDescriptor>,
    constructor: Option<fn() -> Result<Value>>,
}

fn construct<T: Default + Serialize>() -> Result<Value> {
    crate::to_value(&T::default())
}

impl CompositeDescriptor {
    /// Describes a composite that has no zero-argument constructor.
    ///
    /// Such a type can be written but reading it fails with
    /// [`Error::DefaultConstructor`].
    #[must_use]
    pub fn new(type_name: &str) -> Self {
        CompositeDescriptor {
            type_name: type_name.to_string(),
            fields: Vec::new(),
            constructor: None,
        }
    }

    /// Describes a composite constructed through `T::default()`.
    ///
    /// Fields missing from a document keep their default values.
    #[must_use]
    pub fn of<T: Default + Serialize>(type_name: &str) -> Self {
        CompositeDescriptor {
            constructor: Some(construct::<T>),
            ..CompositeDescriptor::new(type_name)
        }
    }

    #[must_use]
    pub fn field<T: Schema + ?Sized>(self, name: &str) -> Self {
        self.with_field(FieldDescriptor::new::<T>(name))
    }

    #[must_use]
    pub fn aliased_field<T: Schema + ?Sized>(self, name: &str, alias: &str) -> Self {
        self.with_field(FieldDescriptor::new::<T>(name).with_alias(alias))
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn into_descriptor(self) -> TypeDescriptor {
        TypeDescriptor::composite(self)
    }

    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Fields in declaration order.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Finds the field a JSON key refers to.
    ///
    /// Field names are matched first, exactly and case-sensitively; aliases only when no
    /// name matches. Among equal candidates the first declared field wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSyntax`] when neither a name nor an alias matches.
    pub fn resolve(&self, name: &str) -> Result<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|field| field.alias.as_deref() == Some(name))
            })
            .ok_or_else(|| {
                Error::syntax(&format!("unknown field {:?} in {}", name, self.type_name))
            })
    }

    /// Creates a fresh instance record through the zero-argument constructor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DefaultConstructor`] if the composite has no constructor.
    pub fn instantiate(&self) -> Result<Record> {
        let constructor = self
            .constructor
            .ok_or_else(|| Error::default_constructor(&self.type_name))?;
        match constructor()? {
            Value::Object(record) => Ok(record),
            other => Err(Error::custom(format!(
                "constructor of {} produced {} instead of an object",
                self.type_name,
                other.type_name()
            ))),
        }
    }
}

/// Types that can describe their own JSON shape.
pub trait Schema {
    fn descriptor() -> TypeDescriptor;
}

macro_rules! scalar_schema {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Schema for $ty {
                #[inline]
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::scalar(ScalarKind::$kind)
                }
            }
        )*
    };
}

scalar_schema! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    str => Text,
    String => Text,
}

impl<T: Schema> Schema for Option<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor().nullable()
    }
}

impl<T: Schema + ?Sized> Schema for Box<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

impl<T: Schema + ?Sized> Schema for &T {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

impl<T: Schema> Schema for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::array(T::descriptor())
    }
}

impl<T: Schema> Schema for [T] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::array(T::descriptor())
    }
}

impl<T: Schema, const N: usize> Schema for [T; N] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::array(T::descriptor())
    }
}

macro_rules! unsupported_schema {
    ($kind:ident: $($ty:ident<$($param:ident),+>),* $(,)?) => {
        $(
            impl<$($param),+> Schema for $ty<$($param),+> {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::unsupported(Unsupported::$kind)
                }
            }
        )*
    };
}

unsupported_schema!(Collection: VecDeque<T>, LinkedList<T>, BinaryHeap<T>, HashSet<T, S>, BTreeSet<T>);
unsupported_schema!(Map: HashMap<K, V, S>, BTreeMap<K, V>);
