/// Implements [`Schema`](crate::Schema) for a struct.
///
/// Each entry names a field as it appears in the struct's serialized form, followed by the
/// field's type. `=> "alias"` gives the field an alias, which becomes its JSON key on output
/// and an accepted key on input. Names that are not identifiers, such as serde renames, are
/// written as string literals.
///
/// The struct must implement `Default` and `Serialize`: reading a document starts from
/// `Default::default()` and fields missing from the document keep their default values.
///
/// # Examples
///
/// ```rust
/// use schema_json::{schema, from_str, to_string};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
/// #[serde(rename_all = "camelCase")]
/// struct Car {
///     model: String,
///     max_speed: i32,
///     owners: Vec<String>,
/// }
///
/// schema!(Car {
///     model: String => "mark",
///     "maxSpeed": i32,
///     owners: Vec<String>,
/// });
///
/// let car: Car = from_str(r#"{"mark":"BMW","maxSpeed":160}"#).unwrap();
/// assert_eq!(car.model, "BMW");
/// assert!(car.owners.is_empty());
/// assert_eq!(to_string(&car).unwrap(), r#"{"mark":"BMW","maxSpeed":160,"owners":[]}"#);
/// ```
#[macro_export]
macro_rules! schema {
    // Field name: identifier or string literal
    (@name $field:ident) => {
        stringify!($field)
    };
    (@name $field:literal) => {
        $field
    };

    // Field list, one entry at a time
    (@fields $builder:expr ;) => {
        $builder
    };
    (@fields $builder:expr ; $field:tt : $ty:ty => $alias:literal $(, $($rest:tt)*)?) => {
        $crate::schema!(@fields
            $builder.aliased_field::<$ty>($crate::schema!(@name $field), $alias) ;
            $($($rest)*)?)
    };
    (@fields $builder:expr ; $field:tt : $ty:ty $(, $($rest:tt)*)?) => {
        $crate::schema!(@fields
            $builder.field::<$ty>($crate::schema!(@name $field)) ;
            $($($rest)*)?)
    };

    ($name:ident { $($body:tt)* }) => {
        impl $crate::Schema for $name {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::schema!(@fields
                    $crate::CompositeDescriptor::of::<$name>(stringify!($name)) ;
                    $($body)*)
                .into_descriptor()
            }
        }
    };
}
