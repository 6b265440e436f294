//! Field model: scalar kinds, runtime field values, and record descriptors.
//!
//! A record type participates in row binding by describing its fields once,
//! at compile time, through the [`Record`] trait. Each field carries a name,
//! a [`FieldKind`], and a pair of accessor functions; the [`record!`] macro
//! generates all of it from an ordinary struct definition.
//!
//! The six canonical scalar kinds (`char`, text, `bool`, `i32`, `f64`, `i64`)
//! convert to and from raw cells without any registration. A field of any
//! other type implements [`FieldScalar`] by hand and must be given an
//! explicit parse function when the codec is built.

use std::fmt;

/// The declared kind of a record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A single character.
    Char,
    /// Free text.
    Text,
    /// A boolean.
    Bool,
    /// A 32-bit signed integer.
    Int,
    /// A 64-bit float.
    Double,
    /// A 64-bit signed integer.
    Long,
    /// A non-canonical kind, named after the field's Rust type.
    Other(&'static str),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Char => f.write_str("char"),
            FieldKind::Text => f.write_str("text"),
            FieldKind::Bool => f.write_str("bool"),
            FieldKind::Int => f.write_str("i32"),
            FieldKind::Double => f.write_str("f64"),
            FieldKind::Long => f.write_str("i64"),
            FieldKind::Other(name) => f.write_str(name),
        }
    }
}

/// A scalar value in transit between a raw cell and a record field.
///
/// Custom parse functions return one of these; custom format functions
/// receive one. `Text` doubles as the carrier for [`FieldKind::Other`]
/// fields, whose [`FieldScalar`] impl decides how to consume it.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Char(char),
    Text(String),
    Bool(bool),
    Int(i32),
    Double(f64),
    Long(i64),
}

impl FieldValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Char(_) => FieldKind::Char,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Double(_) => FieldKind::Double,
            FieldValue::Long(_) => FieldKind::Long,
        }
    }

    /// Shorthand for `FieldValue::Text(s.into())`.
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }
}

/// Storage behavior of a field type: its declared kind plus typed accessors.
///
/// Implemented for the six canonical scalars and for `Option<S>` of each.
/// An `Option` field reports the inner kind; its `None` state is the
/// "absent" value that formats as empty text and that a failed conversion
/// leaves in place.
pub trait FieldScalar: Sized {
    /// The kind this type declares.
    const KIND: FieldKind;

    /// Current value, or `None` when the field is absent.
    fn value(&self) -> Option<FieldValue>;

    /// Store `v` if this type can hold it. Returns whether it was accepted;
    /// a rejected value leaves the field untouched.
    fn assign(&mut self, v: FieldValue) -> bool;
}

macro_rules! scalar_impl {
    ($ty:ty, $variant:ident, $kind:ident) => {
        impl FieldScalar for $ty {
            const KIND: FieldKind = FieldKind::$kind;

            fn value(&self) -> Option<FieldValue> {
                Some(FieldValue::$variant(self.clone()))
            }

            fn assign(&mut self, v: FieldValue) -> bool {
                match v {
                    FieldValue::$variant(x) => {
                        *self = x;
                        true
                    }
                    _ => false,
                }
            }
        }
    };
}

scalar_impl!(char, Char, Char);
scalar_impl!(String, Text, Text);
scalar_impl!(bool, Bool, Bool);
scalar_impl!(i32, Int, Int);
scalar_impl!(f64, Double, Double);
scalar_impl!(i64, Long, Long);

impl<S: FieldScalar + Default> FieldScalar for Option<S> {
    const KIND: FieldKind = S::KIND;

    fn value(&self) -> Option<FieldValue> {
        self.as_ref().and_then(FieldScalar::value)
    }

    fn assign(&mut self, v: FieldValue) -> bool {
        let mut inner = S::default();
        if inner.assign(v) {
            *self = Some(inner);
            true
        } else {
            false
        }
    }
}

/// Descriptor of one declared field: name, kind, and accessors.
///
/// Built once per type, usually by [`record!`], and never mutated.
pub struct FieldDef<T> {
    /// Field name, unique within the record type.
    pub name: &'static str,
    /// Declared kind.
    pub kind: FieldKind,
    /// Read accessor; `None` means the field is absent.
    pub get: fn(&T) -> Option<FieldValue>,
    /// Write accessor; returns whether the value was accepted.
    pub set: fn(&mut T, FieldValue) -> bool,
}

impl<T> Clone for FieldDef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldDef<T> {}

impl<T> fmt::Debug for FieldDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A flat record type with a static field listing in declaration order.
///
/// `Default` supplies the instance every parsed row starts from; fields a
/// row does not populate keep their default value.
pub trait Record: Default + 'static {
    /// Declared fields, in declaration order.
    fn fields() -> &'static [FieldDef<Self>];
}

/// Defines a struct and implements [`Record`] for it.
///
/// Every field type must implement [`FieldScalar`]; derive or implement
/// `Default` yourself along with any other derives you need.
///
/// ```
/// use rowbind::record;
///
/// record! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Person {
///         pub name: String,
///         pub weight: Option<f64>,
///         pub age: i32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $fty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $fty, )+
        }

        impl $crate::field::Record for $name {
            fn fields() -> &'static [$crate::field::FieldDef<Self>] {
                const FIELDS: &[$crate::field::FieldDef<$name>] = &[
                    $(
                        $crate::field::FieldDef {
                            name: stringify!($field),
                            kind: <$fty as $crate::field::FieldScalar>::KIND,
                            get: |rec: &$name| {
                                $crate::field::FieldScalar::value(&rec.$field)
                            },
                            set: |rec: &mut $name, v: $crate::field::FieldValue| {
                                $crate::field::FieldScalar::assign(&mut rec.$field, v)
                            },
                        },
                    )+
                ];
                FIELDS
            }
        }
    };
}
