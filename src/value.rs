use std::collections::{BTreeMap, HashMap};

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::Error;

/// A self-describing runtime value, the common currency between stored
/// fields, rebound constructor arguments and the JSON wire format.
///
/// `Symbol` is a reference to a class or function by qualified name; it
/// formats as the bare name and serializes as a plain string. `Object` is a
/// nested synthesized instance lowered to its class name plus rebound
/// arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    Seq(Vec<Value>),
    Map(Vec<(String, Value)>),
    Object {
        class: String,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Symbol,
    Seq,
    Map,
    Object,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Seq(_) => ValueKind::Seq,
            Value::Map(_) => ValueKind::Map,
            Value::Object { .. } => ValueKind::Object,
        }
    }

    /// Emptiness-style truthiness: null, false, zero, empty strings and
    /// empty collections are falsy; symbols and nested objects are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Symbol(_) => true,
            Value::Seq(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Object { .. } => true,
        }
    }
}

/// A reference to a class or function by qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }
}

/// Lowers a stored field into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Rebuilds a stored field from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, Error>;
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, Error> {
        Ok(value)
    }
}

macro_rules! impl_value_int {
    ( $( $t:ty )* ) => {$(
        impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Int(*self as i64)
            }
        }

        impl FromValue for $t {
            fn from_value(value: Value) -> Result<Self, Error> {
                match value {
                    Value::Int(n) => <$t>::try_from(n).map_err(|_| Error::IntegerRange),
                    other => Err(Error::TypeMismatch {
                        expected: ValueKind::Int,
                        found: other.kind(),
                    }),
                }
            }
        }
    )*};
}

impl_value_int!(i8 i16 i32 i64 isize u8 u16 u32 usize);

macro_rules! impl_value_float {
    ( $( $t:ty )* ) => {$(
        impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::Float(*self as f64)
            }
        }

        impl FromValue for $t {
            fn from_value(value: Value) -> Result<Self, Error> {
                match value {
                    Value::Float(x) => Ok(x as $t),
                    Value::Int(n) => Ok(n as $t),
                    other => Err(Error::TypeMismatch {
                        expected: ValueKind::Float,
                        found: other.kind(),
                    }),
                }
            }
        }
    )*};
}

impl_value_float!(f32 f64);

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::TypeMismatch {
                expected: ValueKind::Bool,
                found: other.kind(),
            }),
        }
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(Error::TypeMismatch {
                expected: ValueKind::Str,
                found: other.kind(),
            }),
        }
    }
}

impl ToValue for Symbol {
    fn to_value(&self) -> Value {
        Value::Symbol(self.0.clone())
    }
}

impl FromValue for Symbol {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            // plain strings are accepted so that names which did not resolve
            // against a decode registry still land in a symbol slot
            Value::Symbol(name) | Value::Str(name) => Ok(Symbol(name)),
            other => Err(Error::TypeMismatch {
                expected: ValueKind::Symbol,
                found: other.kind(),
            }),
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(Error::TypeMismatch {
                expected: ValueKind::Seq,
                found: other.kind(),
            }),
        }
    }
}

macro_rules! impl_value_map {
    ( $( $t:ident )* ) => {$(
        impl<V: ToValue> ToValue for $t<String, V> {
            fn to_value(&self) -> Value {
                Value::Map(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
            }
        }

        impl<V: FromValue> FromValue for $t<String, V> {
            fn from_value(value: Value) -> Result<Self, Error> {
                match value {
                    Value::Map(entries) => entries
                        .into_iter()
                        .map(|(k, v)| Ok((k, V::from_value(v)?)))
                        .collect(),
                    other => Err(Error::TypeMismatch {
                        expected: ValueKind::Map,
                        found: other.kind(),
                    }),
                }
            }
        }
    )*};
}

impl_value_map!(BTreeMap HashMap);

struct MapEntries<'a>(&'a [(String, Value)]);

impl Serialize for MapEntries<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) | Value::Symbol(s) => serializer.serialize_str(s),
            Value::Seq(items) => items.serialize(serializer),
            Value::Map(entries) => MapEntries(entries).serialize(serializer),
            Value::Object {
                class,
                args,
                kwargs,
            } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element(class)?;
                seq.serialize_element(args)?;
                seq.serialize_element(&MapEntries(kwargs))?;
                seq.end()
            }
        }
    }
}
