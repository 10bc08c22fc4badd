use std::sync::Arc;

use crate::arg::Arg;
use crate::error::{ErrorKind, Result};
use crate::proto::Type;
use crate::proxy::Proxy;
use crate::signature::OwnedSignature;

/// The host-side classification of a boxed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostClass {
    /// Numbers and booleans.
    Number,
    /// UTF-8 strings.
    String,
    /// Ordered sequences; arrays and structs.
    Sequence,
    /// Key-value mappings; dictionaries.
    Mapping,
    /// Remote object handles; object paths.
    Proxy,
    /// Parsed signature objects.
    Signature,
}

/// A dynamically typed host value, as produced and consumed by an argument
/// tree.
#[derive(Debug, Clone)]
pub enum Value {
    /// The well-known marker standing in for a missing element in a sequence
    /// or mapping.
    Null,
    /// An 8-bit unsigned integer.
    Byte(u8),
    /// A boolean.
    Bool(bool),
    /// A 16-bit signed integer.
    Int16(i16),
    /// A 16-bit unsigned integer.
    Uint16(u16),
    /// A 32-bit signed integer.
    Int32(i32),
    /// A 32-bit unsigned integer.
    Uint32(u32),
    /// A 64-bit signed integer.
    Int64(i64),
    /// A 64-bit unsigned integer.
    Uint64(u64),
    /// A double-precision floating point number.
    Double(f64),
    /// A string.
    String(String),
    /// A remote object handle standing in for an object path.
    Proxy(Arc<Proxy>),
    /// A parsed signature.
    Signature(Arc<Arg>),
    /// An ordered sequence; boxes both arrays and structs.
    Array(Vec<Value>),
    /// A key-value mapping with first-wins insertion order.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Test if this value is the null marker.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// A short name for the value's runtime class, for diagnostics.
    pub(crate) fn class_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Byte(..) => "byte",
            Value::Bool(..) => "boolean",
            Value::Int16(..) => "int16",
            Value::Uint16(..) => "uint16",
            Value::Int32(..) => "int32",
            Value::Uint32(..) => "uint32",
            Value::Int64(..) => "int64",
            Value::Uint64(..) => "uint64",
            Value::Double(..) => "double",
            Value::String(..) => "string",
            Value::Proxy(..) => "proxy",
            Value::Signature(..) => "signature",
            Value::Array(..) => "sequence",
            Value::Map(..) => "mapping",
        }
    }

    /// The value as a signed 64-bit integer, if it is integer-like.
    pub(crate) fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(i64::from(v)),
            Value::Int16(v) => Some(i64::from(v)),
            Value::Uint16(v) => Some(i64::from(v)),
            Value::Int32(v) => Some(i64::from(v)),
            Value::Uint32(v) => Some(i64::from(v)),
            Value::Int64(v) => Some(v),
            Value::Uint64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// The value as an unsigned 64-bit integer, if it is integer-like and
    /// non-negative.
    pub(crate) fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Byte(v) => Some(u64::from(v)),
            Value::Int16(v) => u64::try_from(v).ok(),
            Value::Uint16(v) => Some(u64::from(v)),
            Value::Int32(v) => u64::try_from(v).ok(),
            Value::Uint32(v) => Some(u64::from(v)),
            Value::Int64(v) => u64::try_from(v).ok(),
            Value::Uint64(v) => Some(v),
            _ => None,
        }
    }

    /// Derive the D-Bus signature for this value's runtime type.
    ///
    /// This is the inverse of boxing and drives variant marshalling. The
    /// null marker has no type of its own and cannot be derived.
    pub(crate) fn infer_signature(&self) -> Result<OwnedSignature> {
        let mut bytes = Vec::new();
        self.infer_into(&mut bytes)?;
        Ok(OwnedSignature::new(&bytes)?)
    }

    fn infer_into(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Value::Null => {
                return Err(ErrorKind::Unrepresentable {
                    expected: Type::VARIANT,
                    actual: "null",
                }
                .into())
            }
            Value::Byte(..) => out.push(b'y'),
            Value::Bool(..) => out.push(b'b'),
            Value::Int16(..) => out.push(b'n'),
            Value::Uint16(..) => out.push(b'q'),
            Value::Int32(..) => out.push(b'i'),
            Value::Uint32(..) => out.push(b'u'),
            Value::Int64(..) => out.push(b'x'),
            Value::Uint64(..) => out.push(b't'),
            Value::Double(..) => out.push(b'd'),
            Value::String(..) => out.push(b's'),
            Value::Proxy(..) => out.push(b'o'),
            Value::Signature(..) => out.push(b'g'),
            Value::Array(items) => {
                out.push(b'a');

                // Homogeneous sequences keep their element type; anything
                // else falls back to an array of variants.
                match items.split_first() {
                    None => out.push(b'v'),
                    Some((first, rest)) => {
                        let mut element = Vec::new();
                        first.infer_into(&mut element)?;

                        let mut homogeneous = true;

                        for item in rest {
                            let mut other = Vec::new();
                            item.infer_into(&mut other)?;

                            if other != element {
                                homogeneous = false;
                                break;
                            }
                        }

                        if homogeneous {
                            out.extend_from_slice(&element);
                        } else {
                            out.push(b'v');
                        }
                    }
                }
            }
            Value::Map(pairs) => {
                out.extend_from_slice(b"a{");

                match pairs.split_first() {
                    None => out.extend_from_slice(b"sv"),
                    Some(((first_key, first_value), rest)) => {
                        first_key.infer_into(out)?;

                        let mut value_sig = Vec::new();
                        first_value.infer_into(&mut value_sig)?;

                        let mut homogeneous = true;

                        for (_, value) in rest {
                            let mut other = Vec::new();
                            value.infer_into(&mut other)?;

                            if other != value_sig {
                                homogeneous = false;
                                break;
                            }
                        }

                        if homogeneous {
                            out.extend_from_slice(&value_sig);
                        } else {
                            out.push(b'v');
                        }
                    }
                }

                out.push(b'}');
            }
        }

        Ok(())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Uint16(a), Value::Uint16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Uint32(a), Value::Uint32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Uint64(a), Value::Uint64(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Proxy(a), Value::Proxy(b)) => {
                a.has_same_scope_as(b) && a.path() == b.path()
            }
            (Value::Signature(a), Value::Signature(b)) => a.signature() == b.signature(),
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<u8> for Value {
    #[inline]
    fn from(value: u8) -> Self {
        Value::Byte(value)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i16> for Value {
    #[inline]
    fn from(value: i16) -> Self {
        Value::Int16(value)
    }
}

impl From<u16> for Value {
    #[inline]
    fn from(value: u16) -> Self {
        Value::Uint16(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<u32> for Value {
    #[inline]
    fn from(value: u32) -> Self {
        Value::Uint32(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<u64> for Value {
    #[inline]
    fn from(value: u64) -> Self {
        Value::Uint64(value)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::String(value)
    }
}
