use std::sync::Arc;

use crate::body::Basic;
use crate::error::{ErrorKind, Result};
use crate::object_path::ObjectPath;
use crate::proto::Type;
use crate::signature::Signature;
use crate::value::Value;

use super::{Arg, Parent};

impl Arg {
    /// Convert a host value into the wire scalar for this argument's type.
    ///
    /// Fails if the value cannot be coerced: a non-numeric value where a
    /// number is expected, an out-of-range integer, or a proxy outside the
    /// scope of the enclosing proxy.
    pub fn unbox<'v>(&self, value: &'v Value) -> Result<Basic<'v>> {
        match self.dbus_type() {
            Type::BYTE => match value.as_u64().and_then(|v| u8::try_from(v).ok()) {
                Some(v) => Ok(Basic::Byte(v)),
                None => Err(self.unrepresentable(value)),
            },
            Type::BOOLEAN => match value {
                Value::Bool(v) => Ok(Basic::Bool(*v)),
                _ => match value.as_u64() {
                    Some(0) => Ok(Basic::Bool(false)),
                    Some(1) => Ok(Basic::Bool(true)),
                    _ => Err(self.unrepresentable(value)),
                },
            },
            Type::INT16 => match value.as_i64().and_then(|v| i16::try_from(v).ok()) {
                Some(v) => Ok(Basic::Int16(v)),
                None => Err(self.unrepresentable(value)),
            },
            Type::UINT16 => match value.as_u64().and_then(|v| u16::try_from(v).ok()) {
                Some(v) => Ok(Basic::Uint16(v)),
                None => Err(self.unrepresentable(value)),
            },
            Type::INT32 => match value.as_i64().and_then(|v| i32::try_from(v).ok()) {
                Some(v) => Ok(Basic::Int32(v)),
                None => Err(self.unrepresentable(value)),
            },
            Type::UINT32 => match value.as_u64().and_then(|v| u32::try_from(v).ok()) {
                Some(v) => Ok(Basic::Uint32(v)),
                None => Err(self.unrepresentable(value)),
            },
            Type::INT64 => match value.as_i64() {
                Some(v) => Ok(Basic::Int64(v)),
                None => Err(self.unrepresentable(value)),
            },
            Type::UINT64 => match value.as_u64() {
                Some(v) => Ok(Basic::Uint64(v)),
                None => Err(self.unrepresentable(value)),
            },
            Type::DOUBLE => match value {
                Value::Double(v) => Ok(Basic::Double(*v)),
                _ => match (value.as_i64(), value.as_u64()) {
                    (Some(v), _) => Ok(Basic::Double(v as f64)),
                    (None, Some(v)) => Ok(Basic::Double(v as f64)),
                    (None, None) => Err(self.unrepresentable(value)),
                },
            },
            Type::STRING => match value {
                Value::String(s) => Ok(Basic::Str(s)),
                _ => Err(self.unrepresentable(value)),
            },
            Type::OBJECT_PATH => match value {
                Value::Proxy(proxy) => {
                    let Some(parent) = self.proxy_parent() else {
                        return Err(ErrorKind::MissingProxy.into());
                    };

                    if !parent.has_same_scope_as(proxy) {
                        return Err(ErrorKind::ProxyOutOfScope.into());
                    }

                    Ok(Basic::Path(proxy.path().as_str()))
                }
                _ => Err(self.unrepresentable(value)),
            },
            Type::SIGNATURE => match value {
                Value::Signature(arg) => Ok(Basic::Sig(arg.signature().as_str())),
                _ => Err(self.unrepresentable(value)),
            },
            ty => Err(ErrorKind::Unrepresentable {
                expected: ty,
                actual: value.class_name(),
            }
            .into()),
        }
    }

    /// Convert a wire scalar into a host value.
    ///
    /// Object paths do not box to an orphan path string: the enclosing
    /// proxy's service and endpoint are resolved through the parent chain
    /// and a sibling proxy at the received path is constructed. Signatures
    /// box to a fresh nameless, parentless argument.
    pub fn box_value(&self, basic: Basic<'_>) -> Result<Value> {
        match basic {
            Basic::Byte(v) => Ok(Value::Byte(v)),
            Basic::Bool(v) => Ok(Value::Bool(v)),
            Basic::Int16(v) => Ok(Value::Int16(v)),
            Basic::Uint16(v) => Ok(Value::Uint16(v)),
            Basic::Int32(v) => Ok(Value::Int32(v)),
            Basic::Uint32(v) => Ok(Value::Uint32(v)),
            Basic::Int64(v) => Ok(Value::Int64(v)),
            Basic::Uint64(v) => Ok(Value::Uint64(v)),
            Basic::Double(v) => Ok(Value::Double(v)),
            Basic::Str(s) => Ok(Value::String(s.into())),
            Basic::Path(s) => {
                let path = ObjectPath::new(s)?;

                let Some(parent) = self.proxy_parent() else {
                    return Err(ErrorKind::MissingProxy.into());
                };

                Ok(Value::Proxy(Arc::new(parent.with_path(path))))
            }
            Basic::Sig(s) => {
                let signature = Signature::new(s.as_bytes())?;
                let arg = Arg::from_signature(signature, None, Parent::Detached)?;
                Ok(Value::Signature(Arc::new(arg)))
            }
        }
    }

    fn unrepresentable(&self, value: &Value) -> crate::error::Error {
        ErrorKind::Unrepresentable {
            expected: self.dbus_type(),
            actual: value.class_name(),
        }
        .into()
    }
}
