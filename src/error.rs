use std::error;
use std::fmt;
use std::str::Utf8Error;

use crate::call::{Slot, SlotClass};
use crate::object_path::ObjectPathError;
use crate::proto::Type;
use crate::signature::SignatureError;

/// Result alias using an [`Error`] as the error type by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error raised by this crate.
#[derive(Debug)]
pub struct Error {
    pub(crate) kind: ErrorKind,
}

impl Error {
    #[inline]
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Self { kind }
    }

    /// Construct an error indicating that a call frame has no such slot.
    ///
    /// Provided for implementors of [`CallFrame`].
    ///
    /// [`CallFrame`]: crate::CallFrame
    #[inline]
    pub fn invalid_slot(slot: Slot) -> Error {
        Self::new(ErrorKind::InvalidSlot(slot))
    }
}

impl From<SignatureError> for Error {
    #[inline]
    fn from(error: SignatureError) -> Self {
        Self::new(ErrorKind::Signature(error))
    }
}

impl From<ObjectPathError> for Error {
    #[inline]
    fn from(error: ObjectPathError) -> Self {
        Self::new(ErrorKind::ObjectPath(error))
    }
}

impl From<Utf8Error> for Error {
    #[inline]
    fn from(error: Utf8Error) -> Self {
        Self::new(ErrorKind::Utf8Error(error))
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Signature(..) => write!(f, "Signature error"),
            ErrorKind::ObjectPath(..) => write!(f, "ObjectPath error"),
            ErrorKind::Utf8Error(..) => write!(f, "UTF-8 error"),
            ErrorKind::WireTypeMismatch { expected, actual } => {
                write!(f, "Wire type {actual:?} where {expected:?} was expected")
            }
            ErrorKind::HostTypeMismatch { expected, actual } => {
                write!(
                    f,
                    "Call frame slot declares {actual:?} where {expected:?} was expected"
                )
            }
            ErrorKind::Unrepresentable { expected, actual } => {
                write!(f, "Cannot represent {actual} value as {expected:?}")
            }
            ErrorKind::StructFieldCount { expected, actual } => {
                write!(f, "Struct value has {actual} fields where {expected} were expected")
            }
            ErrorKind::MissingProxy => {
                write!(f, "No proxy encloses this object path argument")
            }
            ErrorKind::ProxyOutOfScope => {
                write!(f, "Proxy is outside the scope of the enclosing proxy")
            }
            ErrorKind::NotAContainer(ty) => {
                write!(f, "Cannot recurse into non-container type {ty:?}")
            }
            ErrorKind::InvalidBoolean(value) => {
                write!(f, "Invalid boolean value {value}")
            }
            ErrorKind::InvalidSlot(slot) => {
                write!(f, "No such call frame slot {slot:?}")
            }
            ErrorKind::BufferUnderflow => write!(f, "Buffer underflow"),
            ErrorKind::NotNullTerminated => {
                write!(f, "String is not null terminated")
            }
            ErrorKind::ArrayTooLong(length) => {
                write!(f, "Array of length {length} is too long (max is 67108864)")
            }
            ErrorKind::BodyTooLong(length) => {
                write!(f, "Body of length {length} is too long (max is 134217728)")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Signature(error) => Some(error),
            ErrorKind::ObjectPath(error) => Some(error),
            ErrorKind::Utf8Error(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) enum ErrorKind {
    Signature(SignatureError),
    ObjectPath(ObjectPathError),
    Utf8Error(Utf8Error),
    WireTypeMismatch { expected: Type, actual: Type },
    HostTypeMismatch { expected: SlotClass, actual: SlotClass },
    Unrepresentable { expected: Type, actual: &'static str },
    StructFieldCount { expected: usize, actual: usize },
    MissingProxy,
    ProxyOutOfScope,
    NotAContainer(Type),
    InvalidBoolean(u32),
    InvalidSlot(Slot),
    BufferUnderflow,
    NotNullTerminated,
    ArrayTooLong(u32),
    BodyTooLong(u32),
}
