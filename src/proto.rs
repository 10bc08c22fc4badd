//! Low level details of the D-Bus type grammar.

use std::fmt;

/// A single type code as it appears in a D-Bus signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Type(pub(crate) u8);

impl Type {
    /// Not a valid type code, used to report an absent type.
    pub const INVALID: Self = Self(b'\0');
    /// 8-bit unsigned integer.
    pub const BYTE: Self = Self(b'y');
    /// Boolean value, 0 is FALSE and 1 is TRUE. Everything else is invalid.
    pub const BOOLEAN: Self = Self(b'b');
    /// 16-bit signed integer.
    pub const INT16: Self = Self(b'n');
    /// 16-bit unsigned integer.
    pub const UINT16: Self = Self(b'q');
    /// 32-bit signed integer.
    pub const INT32: Self = Self(b'i');
    /// 32-bit unsigned integer.
    pub const UINT32: Self = Self(b'u');
    /// 64-bit signed integer.
    pub const INT64: Self = Self(b'x');
    /// 64-bit unsigned integer.
    pub const UINT64: Self = Self(b't');
    /// IEEE 754 double.
    pub const DOUBLE: Self = Self(b'd');
    /// UTF-8 string. Must be nul terminated and contain no other nul bytes.
    pub const STRING: Self = Self(b's');
    /// Name of an object instance.
    pub const OBJECT_PATH: Self = Self(b'o');
    /// A type signature.
    pub const SIGNATURE: Self = Self(b'g');
    /// Array.
    pub const ARRAY: Self = Self(b'a');
    /// Variant type (the type of the value is part of the value itself).
    pub const VARIANT: Self = Self(b'v');
    /// Struct; type code 114 'r' is reserved for use in bindings to represent
    /// the general concept of a struct, and must not appear in signatures
    /// used on D-Bus.
    pub const STRUCT: Self = Self(b'r');
    /// Entry in a dict or map; type code 101 'e' is reserved for use in
    /// bindings to represent the general concept of a dict entry, and must
    /// not appear in signatures used on D-Bus.
    pub const DICT_ENTRY: Self = Self(b'e');

    pub(crate) const OPEN_PAREN: Self = Self(b'(');
    pub(crate) const CLOSE_PAREN: Self = Self(b')');
    pub(crate) const OPEN_BRACE: Self = Self(b'{');
    pub(crate) const CLOSE_BRACE: Self = Self(b'}');

    #[inline]
    pub(crate) const fn new(byte: u8) -> Self {
        Self(byte)
    }

    /// Test if this is one of the fixed-size or string-like basic types.
    #[inline]
    pub const fn is_basic(self) -> bool {
        matches!(
            self.0,
            b'y' | b'b' | b'n' | b'q' | b'i' | b'u' | b'x' | b't' | b'd' | b's' | b'o' | b'g'
        )
    }

    /// Test if this code names a container type.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self.0, b'a' | b'v' | b'r' | b'e' | b'(' | b'{')
    }

    /// The wire alignment of a value of this type.
    pub(crate) const fn alignment(self) -> usize {
        match self.0 {
            b'n' | b'q' => 2,
            b'b' | b'i' | b'u' | b's' | b'o' | b'a' => 4,
            b'x' | b't' | b'd' | b'r' | b'e' | b'(' | b'{' => 8,
            _ => 1,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BYTE => f.write_str("BYTE"),
            Self::BOOLEAN => f.write_str("BOOLEAN"),
            Self::INT16 => f.write_str("INT16"),
            Self::UINT16 => f.write_str("UINT16"),
            Self::INT32 => f.write_str("INT32"),
            Self::UINT32 => f.write_str("UINT32"),
            Self::INT64 => f.write_str("INT64"),
            Self::UINT64 => f.write_str("UINT64"),
            Self::DOUBLE => f.write_str("DOUBLE"),
            Self::STRING => f.write_str("STRING"),
            Self::OBJECT_PATH => f.write_str("OBJECT_PATH"),
            Self::SIGNATURE => f.write_str("SIGNATURE"),
            Self::ARRAY => f.write_str("ARRAY"),
            Self::VARIANT => f.write_str("VARIANT"),
            Self::STRUCT => f.write_str("STRUCT"),
            Self::DICT_ENTRY => f.write_str("DICT_ENTRY"),
            Self::OPEN_PAREN => f.write_str("OPEN_PAREN"),
            Self::CLOSE_PAREN => f.write_str("CLOSE_PAREN"),
            Self::OPEN_BRACE => f.write_str("OPEN_BRACE"),
            Self::CLOSE_BRACE => f.write_str("CLOSE_BRACE"),
            _ => f.write_str("INVALID"),
        }
    }
}
