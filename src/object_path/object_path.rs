use std::fmt;
use std::str::from_utf8_unchecked;

use super::{ObjectPathError, OwnedObjectPath};

/// A validated object path.
///
/// The following rules define a [valid object path]. Implementations must
/// not send or accept messages with invalid object paths.
///
/// [valid object path]: https://dbus.freedesktop.org/doc/dbus-specification.html#message-protocol-marshaling-object-path
///
/// * The path must begin with an ASCII '/' character, and must consist of
///   elements separated by slash characters.
/// * Each element must only contain the ASCII characters "[A-Z][a-z][0-9]_".
/// * No element may be the empty string.
/// * A trailing '/' character is not allowed unless the path is the root
///   path (a single '/' character).
#[derive(PartialEq, Eq)]
#[repr(transparent)]
pub struct ObjectPath([u8]);

impl ObjectPath {
    /// The special `"/"` object path.
    pub const ROOT: &'static Self = Self::new_const(b"/");

    /// Construct a new object path, panicking if it is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_marshal::ObjectPath;
    ///
    /// const PATH: &ObjectPath = ObjectPath::new_const(b"/org/freedesktop/DBus");
    /// ```
    #[track_caller]
    pub const fn new_const(path: &[u8]) -> &Self {
        if !validate(path) {
            panic!("Invalid D-Bus object path");
        }

        // SAFETY: The path was just validated.
        unsafe { Self::new_unchecked(path) }
    }

    /// Construct a new validated object path.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_marshal::ObjectPath;
    ///
    /// assert!(ObjectPath::new("/org/freedesktop/DBus").is_ok());
    /// assert!(ObjectPath::new("/trailing/").is_err());
    /// ```
    pub fn new<P>(path: &P) -> Result<&Self, ObjectPathError>
    where
        P: ?Sized + AsRef<[u8]>,
    {
        let path = path.as_ref();

        if !validate(path) {
            return Err(ObjectPathError);
        }

        // SAFETY: The path was just validated.
        unsafe { Ok(Self::new_unchecked(path)) }
    }

    /// Construct a new unchecked object path.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the path is a valid object path.
    pub(super) const unsafe fn new_unchecked(path: &[u8]) -> &Self {
        &*(path as *const _ as *const Self)
    }

    /// Get the object path as a string.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: Validation ensures that the path is ASCII.
        unsafe { from_utf8_unchecked(&self.0) }
    }

    /// Get the object path as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ObjectPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl fmt::Debug for ObjectPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl AsRef<ObjectPath> for ObjectPath {
    #[inline]
    fn as_ref(&self) -> &ObjectPath {
        self
    }
}

impl AsRef<[u8]> for ObjectPath {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl ToOwned for ObjectPath {
    type Owned = OwnedObjectPath;

    #[inline]
    fn to_owned(&self) -> Self::Owned {
        // SAFETY: This path was validated when constructed.
        unsafe { OwnedObjectPath::from_raw_vec(self.0.to_vec()) }
    }
}

impl PartialEq<str> for ObjectPath {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0 == *other.as_bytes()
    }
}

impl PartialEq<&str> for ObjectPath {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other.as_bytes()
    }
}

/// Validate an object path: a leading '/', elements of `[A-Za-z0-9_]`
/// separated by single slashes, and no trailing slash unless the path is
/// the root path.
const fn validate(bytes: &[u8]) -> bool {
    if bytes.is_empty() || bytes[0] != b'/' {
        return false;
    }

    if bytes.len() == 1 {
        return true;
    }

    let mut n = 1;

    while n < bytes.len() {
        let start = n;

        while n < bytes.len() && bytes[n] != b'/' {
            let b = bytes[n];

            if !(b.is_ascii_alphanumeric() || b == b'_') {
                return false;
            }

            n += 1;
        }

        // An empty element means doubled slashes.
        if n == start {
            return false;
        }

        if n == bytes.len() {
            return true;
        }

        n += 1;
    }

    // The loop only falls through after a trailing separator.
    false
}
