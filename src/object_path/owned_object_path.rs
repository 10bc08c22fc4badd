use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use super::{ObjectPath, ObjectPathError};

/// An object path.
///
/// This is the owned variant which dereferences to [`ObjectPath`].
#[derive(Clone, PartialEq, Eq)]
pub struct OwnedObjectPath(Vec<u8>);

impl OwnedObjectPath {
    /// Try to construct a new owned object path with validation.
    pub fn new<P>(path: &P) -> Result<Self, ObjectPathError>
    where
        P: ?Sized + AsRef<[u8]>,
    {
        Ok(ObjectPath::new(path)?.to_owned())
    }

    /// Construct directly from a vector.
    ///
    /// # Safety
    ///
    /// Caller must ensure that the vector holds a valid object path.
    pub(super) unsafe fn from_raw_vec(path: Vec<u8>) -> Self {
        Self(path)
    }
}

impl fmt::Debug for OwnedObjectPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl fmt::Display for OwnedObjectPath {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl Deref for OwnedObjectPath {
    type Target = ObjectPath;

    #[inline]
    fn deref(&self) -> &Self::Target {
        // SAFETY: Construction of OwnedObjectPath ensures that the path is
        // valid.
        unsafe { ObjectPath::new_unchecked(&self.0) }
    }
}

impl Borrow<ObjectPath> for OwnedObjectPath {
    #[inline]
    fn borrow(&self) -> &ObjectPath {
        self
    }
}

impl AsRef<ObjectPath> for OwnedObjectPath {
    #[inline]
    fn as_ref(&self) -> &ObjectPath {
        self
    }
}

impl From<&ObjectPath> for OwnedObjectPath {
    #[inline]
    fn from(path: &ObjectPath) -> Self {
        path.to_owned()
    }
}

impl PartialEq<ObjectPath> for OwnedObjectPath {
    #[inline]
    fn eq(&self, other: &ObjectPath) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<OwnedObjectPath> for ObjectPath {
    #[inline]
    fn eq(&self, other: &OwnedObjectPath) -> bool {
        *self.as_bytes() == *other.0
    }
}
