use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use super::{validate, Signature, SignatureError};

/// A D-Bus signature.
///
/// This is the owned variant which dereferences to [`Signature`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OwnedSignature(Vec<u8>);

impl OwnedSignature {
    /// Construct a new empty signature.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_marshal::OwnedSignature;
    ///
    /// let sig = OwnedSignature::empty();
    /// assert!(sig.is_empty());
    /// ```
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Try to construct a new signature with validation.
    pub fn new(signature: &[u8]) -> Result<Self, SignatureError> {
        validate(signature)?;
        Ok(Self(signature.to_vec()))
    }

    /// Construct directly from a vector.
    ///
    /// # Safety
    ///
    /// Caller must ensure that this is a well-nested sequence of complete
    /// types, as for [`Signature::new_unchecked`].
    pub(crate) unsafe fn from_vec(signature: Vec<u8>) -> Self {
        Self(signature)
    }

    /// Extend this signature with another.
    pub(crate) fn extend_from_signature<S>(&mut self, other: S)
    where
        S: AsRef<Signature>,
    {
        self.0.extend_from_slice(other.as_ref().as_bytes());
    }

    /// Clear the current signature.
    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Debug for OwnedSignature {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnedSignature").field(&self.as_str()).finish()
    }
}

impl Deref for OwnedSignature {
    type Target = Signature;

    #[inline]
    fn deref(&self) -> &Self::Target {
        // SAFETY: Construction of OwnedSignature ensures that the signature
        // is well formed.
        unsafe { Signature::new_unchecked(&self.0) }
    }
}

impl Borrow<Signature> for OwnedSignature {
    #[inline]
    fn borrow(&self) -> &Signature {
        self
    }
}

impl AsRef<Signature> for OwnedSignature {
    #[inline]
    fn as_ref(&self) -> &Signature {
        self
    }
}

impl From<&Signature> for OwnedSignature {
    #[inline]
    fn from(signature: &Signature) -> Self {
        signature.to_owned()
    }
}

/// Equality check between [`Signature`] and [`OwnedSignature`].
///
/// # Examples
///
/// ```
/// use dbus_marshal::{OwnedSignature, Signature};
///
/// assert_eq!(OwnedSignature::empty(), *Signature::EMPTY);
/// assert_eq!(Signature::STRING.to_owned(), *Signature::STRING);
/// ```
impl PartialEq<Signature> for OwnedSignature {
    #[inline]
    fn eq(&self, other: &Signature) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&Signature> for OwnedSignature {
    #[inline]
    fn eq(&self, other: &&Signature) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<OwnedSignature> for Signature {
    #[inline]
    fn eq(&self, other: &OwnedSignature) -> bool {
        *self.as_bytes() == *other.0
    }
}

impl PartialEq<OwnedSignature> for &Signature {
    #[inline]
    fn eq(&self, other: &OwnedSignature) -> bool {
        *self.as_bytes() == *other.0
    }
}

impl PartialEq<str> for OwnedSignature {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}
