pub use self::basic::Basic;
mod basic;

pub use self::writer::Writer;
mod writer;

pub use self::reader::Reader;
mod reader;


use std::fmt;

use crate::error::{ErrorKind, Result};
use crate::signature::{OwnedSignature, Signature};

/// The maximum length in bytes of a single array.
pub(crate) const MAX_ARRAY: usize = 67108864;

/// The maximum length in bytes of a message body.
pub(crate) const MAX_BODY: usize = 134217728;

/// Padding needed to bring `len` up to `align`.
pub(crate) fn padding_to(len: usize, align: usize) -> usize {
    (align - len % align) % align
}

/// An owned D-Bus message body, aligned per the D-Bus specification and
/// carrying the signature of everything stored at the top level.
///
/// # Examples
///
/// ```
/// use dbus_marshal::{Arg, BodyBuf, Parent, Value};
///
/// let arg = Arg::from_str("i", None, Parent::Detached)?;
///
/// let mut body = BodyBuf::new();
/// arg.marshal(&Value::Int32(42), &mut body.writer())?;
///
/// assert_eq!(body.signature(), "i");
/// assert_eq!(arg.unmarshal(&mut body.reader())?, Value::Int32(42));
/// # Ok::<_, dbus_marshal::Error>(())
/// ```
pub struct BodyBuf {
    data: Vec<u8>,
    signature: OwnedSignature,
    /// Containers opened and closed over the lifetime of the buffer. The
    /// counts match on every marshal exit path, including errors.
    pub(crate) opened: usize,
    pub(crate) closed: usize,
}

impl BodyBuf {
    /// Construct a new empty body.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            signature: OwnedSignature::empty(),
            opened: 0,
            closed: 0,
        }
    }

    /// The signature of the arguments stored at the top level of the body.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Get a slice of the bytes written so far.
    #[inline]
    pub fn get(&self) -> &[u8] {
        &self.data
    }

    /// The number of bytes written.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Test if the body is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Clear the body and its signature.
    pub fn clear(&mut self) {
        self.data.clear();
        self.signature.clear();
        self.opened = 0;
        self.closed = 0;
    }

    /// Construct the write half of a message iterator over this body.
    #[inline]
    pub fn writer(&mut self) -> Writer<'_> {
        Writer::root(self)
    }

    /// Construct the read half of a message iterator over this body.
    #[inline]
    pub fn reader(&self) -> Reader<'_> {
        Reader::new(&self.data, &self.signature)
    }

    /// Pad the body up to `align` with zero bytes.
    pub(crate) fn align_mut(&mut self, align: usize) {
        let pad = padding_to(self.data.len(), align);
        self.data.resize(self.data.len() + pad, 0);
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Allocate an aligned length prefix, to be filled in by
    /// [`store_len_at`](Self::store_len_at) once the extent is known.
    pub(crate) fn alloc_len(&mut self) -> usize {
        self.align_mut(4);
        let at = self.data.len();
        self.data.extend_from_slice(&0u32.to_ne_bytes());
        at
    }

    pub(crate) fn store_len_at(&mut self, at: usize, len: u32) {
        self.data[at..at + 4].copy_from_slice(&len.to_ne_bytes());
    }

    pub(crate) fn check_space(&self) -> Result<()> {
        if self.data.len() > MAX_BODY {
            return Err(ErrorKind::BodyTooLong(self.data.len() as u32).into());
        }

        Ok(())
    }

    pub(crate) fn record(&mut self, signature: &Signature) {
        self.signature.extend_from_signature(signature);
    }
}

impl Default for BodyBuf {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BodyBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyBuf")
            .field("len", &self.data.len())
            .field("signature", &self.signature)
            .finish()
    }
}
