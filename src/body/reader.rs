use std::str;

use crate::error::{ErrorKind, Result};
use crate::proto::Type;
use crate::signature::{complete_len, Signature};

use super::{padding_to, Basic, MAX_ARRAY};

/// The read half of a message iterator.
///
/// A reader couples a cursor over the body bytes with a cursor over the
/// signature describing them. [`recurse`] produces a sub-reader bounded to
/// the extent of the container under the cursor and advances this reader
/// past it.
///
/// [`recurse`]: Reader::recurse
pub struct Reader<'de> {
    /// The whole message body; positions are absolute so that alignment is
    /// computed relative to the start of the body.
    buf: &'de [u8],
    pos: usize,
    end: usize,
    /// Remaining signature at this level.
    sig: &'de [u8],
    /// Complete signature at this level; the element signature for array
    /// levels.
    level: &'de [u8],
    /// Whether the signature repeats per element (array levels).
    wraps: bool,
}

impl<'de> Reader<'de> {
    pub(crate) fn new(buf: &'de [u8], signature: &'de Signature) -> Self {
        Self {
            buf,
            pos: 0,
            end: buf.len(),
            sig: signature.as_bytes(),
            level: signature.as_bytes(),
            wraps: false,
        }
    }

    /// The complete signature for this level of the message.
    ///
    /// For a reader produced by recursing into a variant this is the
    /// signature embedded in the wire data.
    pub fn signature(&self) -> &'de Signature {
        // SAFETY: always carved out of a validated signature at a complete
        // type boundary, or validated when read off the wire.
        unsafe { Signature::new_unchecked(self.level) }
    }

    /// The type of the argument under the cursor, if any.
    pub fn arg_type(&self) -> Option<Type> {
        if self.wraps && self.pos >= self.end {
            return None;
        }

        self.current_sig().first().map(|&b| code_of(b))
    }

    /// The element type of the array under the cursor.
    pub fn element_type(&self) -> Option<Type> {
        match self.current_sig() {
            [b'a', rest @ ..] => rest.first().map(|&b| code_of(b)),
            _ => None,
        }
    }

    /// Whether another complete value remains at this level.
    pub fn has_more(&self) -> bool {
        if self.wraps {
            self.pos < self.end
        } else {
            !self.sig.is_empty()
        }
    }

    /// Load the basic value under the cursor, checking it against the
    /// expected type.
    pub fn load_basic(&mut self, ty: Type) -> Result<Basic<'de>> {
        self.refill();

        match self.arg_type() {
            Some(t) if t == ty => {}
            actual => {
                return Err(ErrorKind::WireTypeMismatch {
                    expected: ty,
                    actual: actual.unwrap_or(Type::INVALID),
                }
                .into())
            }
        }

        self.sig = &self.sig[1..];

        match ty {
            Type::BYTE => Ok(Basic::Byte(self.load_bytes::<1>(1)?[0])),
            Type::BOOLEAN => match u32::from_ne_bytes(self.load_bytes(4)?) {
                0 => Ok(Basic::Bool(false)),
                1 => Ok(Basic::Bool(true)),
                v => Err(ErrorKind::InvalidBoolean(v).into()),
            },
            Type::INT16 => Ok(Basic::Int16(i16::from_ne_bytes(self.load_bytes(2)?))),
            Type::UINT16 => Ok(Basic::Uint16(u16::from_ne_bytes(self.load_bytes(2)?))),
            Type::INT32 => Ok(Basic::Int32(i32::from_ne_bytes(self.load_bytes(4)?))),
            Type::UINT32 => Ok(Basic::Uint32(u32::from_ne_bytes(self.load_bytes(4)?))),
            Type::INT64 => Ok(Basic::Int64(i64::from_ne_bytes(self.load_bytes(8)?))),
            Type::UINT64 => Ok(Basic::Uint64(u64::from_ne_bytes(self.load_bytes(8)?))),
            Type::DOUBLE => Ok(Basic::Double(f64::from_ne_bytes(self.load_bytes(8)?))),
            Type::STRING => Ok(Basic::Str(self.load_str()?)),
            Type::OBJECT_PATH => Ok(Basic::Path(self.load_str()?)),
            Type::SIGNATURE => Ok(Basic::Sig(self.load_sig_str()?)),
            ty => Err(ErrorKind::NotAContainer(ty).into()),
        }
    }

    /// Recurse into the container under the cursor.
    ///
    /// The returned sub-reader is bounded to the container's extent; this
    /// reader is advanced past it.
    pub fn recurse(&mut self) -> Result<Reader<'de>> {
        self.refill();
        let sig = self.sig;

        match sig.first().copied() {
            Some(b'a') => {
                let n = complete_len(&sig[1..]);
                let element = &sig[1..1 + n];
                self.sig = &sig[1 + n..];

                let len = u32::from_ne_bytes(self.load_bytes(4)?) as usize;

                if len > MAX_ARRAY {
                    return Err(ErrorKind::ArrayTooLong(len as u32).into());
                }

                self.align(Type::new(element[0]).alignment())?;
                let start = self.pos;
                let end = start.saturating_add(len);

                if end > self.end {
                    return Err(ErrorKind::BufferUnderflow.into());
                }

                self.pos = end;

                Ok(Reader {
                    buf: self.buf,
                    pos: start,
                    end,
                    sig: element,
                    level: element,
                    wraps: true,
                })
            }
            Some(b'(') => {
                let whole = complete_len(sig);
                let fields = &sig[1..whole - 1];
                self.sig = &sig[whole..];
                self.bounded(fields)
            }
            Some(b'{') => {
                let whole = complete_len(sig);
                let inner = &sig[1..whole - 1];
                self.sig = &sig[whole..];
                self.bounded(inner)
            }
            Some(b'v') => {
                self.sig = &sig[1..];

                // The contained signature comes off the wire.
                let len = self.load_bytes::<1>(1)?[0] as usize;
                let bytes = self.load_slice_nul(len)?;
                let contained = Signature::new(bytes)?;

                let start = self.pos;
                let extent = self.extent_of(contained.as_bytes(), start)?;
                let end = start + extent;
                self.pos = end;

                Ok(Reader {
                    buf: self.buf,
                    pos: start,
                    end,
                    sig: contained.as_bytes(),
                    level: contained.as_bytes(),
                    wraps: false,
                })
            }
            Some(b) => Err(ErrorKind::NotAContainer(code_of(b)).into()),
            None => Err(ErrorKind::NotAContainer(Type::INVALID).into()),
        }
    }

    /// Produce a sub-reader for an 8-aligned aggregate with the given inner
    /// signature.
    fn bounded(&mut self, inner: &'de [u8]) -> Result<Reader<'de>> {
        self.align(8)?;
        let start = self.pos;
        let extent = self.extent_of(inner, start)?;
        let end = start + extent;
        self.pos = end;

        Ok(Reader {
            buf: self.buf,
            pos: start,
            end,
            sig: inner,
            level: inner,
            wraps: false,
        })
    }

    /// The number of bytes the values described by `sig` occupy starting at
    /// `from`, including any leading padding.
    fn extent_of(&self, sig: &[u8], from: usize) -> Result<usize> {
        let mut probe = Reader {
            buf: self.buf,
            pos: from,
            end: self.end,
            sig,
            level: sig,
            wraps: false,
        };

        while probe.has_more() {
            probe.skip_one()?;
        }

        Ok(probe.pos - from)
    }

    /// Skip the complete value under the cursor.
    fn skip_one(&mut self) -> Result<()> {
        self.refill();

        match self.sig.first().copied() {
            Some(b'a' | b'(' | b'{' | b'v') => {
                self.recurse()?;
            }
            Some(b) => {
                self.load_basic(Type::new(b))?;
            }
            None => {}
        }

        Ok(())
    }

    /// The remaining signature, seen through the array-level wrap-around.
    fn current_sig(&self) -> &'de [u8] {
        if self.wraps && self.sig.is_empty() {
            self.level
        } else {
            self.sig
        }
    }

    /// Start the element signature over on array levels.
    fn refill(&mut self) {
        if self.wraps && self.sig.is_empty() {
            self.sig = self.level;
        }
    }

    fn align(&mut self, align: usize) -> Result<()> {
        let pad = padding_to(self.pos, align);

        if self.pos + pad > self.end {
            return Err(ErrorKind::BufferUnderflow.into());
        }

        self.pos += pad;
        Ok(())
    }

    fn load_bytes<const N: usize>(&mut self, align: usize) -> Result<[u8; N]> {
        self.align(align)?;

        if self.pos + N > self.end {
            return Err(ErrorKind::BufferUnderflow.into());
        }

        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    fn load_str(&mut self) -> Result<&'de str> {
        let len = u32::from_ne_bytes(self.load_bytes(4)?) as usize;
        let bytes = self.load_slice_nul(len)?;
        Ok(str::from_utf8(bytes)?)
    }

    fn load_sig_str(&mut self) -> Result<&'de str> {
        let len = self.load_bytes::<1>(1)?[0] as usize;
        let bytes = self.load_slice_nul(len)?;
        Ok(str::from_utf8(bytes)?)
    }

    /// Load a slice ending with a NUL byte, excluding the NUL byte.
    fn load_slice_nul(&mut self, len: usize) -> Result<&'de [u8]> {
        let end = self.pos.saturating_add(len).saturating_add(1);

        if end > self.end {
            return Err(ErrorKind::BufferUnderflow.into());
        }

        let bytes = &self.buf[self.pos..self.pos + len];

        if self.buf[self.pos + len] != 0 {
            return Err(ErrorKind::NotNullTerminated.into());
        }

        self.pos = end;
        Ok(bytes)
    }
}

fn code_of(byte: u8) -> Type {
    match byte {
        b'(' => Type::STRUCT,
        b'{' => Type::DICT_ENTRY,
        _ => Type::new(byte),
    }
}
