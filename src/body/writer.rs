use crate::error::{ErrorKind, Result};
use crate::signature::Signature;

use super::{Basic, BodyBuf, MAX_ARRAY};

enum Close {
    /// The writer spans the whole body and closes nothing.
    Root,
    /// A struct, dict entry or variant; nothing to patch on close.
    Plain,
    /// An array; the length prefix is patched on close.
    Array { len_at: usize, start: usize },
}

/// The write half of a message iterator.
///
/// A writer either spans the whole body (see [`BodyBuf::writer`]) or a
/// single open container produced by one of the `open_` methods. Containers
/// are closed by [`finish`]; a writer dropped on an error path closes its
/// container as well, so container framing stays balanced on every exit
/// path.
///
/// [`finish`]: Writer::finish
#[must_use = "containers must be closed using Writer::finish"]
pub struct Writer<'a> {
    buf: &'a mut BodyBuf,
    close: Close,
    done: bool,
}

impl<'a> Writer<'a> {
    pub(crate) fn root(buf: &'a mut BodyBuf) -> Self {
        Self {
            buf,
            close: Close::Root,
            done: true,
        }
    }

    /// Record the signature of a top level argument.
    ///
    /// Only the root writer keeps a record; container writers already know
    /// their contents from the framing written around them.
    pub(crate) fn record_signature(&mut self, signature: &Signature) {
        if matches!(self.close, Close::Root) {
            self.buf.record(signature);
        }
    }

    /// Append a basic value.
    pub fn append_basic(&mut self, value: Basic<'_>) -> Result<()> {
        match value {
            Basic::Byte(v) => {
                self.buf.push(v);
            }
            Basic::Bool(v) => {
                self.buf.align_mut(4);
                self.buf.extend(&u32::from(v).to_ne_bytes());
            }
            Basic::Int16(v) => {
                self.buf.align_mut(2);
                self.buf.extend(&v.to_ne_bytes());
            }
            Basic::Uint16(v) => {
                self.buf.align_mut(2);
                self.buf.extend(&v.to_ne_bytes());
            }
            Basic::Int32(v) => {
                self.buf.align_mut(4);
                self.buf.extend(&v.to_ne_bytes());
            }
            Basic::Uint32(v) => {
                self.buf.align_mut(4);
                self.buf.extend(&v.to_ne_bytes());
            }
            Basic::Int64(v) => {
                self.buf.align_mut(8);
                self.buf.extend(&v.to_ne_bytes());
            }
            Basic::Uint64(v) => {
                self.buf.align_mut(8);
                self.buf.extend(&v.to_ne_bytes());
            }
            Basic::Double(v) => {
                self.buf.align_mut(8);
                self.buf.extend(&v.to_ne_bytes());
            }
            Basic::Str(s) | Basic::Path(s) => {
                self.buf.align_mut(4);
                self.buf.extend(&(s.len() as u32).to_ne_bytes());
                self.buf.extend(s.as_bytes());
                self.buf.push(0);
            }
            Basic::Sig(s) => {
                self.buf.push(s.len() as u8);
                self.buf.extend(s.as_bytes());
                self.buf.push(0);
            }
        }

        self.buf.check_space()
    }

    /// Open an array with the given element signature.
    ///
    /// The length prefix is allocated here and patched when the returned
    /// writer is finished. Padding up to the element boundary is not part of
    /// the length, per the D-Bus wire rules.
    pub fn open_array(&mut self, element: &Signature) -> Result<Writer<'_>> {
        let len_at = self.buf.alloc_len();

        let align = match element.head() {
            Some(ty) => ty.alignment(),
            None => 1,
        };

        self.buf.align_mut(align);
        let start = self.buf.len();
        self.buf.check_space()?;
        self.buf.opened += 1;

        Ok(Writer {
            buf: &mut *self.buf,
            close: Close::Array { len_at, start },
            done: false,
        })
    }

    /// Open a struct.
    pub fn open_struct(&mut self) -> Result<Writer<'_>> {
        self.open_aligned()
    }

    /// Open a dict entry.
    ///
    /// Dict entries open with no contained signature, per the D-Bus wire
    /// rules; the enclosing array's element signature already describes
    /// them.
    pub fn open_dict_entry(&mut self) -> Result<Writer<'_>> {
        self.open_aligned()
    }

    fn open_aligned(&mut self) -> Result<Writer<'_>> {
        self.buf.align_mut(8);
        self.buf.check_space()?;
        self.buf.opened += 1;

        Ok(Writer {
            buf: &mut *self.buf,
            close: Close::Plain,
            done: false,
        })
    }

    /// Open a variant containing a value of the given signature.
    ///
    /// The contained signature is embedded in the wire data ahead of the
    /// value.
    pub fn open_variant(&mut self, contained: &Signature) -> Result<Writer<'_>> {
        self.buf.push(contained.len() as u8);
        self.buf.extend(contained.as_bytes());
        self.buf.push(0);
        self.buf.check_space()?;
        self.buf.opened += 1;

        Ok(Writer {
            buf: &mut *self.buf,
            close: Close::Plain,
            done: false,
        })
    }

    /// Close the container and surface any framing error.
    pub fn finish(mut self) -> Result<()> {
        self.done = true;
        self.finalize()
    }

    fn finalize(&mut self) -> Result<()> {
        match self.close {
            Close::Root => Ok(()),
            Close::Plain => {
                self.buf.closed += 1;
                Ok(())
            }
            Close::Array { len_at, start } => {
                self.buf.closed += 1;
                let len = self.buf.len() - start;
                self.buf.store_len_at(len_at, len as u32);

                if len > MAX_ARRAY {
                    return Err(ErrorKind::ArrayTooLong(len as u32).into());
                }

                Ok(())
            }
        }
    }
}

impl Drop for Writer<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.done = true;
            // The close on an error path cannot improve on the error already
            // in flight.
            let _ = self.finalize();
        }
    }
}
