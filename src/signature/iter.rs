use crate::proto::Type;

use super::{complete_len, Signature};

/// The item yielded by the [`Iter`] iterator, one complete type at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A basic type.
    Basic(&'a Signature),
    /// A variant; the contained type is only known once a value is on the
    /// wire.
    Variant,
    /// An array with the given element signature.
    Array(&'a Signature),
    /// A struct with the given field signatures.
    Struct(&'a Signature),
    /// A dict entry with the given key and value signatures.
    Dict(&'a Signature, &'a Signature),
}

/// An iterator over a signature which yields one [`Token`] at a time.
pub struct Iter<'a> {
    bytes: &'a [u8],
}

impl<'a> Iter<'a> {
    #[inline]
    pub(super) fn new(signature: &'a Signature) -> Iter<'a> {
        Iter {
            bytes: signature.as_bytes(),
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let &first = self.bytes.first()?;

        // SAFETY: all slices below are carved out of an already validated
        // signature at complete type boundaries.
        Some(match Type::new(first) {
            Type::ARRAY => {
                let n = complete_len(&self.bytes[1..]);
                let element = unsafe { Signature::new_unchecked(&self.bytes[1..1 + n]) };
                self.bytes = &self.bytes[1 + n..];
                Token::Array(element)
            }
            Type::OPEN_PAREN => {
                let whole = complete_len(self.bytes);
                let fields = unsafe { Signature::new_unchecked(&self.bytes[1..whole - 1]) };
                self.bytes = &self.bytes[whole..];
                Token::Struct(fields)
            }
            Type::OPEN_BRACE => {
                let whole = complete_len(self.bytes);
                let inner = &self.bytes[1..whole - 1];
                let k = complete_len(inner);
                let key = unsafe { Signature::new_unchecked(&inner[..k]) };
                let value = unsafe { Signature::new_unchecked(&inner[k..]) };
                self.bytes = &self.bytes[whole..];
                Token::Dict(key, value)
            }
            Type::VARIANT => {
                self.bytes = &self.bytes[1..];
                Token::Variant
            }
            _ => {
                let sig = unsafe { Signature::new_unchecked(&self.bytes[..1]) };
                self.bytes = &self.bytes[1..];
                Token::Basic(sig)
            }
        })
    }
}
