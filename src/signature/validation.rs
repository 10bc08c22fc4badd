use crate::proto::Type;

use super::{SignatureError, SignatureErrorKind, MAX_CONTAINER_DEPTH, MAX_DEPTH, MAX_SIGNATURE};

#[derive(Clone, Copy)]
enum Frame {
    Array,
    Struct,
    Dict,
}

/// Validate a D-Bus signature.
///
/// The empty signature and signatures holding more than one complete type are
/// both accepted; callers which require exactly one complete type check with
/// [`count_complete`] on top of this.
pub(crate) const fn validate(bytes: &[u8]) -> Result<(), SignatureError> {
    use SignatureErrorKind::*;

    if bytes.len() > MAX_SIGNATURE {
        return Err(SignatureError::new(SignatureTooLong));
    }

    // Container frames still open at the current position, with the number of
    // complete types seen inside each so far.
    let mut stack = [(Frame::Array, 0u8); MAX_DEPTH];
    let mut sp = 0;
    let mut arrays = 0;
    let mut structs = 0;
    let mut n = 0;

    while n < bytes.len() {
        let t = Type::new(bytes[n]);
        n += 1;

        let mut is_basic = match t {
            Type::BYTE => true,
            Type::BOOLEAN => true,
            Type::INT16 => true,
            Type::UINT16 => true,
            Type::INT32 => true,
            Type::UINT32 => true,
            Type::INT64 => true,
            Type::UINT64 => true,
            Type::DOUBLE => true,
            Type::STRING => true,
            Type::OBJECT_PATH => true,
            Type::SIGNATURE => true,
            // A complete type on its own, but never a legal dict key.
            Type::VARIANT => false,
            Type::ARRAY => {
                if sp == MAX_DEPTH || arrays == MAX_CONTAINER_DEPTH {
                    return Err(SignatureError::new(ExceededMaximumArrayRecursion));
                }

                stack[sp] = (Frame::Array, 0);
                sp += 1;
                arrays += 1;
                continue;
            }
            Type::OPEN_PAREN => {
                if sp == MAX_DEPTH || structs == MAX_CONTAINER_DEPTH {
                    return Err(SignatureError::new(ExceededMaximumStructRecursion));
                }

                stack[sp] = (Frame::Struct, 0);
                sp += 1;
                structs += 1;
                continue;
            }
            Type::CLOSE_PAREN => {
                if sp == 0 {
                    return Err(SignatureError::new(StructEndedButNotStarted));
                }

                sp -= 1;

                let fields = match stack[sp] {
                    (Frame::Struct, fields) => fields,
                    (Frame::Array, _) => {
                        return Err(SignatureError::new(MissingArrayElementType));
                    }
                    _ => {
                        return Err(SignatureError::new(StructEndedButNotStarted));
                    }
                };

                if fields == 0 {
                    return Err(SignatureError::new(StructHasNoFields));
                }

                structs -= 1;
                false
            }
            Type::OPEN_BRACE => {
                if sp == MAX_DEPTH {
                    return Err(SignatureError::new(ExceededMaximumDictRecursion));
                }

                stack[sp] = (Frame::Dict, 0);
                sp += 1;
                continue;
            }
            Type::CLOSE_BRACE => {
                if sp == 0 {
                    return Err(SignatureError::new(DictEndedButNotStarted));
                }

                sp -= 1;

                let fields = match stack[sp] {
                    (Frame::Dict, fields) => fields,
                    (Frame::Array, _) => {
                        return Err(SignatureError::new(MissingArrayElementType));
                    }
                    _ => {
                        return Err(SignatureError::new(DictEndedButNotStarted));
                    }
                };

                match fields {
                    0 => {
                        return Err(SignatureError::new(DictEntryHasNoFields));
                    }
                    1 => {
                        return Err(SignatureError::new(DictEntryHasOnlyOneField));
                    }
                    2 => {}
                    _ => {
                        return Err(SignatureError::new(DictEntryHasTooManyFields));
                    }
                }

                if sp == 0 || !matches!(stack[sp - 1].0, Frame::Array) {
                    return Err(SignatureError::new(DictEntryNotInsideArray));
                }

                false
            }
            t => return Err(SignatureError::new(UnknownTypeCode(t))),
        };

        // A complete type also completes every array it is the element of.
        while sp > 0 && matches!(stack[sp - 1].0, Frame::Array) {
            sp -= 1;
            arrays -= 1;
            is_basic = false;
        }

        if sp > 0 && !is_basic {
            if let (Frame::Dict, 0) = stack[sp - 1] {
                return Err(SignatureError::new(DictKeyMustBeBasicType));
            }
        }

        if sp > 0 {
            stack[sp - 1].1 += 1;
        }
    }

    if sp > 0 {
        let kind = match stack[sp - 1].0 {
            Frame::Array => MissingArrayElementType,
            Frame::Struct => StructStartedButNotEnded,
            Frame::Dict => DictStartedButNotEnded,
        };

        return Err(SignatureError::new(kind));
    }

    Ok(())
}

/// The length in bytes of the complete type leading `bytes`.
///
/// Expects `bytes` to be carved out of an already validated signature.
pub(crate) fn complete_len(bytes: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut n = 0;

    while n < bytes.len() {
        let term = match bytes[n] {
            b'a' => false,
            b'(' | b'{' => {
                depth += 1;
                false
            }
            b')' | b'}' => {
                depth -= 1;
                true
            }
            _ => true,
        };

        n += 1;

        if term && depth == 0 {
            break;
        }
    }

    n
}

/// Count the complete types in an already validated signature.
pub(crate) fn count_complete(bytes: &[u8]) -> usize {
    let mut bytes = bytes;
    let mut count = 0;

    while !bytes.is_empty() {
        bytes = &bytes[complete_len(bytes)..];
        count += 1;
    }

    count
}
