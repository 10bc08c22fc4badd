use super::{Signature, SignatureError, SignatureErrorKind, Token, MAX_SIGNATURE};

use SignatureErrorKind::*;

macro_rules! test {
    ($input:expr, $expected:pat) => {{
        let actual = Signature::new($input).map_err(|e| e.kind);

        assert!(
            matches!(actual, $expected),
            "{actual:?} does not match {}",
            stringify!($expected)
        );
    }};
}

#[test]
fn signature_tests() {
    test!(b"", Ok(..));
    test!(b"sss", Ok(..));
    test!(b"i", Ok(..));
    test!(b"b", Ok(..));
    test!(b"ai", Ok(..));
    test!(b"(i)", Ok(..));
    test!(b"w", Err(UnknownTypeCode(..)));
    test!(b"h", Err(UnknownTypeCode(..)));
    test!(b"a", Err(MissingArrayElementType));
    test!(b"aaaaaa", Err(MissingArrayElementType));
    test!(b"ii(ii)a", Err(MissingArrayElementType));
    test!(b"ia", Err(MissingArrayElementType));
    test!(b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaai", Ok(..));
    test!(
        b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaai",
        Err(ExceededMaximumArrayRecursion)
    );
    test!(b"aiaiaiaiaiaiaiaiaiaiaiaiaiaiaiaiaiai", Ok(..));
    test!(b")", Err(StructEndedButNotStarted));
    test!(b"}", Err(DictEndedButNotStarted));
    test!(b"i)", Err(StructEndedButNotStarted));
    test!(b"a)", Err(MissingArrayElementType));
    test!(b"(", Err(StructStartedButNotEnded));
    test!(b"(i", Err(StructStartedButNotEnded));
    test!(b"(iiiii", Err(StructStartedButNotEnded));
    test!(b"(ai", Err(StructStartedButNotEnded));
    test!(b"()", Err(StructHasNoFields));
    test!(b"(())", Err(StructHasNoFields));
    test!(b"a()", Err(StructHasNoFields));
    test!(b"i()", Err(StructHasNoFields));
    test!(b"()i", Err(StructHasNoFields));
    test!(b"(a)", Err(MissingArrayElementType));
    test!(b"a{ia}", Err(MissingArrayElementType));
    test!(b"a{}", Err(DictEntryHasNoFields));
    test!(b"a{aii}", Err(DictKeyMustBeBasicType));
    test!(b"a{vi}", Err(DictKeyMustBeBasicType));
    test!(b"a{(ii)i}", Err(DictKeyMustBeBasicType));
    test!(b"a{i}", Err(DictEntryHasOnlyOneField));
    test!(b"{is}", Err(DictEntryNotInsideArray));
    test!(b"a{isi}", Err(DictEntryHasTooManyFields));
    test!(b" ", Err(UnknownTypeCode(..)));
    test!(b"not a valid signature", Err(UnknownTypeCode(..)));
    test!(b"123", Err(UnknownTypeCode(..)));
    test!(b".", Err(UnknownTypeCode(..)));
    test!(&[b'i'; MAX_SIGNATURE], Ok(..));
    test!(&[b'i'; MAX_SIGNATURE + 1], Err(SignatureTooLong));
    test! {
        b"((((((((((((((((((((((((((((((((ii))))))))))))))))))))))))))))))))",
        Ok(..)
    };
    test! {
        b"(((((((((((((((((((((((((((((((((ii))))))))))))))))))))))))))))))))",
        Err(ExceededMaximumStructRecursion)
    };
}

#[test]
fn single_complete_type() -> Result<(), SignatureError> {
    assert!(Signature::new(b"i")?.is_single());
    assert!(Signature::new(b"a{s(iu)}")?.is_single());
    assert!(Signature::new(b"(ua{s(iu)}bv)")?.is_single());
    assert!(!Signature::new(b"")?.is_single());
    assert!(!Signature::new(b"iiu")?.is_single());
    assert!(!Signature::new(b"a{sv}u")?.is_single());
    Ok(())
}

#[test]
fn iter_tokens() -> Result<(), SignatureError> {
    let s = Signature::new(b"aaa(as)yva{yy}")?;

    let mut it = s.iter();

    let Some(Token::Array(s2)) = it.next() else {
        panic!("expected outer array");
    };

    assert_eq!(s2, "aa(as)");

    let Some(Token::Array(s3)) = s2.iter().next() else {
        panic!("expected inner array");
    };

    assert_eq!(s3, "a(as)");

    let Some(Token::Array(s4)) = s3.iter().next() else {
        panic!("expected innermost array");
    };

    assert_eq!(s4, "(as)");

    let Some(Token::Struct(s5)) = s4.iter().next() else {
        panic!("expected struct: {:?}", s4.iter().next());
    };

    assert_eq!(s5, "as");

    assert_eq!(it.next(), Some(Token::Basic(Signature::BYTE)));
    assert_eq!(it.next(), Some(Token::Variant));

    let Some(Token::Array(s6)) = it.next() else {
        panic!("expected dict array");
    };

    let Some(Token::Dict(key, value)) = s6.iter().next() else {
        panic!("expected dict entry");
    };

    assert_eq!(key, Signature::BYTE);
    assert_eq!(value, Signature::BYTE);
    assert!(it.next().is_none());
    Ok(())
}
