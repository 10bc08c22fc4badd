use std::sync::Arc;

use crate::body::{Basic, BodyBuf, Reader};
use crate::call::{CallFrame, Slot, SlotClass};
use crate::error::{Error, ErrorKind, Result};
use crate::object_path::ObjectPath;
use crate::proto::Type;
use crate::proxy::Proxy;
use crate::signature::Signature;
use crate::value::{HostClass, Value};

use super::{Arg, Parent};

fn detached(signature: &str) -> Result<Arg> {
    Arg::from_str(signature, None, Parent::Detached)
}

fn round_trip(signature: &str, value: Value) -> Result<Value> {
    let arg = detached(signature)?;
    let mut body = BodyBuf::new();
    arg.marshal(&value, &mut body.writer())?;
    assert_eq!(body.signature(), signature);
    arg.unmarshal(&mut body.reader())
}

#[test]
fn reject_invalid_signature() {
    assert!(detached("k").is_err());
    assert!(detached("a{vs}").is_err());
    assert!(detached("").is_err());
}

#[test]
fn reject_multi_type_signature() {
    assert!(detached("iiu").is_err());
    assert!(detached("ii").is_err());
}

#[test]
fn signature_round_trip() -> Result<()> {
    let signatures = [
        "y", "b", "n", "q", "i", "u", "x", "t", "d", "s", "o", "g", "as", "(iiu)", "v",
        "a{su}", "aav", "(ua{s(iu)}bv)",
    ];

    for signature in signatures {
        let arg = detached(signature)?;
        assert_eq!(arg.signature().as_str(), signature);
    }

    Ok(())
}

#[test]
fn host_class_mapping() -> Result<()> {
    for signature in ["y", "b", "n", "q", "i", "u", "x", "t", "d"] {
        assert_eq!(detached(signature)?.host_class(), Some(HostClass::Number));
    }

    assert_eq!(detached("s")?.host_class(), Some(HostClass::String));
    assert_eq!(detached("o")?.host_class(), Some(HostClass::Proxy));
    assert_eq!(detached("g")?.host_class(), Some(HostClass::Signature));
    assert_eq!(detached("ai")?.host_class(), Some(HostClass::Sequence));
    assert_eq!(detached("(iu)")?.host_class(), Some(HostClass::Sequence));
    assert_eq!(detached("a{su}")?.host_class(), Some(HostClass::Mapping));
    assert_eq!(detached("v")?.host_class(), None);
    Ok(())
}

#[test]
fn dictionary_detection() -> Result<()> {
    let arg = detached("a{su}")?;

    assert!(arg.is_dictionary());
    assert_eq!(arg.host_class(), Some(HostClass::Mapping));
    assert_eq!(arg.children().len(), 1);

    let entry = &arg.children()[0];
    assert_eq!(entry.dbus_type(), Type::DICT_ENTRY);

    // A standalone dict entry has no host class and keeps its braced
    // signature.
    assert_eq!(entry.host_class(), None);
    assert_eq!(entry.signature().as_str(), "{su}");
    Ok(())
}

#[test]
fn plain_array_is_not_dictionary() -> Result<()> {
    let arg = detached("aai")?;
    assert!(!arg.is_dictionary());
    assert_eq!(arg.host_class(), Some(HostClass::Sequence));
    Ok(())
}

#[test]
fn box_identity_on_scalars() -> Result<()> {
    assert_eq!(detached("y")?.box_value(Basic::Byte(255))?, Value::Byte(255));
    assert_eq!(detached("b")?.box_value(Basic::Bool(true))?, Value::Bool(true));
    assert_eq!(
        detached("n")?.box_value(Basic::Int16(i16::MIN))?,
        Value::Int16(i16::MIN)
    );
    assert_eq!(
        detached("x")?.box_value(Basic::Int64(i64::MAX))?,
        Value::Int64(i64::MAX)
    );
    assert_eq!(
        detached("t")?.box_value(Basic::Uint64(u64::MAX))?,
        Value::Uint64(u64::MAX)
    );
    assert_eq!(
        detached("d")?.box_value(Basic::Double(2.5))?,
        Value::Double(2.5)
    );
    assert_eq!(
        detached("s")?.box_value(Basic::Str("hi"))?,
        Value::String(String::from("hi"))
    );
    Ok(())
}

#[test]
fn signature_boxing() -> Result<()> {
    let value = detached("g")?.box_value(Basic::Sig("(ss)"))?;

    let Value::Signature(arg) = value else {
        panic!("expected signature value: {value:?}");
    };

    assert_eq!(arg.signature().as_str(), "(ss)");
    assert!(arg.name().is_none());
    assert!(arg.proxy_parent().is_none());
    Ok(())
}

#[test]
fn scalar_round_trips() -> Result<()> {
    assert_eq!(round_trip("i", Value::Int32(42))?, Value::Int32(42));
    assert_eq!(round_trip("y", Value::Byte(0))?, Value::Byte(0));
    assert_eq!(round_trip("b", Value::Bool(true))?, Value::Bool(true));
    assert_eq!(
        round_trip("d", Value::Double(-0.25))?,
        Value::Double(-0.25)
    );
    assert_eq!(
        round_trip("s", Value::from("hello world"))?,
        Value::from("hello world")
    );
    Ok(())
}

#[test]
fn integer_coercion() -> Result<()> {
    // Integer-like values coerce across widths when they fit.
    assert_eq!(round_trip("x", Value::Int32(7))?, Value::Int64(7));
    assert_eq!(round_trip("y", Value::Uint32(255))?, Value::Byte(255));
    assert!(round_trip("y", Value::Uint32(256)).is_err());
    assert!(round_trip("i", Value::from("7")).is_err());

    // Doubles accept any integer width, lossily for the extremes.
    assert_eq!(round_trip("d", Value::Int32(-3))?, Value::Double(-3.0));
    assert_eq!(
        round_trip("d", Value::Uint64(u64::MAX))?,
        Value::Double(u64::MAX as f64)
    );
    Ok(())
}

#[test]
fn array_round_trip() -> Result<()> {
    let value = Value::Array(vec![Value::Uint32(1), Value::Uint32(2), Value::Uint32(3)]);
    assert_eq!(round_trip("au", value.clone())?, value);

    let empty = Value::Array(Vec::new());
    assert_eq!(round_trip("au", empty.clone())?, empty);
    Ok(())
}

#[test]
fn struct_round_trip() -> Result<()> {
    let value = Value::Array(vec![
        Value::Int32(-5),
        Value::Uint32(7),
        Value::from("name"),
    ]);

    assert_eq!(round_trip("(ius)", value.clone())?, value);
    Ok(())
}

#[test]
fn struct_field_count_is_checked() -> Result<()> {
    let arg = detached("(iu)")?;
    let mut body = BodyBuf::new();

    let err = arg
        .marshal(&Value::Array(vec![Value::Int32(1)]), &mut body.writer())
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::StructFieldCount { .. }));
    Ok(())
}

#[test]
fn nested_round_trip() -> Result<()> {
    let value = Value::Array(vec![
        Value::Uint32(9),
        Value::Map(vec![(
            Value::from("k"),
            Value::Array(vec![Value::Int32(1), Value::Uint32(2)]),
        )]),
        Value::Bool(false),
        Value::from("inside a variant"),
    ]);

    assert_eq!(round_trip("(ua{s(iu)}bv)", value.clone())?, value);
    Ok(())
}

#[test]
fn dictionary_round_trip() -> Result<()> {
    let value = Value::Map(vec![
        (Value::from("a"), Value::Uint32(1)),
        (Value::from("b"), Value::Uint32(2)),
    ]);

    assert_eq!(round_trip("a{su}", value.clone())?, value);
    Ok(())
}

#[test]
fn dictionary_of_variants_round_trip() -> Result<()> {
    let value = Value::Map(vec![
        (Value::from("number"), Value::Int32(1)),
        (Value::from("text"), Value::from("two")),
    ]);

    assert_eq!(round_trip("a{sv}", value.clone())?, value);
    Ok(())
}

#[test]
fn dictionary_keeps_first_duplicate_key() -> Result<()> {
    let value = Value::Map(vec![
        (Value::from("a"), Value::Uint32(1)),
        (Value::from("a"), Value::Uint32(2)),
        (Value::from("b"), Value::Uint32(3)),
    ]);

    let expected = Value::Map(vec![
        (Value::from("a"), Value::Uint32(1)),
        (Value::from("b"), Value::Uint32(3)),
    ]);

    assert_eq!(round_trip("a{su}", value)?, expected);
    Ok(())
}

#[test]
fn variant_dispatch() -> Result<()> {
    let arg = detached("v")?;
    assert!(arg.children().is_empty());

    let mut body = BodyBuf::new();
    arg.marshal(&Value::Int32(7), &mut body.writer())?;

    assert_eq!(arg.unmarshal(&mut body.reader())?, Value::Int32(7));
    assert!(arg.children().is_empty());
    Ok(())
}

#[test]
fn variant_of_containers() -> Result<()> {
    let value = Value::Array(vec![Value::from("x"), Value::from("y")]);
    assert_eq!(round_trip("v", value.clone())?, value);

    // Mixed element types fall back to an array of variants.
    let mixed = Value::Array(vec![Value::Int32(1), Value::from("two")]);
    assert_eq!(round_trip("v", mixed.clone())?, mixed);
    Ok(())
}

#[test]
fn variant_of_null_is_rejected() -> Result<()> {
    let arg = detached("v")?;
    let mut body = BodyBuf::new();

    let err = arg.marshal(&Value::Null, &mut body.writer()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Unrepresentable { .. }));
    Ok(())
}

#[test]
fn null_marker_substitution() -> Result<()> {
    // An array of one variant whose contained signature is empty: there is
    // no value to read, and the null marker stands in for the element
    // rather than it being dropped.
    let data = [
        2u32.to_ne_bytes().as_slice(),
        // Empty signature plus its NUL terminator.
        &[0, 0],
    ]
    .concat();

    let arg = detached("av")?;
    let mut reader = Reader::new(&data, Signature::new(b"av")?);

    let value = arg.unmarshal(&mut reader)?;
    assert_eq!(value, Value::Array(vec![Value::Null]));

    let Value::Array(items) = value else {
        unreachable!()
    };

    assert!(items[0].is_null());
    Ok(())
}

#[test]
fn open_close_balance_on_marshal_failure() -> Result<()> {
    let arg = detached("aai")?;
    let mut body = BodyBuf::new();

    // The inner array holds a string, which cannot unbox at "i"; both the
    // outer and inner containers must still close.
    let value = Value::Array(vec![Value::Array(vec![Value::from("oops")])]);

    assert!(arg.marshal(&value, &mut body.writer()).is_err());
    assert_eq!(body.opened, 2);
    assert_eq!(body.closed, 2);
    Ok(())
}

#[test]
fn wire_type_mismatch_on_unmarshal() -> Result<()> {
    let mut body = BodyBuf::new();
    detached("i")?.marshal(&Value::Int32(1), &mut body.writer())?;

    let err = detached("u")?.unmarshal(&mut body.reader()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::WireTypeMismatch { .. }));
    Ok(())
}

#[test]
fn element_type_mismatch_on_unmarshal() -> Result<()> {
    let mut body = BodyBuf::new();
    detached("ai")?.marshal(
        &Value::Array(vec![Value::Int32(1)]),
        &mut body.writer(),
    )?;

    let err = detached("au")?.unmarshal(&mut body.reader()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::WireTypeMismatch { .. }));
    Ok(())
}

fn test_proxy() -> Arc<Proxy> {
    Arc::new(Proxy::new(
        "org.example.Service",
        "unix:path=/run/bus",
        ObjectPath::new_const(b"/org/example"),
    ))
}

#[test]
fn object_path_boxing() -> Result<()> {
    let proxy = test_proxy();
    let arg = Arg::from_str("o", None, Parent::proxy(&proxy))?;

    let value = arg.box_value(Basic::Path("/"))?;

    let Value::Proxy(sibling) = value else {
        panic!("expected proxy value: {value:?}");
    };

    assert_eq!(sibling.service(), "org.example.Service");
    assert_eq!(sibling.endpoint(), "unix:path=/run/bus");
    assert_eq!(sibling.path(), "/");
    Ok(())
}

#[test]
fn object_path_round_trip() -> Result<()> {
    let proxy = test_proxy();
    let arg = Arg::from_str("o", None, Parent::proxy(&proxy))?;

    let other = Arc::new(proxy.with_path(ObjectPath::new_const(b"/org/example/child")));

    let mut body = BodyBuf::new();
    arg.marshal(&Value::Proxy(other.clone()), &mut body.writer())?;

    let value = arg.unmarshal(&mut body.reader())?;
    assert_eq!(value, Value::Proxy(other));
    Ok(())
}

#[test]
fn object_path_scope_is_enforced() -> Result<()> {
    let proxy = test_proxy();
    let arg = Arg::from_str("o", None, Parent::proxy(&proxy))?;

    let foreign = Arc::new(Proxy::new(
        "org.example.Other",
        "unix:path=/run/bus",
        ObjectPath::ROOT,
    ));

    let err = arg.unbox(&Value::Proxy(foreign)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ProxyOutOfScope));

    // Without an enclosing proxy the path cannot be scoped at all.
    let unscoped = detached("o")?;
    let err = unscoped.unbox(&Value::Proxy(test_proxy())).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingProxy));
    Ok(())
}

#[test]
fn variant_keeps_proxy_scope() -> Result<()> {
    let proxy = test_proxy();
    let arg = Arg::from_str("v", None, Parent::proxy(&proxy))?;

    let mut body = BodyBuf::new();
    arg.marshal(&Value::Proxy(proxy.clone()), &mut body.writer())?;

    let value = arg.unmarshal(&mut body.reader())?;

    let Value::Proxy(read) = value else {
        panic!("expected proxy value: {value:?}");
    };

    assert!(read.has_same_scope_as(&proxy));
    assert_eq!(read.path(), "/org/example");
    Ok(())
}

struct TestFrame {
    args: Vec<(SlotClass, Value)>,
    ret: (SlotClass, Value),
}

impl CallFrame for TestFrame {
    fn slot_class(&self, slot: Slot) -> SlotClass {
        match slot {
            Slot::Arg(n) => self.args[n].0,
            Slot::Ret => self.ret.0,
        }
    }

    fn load(&self, slot: Slot) -> Result<Value> {
        match slot {
            Slot::Arg(n) => match self.args.get(n) {
                Some((_, value)) => Ok(value.clone()),
                None => Err(Error::invalid_slot(slot)),
            },
            Slot::Ret => Ok(self.ret.1.clone()),
        }
    }

    fn store(&mut self, slot: Slot, value: Value) -> Result<()> {
        match slot {
            Slot::Arg(n) => match self.args.get_mut(n) {
                Some(arg) => arg.1 = value,
                None => return Err(Error::invalid_slot(slot)),
            },
            Slot::Ret => self.ret.1 = value,
        }

        Ok(())
    }
}

#[test]
fn call_frame_bridge() -> Result<()> {
    let arg = detached("i")?;

    let frame = TestFrame {
        args: vec![(SlotClass::Int32, Value::Int32(42))],
        ret: (SlotClass::Object, Value::Null),
    };

    let mut body = BodyBuf::new();
    arg.marshal_from(&frame, Slot::Arg(0), &mut body.writer(), false)?;

    let mut frame = frame;
    arg.unmarshal_into(&mut body.reader(), &mut frame, Slot::Ret, true)?;
    assert_eq!(frame.ret.1, Value::Int32(42));
    Ok(())
}

#[test]
fn call_frame_slot_class_is_asserted() -> Result<()> {
    let arg = detached("i")?;

    let mut frame = TestFrame {
        args: vec![(SlotClass::Str, Value::from("nope"))],
        ret: (SlotClass::Int32, Value::Null),
    };

    let mut body = BodyBuf::new();

    // Boxing disabled: the slot must declare the raw class of the type.
    let err = arg
        .marshal_from(&frame, Slot::Arg(0), &mut body.writer(), false)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::HostTypeMismatch { .. }));

    // Boxing enabled: the slot must declare the generic object class.
    detached("i")?.marshal(&Value::Int32(3), &mut body.writer())?;

    let err = arg
        .unmarshal_into(&mut body.reader(), &mut frame, Slot::Ret, true)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::HostTypeMismatch { .. }));
    Ok(())
}

#[test]
fn containers_bridge_boxed() -> Result<()> {
    let arg = detached("au")?;

    let mut frame = TestFrame {
        args: vec![(
            SlotClass::Object,
            Value::Array(vec![Value::Uint32(1), Value::Uint32(2)]),
        )],
        ret: (SlotClass::Object, Value::Null),
    };

    let mut body = BodyBuf::new();
    arg.marshal_from(&frame, Slot::Arg(0), &mut body.writer(), true)?;
    arg.unmarshal_into(&mut body.reader(), &mut frame, Slot::Ret, true)?;

    assert_eq!(
        frame.ret.1,
        Value::Array(vec![Value::Uint32(1), Value::Uint32(2)])
    );
    Ok(())
}

#[test]
fn marshalling_null_scalar_is_rejected() -> Result<()> {
    let err = round_trip("i", Value::Null).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Unrepresentable { .. }));
    Ok(())
}

#[test]
fn multiple_arguments_accumulate_signature() -> Result<()> {
    let mut body = BodyBuf::new();

    detached("i")?.marshal(&Value::Int32(1), &mut body.writer())?;
    detached("s")?.marshal(&Value::from("two"), &mut body.writer())?;

    assert_eq!(body.signature(), "is");

    let mut reader = body.reader();
    assert_eq!(detached("i")?.unmarshal(&mut reader)?, Value::Int32(1));
    assert_eq!(detached("s")?.unmarshal(&mut reader)?, Value::from("two"));
    Ok(())
}
