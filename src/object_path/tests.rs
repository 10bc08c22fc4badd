use super::ObjectPath;

macro_rules! test {
    ($input:expr, $expected:expr) => {{
        assert_eq!(
            ObjectPath::new($input).is_ok(),
            $expected,
            "{:?}",
            ::std::str::from_utf8($input)
        );
    }};
}

#[test]
fn object_path_tests() {
    test!(b"/", true);
    test!(b"/org", true);
    test!(b"/org/freedesktop/DBus", true);
    test!(b"/com/example/_1", true);
    test!(b"/0", true);
    test!(b"", false);
    test!(b"org", false);
    test!(b"/org/", false);
    test!(b"//org", false);
    test!(b"/org//freedesktop", false);
    test!(b"/org/free-desktop", false);
    test!(b"/org/free desktop", false);
    test!(b"/\xc3\xa9", false);
}

#[test]
fn to_owned_round_trip() {
    let path = ObjectPath::new("/org/freedesktop/DBus").unwrap();
    let owned = path.to_owned();
    assert_eq!(*path, owned);
    assert_eq!(owned.as_str(), "/org/freedesktop/DBus");
}
