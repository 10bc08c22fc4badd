//! D-Bus argument trees and wire marshalling for dynamically typed values.
//!
//! This crate parses D-Bus type signatures into trees of typed [`Arg`]
//! descriptors and uses them to move dynamically typed [`Value`]s across the
//! D-Bus wire format: marshalling writes a value through a [`Writer`],
//! unmarshalling reads one back through a [`Reader`]. Object path arguments
//! resolve against the [`Proxy`] enclosing their tree, so paths box to live
//! proxy handles rather than orphan strings.
//!
//! The crate performs no I/O of its own; a transport hands it message
//! bodies and takes them away again.
//!
//! # Examples
//!
//! ```
//! use dbus_marshal::{Arg, BodyBuf, Parent, Value};
//!
//! let arg = Arg::from_str("a{su}", None, Parent::Detached)?;
//!
//! let mut body = BodyBuf::new();
//!
//! arg.marshal(
//!     &Value::Map(vec![(Value::from("answer"), Value::from(42u32))]),
//!     &mut body.writer(),
//! )?;
//!
//! assert_eq!(body.signature(), "a{su}");
//!
//! let map = arg.unmarshal(&mut body.reader())?;
//! assert_eq!(
//!     map,
//!     Value::Map(vec![(Value::from("answer"), Value::from(42u32))]),
//! );
//! # Ok::<_, dbus_marshal::Error>(())
//! ```

#[doc(inline)]
pub use self::error::{Error, Result};
mod error;

#[doc(inline)]
pub use self::proto::Type;
mod proto;

#[doc(inline)]
pub use self::signature::{Iter, OwnedSignature, Signature, SignatureError, Token};
mod signature;

#[doc(inline)]
pub use self::object_path::{ObjectPath, ObjectPathError, OwnedObjectPath};
mod object_path;

#[doc(inline)]
pub use self::value::{HostClass, Value};
mod value;

#[doc(inline)]
pub use self::proxy::Proxy;
mod proxy;

#[doc(inline)]
pub use self::arg::{Arg, Parent};
mod arg;

#[doc(inline)]
pub use self::body::{Basic, BodyBuf, Reader, Writer};
mod body;

#[doc(inline)]
pub use self::call::{CallFrame, Slot, SlotClass};
mod call;
