use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::Result;
use crate::proto::Type;
use crate::proxy::Proxy;
use crate::signature::{Iter, OwnedSignature, Signature, SignatureError, SignatureErrorKind, Token};
use crate::value::HostClass;

/// A non-owning link from an argument to whatever encloses it.
///
/// The link never keeps the enclosing object alive; it is only walked
/// upwards to resolve the proxy that object path arguments are scoped to.
#[derive(Clone, Default)]
pub enum Parent {
    /// Not attached to anything that resolves to a proxy.
    #[default]
    Detached,
    /// Attached beneath a proxy object.
    Proxy(Weak<Proxy>),
}

impl Parent {
    /// Construct a parent link to the given proxy.
    pub fn proxy(proxy: &Arc<Proxy>) -> Self {
        Self::Proxy(Arc::downgrade(proxy))
    }
}

impl From<&Arc<Proxy>> for Parent {
    #[inline]
    fn from(proxy: &Arc<Proxy>) -> Self {
        Self::proxy(proxy)
    }
}

impl fmt::Debug for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parent::Detached => f.write_str("Detached"),
            Parent::Proxy(..) => f.write_str("Proxy(..)"),
        }
    }
}

/// The kind of an argument, assigned at construction from the signature.
#[derive(Debug)]
pub(crate) enum ArgKind {
    Scalar,
    Array {
        /// Promoted when the element is a dict entry; the array then boxes
        /// to a mapping instead of a sequence.
        dictionary: bool,
    },
    Struct,
    DictEntry,
    Variant,
}

/// One complete D-Bus type at some position in a method or signal signature.
///
/// An argument knows how to box and unbox values of its type and drives
/// marshalling and unmarshalling of them through a message iterator.
///
/// # Examples
///
/// ```
/// use dbus_marshal::{Arg, HostClass, Parent};
///
/// let arg = Arg::from_str("a{s(iu)}", Some("properties"), Parent::Detached)?;
///
/// assert_eq!(arg.signature(), "a{s(iu)}");
/// assert_eq!(arg.host_class(), Some(HostClass::Mapping));
/// assert!(arg.is_dictionary());
/// # Ok::<_, dbus_marshal::Error>(())
/// ```
pub struct Arg {
    ty: Type,
    pub(crate) kind: ArgKind,
    name: Option<Box<str>>,
    signature: OwnedSignature,
    pub(crate) children: Vec<Arg>,
    pub(crate) parent: Parent,
}

impl Arg {
    /// Construct an argument from a raw signature string, validating it
    /// first.
    ///
    /// The signature must hold exactly one complete type; multi-type
    /// signatures only occur at the message level.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_marshal::{Arg, Parent};
    ///
    /// assert!(Arg::from_str("(iu)", None, Parent::Detached).is_ok());
    /// assert!(Arg::from_str("k", None, Parent::Detached).is_err());
    /// assert!(Arg::from_str("iiu", None, Parent::Detached).is_err());
    /// ```
    pub fn from_str(signature: &str, name: Option<&str>, parent: Parent) -> Result<Arg> {
        let signature = Signature::new(signature.as_bytes())?;
        Self::from_signature(signature, name, parent)
    }

    /// Construct an argument from a validated signature holding exactly one
    /// complete type.
    pub fn from_signature(signature: &Signature, name: Option<&str>, parent: Parent) -> Result<Arg> {
        if !signature.is_single() {
            return Err(SignatureError::new(SignatureErrorKind::NotSingleCompleteType).into());
        }

        let mut iter = signature.iter();
        Self::from_iter(&mut iter, name, parent)
    }

    /// Construct an argument from the next complete type of a signature
    /// iterator.
    pub fn from_iter(iter: &mut Iter<'_>, name: Option<&str>, parent: Parent) -> Result<Arg> {
        let Some(token) = iter.next() else {
            return Err(SignatureError::new(SignatureErrorKind::NotSingleCompleteType).into());
        };

        Self::from_token(token, name, parent)
    }

    fn from_token(token: Token<'_>, name: Option<&str>, parent: Parent) -> Result<Arg> {
        let arg = match token {
            Token::Basic(signature) => Arg {
                ty: signature.head().unwrap_or(Type::INVALID),
                kind: ArgKind::Scalar,
                name: name.map(Box::from),
                signature: signature.to_owned(),
                children: Vec::new(),
                parent,
            },
            // Recursion is suppressed for variants; the contained type is
            // only discovered once a value is on the wire.
            Token::Variant => Arg {
                ty: Type::VARIANT,
                kind: ArgKind::Variant,
                name: name.map(Box::from),
                signature: Signature::VARIANT.to_owned(),
                children: Vec::new(),
                parent,
            },
            Token::Array(element) => {
                let mut iter = element.iter();
                let child = Self::from_iter(&mut iter, None, parent.clone())?;
                let dictionary = matches!(child.kind, ArgKind::DictEntry);

                let mut bytes = Vec::with_capacity(element.len() + 1);
                bytes.push(b'a');
                bytes.extend_from_slice(element.as_bytes());

                Arg {
                    ty: Type::ARRAY,
                    kind: ArgKind::Array { dictionary },
                    name: name.map(Box::from),
                    // SAFETY: an array marker ahead of a complete type is a
                    // complete type.
                    signature: unsafe { OwnedSignature::from_vec(bytes) },
                    children: vec![child],
                    parent,
                }
            }
            Token::Struct(fields) => {
                let mut children = Vec::new();

                for token in fields.iter() {
                    children.push(Self::from_token(token, None, parent.clone())?);
                }

                let mut bytes = Vec::with_capacity(fields.len() + 2);
                bytes.push(b'(');
                bytes.extend_from_slice(fields.as_bytes());
                bytes.push(b')');

                Arg {
                    ty: Type::STRUCT,
                    kind: ArgKind::Struct,
                    name: name.map(Box::from),
                    // SAFETY: fields were carved out of a validated struct.
                    signature: unsafe { OwnedSignature::from_vec(bytes) },
                    children,
                    parent,
                }
            }
            Token::Dict(key, value) => {
                let key = Self::from_signature(key, None, parent.clone())?;
                let value = Self::from_signature(value, None, parent.clone())?;

                // Keys must be basic types; signature validation already
                // enforces this for signatures that arrive as strings.
                if !key.dbus_type().is_basic() {
                    return Err(
                        SignatureError::new(SignatureErrorKind::DictKeyMustBeBasicType).into()
                    );
                }

                let mut bytes =
                    Vec::with_capacity(key.signature.len() + value.signature.len() + 2);
                bytes.push(b'{');
                bytes.extend_from_slice(key.signature.as_bytes());
                bytes.extend_from_slice(value.signature.as_bytes());
                bytes.push(b'}');

                Arg {
                    ty: Type::DICT_ENTRY,
                    kind: ArgKind::DictEntry,
                    name: name.map(Box::from),
                    // SAFETY: a braced key-value pair keeps the structural
                    // properties of a signature even though it does not
                    // validate outside an array.
                    signature: unsafe { OwnedSignature::from_vec(bytes) },
                    children: vec![key, value],
                    parent,
                }
            }
        };

        Ok(arg)
    }

    /// The D-Bus type code of this argument.
    ///
    /// Structs and dict entries report the reserved binding codes
    /// [`Type::STRUCT`] and [`Type::DICT_ENTRY`].
    #[inline]
    pub fn dbus_type(&self) -> Type {
        self.ty
    }

    /// The signature of this argument.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The name of this argument, if any. Used for diagnostics only.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Test if this argument is a container.
    #[inline]
    pub fn is_container(&self) -> bool {
        !matches!(self.kind, ArgKind::Scalar)
    }

    /// Test if this argument is an array whose element is a dict entry.
    #[inline]
    pub fn is_dictionary(&self) -> bool {
        matches!(self.kind, ArgKind::Array { dictionary: true })
    }

    /// The children of this argument.
    ///
    /// Empty for scalars and for variants; a variant's contained type is
    /// only known on the wire.
    #[inline]
    pub fn children(&self) -> &[Arg] {
        &self.children
    }

    /// The host class values of this argument box to.
    ///
    /// Variants have no class of their own since their contents decide it,
    /// and a dict entry only ever surfaces through its enclosing array.
    pub fn host_class(&self) -> Option<HostClass> {
        match self.kind {
            ArgKind::Scalar => Some(match self.ty {
                Type::STRING => HostClass::String,
                Type::OBJECT_PATH => HostClass::Proxy,
                Type::SIGNATURE => HostClass::Signature,
                _ => HostClass::Number,
            }),
            ArgKind::Array { dictionary: true } => Some(HostClass::Mapping),
            ArgKind::Array { dictionary: false } => Some(HostClass::Sequence),
            ArgKind::Struct => Some(HostClass::Sequence),
            ArgKind::DictEntry => None,
            ArgKind::Variant => None,
        }
    }

    /// Resolve the proxy this argument is scoped to, walking the parent
    /// chain upwards.
    pub fn proxy_parent(&self) -> Option<Arc<Proxy>> {
        match &self.parent {
            Parent::Detached => None,
            Parent::Proxy(proxy) => proxy.upgrade(),
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arg")
            .field("signature", &self.signature)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish()
    }
}
