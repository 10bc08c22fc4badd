use std::fmt;

use crate::object_path::{ObjectPath, OwnedObjectPath};

/// A handle to a remote object, identified by the service it lives in, the
/// endpoint the service is reached over and its object path.
///
/// Object paths are only meaningful within one (service, endpoint) scope;
/// see [`has_same_scope_as`].
///
/// [`has_same_scope_as`]: Proxy::has_same_scope_as
pub struct Proxy {
    service: Box<str>,
    endpoint: Box<str>,
    path: OwnedObjectPath,
}

impl Proxy {
    /// Construct a new proxy.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbus_marshal::{ObjectPath, Proxy};
    ///
    /// let proxy = Proxy::new(
    ///     "org.freedesktop.DBus",
    ///     "unix:path=/run/dbus/system_bus_socket",
    ///     ObjectPath::new_const(b"/org/freedesktop/DBus"),
    /// );
    ///
    /// assert_eq!(proxy.path(), "/org/freedesktop/DBus");
    /// ```
    pub fn new(service: &str, endpoint: &str, path: &ObjectPath) -> Self {
        Self {
            service: service.into(),
            endpoint: endpoint.into(),
            path: path.to_owned(),
        }
    }

    /// The name of the service the proxied object lives in.
    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The endpoint the service is reached over.
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The path of the proxied object.
    #[inline]
    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// Test if two proxies address the same service over the same endpoint.
    pub fn has_same_scope_as(&self, other: &Proxy) -> bool {
        self.service == other.service && self.endpoint == other.endpoint
    }

    /// Construct a sibling proxy at a different path within the same scope.
    pub fn with_path(&self, path: &ObjectPath) -> Proxy {
        Self {
            service: self.service.clone(),
            endpoint: self.endpoint.clone(),
            path: path.to_owned(),
        }
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("service", &self.service)
            .field("endpoint", &self.endpoint)
            .field("path", &self.path)
            .finish()
    }
}
