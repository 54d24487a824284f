//! # Host Objects and Resource Handles
//!
//! Values that the dictionary stores but does not understand: arbitrary
//! host objects (checked by class name) and external resources (checked by
//! resource kind, compared by identity).
//!
//! Host objects opt into text and boolean conversion through the
//! [`HostObject`] capability methods; the container never guesses at them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Capability interface for host objects held as dictionary values.
pub trait HostObject: fmt::Debug + Send + Sync + 'static {
    /// The concrete class name used for `instanceof` checks.
    fn class_name(&self) -> &str;

    /// Whether this object satisfies an `instanceof` constraint.
    ///
    /// The default is exact class-name equality. Implementors modelling a
    /// type hierarchy override this to accept their ancestors too.
    fn instance_of(&self, class: &str) -> bool {
        self.class_name() == class
    }

    /// Textual form, for objects that have one.
    fn to_text(&self) -> Option<String> {
        None
    }

    /// Boolean form, for objects that have one.
    fn to_bool(&self) -> Option<bool> {
        None
    }
}

/// A shared handle to a host object.
///
/// Cloning the handle does not clone the object. Two handles are equal
/// only when they point at the same object.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn HostObject>);

impl ObjectRef {
    pub fn new<T: HostObject>(object: T) -> Self {
        Self(Arc::new(object))
    }

    pub fn from_arc(object: Arc<dyn HostObject>) -> Self {
        Self(object)
    }

    pub fn get(&self) -> &dyn HostObject {
        self.0.as_ref()
    }

    pub fn class_name(&self) -> &str {
        self.0.class_name()
    }

    pub fn instance_of(&self, class: &str) -> bool {
        self.0.instance_of(class)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// An opaque, identity-compared handle to an external resource.
///
/// The dictionary never opens, closes or inspects the resource; the kind
/// label (e.g. `"stream"`) is the only property validators look at.
#[derive(Clone)]
pub struct ResourceHandle {
    id: Uuid,
    kind: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ResourceHandle {
    pub fn new<T: Any + Send + Sync>(kind: impl Into<String>, resource: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: Arc::from(kind.into()),
            inner: Arc::new(resource),
        }
    }

    /// Resource kind label.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Borrow the wrapped resource as `T`, if that is its type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

impl PartialEq for ResourceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
