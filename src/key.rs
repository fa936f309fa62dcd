use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

/// Identity of a bound type.
///
/// A key is derived from the referent type: `Arc<dyn Store>`, `Box<dyn Store>` and
/// `dyn Store` all produce the same key. An optional name distinguishes several
/// bindings of the same type.
#[derive(Clone, Copy)]
pub struct Key {
    id: TypeId,
    type_name: &'static str,
    name: Option<&'static str>,
}

impl Key {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            name: None,
        }
    }

    pub fn named<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::of::<T>().with_name(name)
    }

    /// Key of the type behind a pointer type.
    pub fn of_pointer<P: Pointer>() -> Self {
        Self::of::<P::Target>()
    }

    /// Key of the type behind a pointer value.
    pub fn from_pointer<P: Pointer>(_pointer: &P) -> Self {
        Self::of_pointer::<P>()
    }

    pub fn with_name(self, name: &'static str) -> Self {
        Self {
            name: Some(name),
            ..self
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            None => f.write_str(self.type_name),
            Some(name) => write!(f, "{} ({:?})", self.type_name, name),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({self})")
    }
}

/// Pointer types whose key collapses onto the pointee.
pub trait Pointer {
    type Target: ?Sized + 'static;
}

impl<T: ?Sized + 'static> Pointer for Arc<T> {
    type Target = T;
}

impl<T: ?Sized + 'static> Pointer for Box<T> {
    type Target = T;
}

impl<T: ?Sized + 'static> Pointer for Rc<T> {
    type Target = T;
}

impl<'a, T: ?Sized + 'static> Pointer for &'a T {
    type Target = T;
}
