//! Shared resource handles and lifecycle hooks.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared, mutable handle to a resource.
///
/// The engine is single-threaded, so `Rc<RefCell<_>>` is enough. Two gets
/// of the same cached URL yield handles for which `Rc::ptr_eq` holds.
pub type Handle<R> = Rc<RefCell<R>>;

/// Wrap a resource in a new handle.
pub fn handle<R>(resource: R) -> Handle<R> {
    Rc::new(RefCell::new(resource))
}

/// Kind of a managed resource, used in logs and errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Mesh,
    Shader,
    Texture,
}

impl ResourceKind {
    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Mesh => "mesh",
            ResourceKind::Shader => "shader",
            ResourceKind::Texture => "texture",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A resource that can be stored in a [`ResourceCache`](crate::ResourceCache).
pub trait Resource {
    /// Kind reported in logs.
    const KIND: ResourceKind;

    /// Release any backing handle. Called exactly once when the last cache
    /// reference is released.
    fn destroy(&mut self) {}
}

/// Progress of a destination-style load.
///
/// Asynchronous failures land here rather than in a returned error, since
/// the call that started the load has already returned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet, or data was assigned directly.
    #[default]
    Unloaded,
    /// A load is in flight.
    Pending,
    /// Data is in place.
    Ready,
    /// The load failed with the given message.
    Failed(String),
}

impl LoadState {
    /// True once data is in place.
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }
}
