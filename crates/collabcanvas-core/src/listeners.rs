//! Scoped registration of global pointer listeners.
//!
//! A drag session (marquee, resize, draw) needs pointer-move and pointer-up
//! events even after the pointer leaves the element that started it. The host
//! routes window-level pointer events to the core only while the registry has
//! an active registration. Registrations are owned by [`ListenerGuard`]s, which
//! release them on drop, so every exit path of a session releases its listeners.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// The session kind that owns a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    Marquee,
    Resize,
    Draw,
}

/// Global events a registration listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalListener {
    PointerMove,
    PointerUp,
}

/// Both global pointer listeners a drag session needs.
pub const DRAG_LISTENERS: [GlobalListener; 2] = [GlobalListener::PointerMove, GlobalListener::PointerUp];

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    active: BTreeMap<u64, ListenerScope>,
}

/// Shared, single-threaded listener registry.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the drag listeners for a session.
    pub fn acquire(&self, scope: ListenerScope) -> ListenerGuard {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.active.insert(id, scope);
            id
        };
        log::trace!("Registered global pointer listeners #{id} for {scope:?}");
        ListenerGuard {
            id,
            scope,
            inner: Rc::clone(&self.inner),
        }
    }

    /// Whether any global pointer listener is registered.
    pub fn is_listening(&self) -> bool {
        !self.inner.borrow().active.is_empty()
    }

    /// Number of live registrations.
    pub fn active_count(&self) -> usize {
        self.inner.borrow().active.len()
    }

    /// Scopes of all live registrations, oldest first.
    pub fn active_scopes(&self) -> Vec<ListenerScope> {
        self.inner.borrow().active.values().copied().collect()
    }

    /// Whether a given global event should be routed to the core.
    pub fn wants(&self, listener: GlobalListener) -> bool {
        DRAG_LISTENERS.contains(&listener) && self.is_listening()
    }
}

/// Owns one registration; dropping it deregisters.
#[derive(Debug)]
pub struct ListenerGuard {
    id: u64,
    scope: ListenerScope,
    inner: Rc<RefCell<RegistryInner>>,
}

impl ListenerGuard {
    pub fn scope(&self) -> ListenerScope {
        self.scope
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if self.inner.borrow_mut().active.remove(&self.id).is_some() {
            log::trace!("Released global pointer listeners #{} for {:?}", self.id, self.scope);
        }
    }
}
