//! Route change notification.
//!
//! Viewers implement [`RouteListener`] and subscribe to a [`RouteBook`]. The
//! book remembers the last published state of every route and only emits an
//! event when that state actually changes.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::route::{RouteDescriptor, RouteId};

/// Callbacks invoked when a known route changes.
///
/// All methods default to doing nothing so listeners only implement what
/// they care about.
pub trait RouteListener: Send + Sync {
    fn on_route_created(&self, _route: &RouteDescriptor) {}

    /// Same route identity with a different course or distance.
    fn on_route_updated(&self, _route: &RouteDescriptor) {}

    fn on_route_deleted(&self, _route: &RouteDescriptor) {}
}

/// What a [`RouteBook::publish`] call changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteChange {
    Created,
    Updated,
    Unchanged,
}

/// Known routes plus the listeners interested in them.
///
/// Events are delivered synchronously, once per listener, in registration
/// order.
#[derive(Default)]
pub struct RouteBook {
    listeners: Vec<Arc<dyn RouteListener>>,
    // Creation order is preserved; route counts stay small.
    routes: Vec<RouteDescriptor>,
}

impl RouteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all future events.
    pub fn subscribe(&mut self, listener: Arc<dyn RouteListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Record `route`, emitting created or updated if its state is new.
    ///
    /// A route identical to the stored one, name aside, emits nothing.
    pub fn publish(&mut self, route: RouteDescriptor) -> RouteChange {
        match self.position(route.id) {
            None => {
                debug!(route = %route.id, "route created");
                self.emit(|listener| listener.on_route_created(&route));
                self.routes.push(route);
                RouteChange::Created
            }
            Some(slot) if self.routes[slot].same_course(&route) => {
                self.routes[slot].name = route.name;
                RouteChange::Unchanged
            }
            Some(slot) => {
                debug!(route = %route.id, "route updated");
                self.emit(|listener| listener.on_route_updated(&route));
                self.routes[slot] = route;
                RouteChange::Updated
            }
        }
    }

    /// Forget a route, emitting deleted if it was known.
    pub fn remove(&mut self, id: RouteId) -> Option<RouteDescriptor> {
        let slot = self.position(id)?;
        let route = self.routes.remove(slot);
        debug!(route = %route.id, "route deleted");
        self.emit(|listener| listener.on_route_deleted(&route));
        Some(route)
    }

    /// Forget every route, emitting deleted for each in creation order.
    pub fn clear(&mut self) {
        for route in std::mem::take(&mut self.routes) {
            self.emit(|listener| listener.on_route_deleted(&route));
        }
    }

    pub fn get(&self, id: RouteId) -> Option<&RouteDescriptor> {
        self.position(id).map(|slot| &self.routes[slot])
    }

    /// Known routes in creation order.
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn position(&self, id: RouteId) -> Option<usize> {
        self.routes.iter().position(|route| route.id == id)
    }

    fn emit(&self, event: impl Fn(&dyn RouteListener)) {
        for listener in &self.listeners {
            event(listener.as_ref());
        }
    }
}

impl fmt::Debug for RouteBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBook")
            .field("listeners", &self.listeners.len())
            .field("routes", &self.routes)
            .finish()
    }
}
