//! Named event emission
//!
//! An [`EventEmitter`] delivers each emitted [`AuthEvent`] to synchronous
//! listeners (registered per event name or for every event) and to async
//! consumers through a broadcast subscription. Events emitted before a
//! listener registers are not replayed.

use crate::types::JsonValue;
use std::fmt;
use std::sync::{Arc, RwLock, Weak};
use tokio::sync::broadcast;
use tracing::debug;

/// Default capacity of the broadcast channel
///
/// A subscriber that falls more than this many events behind receives
/// `RecvError::Lagged` and misses the oldest events.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// A named event with its argument list
#[derive(Debug, Clone, PartialEq)]
pub struct AuthEvent {
    /// Event name
    pub name: String,
    /// Positional event arguments
    pub args: Vec<JsonValue>,
}

impl AuthEvent {
    /// Create a new event
    pub fn new(name: impl Into<String>, args: Vec<JsonValue>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

type Listener = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

struct Registration {
    /// `None` listens to every event
    name: Option<String>,
    listener: Listener,
    /// Forwarding target; the registration is pruned once it is dropped
    target: Option<Weak<Inner>>,
}

impl Registration {
    fn is_live(&self) -> bool {
        self.target.as_ref().map_or(true, |t| t.strong_count() > 0)
    }
}

struct Inner {
    listeners: RwLock<Vec<Registration>>,
    sender: broadcast::Sender<AuthEvent>,
}

/// Cloneable handle to a shared event channel
#[derive(Clone)]
pub struct EventEmitter {
    inner: Arc<Inner>,
}

impl EventEmitter {
    /// Create an emitter with the default broadcast capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create an emitter whose broadcast channel buffers `capacity` events
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                listeners: RwLock::new(Vec::new()),
                sender,
            }),
        }
    }

    /// Register a listener for one event name
    pub fn on<F>(&self, name: impl Into<String>, listener: F)
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        self.register(Some(name.into()), Arc::new(listener), None);
    }

    /// Register a listener for every event
    pub fn on_any<F>(&self, listener: F)
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(listener), None);
    }

    fn register(&self, name: Option<String>, listener: Listener, target: Option<Weak<Inner>>) {
        let mut listeners = self
            .inner
            .listeners
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        listeners.retain(Registration::is_live);
        listeners.push(Registration {
            name,
            listener,
            target,
        });
    }

    /// Drop forwarding registrations whose target is gone
    fn prune(&self) {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .retain(Registration::is_live);
    }

    /// Subscribe to all future events as an async stream of messages
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.sender.subscribe()
    }

    /// Emit an event by name
    pub fn emit(&self, name: impl Into<String>, args: Vec<JsonValue>) {
        self.emit_event(AuthEvent::new(name, args));
    }

    /// Emit an already-built event
    pub fn emit_event(&self, event: AuthEvent) {
        // Snapshot so listeners may register further listeners without deadlocking.
        let (listeners, stale) = {
            let registrations = self
                .inner
                .listeners
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let listeners: Vec<Listener> = registrations
                .iter()
                .filter(|r| r.is_live())
                .filter(|r| r.name.as_deref().map_or(true, |n| n == event.name))
                .map(|r| r.listener.clone())
                .collect();
            let stale = registrations.iter().any(|r| !r.is_live());
            (listeners, stale)
        };

        for listener in listeners {
            listener(&event);
        }

        if stale {
            self.prune();
        }

        // No subscribers is not an error.
        let _ = self.inner.sender.send(event);
    }

    /// Number of registered synchronous listeners
    ///
    /// Forwarding registrations whose target has been dropped are not counted.
    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|r| r.is_live())
            .count()
    }

    /// Re-emit every event from this emitter on `target`, unchanged
    ///
    /// Forwarding holds only a weak reference to `target`. Once the target has
    /// been dropped the registration is removed on the next emit or register.
    pub fn forward_to(&self, target: &EventEmitter) {
        let target: Weak<Inner> = Arc::downgrade(&target.inner);
        let weak = target.clone();
        let listener: Listener = Arc::new(move |event: &AuthEvent| {
            if let Some(inner) = weak.upgrade() {
                EventEmitter { inner }.emit_event(event.clone());
            }
        });
        self.register(None, listener, Some(target));
        debug!("Forwarding events to owning SDK instance");
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listener_count())
            .field("subscribers", &self.inner.sender.receiver_count())
            .finish()
    }
}
