//! Callback-based event delivery

use crate::event::ReaderEvent;

/// A type that can consume events of type `T`
///
/// Implemented for closures, so a plain `FnMut` can be registered
/// without ceremony.
pub trait EventHandler<T>: Send {
    /// Handle one event
    fn handle(&mut self, event: T);
}

impl<T, F> EventHandler<T> for F
where
    F: FnMut(T) + Send,
{
    fn handle(&mut self, event: T) {
        self(event)
    }
}

/// Fan-out of one event stream to multiple handlers
#[allow(missing_debug_implementations)]
pub struct EventDispatcher<T> {
    handlers: Vec<Box<dyn EventHandler<T> + Send>>,
}

impl<T> EventDispatcher<T> {
    /// Create an empty dispatcher
    pub const fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Add a handler
    pub fn add_handler<H>(&mut self, handler: H)
    where
        H: EventHandler<T> + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Deliver an event to every handler
    pub fn dispatch(&mut self, event: T)
    where
        T: Clone,
    {
        for handler in &mut self.handlers {
            handler.handle(event.clone());
        }
    }

    /// Remove all handlers
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl<T> Default for EventDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatcher for reader events
pub type ReaderEventDispatcher = EventDispatcher<ReaderEvent>;
