//! Synchronous publish/subscribe primitive.
//!
//! Handlers are grouped by event name and invoked in registration order.
//! Dispatch is not isolated: the first handler that returns an error stops
//! the remaining handlers for that publish call, and the error is handed
//! back to the publisher.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Error type a handler may fail with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a single handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

type Handler<E> = Box<dyn FnMut(&E) -> HandlerResult + Send>;

/// Errors returned by [`EventBus::publish`].
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// A handler failed; handlers registered after it were not invoked.
    #[error("handler #{index} for '{event}' failed: {source}")]
    HandlerFailed {
        /// Name of the event being dispatched.
        event: String,
        /// Registration index of the failing handler.
        index: usize,
        /// The handler's error.
        source: HandlerError,
    },
}

/// Maps event names to ordered handler lists.
pub struct EventBus<K, E> {
    handlers: HashMap<K, Vec<Handler<E>>>,
}

impl<K, E> EventBus<K, E>
where
    K: Copy + Eq + Hash + fmt::Display,
{
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `name`, after any existing handlers.
    pub fn subscribe<F>(&mut self, name: K, handler: F)
    where
        F: FnMut(&E) -> HandlerResult + Send + 'static,
    {
        self.handlers
            .entry(name)
            .or_default()
            .push(Box::new(handler));
    }

    /// Invoke every handler registered for `name`, in order.
    ///
    /// Returns the number of handlers invoked.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::HandlerFailed`] for the first handler that fails.
    pub fn publish(&mut self, name: K, payload: &E) -> Result<usize, BusError> {
        let Some(handlers) = self.handlers.get_mut(&name) else {
            tracing::trace!(event = %name, "publish with no subscribers");
            return Ok(0);
        };

        for (index, handler) in handlers.iter_mut().enumerate() {
            handler(payload).map_err(|source| {
                tracing::warn!(event = %name, index, error = %source, "event handler failed");
                BusError::HandlerFailed {
                    event: name.to_string(),
                    index,
                    source,
                }
            })?;
        }
        Ok(handlers.len())
    }

    /// Number of handlers registered for `name`.
    #[must_use]
    pub fn subscriber_count(&self, name: K) -> usize {
        self.handlers.get(&name).map_or(0, Vec::len)
    }
}

impl<K, E> Default for EventBus<K, E>
where
    K: Copy + Eq + Hash + fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}
