//! In-process, synchronous event bus.
//!
//! [`EventEmitter`] is the [`EventBus`] implementation the storefront runs on.
//! Cloning an emitter yields another handle to the same subscriber list.
//!
//! # Dispatch
//!
//! `emit` snapshots the matching handlers, releases every internal borrow and
//! only then runs them. A handler may therefore publish further events,
//! subscribe or unsubscribe without deadlocking or re-running handlers of the
//! outer event. Subscriptions made during dispatch take effect from the next
//! publish; a subscription removed during dispatch still receives the event
//! currently being delivered.

use larek_core::{Event, EventBus, EventBusError, Handler, HandlerError, Matcher, SubscriptionId};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

struct Subscription<E> {
    id: SubscriptionId,
    matcher: Matcher,
    handler: Handler<E>,
}

struct Inner<E> {
    subscriptions: RefCell<Vec<Subscription<E>>>,
    next_id: Cell<u64>,
}

/// Synchronous publish/subscribe hub.
///
/// # Example
///
/// ```ignore
/// let events = EventEmitter::<ShopEvent>::new();
///
/// events.on("basket:change", |_| {
///     println!("basket changed");
///     Ok(())
/// })?;
///
/// events.on(Matcher::pattern(r"^order\..+:change$")?, |event| {
///     println!("order form input: {event:?}");
///     Ok(())
/// })?;
///
/// events.emit(&ShopEvent::BasketChanged);
/// ```
pub struct EventEmitter<E> {
    inner: Rc<Inner<E>>,
}

impl<E> Clone for EventEmitter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscriptions = self.inner.subscriptions.borrow();
        f.debug_struct("EventEmitter")
            .field(
                "subscriptions",
                &subscriptions.iter().map(|s| (s.id, s.matcher.to_string())).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<E: Event> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> EventEmitter<E> {
    /// Create an emitter with no subscribers
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                subscriptions: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    /// Subscribe a closure.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::UnknownTopic`] if `matcher` can never match an
    /// event of type `E`.
    pub fn on<F>(&self, matcher: impl Into<Matcher>, handler: F) -> Result<SubscriptionId, EventBusError>
    where
        F: Fn(&E) -> Result<(), HandlerError> + 'static,
    {
        self.subscribe(matcher.into(), Rc::new(handler))
    }

    /// Subscribe a closure to every event.
    pub fn on_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) -> Result<(), HandlerError> + 'static,
    {
        self.register(Matcher::Any, Rc::new(handler))
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn off(&self, id: SubscriptionId) -> bool {
        self.unsubscribe(id)
    }

    /// Remove every subscription.
    pub fn clear(&self) {
        let removed = {
            let mut subscriptions = self.inner.subscriptions.borrow_mut();
            std::mem::take(&mut *subscriptions)
        };
        tracing::debug!(removed = removed.len(), "Cleared all event subscriptions");
    }

    /// Number of live subscriptions
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriptions.borrow().len()
    }

    /// Publish `event` to every matching handler. See [`EventBus::publish`].
    pub fn emit(&self, event: &E) -> usize {
        self.publish(event)
    }

    fn register(&self, matcher: Matcher, handler: Handler<E>) -> SubscriptionId {
        let id = SubscriptionId::new(self.inner.next_id.get());
        self.inner.next_id.set(id.get() + 1);

        tracing::trace!(subscription = %id, matcher = %matcher, "Subscribed");
        self.inner.subscriptions.borrow_mut().push(Subscription { id, matcher, handler });
        id
    }
}

impl<E: Event> EventBus<E> for EventEmitter<E> {
    fn subscribe(&self, matcher: Matcher, handler: Handler<E>) -> Result<SubscriptionId, EventBusError> {
        if let Err(error) = matcher.validate::<E>() {
            tracing::warn!(matcher = %matcher, "Rejected subscription to unknown topic");
            return Err(error);
        }
        Ok(self.register(matcher, handler))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.inner.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        before != subscriptions.len()
    }

    fn publish(&self, event: &E) -> usize {
        let name = event.name();

        let handlers: Vec<(SubscriptionId, Handler<E>)> = self
            .inner
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.matcher.matches(&name))
            .map(|s| (s.id, Rc::clone(&s.handler)))
            .collect();

        tracing::trace!(event = %name, handlers = handlers.len(), "Publishing event");
        metrics::counter!("event_bus.published", "event" => name.to_string()).increment(1);

        for (id, handler) in &handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => {},
                Ok(Err(error)) => {
                    metrics::counter!("event_bus.handler_failed", "event" => name.to_string()).increment(1);
                    tracing::error!(
                        event = %name,
                        subscription = %id,
                        error = %error,
                        "Event handler failed, continuing"
                    );
                },
                Err(payload) => {
                    metrics::counter!("event_bus.handler_failed", "event" => name.to_string()).increment(1);
                    tracing::error!(
                        event = %name,
                        subscription = %id,
                        panic = panic_message(payload.as_ref()),
                        "Event handler panicked, continuing"
                    );
                },
            }
        }

        handlers.len()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}
