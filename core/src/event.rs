//! Event trait for named notifications.
//!
//! Events are the only way state changes leave the store. Each event carries a
//! wire name (`"basket:change"`, `"order.address:change"`) that subscribers
//! match against, either exactly or with a pattern.
//!
//! # Closed Topic Lists
//!
//! Every event type declares the complete list of names it can ever carry.
//! The event bus checks subscriptions against that list when they are made,
//! so a misspelled topic fails at startup instead of silently never firing.
//!
//! # Example
//!
//! ```
//! use larek_core::event::Event;
//! use std::borrow::Cow;
//!
//! #[derive(Debug)]
//! enum BasketEvent {
//!     Changed,
//!     Opened,
//! }
//!
//! impl Event for BasketEvent {
//!     fn name(&self) -> Cow<'static, str> {
//!         match self {
//!             Self::Changed => Cow::Borrowed("basket:change"),
//!             Self::Opened => Cow::Borrowed("basket:open"),
//!         }
//!     }
//!
//!     fn topics() -> &'static [&'static str] {
//!         &["basket:change", "basket:open"]
//!     }
//! }
//!
//! assert_eq!(BasketEvent::Changed.name(), "basket:change");
//! assert!(BasketEvent::is_known_topic("basket:open"));
//! assert!(!BasketEvent::is_known_topic("basket:opne"));
//! ```

use std::borrow::Cow;
use std::fmt;

/// A named notification that can be delivered through an event bus.
pub trait Event: fmt::Debug + 'static {
    /// The wire name subscribers match against.
    ///
    /// Must be one of [`Event::topics`].
    fn name(&self) -> Cow<'static, str>;

    /// Every name this event type can carry.
    fn topics() -> &'static [&'static str]
    where
        Self: Sized;

    /// Whether `name` is one of [`Event::topics`].
    fn is_known_topic(name: &str) -> bool
    where
        Self: Sized,
    {
        Self::topics().contains(&name)
    }
}
