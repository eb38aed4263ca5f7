//! Event bus abstraction for state → view communication.
//!
//! This module provides the [`EventBus`] trait for publishing and subscribing
//! to [`Event`]s, plus the [`Matcher`] used to select events by name.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────────┐
//! │ View event  │────►│   Reducer   │────►│ Effect::Publish │
//! └─────────────┘     └─────────────┘     └────────┬────────┘
//!                                                  │
//!                                                  ▼
//!                                         ┌─────────────────┐
//!                                         │    Event bus    │
//!                                         └────────┬────────┘
//!                                             ┌────┴────┐
//!                                             ▼         ▼
//!                                         ┌───────┐ ┌───────┐
//!                                         │ View  │ │ View  │
//!                                         └───────┘ └───────┘
//! ```
//!
//! # Key Principles
//!
//! - **Synchronous**: `publish` runs every matching handler before returning
//! - **Ordered**: handlers run in subscription order, whatever their matcher kind
//! - **Isolated**: a failing handler is logged and skipped, the rest still run
//! - **Re-entrant**: handlers may publish, subscribe or unsubscribe
//!
//! # Topic Naming Convention
//!
//! Topics follow `{subject}:{verb}` (`basket:change`) or, for form inputs,
//! `{form}.{field}:change` (`order.address:change`) so a single pattern such as
//! `^order\..+:change$` can route every field of a form.

use crate::event::Event;
use regex::Regex;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Errors that can occur during event bus operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventBusError {
    /// Exact topic or pattern that no event of this type can carry
    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    /// Pattern that does not compile
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The rejected pattern source
        pattern: String,
        /// The regex compiler's message
        reason: String,
    },
}

/// Error returned by a handler. Logged by the bus, never propagated.
pub type HandlerError = Box<dyn std::error::Error>;

/// A subscribed callback.
pub type Handler<E> = Rc<dyn Fn(&E) -> Result<(), HandlerError>>;

/// Identifies a subscription for [`EventBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wrap a raw id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Selects which events a handler receives.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exactly one event name
    Exact(String),
    /// Every name the regular expression matches
    Pattern(Regex),
    /// Every event
    Any,
}

impl Matcher {
    /// Build a pattern matcher from regex source.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::InvalidPattern`] if `pattern` does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, EventBusError> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| EventBusError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Whether this matcher selects the event named `name`.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == name,
            Self::Pattern(regex) => regex.is_match(name),
            Self::Any => true,
        }
    }

    /// Check this matcher against the closed topic list of `E`.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::UnknownTopic`] for an exact name outside
    /// `E::topics()`, or a pattern that matches none of them.
    pub fn validate<E: Event>(&self) -> Result<(), EventBusError> {
        let known = match self {
            Self::Exact(name) => E::is_known_topic(name),
            Self::Pattern(regex) => E::topics().iter().any(|topic| regex.is_match(topic)),
            Self::Any => true,
        };

        if known {
            Ok(())
        } else {
            Err(EventBusError::UnknownTopic(self.to_string()))
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            Self::Any => f.write_str("*"),
        }
    }
}

impl From<&str> for Matcher {
    fn from(name: &str) -> Self {
        Self::Exact(name.to_string())
    }
}

impl From<String> for Matcher {
    fn from(name: String) -> Self {
        Self::Exact(name)
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

/// Trait for event bus implementations.
///
/// # Thread Safety
///
/// Buses are single-threaded. Handlers are `Rc` callbacks and may capture
/// non-`Send` state such as a `Weak` store reference.
///
/// # Examples
///
/// ```rust,ignore
/// let id = bus.subscribe(Matcher::from("basket:change"), Rc::new(|_event| {
///     render_basket();
///     Ok(())
/// }))?;
///
/// bus.publish(&ShopEvent::BasketChanged);
/// bus.unsubscribe(id);
/// ```
pub trait EventBus<E: Event> {
    /// Register `handler` for every event selected by `matcher`.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::UnknownTopic`] if the matcher can never fire
    /// for this event type.
    fn subscribe(&self, matcher: Matcher, handler: Handler<E>) -> Result<SubscriptionId, EventBusError>;

    /// Remove a subscription. Returns `false` if it was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Deliver `event` to every matching handler, in subscription order.
    ///
    /// Returns the number of handlers invoked. Never fails: handler errors
    /// and panics are logged and the remaining handlers still run.
    fn publish(&self, event: &E) -> usize;
}
