//! # Larek Testing
//!
//! Testing utilities and helpers for the Larek storefront state layer.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then builder for reducers
//! - [`EventRecorder`]: Captures everything published on an emitter
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use larek_testing::EventRecorder;
//!
//! #[test]
//! fn basket_change_is_published() {
//!     let app = AppData::new()?;
//!     let recorder = EventRecorder::attach(app.events());
//!
//!     app.init_basket()?;
//!
//!     assert_eq!(recorder.names(), vec!["basket:change"]);
//! }
//! ```

/// Given-When-Then reducer tests
pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Recording subscribers
pub mod mocks {
    use larek_core::Event;
    use larek_runtime::EventEmitter;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every event published on an emitter
    ///
    /// The recorder subscribes with a catch-all matcher, so it sees events in
    /// exactly the order other subscribers do.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let recorder = EventRecorder::attach(&events);
    /// events.emit(&ShopEvent::BasketChanged);
    /// assert_eq!(recorder.count("basket:change"), 1);
    /// ```
    #[derive(Debug)]
    pub struct EventRecorder<E> {
        events: Rc<RefCell<Vec<E>>>,
    }

    impl<E: Event + Clone> EventRecorder<E> {
        /// Subscribe a new recorder to `emitter`
        #[must_use]
        pub fn attach(emitter: &EventEmitter<E>) -> Self {
            let events = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&events);
            emitter.on_all(move |event: &E| {
                sink.borrow_mut().push(event.clone());
                Ok(())
            });
            Self { events }
        }

        /// Every recorded event, oldest first
        #[must_use]
        pub fn events(&self) -> Vec<E> {
            self.events.borrow().clone()
        }

        /// Names of every recorded event, oldest first
        #[must_use]
        pub fn names(&self) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .map(|event| event.name().into_owned())
                .collect()
        }

        /// How many events named `name` were recorded
        #[must_use]
        pub fn count(&self, name: &str) -> usize {
            self.events.borrow().iter().filter(|event| event.name() == name).count()
        }

        /// The most recent event named `name`
        #[must_use]
        pub fn last(&self, name: &str) -> Option<E> {
            self.events
                .borrow()
                .iter()
                .rev()
                .find(|event| event.name() == name)
                .cloned()
        }

        /// Forget everything recorded so far
        pub fn clear(&self) {
            self.events.borrow_mut().clear();
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Route `tracing` output to the test harness
    ///
    /// Safe to call from every test; only the first call installs the
    /// subscriber. Honors `RUST_LOG`, defaulting to `debug`.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_tracing;
pub use mocks::EventRecorder;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use larek_core::Event;
    use larek_runtime::EventEmitter;
    use std::borrow::Cow;

    #[derive(Debug, Clone, PartialEq)]
    enum Light {
        On,
        Off,
    }

    impl Event for Light {
        fn name(&self) -> Cow<'static, str> {
            match self {
                Self::On => Cow::Borrowed("light:on"),
                Self::Off => Cow::Borrowed("light:off"),
            }
        }

        fn topics() -> &'static [&'static str] {
            &["light:on", "light:off"]
        }
    }

    #[test]
    fn recorder_captures_in_order() {
        let emitter = EventEmitter::new();
        let recorder = EventRecorder::attach(&emitter);

        emitter.emit(&Light::On);
        emitter.emit(&Light::Off);
        emitter.emit(&Light::On);

        assert_eq!(recorder.names(), vec!["light:on", "light:off", "light:on"]);
        assert_eq!(recorder.count("light:on"), 2);
        assert_eq!(recorder.last("light:off"), Some(Light::Off));

        recorder.clear();
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
