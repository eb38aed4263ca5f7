//! # Larek Runtime
//!
//! Runtime implementation for the Larek storefront state layer.
//!
//! This crate provides the Store that coordinates reducer execution and the
//! event emitter the Store publishes through.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer, publishes the resulting effects
//! - **`EventEmitter`**: Synchronous in-process [`EventBus`](larek_core::EventBus)
//!
//! ## Example
//!
//! ```ignore
//! use larek_runtime::{EventEmitter, Store};
//!
//! let events = EventEmitter::new();
//! let store = Store::new(initial_state, my_reducer, environment, events.clone());
//!
//! events.on("basket:change", |_| Ok(()))?;
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

/// Synchronous event bus
pub mod emitter;

pub use emitter::EventEmitter;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError<E> {
        /// The reducer rejected the action. State was not modified.
        #[error("Action rejected: {0}")]
        Rejected(#[source] E),

        /// `send()` was called while the state was already borrowed
        ///
        /// Happens when an action is sent from inside a `state()` closure.
        /// Handlers run after the reducer returns, so sending from a handler
        /// is fine.
        #[error("Store is busy: state is borrowed")]
        Busy,
    }

    impl<E> StoreError<E> {
        /// The reducer's rejection, if this is one
        #[must_use]
        pub fn into_rejection(self) -> Option<E> {
            match self {
                Self::Rejected(error) => Some(error),
                Self::Busy => None,
            }
        }
    }
}

pub use error::StoreError;

/// Store module - the single-writer runtime for a reducer
pub mod store {
    use super::{EventEmitter, StoreError};
    use larek_core::{Effect, Event, Reducer};
    use std::cell::RefCell;
    use std::fmt;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RefCell`, mutated only by the reducer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (publishing events on the emitter)
    ///
    /// The state borrow is released before any effect runs, so handlers may
    /// read state or send further actions.
    pub struct Store<R: Reducer> {
        state: RefCell<R::State>,
        reducer: R,
        environment: R::Environment,
        events: EventEmitter<R::Event>,
    }

    impl<R> Store<R>
    where
        R: Reducer,
        R::Event: Event,
        R::Error: fmt::Display,
    {
        /// Create a new store with initial state, reducer, environment and
        /// the emitter it publishes on
        #[must_use]
        pub fn new(
            initial_state: R::State,
            reducer: R,
            environment: R::Environment,
            events: EventEmitter<R::Event>,
        ) -> Self {
            Self {
                state: RefCell::new(initial_state),
                reducer,
                environment,
                events,
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer, then publishes its effects in order. Handlers
        /// have all run by the time this returns.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Rejected`] if the reducer refused the action
        /// - [`StoreError::Busy`] if the state is currently borrowed
        #[tracing::instrument(skip_all, name = "store_send")]
        pub fn send(&self, action: R::Action) -> Result<(), StoreError<R::Error>> {
            let outcome = {
                let Ok(mut state) = self.state.try_borrow_mut() else {
                    tracing::warn!("Action sent while state was borrowed");
                    return Err(StoreError::Busy);
                };
                self.reducer.reduce(&mut state, action, &self.environment)
            };

            match outcome {
                Ok(effects) => {
                    metrics::counter!("store.actions.processed").increment(1);
                    for effect in effects {
                        self.execute(effect);
                    }
                    Ok(())
                },
                Err(error) => {
                    metrics::counter!("store.actions.rejected").increment(1);
                    tracing::warn!(error = %error, "Action rejected by reducer");
                    Err(StoreError::Rejected(error))
                },
            }
        }

        /// Read state through a closure
        ///
        /// # Panics
        ///
        /// Panics if called from inside the reducer. Reducers receive the
        /// state directly and have no reason to.
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&R::State) -> T,
        {
            let state = self.state.borrow();
            f(&*state)
        }

        /// The emitter effects are published on
        #[must_use]
        pub const fn events(&self) -> &EventEmitter<R::Event> {
            &self.events
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &R::Environment {
            &self.environment
        }

        fn execute(&self, effect: Effect<R::Event>) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Publish(event) => {
                    let handlers = self.events.emit(&event);
                    tracing::debug!(event = %event.name(), handlers, "Published");
                },
                Effect::Sequential(effects) => {
                    for effect in effects {
                        self.execute(effect);
                    }
                },
            }
        }
    }

    impl<R: Reducer> fmt::Debug for Store<R>
    where
        R::State: fmt::Debug,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Store").field("state", &self.state).finish_non_exhaustive()
        }
    }
}

pub use store::Store;
