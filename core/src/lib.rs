//! # Larek Core
//!
//! Core traits and types for the Larek storefront state layer.
//!
//! This crate provides the abstractions the storefront is built from: a
//! reducer that owns all state transitions, effect descriptions returned by
//! the reducer, and the event contract shared between state and view.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state owned by a single store
//! - **Action**: All possible inputs to a reducer (user intents, fetch results)
//! - **Reducer**: `(State, Action, Environment) → Result<Effects, Error>`
//! - **Effect**: An event to publish once the state change is committed
//! - **Event**: A named notification delivered through the event bus
//!
//! ## Architecture Principles
//!
//! - Single writer: only the reducer mutates state
//! - Unidirectional data flow: view event → action → state → change event
//! - Explicit effects: reducers describe publications, the runtime performs them
//! - Rejected actions leave state untouched
//!
//! ## Example
//!
//! ```ignore
//! use larek_core::*;
//!
//! impl Reducer for BasketReducer {
//!     type State = BasketState;
//!     type Action = BasketAction;
//!     type Event = BasketEvent;
//!     type Environment = ();
//!     type Error = BasketError;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BasketState,
//!         action: BasketAction,
//!         _env: &(),
//!     ) -> Result<Effects<BasketEvent>, BasketError> {
//!         // Business logic goes here
//!         Ok(smallvec![Effect::Publish(BasketEvent::Changed)])
//!     }
//! }
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Named events and their closed topic lists
pub mod event;

/// Publish/subscribe contract between state and view
pub mod event_bus;

/// Reducer module - The core trait for business logic
///
/// Reducers are the only place state changes. They validate the action,
/// update state in place and return the events that describe the change.
pub mod reducer {
    use super::effect::Effects;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Event`: The event type published for committed changes
    /// - `Environment`: The injected dependencies this reducer needs
    /// - `Error`: Why an action was rejected
    ///
    /// # Contract
    ///
    /// When `reduce` returns `Err`, `state` must be exactly as it was before
    /// the call. Check preconditions first, then mutate.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The event type carried by [`Effect::Publish`](super::effect::Effect::Publish)
        type Event;

        /// The environment type with injected dependencies
        type Environment;

        /// The rejection type for actions that violate an invariant
        type Error;

        /// Reduce an action into state changes and effects
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action would break a state
        /// invariant. State is not modified in that case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<Effects<Self::Event>, Self::Error>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values, not execution. The runtime performs them after the
/// reducer has returned and the state borrow has been released.
pub mod effect {
    use smallvec::SmallVec;

    /// Inline storage for the effects of a single action.
    ///
    /// Most actions publish one or two events, so four slots keep the common
    /// case off the heap.
    pub type Effects<E> = SmallVec<[Effect<E>; 4]>;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `E`: The event type published through the bus
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect<E> {
        /// No-op effect
        None,

        /// Publish an event to every matching subscriber
        Publish(E),

        /// Run effects in order
        Sequential(Vec<Effect<E>>),
    }

    impl<E> Effect<E> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<E>>) -> Effect<E> {
            Effect::Sequential(effects)
        }

        /// Every event this effect would publish, in publication order.
        pub fn events(&self) -> Vec<&E> {
            let mut events = Vec::new();
            self.collect_events(&mut events);
            events
        }

        fn collect_events<'a>(&'a self, out: &mut Vec<&'a E>) {
            match self {
                Effect::None => {},
                Effect::Publish(event) => out.push(event),
                Effect::Sequential(effects) => {
                    for effect in effects {
                        effect.collect_events(out);
                    }
                },
            }
        }
    }
}

pub use effect::{Effect, Effects};
pub use event::Event;
pub use event_bus::{EventBus, EventBusError, Handler, HandlerError, Matcher, SubscriptionId};
pub use reducer::Reducer;
