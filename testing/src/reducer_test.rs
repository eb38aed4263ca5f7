//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use larek_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<E> = Box<dyn FnOnce(&[Effect<E>])>;

/// Type alias for rejection assertion functions
type ErrorAssertion<Err> = Box<dyn FnOnce(&Err)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use larek_testing::ReducerTest;
///
/// ReducerTest::new(AppReducer)
///     .with_env(test_environment())
///     .given_state(AppState::default())
///     .when_action(ShopAction::InitBasket)
///     .then_state(|state| {
///         assert!(state.basket.is_empty());
///     })
///     .then_effects(|effects| {
///         assert_eq!(effects.len(), 1);
///     })
///     .run();
/// ```
pub struct ReducerTest<R: Reducer> {
    reducer: R,
    environment: Option<R::Environment>,
    initial_state: Option<R::State>,
    action: Option<R::Action>,
    state_assertions: Vec<StateAssertion<R::State>>,
    effect_assertions: Vec<EffectAssertion<R::Event>>,
    error_assertions: Vec<ErrorAssertion<R::Error>>,
}

impl<R> ReducerTest<R>
where
    R: Reducer,
    R::Error: std::fmt::Debug,
    R::Event: std::fmt::Debug,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            action: None,
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
            error_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: R::Environment) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Set the action to test (When)
    #[must_use]
    pub fn when_action(mut self, action: R::Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    ///
    /// Runs whether the action was accepted or rejected, so it can also
    /// check that a rejection left state untouched.
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&R::State) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the resulting effects (Then)
    ///
    /// Implies the action must be accepted.
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<R::Event>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the rejection (Then)
    ///
    /// Implies the action must be rejected.
    #[must_use]
    pub fn then_rejected<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&R::Error) + 'static,
    {
        self.error_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set, if the
    /// outcome (accepted/rejected) contradicts the assertions registered,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        let action = self.action.expect("Action must be set with when_action()");

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        // Execute reducer
        let outcome = self.reducer.reduce(&mut state, action, &env);

        // Run state assertions
        for assertion in self.state_assertions {
            assertion(&state);
        }

        match outcome {
            Ok(effects) => {
                assert!(
                    self.error_assertions.is_empty(),
                    "Expected the action to be rejected, but it produced effects: {effects:?}"
                );
                for assertion in self.effect_assertions {
                    assertion(&effects);
                }
            },
            Err(error) => {
                assert!(
                    self.effect_assertions.is_empty(),
                    "Expected the action to be accepted, but it was rejected: {error:?}"
                );
                for assertion in self.error_assertions {
                    assertion(&error);
                }
            },
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use larek_core::{Event, effect::Effect};

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect would publish an event.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<E: std::fmt::Debug>(effects: &[Effect<E>]) {
        assert!(
            effects.iter().all(|e| e.events().is_empty()),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<E>(effects: &[Effect<E>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Names of every event the effects publish, in order
    #[must_use]
    pub fn published_names<E: Event>(effects: &[Effect<E>]) -> Vec<String> {
        effects
            .iter()
            .flat_map(Effect::events)
            .map(|event| event.name().into_owned())
            .collect()
    }

    /// Assert the exact sequence of event names published
    ///
    /// # Panics
    ///
    /// Panics if the published names differ from `expected`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_publishes<E: Event>(effects: &[Effect<E>], expected: &[&str]) {
        let names = published_names(effects);
        assert_eq!(names, expected, "Unexpected published events");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_core::effect::Effect;
    use larek_core::reducer::Reducer;
    use larek_core::{Effects, Event, smallvec};
    use std::borrow::Cow;

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
    }

    #[derive(Clone, Debug)]
    struct Changed;

    impl Event for Changed {
        fn name(&self) -> Cow<'static, str> {
            Cow::Borrowed("count:change")
        }

        fn topics() -> &'static [&'static str] {
            &["count:change"]
        }
    }

    struct TestReducer;

    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Event = Changed;
        type Environment = TestEnv;
        type Error = String;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> Result<Effects<Changed>, String> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    Ok(smallvec![Effect::Publish(Changed)])
                },
                TestAction::Decrement if state.count == 0 => Err("already zero".to_string()),
                TestAction::Decrement => {
                    state.count -= 1;
                    Ok(smallvec![Effect::Publish(Changed)])
                },
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_effects(|effects| {
                assertions::assert_publishes(effects, &["count:change"]);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_rejection() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Decrement)
            .then_state(|state| {
                assert_eq!(state.count, 0);
            })
            .then_rejected(|error| {
                assert_eq!(error, "already zero");
            })
            .run();
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<Changed>(&[Effect::None]);
        assertions::assert_no_effects::<Changed>(&[]);
    }

    #[test]
    fn test_assertions_effects_count() {
        assertions::assert_effects_count(&[Effect::<Changed>::None], 1);
        assertions::assert_effects_count::<Changed>(&[], 0);
    }
}
