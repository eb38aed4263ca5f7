//! Reducer logic for the storefront.
//!
//! Each action is validated against the current state first. A failed check
//! returns the error before anything is touched, so a rejected action leaves
//! both the state and the bus exactly as they were. Accepted actions mutate
//! the state and describe the events to publish; the store publishes them
//! once the reducer has returned.

use crate::actions::ShopAction;
use crate::error::{BasketError, CheckoutError, ShopError};
use crate::events::ShopEvent;
use crate::model::{FormErrors, OrderDraft, Product};
use crate::order::{CheckoutStep, assemble};
use crate::state::AppState;
use crate::validation::{FieldGroup, Validator, ValidatorError};
use larek_core::{Effect, Effects, Reducer, SmallVec, smallvec};

/// Environment dependencies for the storefront reducer
#[derive(Clone, Debug)]
pub struct ShopEnvironment {
    /// Compiled form validation rules
    pub validator: Validator,
}

impl ShopEnvironment {
    /// Creates a new `ShopEnvironment` with freshly compiled rules
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] if a validation rule fails to compile.
    pub fn new() -> Result<Self, ValidatorError> {
        Ok(Self {
            validator: Validator::new()?,
        })
    }
}

/// Reducer for the storefront
#[derive(Clone, Copy, Debug, Default)]
pub struct AppReducer;

impl AppReducer {
    /// Creates a new `AppReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an add-to-basket request and resolves it to the catalog entry.
    ///
    /// Price checks use the catalog's copy, never the caller's.
    fn validate_add(state: &AppState, product: &Product) -> Result<Product, BasketError> {
        if state.in_basket(&product.id) {
            return Err(BasketError::AlreadyInBasket(product.id.clone()));
        }

        let Some(listed) = state.catalog_product(&product.id) else {
            return Err(BasketError::NotInCatalog(product.id.clone()));
        };

        if !listed.is_purchasable() {
            return Err(BasketError::Priceless(product.id.clone()));
        }

        Ok(listed.clone())
    }

    /// Moves the checkout to `to`, publishing the new step
    fn transition(state: &mut AppState, to: CheckoutStep) -> Result<Effect<ShopEvent>, CheckoutError> {
        let from = state.step;
        state.step = from.transition(to)?;
        tracing::debug!(%from, %to, "Checkout step changed");
        Ok(Effect::Publish(ShopEvent::CheckoutChanged(to)))
    }

    /// Revalidates one field group and stores the result as the current errors.
    ///
    /// With `announce_ready`, a fully valid group also publishes `order:ready`.
    fn revalidate(state: &mut AppState, validator: &Validator, group: FieldGroup, announce_ready: bool) -> Effects<ShopEvent> {
        let errors = validator.validate(group, &state.draft);
        let ready = announce_ready && errors.is_valid();
        state.form_errors = errors.clone();

        let validated = match group {
            FieldGroup::Address => ShopEvent::PaymentFormValidated(errors),
            FieldGroup::Contacts => ShopEvent::ContactsFormValidated(errors),
        };

        let mut effects: Effects<ShopEvent> = smallvec![Effect::Publish(validated)];
        if ready {
            effects.push(Effect::Publish(ShopEvent::OrderReady(state.draft.clone())));
        }
        effects
    }

    fn basket_changed() -> Effects<ShopEvent> {
        smallvec![Effect::Publish(ShopEvent::BasketChanged)]
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = ShopAction;
    type Event = ShopEvent;
    type Environment = ShopEnvironment;
    type Error = ShopError;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Result<Effects<ShopEvent>, ShopError> {
        match action {
            // ========== Catalog ==========
            ShopAction::SetCatalog(products) => {
                state.catalog = products;
                tracing::debug!(count = state.catalog.len(), "Catalog replaced");
                Ok(smallvec![Effect::Publish(ShopEvent::ProductsChanged {
                    catalog: state.catalog.clone(),
                })])
            },

            // ========== Basket ==========
            ShopAction::AddToBasket(product) => {
                let listed = Self::validate_add(state, &product)?;
                tracing::debug!(id = %listed.id, "Added to basket");
                state.basket.push(listed);
                Ok(Self::basket_changed())
            },

            ShopAction::RemoveFromBasket(product) => {
                state.basket.retain(|entry| entry.id != product.id);
                tracing::debug!(id = %product.id, "Removed from basket");
                Ok(Self::basket_changed())
            },

            ShopAction::ToggleBasket(product) => {
                if state.in_basket(&product.id) {
                    state.basket.retain(|entry| entry.id != product.id);
                } else {
                    let listed = Self::validate_add(state, &product)?;
                    state.basket.push(listed);
                }
                Ok(Self::basket_changed())
            },

            ShopAction::InitBasket => {
                state.basket.clear();
                Ok(Self::basket_changed())
            },

            // ========== Preview ==========
            ShopAction::SetPreview(product) => {
                state.preview = Some(product.id.clone());
                Ok(smallvec![Effect::Publish(ShopEvent::PreviewChanged(product))])
            },

            ShopAction::ClearPreview => {
                state.preview = None;
                Ok(SmallVec::new())
            },

            // ========== Order form ==========
            ShopAction::SetPayment(method) => {
                state.draft.payment = Some(method);
                Ok(Self::revalidate(state, &env.validator, FieldGroup::Address, false))
            },

            ShopAction::SetAddress(address) => {
                state.draft.address = address;
                Ok(Self::revalidate(state, &env.validator, FieldGroup::Address, false))
            },

            ShopAction::SetEmail(email) => {
                state.draft.email = email;
                Ok(Self::revalidate(state, &env.validator, FieldGroup::Contacts, false))
            },

            ShopAction::SetPhone(phone) => {
                state.draft.phone = phone;
                Ok(Self::revalidate(state, &env.validator, FieldGroup::Contacts, false))
            },

            ShopAction::SetOrderField { field, value } => {
                state.draft.set_order_field(field, &value);
                Ok(Self::revalidate(state, &env.validator, FieldGroup::Address, true))
            },

            ShopAction::SetContactsField { field, value } => {
                state.draft.set_contacts_field(field, &value);
                Ok(Self::revalidate(state, &env.validator, FieldGroup::Contacts, true))
            },

            // ========== Checkout ==========
            ShopAction::BeginCheckout => {
                if state.basket.is_empty() {
                    return Err(CheckoutError::EmptyBasket.into());
                }
                let effect = Self::transition(state, CheckoutStep::AddressStep)?;
                state.draft = OrderDraft::default();
                state.form_errors = FormErrors::default();
                Ok(smallvec![effect])
            },

            ShopAction::ProceedToContacts => {
                // Step before draft
                state.step.transition(CheckoutStep::ContactsStep)?;
                let errors = env.validator.validate_address(&state.draft);
                if !errors.is_valid() {
                    return Err(CheckoutError::InvalidDraft(errors).into());
                }
                let effect = Self::transition(state, CheckoutStep::ContactsStep)?;
                state.form_errors = errors;
                Ok(smallvec![effect])
            },

            ShopAction::BeginSubmit => {
                state.step.transition(CheckoutStep::Submitting)?;
                let order = assemble(&state.draft, &state.basket, &env.validator)?;
                let effect = Self::transition(state, CheckoutStep::Submitting)?;
                state.pending_order = Some(order);
                Ok(smallvec![effect])
            },

            ShopAction::CompleteOrder(result) => {
                let effect = Self::transition(state, CheckoutStep::Done)?;
                state.basket.clear();
                state.draft = OrderDraft::default();
                state.pending_order = None;
                tracing::info!(order_id = %result.id, total = result.total, "Order placed");
                Ok(smallvec![
                    Effect::Publish(ShopEvent::BasketChanged),
                    effect,
                    Effect::Publish(ShopEvent::OrderPlaced(result)),
                ])
            },

            ShopAction::FailOrder { reason } => {
                let effect = Self::transition(state, CheckoutStep::ContactsStep)?;
                state.pending_order = None;
                tracing::warn!(%reason, "Order submission failed");
                Ok(smallvec![effect])
            },

            ShopAction::CancelCheckout => {
                let effect = Self::transition(state, CheckoutStep::Cart)?;
                Ok(smallvec![effect])
            },
        }
    }
}
