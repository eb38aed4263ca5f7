//! `AppData`: the storefront state store.
//!
//! A thin handle over [`Store<AppReducer>`](larek_runtime::Store). Every
//! mutator sends one [`ShopAction`]; every query reads the state through a
//! closure and returns owned data. Clones share the same store.

use crate::actions::ShopAction;
use crate::error::{CheckoutError, ShopError};
use crate::events::ShopEvent;
use crate::model::{ContactsField, FinalOrder, FormErrors, OrderDraft, OrderField, OrderResult, PaymentMethod, Product, ProductId};
use crate::order::{CheckoutStep, assemble};
use crate::reducer::{AppReducer, ShopEnvironment};
use crate::state::AppState;
use larek_runtime::{EventEmitter, Store};
use std::fmt;
use std::rc::{Rc, Weak};

/// The store type behind [`AppData`]
pub type ShopStore = Store<AppReducer>;

/// Shared handle to the storefront state
#[derive(Clone)]
pub struct AppData {
    store: Rc<ShopStore>,
}

/// Non-owning [`AppData`] handle, for event handlers
#[derive(Clone)]
pub struct WeakAppData {
    store: Weak<ShopStore>,
}

impl WeakAppData {
    /// The store, if it is still alive
    #[must_use]
    pub fn upgrade(&self) -> Option<AppData> {
        self.store.upgrade().map(|store| AppData { store })
    }
}

impl AppData {
    /// Create an empty store with its own event bus
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Validator`] if the validation rules fail to compile.
    pub fn new() -> Result<Self, ShopError> {
        Self::with_events(EventEmitter::new())
    }

    /// Create an empty store publishing on `events`
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Validator`] if the validation rules fail to compile.
    pub fn with_events(events: EventEmitter<ShopEvent>) -> Result<Self, ShopError> {
        let environment = ShopEnvironment::new()?;
        let store = Store::new(AppState::default(), AppReducer::new(), environment, events);
        Ok(Self { store: Rc::new(store) })
    }

    /// The bus state changes are published on
    #[must_use]
    pub fn events(&self) -> &EventEmitter<ShopEvent> {
        self.store.events()
    }

    /// A handle that does not keep the store alive
    #[must_use]
    pub fn downgrade(&self) -> WeakAppData {
        WeakAppData {
            store: Rc::downgrade(&self.store),
        }
    }

    /// Read the state through a closure
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.store.state(f)
    }

    fn send(&self, action: ShopAction) -> Result<(), ShopError> {
        self.store.send(action).map_err(ShopError::from)
    }

    // ========== Catalog ==========

    /// Replace the catalog. Publishes `products:change`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn set_catalog(&self, products: Vec<Product>) -> Result<(), ShopError> {
        self.send(ShopAction::SetCatalog(products))
    }

    /// Current catalog
    #[must_use]
    pub fn catalog(&self) -> Vec<Product> {
        self.state(|state| state.catalog.clone())
    }

    // ========== Basket ==========

    /// Append `product` to the basket. Publishes `basket:change`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Basket`] if the product is already in the basket,
    /// has no price, or is not in the catalog.
    pub fn add_to_basket(&self, product: &Product) -> Result<(), ShopError> {
        self.send(ShopAction::AddToBasket(product.clone()))
    }

    /// Remove `product` from the basket. Publishes `basket:change` even if
    /// it was not there.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn remove_from_basket(&self, product: &Product) -> Result<(), ShopError> {
        self.send(ShopAction::RemoveFromBasket(product.clone()))
    }

    /// Add `product` if absent, remove it if present
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Basket`] if adding is refused.
    pub fn toggle_basket(&self, product: &Product) -> Result<(), ShopError> {
        self.send(ShopAction::ToggleBasket(product.clone()))
    }

    /// Empty the basket. Publishes `basket:change`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn init_basket(&self) -> Result<(), ShopError> {
        self.send(ShopAction::InitBasket)
    }

    /// Sum of basket prices
    #[must_use]
    pub fn get_total(&self) -> u64 {
        self.state(AppState::total)
    }

    /// Basket contents in insertion order
    #[must_use]
    pub fn get_basket_items(&self) -> Vec<Product> {
        self.state(|state| state.basket.clone())
    }

    /// Number of products in the basket
    #[must_use]
    pub fn basket_count(&self) -> usize {
        self.state(|state| state.basket.len())
    }

    /// Whether a product with `product`'s id is in the basket
    #[must_use]
    pub fn is_product_already_added(&self, product: &Product) -> bool {
        self.state(|state| state.in_basket(&product.id))
    }

    // ========== Preview ==========

    /// Show `product` in the preview. Publishes `preview:change`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn set_preview(&self, product: &Product) -> Result<(), ShopError> {
        self.send(ShopAction::SetPreview(product.clone()))
    }

    /// Close the preview
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn clear_preview(&self) -> Result<(), ShopError> {
        self.send(ShopAction::ClearPreview)
    }

    /// Id of the previewed product
    #[must_use]
    pub fn preview(&self) -> Option<ProductId> {
        self.state(|state| state.preview.clone())
    }

    // ========== Order form ==========

    /// Choose the payment method. Publishes `formPaymentInvalid:change`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn set_payment(&self, method: PaymentMethod) -> Result<(), ShopError> {
        self.send(ShopAction::SetPayment(method))
    }

    /// Set the delivery address. Publishes `formPaymentInvalid:change`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn set_address(&self, address: impl Into<String>) -> Result<(), ShopError> {
        self.send(ShopAction::SetAddress(address.into()))
    }

    /// Set the contact email. Publishes `formContactsInvalid:change`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn set_email(&self, email: impl Into<String>) -> Result<(), ShopError> {
        self.send(ShopAction::SetEmail(email.into()))
    }

    /// Set the contact phone. Publishes `formContactsInvalid:change`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn set_phone(&self, phone: impl Into<String>) -> Result<(), ShopError> {
        self.send(ShopAction::SetPhone(phone.into()))
    }

    /// Raw input on the address step.
    ///
    /// Publishes `formPaymentInvalid:change`, then `order:ready` if the
    /// address step is now complete.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn set_order_field(&self, field: OrderField, value: impl Into<String>) -> Result<(), ShopError> {
        self.send(ShopAction::SetOrderField {
            field,
            value: value.into(),
        })
    }

    /// Raw input on the contacts step.
    ///
    /// Publishes `formContactsInvalid:change`, then `order:ready` if the
    /// contacts step is now complete.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::StoreBusy`] if called while the state is borrowed.
    pub fn set_contacts_field(&self, field: ContactsField, value: impl Into<String>) -> Result<(), ShopError> {
        self.send(ShopAction::SetContactsField {
            field,
            value: value.into(),
        })
    }

    /// Current form contents
    #[must_use]
    pub fn order_draft(&self) -> OrderDraft {
        self.state(|state| state.draft.clone())
    }

    /// Errors of the most recently validated field group
    #[must_use]
    pub fn form_errors(&self) -> FormErrors {
        self.state(|state| state.form_errors.clone())
    }

    // ========== Checkout ==========

    /// Current checkout step
    #[must_use]
    pub fn checkout_step(&self) -> CheckoutStep {
        self.state(|state| state.step)
    }

    /// Open the address step with an empty form
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Checkout`] if the basket is empty or a checkout
    /// is already under way.
    pub fn begin_checkout(&self) -> Result<(), ShopError> {
        self.send(ShopAction::BeginCheckout)
    }

    /// Move on to the contacts step
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Checkout`] if not on the address step or the
    /// address step does not validate.
    pub fn proceed_to_contacts(&self) -> Result<(), ShopError> {
        self.send(ShopAction::ProceedToContacts)
    }

    /// Freeze the order for submission and return it
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Checkout`] if not on the contacts step, or the
    /// order cannot be assembled.
    pub fn begin_submit(&self) -> Result<FinalOrder, ShopError> {
        self.send(ShopAction::BeginSubmit)?;
        self.state(|state| state.pending_order.clone())
            .ok_or(ShopError::Checkout(CheckoutError::InvalidTransition {
                from: CheckoutStep::ContactsStep,
                to: CheckoutStep::Submitting,
            }))
    }

    /// The order frozen by [`AppData::begin_submit`], while it awaits the backend
    #[must_use]
    pub fn pending_order(&self) -> Option<FinalOrder> {
        self.state(|state| state.pending_order.clone())
    }

    /// Record the backend's acceptance. Publishes `basket:change`,
    /// `checkout:change` and `order:placed`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Checkout`] if no submission is in flight.
    pub fn complete_order(&self, result: OrderResult) -> Result<(), ShopError> {
        self.send(ShopAction::CompleteOrder(result))
    }

    /// Record a failed submission and return to the contacts step
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Checkout`] if no submission is in flight.
    pub fn fail_order(&self, reason: impl Into<String>) -> Result<(), ShopError> {
        self.send(ShopAction::FailOrder { reason: reason.into() })
    }

    /// Abandon the checkout, keeping the form contents
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Checkout`] while a submission is in flight.
    pub fn cancel_checkout(&self) -> Result<(), ShopError> {
        self.send(ShopAction::CancelCheckout)
    }

    /// Assemble the order from the current basket and form.
    ///
    /// Reads only; nothing is published.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Checkout`] before the contacts step, with an
    /// empty basket, or with an invalid form.
    pub fn get_order(&self) -> Result<FinalOrder, ShopError> {
        let validator = &self.store.environment().validator;
        self.state(|state| {
            if !state.step.allows_assembly() {
                return Err(CheckoutError::InvalidTransition {
                    from: state.step,
                    to: CheckoutStep::Submitting,
                });
            }
            assemble(&state.draft, &state.basket, validator)
        })
        .map_err(ShopError::from)
    }
}

impl fmt::Debug for AppData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppData").field("store", &self.store).finish()
    }
}

impl fmt::Debug for WeakAppData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakAppData").field("alive", &(self.store.strong_count() > 0)).finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mocks::product;
    use larek_testing::EventRecorder;

    fn stocked() -> AppData {
        let app = AppData::new().unwrap();
        app.set_catalog(vec![product("P1", Some(100)), product("P2", Some(250))]).unwrap();
        app
    }

    #[test]
    fn clones_share_state() {
        let app = stocked();
        let other = app.clone();
        other.add_to_basket(&product("P1", Some(100))).unwrap();
        assert_eq!(app.basket_count(), 1);
    }

    #[test]
    fn weak_handle_does_not_keep_store_alive() {
        let app = AppData::new().unwrap();
        let weak = app.downgrade();
        assert!(weak.upgrade().is_some());
        drop(app);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn rejected_add_publishes_nothing() {
        let app = stocked();
        let recorder = EventRecorder::attach(app.events());
        let p1 = product("P1", Some(100));

        app.add_to_basket(&p1).unwrap();
        let error = app.add_to_basket(&p1).unwrap_err();

        assert!(error.as_basket().is_some());
        assert_eq!(recorder.count("basket:change"), 1);
        assert_eq!(app.get_basket_items(), vec![p1]);
    }

    #[test]
    fn get_order_requires_contacts_step() {
        let app = stocked();
        app.add_to_basket(&product("P1", Some(100))).unwrap();

        let error = app.get_order().unwrap_err();
        assert!(matches!(
            error.as_checkout(),
            Some(CheckoutError::InvalidTransition { from: CheckoutStep::Cart, .. })
        ));
    }

    #[test]
    fn get_order_publishes_nothing() {
        let app = stocked();
        app.add_to_basket(&product("P1", Some(100))).unwrap();
        app.begin_checkout().unwrap();
        app.set_order_field(OrderField::Payment, "card").unwrap();
        app.set_order_field(OrderField::Address, "Moscow, 1").unwrap();
        app.proceed_to_contacts().unwrap();
        app.set_contacts_field(ContactsField::Email, "e@e.com").unwrap();
        app.set_contacts_field(ContactsField::Phone, "+71234567890").unwrap();

        let recorder = EventRecorder::attach(app.events());
        let order = app.get_order().unwrap();

        assert_eq!(order.total, 100);
        assert_eq!(order.payment, PaymentMethod::Card);
        assert!(recorder.events().is_empty());
        assert_eq!(app.checkout_step(), CheckoutStep::ContactsStep);
    }

    #[test]
    fn sending_from_a_state_closure_is_busy() {
        let app = stocked();
        let result = app.state(|_| app.init_basket());
        assert!(matches!(result, Err(ShopError::StoreBusy)));
    }
}
