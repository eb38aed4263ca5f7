//! Wiring between view events, the store and the backend.
//!
//! [`Presenter::wire`] subscribes the store to the inbound view events. The
//! async flows (loading the catalog, placing an order) are plain methods the
//! caller drives; they hold no store borrow across an `.await`.
//!
//! `contacts:submit` freezes the order synchronously (the checkout moves to
//! `Submitting`); the caller then ships it with [`Presenter::submit_order`].

use crate::api::ShopApi;
use crate::app::AppData;
use crate::error::ShopError;
use crate::events::{ShopEvent, topic};
use crate::model::{OrderResult, Product, ProductId};
use crate::order::CheckoutStep;
use larek_core::{Matcher, SubscriptionId};
use std::cell::Cell;

/// Address step inputs: `order.address:change`, `order.payment:change`
const ORDER_INPUT_PATTERN: &str = r"^order\..+:change$";
/// Contacts step inputs: `contacts.email:change`, `contacts.phone:change`
const CONTACTS_INPUT_PATTERN: &str = r"^contacts\..+:change$";

/// Connects an [`AppData`] store to the views and a [`ShopApi`] backend
#[derive(Debug)]
pub struct Presenter<A> {
    app: AppData,
    api: A,
    subscriptions: Vec<SubscriptionId>,
    in_flight: Cell<bool>,
}

impl<A: ShopApi> Presenter<A> {
    /// Create an unwired presenter
    #[must_use]
    pub const fn new(app: AppData, api: A) -> Self {
        Self {
            app,
            api,
            subscriptions: Vec::new(),
            in_flight: Cell::new(false),
        }
    }

    /// The store
    #[must_use]
    pub const fn app(&self) -> &AppData {
        &self.app
    }

    /// The backend
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Subscribe the store to inbound view events.
    ///
    /// Handlers hold a weak store reference and do nothing once the store
    /// is dropped. A refused action is returned from the handler, so the bus
    /// logs it.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Bus`] if a subscription is refused.
    pub fn wire(&mut self) -> Result<(), ShopError> {
        self.route(topic::BASKET_ADD, |app, event| match event {
            ShopEvent::BasketAdd(product) => app.add_to_basket(product),
            _ => Ok(()),
        })?;

        self.route(topic::BASKET_REMOVE, |app, event| match event {
            ShopEvent::BasketRemove(product) => app.remove_from_basket(product),
            _ => Ok(()),
        })?;

        self.route(topic::CARD_BASKET, |app, event| match event {
            ShopEvent::CardToggle(product) => app.toggle_basket(product),
            _ => Ok(()),
        })?;

        self.route(topic::CARD_SELECT, |app, event| match event {
            ShopEvent::CardSelect(product) => app.set_preview(product),
            _ => Ok(()),
        })?;

        self.route(topic::MODAL_CLOSE, |app, _| {
            app.clear_preview()?;
            match app.checkout_step() {
                CheckoutStep::Cart | CheckoutStep::Submitting => Ok(()),
                _ => app.cancel_checkout(),
            }
        })?;

        self.route(topic::ORDER_OPEN, |app, _| app.begin_checkout())?;

        self.route(topic::ORDER_SUBMIT, |app, _| app.proceed_to_contacts())?;

        self.route(topic::CONTACTS_SUBMIT, |app, _| app.begin_submit().map(|_| ()))?;

        self.route(Matcher::pattern(ORDER_INPUT_PATTERN)?, |app, event| match event {
            ShopEvent::OrderInput { field, value } => app.set_order_field(*field, value.as_str()),
            _ => Ok(()),
        })?;

        self.route(Matcher::pattern(CONTACTS_INPUT_PATTERN)?, |app, event| match event {
            ShopEvent::ContactsInput { field, value } => app.set_contacts_field(*field, value.as_str()),
            _ => Ok(()),
        })?;

        tracing::debug!(subscriptions = self.subscriptions.len(), "Presenter wired");
        Ok(())
    }

    fn route<F>(&mut self, matcher: impl Into<Matcher>, handler: F) -> Result<(), ShopError>
    where
        F: Fn(&AppData, &ShopEvent) -> Result<(), ShopError> + 'static,
    {
        let weak = self.app.downgrade();
        let id = self.app.events().on(matcher, move |event| {
            let Some(app) = weak.upgrade() else {
                return Ok(());
            };
            handler(&app, event).map_err(Into::into)
        })?;
        self.subscriptions.push(id);
        Ok(())
    }

    /// Fetch the catalog into the store
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Api`] if the backend call fails; the store is
    /// left untouched.
    pub async fn load_catalog(&self) -> Result<usize, ShopError> {
        let products = self.api.fetch_catalog().await.map_err(|error| {
            metrics::counter!("shop.api.failures", "call" => "fetch_catalog").increment(1);
            tracing::error!(%error, "Failed to load catalog");
            error
        })?;

        let count = products.len();
        self.app.set_catalog(products)?;
        tracing::info!(count, "Catalog loaded");
        Ok(count)
    }

    /// Fetch one product and show it in the preview
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Api`] if the backend call fails.
    pub async fn load_product(&self, id: &ProductId) -> Result<Product, ShopError> {
        let product = self.api.fetch_product(id).await.map_err(|error| {
            metrics::counter!("shop.api.failures", "call" => "fetch_product").increment(1);
            tracing::error!(%error, %id, "Failed to load product");
            error
        })?;

        self.app.set_preview(&product)?;
        Ok(product)
    }

    /// Submit the order.
    ///
    /// Ships the order frozen by `contacts:submit` if there is one, otherwise
    /// freezes it from the contacts step first. Only one submission can be in
    /// flight. On success the basket and form are cleared. On failure the
    /// checkout returns to the contacts step with everything intact.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Checkout`] if the order cannot be assembled or a
    /// submission is already in flight, or [`ShopError::Api`] if the backend
    /// refuses it.
    pub async fn submit_order(&self) -> Result<OrderResult, ShopError> {
        let order = match self.app.pending_order() {
            Some(order) if !self.in_flight.get() => order,
            _ => self.app.begin_submit()?,
        };
        tracing::info!(items = order.items.len(), total = order.total, "Submitting order");

        self.in_flight.set(true);
        let outcome = self.api.submit_order(&order).await;
        self.in_flight.set(false);

        match outcome {
            Ok(result) => {
                self.app.complete_order(result.clone())?;
                Ok(result)
            },
            Err(error) => {
                metrics::counter!("shop.api.failures", "call" => "submit_order").increment(1);
                tracing::error!(%error, "Order submission failed");
                self.app.fail_order(error.to_string())?;
                Err(error.into())
            },
        }
    }
}

impl<A> Presenter<A> {
    /// Remove every subscription made by [`Presenter::wire`]
    pub fn unwire(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.app.events().off(id);
        }
    }
}

impl<A> Drop for Presenter<A> {
    fn drop(&mut self) {
        self.unwire();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mocks::{MockShopApi, product};
    use crate::model::OrderField;
    use larek_testing::EventRecorder;

    fn wired() -> Presenter<MockShopApi> {
        let app = AppData::new().unwrap();
        let api = MockShopApi::new(vec![product("P1", Some(100)), product("P2", Some(250))]);
        let mut presenter = Presenter::new(app, api);
        presenter.wire().unwrap();
        presenter
    }

    #[tokio::test]
    async fn card_events_drive_the_basket() {
        let presenter = wired();
        presenter.load_catalog().await.unwrap();
        let app = presenter.app();
        let p1 = product("P1", Some(100));

        app.events().emit(&ShopEvent::CardToggle(p1.clone()));
        assert!(app.is_product_already_added(&p1));

        app.events().emit(&ShopEvent::CardToggle(p1.clone()));
        assert!(!app.is_product_already_added(&p1));

        app.events().emit(&ShopEvent::BasketAdd(p1.clone()));
        app.events().emit(&ShopEvent::BasketRemove(p1));
        assert_eq!(app.basket_count(), 0);
    }

    #[tokio::test]
    async fn form_input_routes_through_patterns() {
        let presenter = wired();
        presenter.load_catalog().await.unwrap();
        let app = presenter.app();
        app.add_to_basket(&product("P1", Some(100))).unwrap();
        app.events().emit(&ShopEvent::OrderOpen);

        app.events().emit(&ShopEvent::order_input(OrderField::Payment, "card"));
        app.events().emit(&ShopEvent::order_input(OrderField::Address, "Moscow, 1"));

        let draft = app.order_draft();
        assert_eq!(draft.address, "Moscow, 1");
        assert!(draft.payment.is_some());
    }

    #[tokio::test]
    async fn modal_close_abandons_checkout() {
        let presenter = wired();
        presenter.load_catalog().await.unwrap();
        let app = presenter.app();
        app.add_to_basket(&product("P1", Some(100))).unwrap();
        app.events().emit(&ShopEvent::CardSelect(product("P1", Some(100))));
        app.events().emit(&ShopEvent::OrderOpen);
        assert_eq!(app.checkout_step(), CheckoutStep::AddressStep);

        app.events().emit(&ShopEvent::ModalClose);

        assert_eq!(app.checkout_step(), CheckoutStep::Cart);
        assert_eq!(app.preview(), None);
    }

    #[test]
    fn unwire_removes_subscriptions() {
        let mut presenter = wired();
        let before = presenter.app().events().subscriber_count();
        assert_eq!(before, 10);

        presenter.unwire();
        assert_eq!(presenter.app().events().subscriber_count(), 0);
    }

    #[tokio::test]
    async fn contacts_submit_freezes_the_order_for_submission() {
        let presenter = wired();
        presenter.load_catalog().await.unwrap();
        let app = presenter.app();
        app.add_to_basket(&product("P1", Some(100))).unwrap();
        app.begin_checkout().unwrap();
        app.set_order_field(OrderField::Payment, "card").unwrap();
        app.set_order_field(OrderField::Address, "Moscow, 1").unwrap();
        app.proceed_to_contacts().unwrap();
        app.set_email("e@e.com").unwrap();
        app.set_phone("+71234567890").unwrap();

        app.events().emit(&ShopEvent::ContactsSubmit);

        assert_eq!(app.checkout_step(), CheckoutStep::Submitting);
        let frozen = app.pending_order().unwrap();
        assert_eq!(frozen.total, 100);

        let result = presenter.submit_order().await.unwrap();

        assert_eq!(result.total, 100);
        assert_eq!(presenter.api().submitted(), vec![frozen]);
        assert_eq!(app.checkout_step(), CheckoutStep::Done);
    }

    #[tokio::test]
    async fn contacts_submit_with_invalid_contacts_stays_put() {
        let presenter = wired();
        presenter.load_catalog().await.unwrap();
        let app = presenter.app();
        app.add_to_basket(&product("P1", Some(100))).unwrap();
        app.begin_checkout().unwrap();
        app.set_order_field(OrderField::Payment, "cash").unwrap();
        app.set_order_field(OrderField::Address, "Moscow, 1").unwrap();
        app.proceed_to_contacts().unwrap();
        app.set_email("bad").unwrap();

        app.events().emit(&ShopEvent::ContactsSubmit);

        assert_eq!(app.checkout_step(), CheckoutStep::ContactsStep);
        assert_eq!(app.pending_order(), None);
        assert!(presenter.api().submitted().is_empty());
    }

    #[tokio::test]
    async fn failed_catalog_load_leaves_store_untouched() {
        let app = AppData::new().unwrap();
        let recorder = EventRecorder::attach(app.events());
        let api = MockShopApi::new(Vec::new()).with_catalog_error(crate::api::ApiError::Request("offline".to_string()));
        let presenter = Presenter::new(app, api);

        let error = presenter.load_catalog().await.unwrap_err();

        assert!(matches!(error, ShopError::Api(_)));
        assert!(presenter.app().catalog().is_empty());
        assert!(recorder.events().is_empty());
    }

    #[tokio::test]
    async fn load_product_sets_preview() {
        let presenter = wired();
        let recorder = EventRecorder::attach(presenter.app().events());

        let loaded = presenter.load_product(&ProductId::new("P2")).await.unwrap();

        assert_eq!(loaded.price, Some(250));
        assert_eq!(presenter.app().preview(), Some(ProductId::new("P2")));
        assert_eq!(recorder.names(), vec!["preview:change"]);
    }
}
