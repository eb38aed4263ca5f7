//! Storefront events.
//!
//! Names follow the `source:action` convention the views use. Form input
//! events carry the group and field in the name (`order.address:change`) so a
//! single pattern subscription can route a whole form.

use crate::model::{ContactsField, FormErrors, OrderDraft, OrderField, OrderResult, Product};
use crate::order::CheckoutStep;
use larek_core::Event;
use std::borrow::Cow;

/// Wire names of every [`ShopEvent`]
pub mod topic {
    /// Catalog replaced
    pub const PRODUCTS_CHANGE: &str = "products:change";
    /// Basket contents changed
    pub const BASKET_CHANGE: &str = "basket:change";
    /// Preview selection changed
    pub const PREVIEW_CHANGE: &str = "preview:change";
    /// Address step revalidated
    pub const PAYMENT_FORM_INVALID: &str = "formPaymentInvalid:change";
    /// Contacts step revalidated
    pub const CONTACTS_FORM_INVALID: &str = "formContactsInvalid:change";
    /// A form group became valid
    pub const ORDER_READY: &str = "order:ready";
    /// Checkout step changed
    pub const CHECKOUT_CHANGE: &str = "checkout:change";
    /// Backend accepted the order
    pub const ORDER_PLACED: &str = "order:placed";

    /// Add to basket requested
    pub const BASKET_ADD: &str = "basket:add";
    /// Remove from basket requested
    pub const BASKET_REMOVE: &str = "basket:remove";
    /// Card's basket button pressed
    pub const CARD_BASKET: &str = "card:basket";
    /// Card opened for preview
    pub const CARD_SELECT: &str = "card:select";
    /// Address input changed
    pub const ORDER_ADDRESS_CHANGE: &str = "order.address:change";
    /// Payment button pressed
    pub const ORDER_PAYMENT_CHANGE: &str = "order.payment:change";
    /// Email input changed
    pub const CONTACTS_EMAIL_CHANGE: &str = "contacts.email:change";
    /// Phone input changed
    pub const CONTACTS_PHONE_CHANGE: &str = "contacts.phone:change";
    /// Basket opened
    pub const BASKET_OPEN: &str = "basket:open";
    /// Checkout started from the basket
    pub const ORDER_OPEN: &str = "order:open";
    /// Address step submitted
    pub const ORDER_SUBMIT: &str = "order:submit";
    /// Contacts step submitted
    pub const CONTACTS_SUBMIT: &str = "contacts:submit";
    /// Modal shown
    pub const MODAL_OPEN: &str = "modal:open";
    /// Modal closed
    pub const MODAL_CLOSE: &str = "modal:close";

    /// Every name above
    pub const ALL: &[&str] = &[
        PRODUCTS_CHANGE,
        BASKET_CHANGE,
        PREVIEW_CHANGE,
        PAYMENT_FORM_INVALID,
        CONTACTS_FORM_INVALID,
        ORDER_READY,
        CHECKOUT_CHANGE,
        ORDER_PLACED,
        BASKET_ADD,
        BASKET_REMOVE,
        CARD_BASKET,
        CARD_SELECT,
        ORDER_ADDRESS_CHANGE,
        ORDER_PAYMENT_CHANGE,
        CONTACTS_EMAIL_CHANGE,
        CONTACTS_PHONE_CHANGE,
        BASKET_OPEN,
        ORDER_OPEN,
        ORDER_SUBMIT,
        CONTACTS_SUBMIT,
        MODAL_OPEN,
        MODAL_CLOSE,
    ];
}

/// Everything published on the storefront bus.
///
/// The first group is published by the store after a state change. The
/// second group comes from the views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShopEvent {
    /// `products:change`
    ProductsChanged {
        /// The new catalog
        catalog: Vec<Product>,
    },
    /// `basket:change`
    BasketChanged,
    /// `preview:change`
    PreviewChanged(Product),
    /// `formPaymentInvalid:change`
    PaymentFormValidated(FormErrors),
    /// `formContactsInvalid:change`
    ContactsFormValidated(FormErrors),
    /// `order:ready`
    OrderReady(OrderDraft),
    /// `checkout:change`
    CheckoutChanged(CheckoutStep),
    /// `order:placed`
    OrderPlaced(OrderResult),

    /// `basket:add`
    BasketAdd(Product),
    /// `basket:remove`
    BasketRemove(Product),
    /// `card:basket`
    CardToggle(Product),
    /// `card:select`
    CardSelect(Product),
    /// `order.<field>:change`
    OrderInput {
        /// Edited field
        field: OrderField,
        /// Raw input value
        value: String,
    },
    /// `contacts.<field>:change`
    ContactsInput {
        /// Edited field
        field: ContactsField,
        /// Raw input value
        value: String,
    },
    /// `basket:open`
    BasketOpen,
    /// `order:open`
    OrderOpen,
    /// `order:submit`
    OrderSubmit,
    /// `contacts:submit`
    ContactsSubmit,
    /// `modal:open`
    ModalOpen,
    /// `modal:close`
    ModalClose,
}

impl ShopEvent {
    /// Form input event for the address step
    #[must_use]
    pub fn order_input(field: OrderField, value: impl Into<String>) -> Self {
        Self::OrderInput {
            field,
            value: value.into(),
        }
    }

    /// Form input event for the contacts step
    #[must_use]
    pub fn contacts_input(field: ContactsField, value: impl Into<String>) -> Self {
        Self::ContactsInput {
            field,
            value: value.into(),
        }
    }

    const fn topic(&self) -> &'static str {
        match self {
            Self::ProductsChanged { .. } => topic::PRODUCTS_CHANGE,
            Self::BasketChanged => topic::BASKET_CHANGE,
            Self::PreviewChanged(_) => topic::PREVIEW_CHANGE,
            Self::PaymentFormValidated(_) => topic::PAYMENT_FORM_INVALID,
            Self::ContactsFormValidated(_) => topic::CONTACTS_FORM_INVALID,
            Self::OrderReady(_) => topic::ORDER_READY,
            Self::CheckoutChanged(_) => topic::CHECKOUT_CHANGE,
            Self::OrderPlaced(_) => topic::ORDER_PLACED,
            Self::BasketAdd(_) => topic::BASKET_ADD,
            Self::BasketRemove(_) => topic::BASKET_REMOVE,
            Self::CardToggle(_) => topic::CARD_BASKET,
            Self::CardSelect(_) => topic::CARD_SELECT,
            Self::OrderInput { field, .. } => match field {
                OrderField::Address => topic::ORDER_ADDRESS_CHANGE,
                OrderField::Payment => topic::ORDER_PAYMENT_CHANGE,
            },
            Self::ContactsInput { field, .. } => match field {
                ContactsField::Email => topic::CONTACTS_EMAIL_CHANGE,
                ContactsField::Phone => topic::CONTACTS_PHONE_CHANGE,
            },
            Self::BasketOpen => topic::BASKET_OPEN,
            Self::OrderOpen => topic::ORDER_OPEN,
            Self::OrderSubmit => topic::ORDER_SUBMIT,
            Self::ContactsSubmit => topic::CONTACTS_SUBMIT,
            Self::ModalOpen => topic::MODAL_OPEN,
            Self::ModalClose => topic::MODAL_CLOSE,
        }
    }
}

impl Event for ShopEvent {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.topic())
    }

    fn topics() -> &'static [&'static str] {
        topic::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_name_is_a_known_topic() {
        let samples = [
            ShopEvent::BasketChanged,
            ShopEvent::CheckoutChanged(CheckoutStep::Cart),
            ShopEvent::order_input(OrderField::Address, "x"),
            ShopEvent::order_input(OrderField::Payment, "card"),
            ShopEvent::contacts_input(ContactsField::Email, "x"),
            ShopEvent::contacts_input(ContactsField::Phone, "x"),
            ShopEvent::ModalClose,
        ];
        for event in samples {
            assert!(ShopEvent::is_known_topic(&event.name()), "{}", event.name());
        }
    }

    #[test]
    fn topics_are_unique() {
        let unique: HashSet<_> = topic::ALL.iter().collect();
        assert_eq!(unique.len(), topic::ALL.len());
    }

    #[test]
    fn input_names_carry_the_field() {
        assert_eq!(
            ShopEvent::order_input(OrderField::Address, "Moscow").name(),
            "order.address:change"
        );
        assert_eq!(
            ShopEvent::contacts_input(ContactsField::Phone, "8").name(),
            "contacts.phone:change"
        );
    }
}
