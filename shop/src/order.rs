//! Checkout steps and order assembly.
//!
//! The checkout is a small state machine:
//!
//! ```text
//! Cart ─► AddressStep ─► ContactsStep ─► Submitting ─► Done ─► AddressStep
//!                             ▲               │
//!                             └── (failure) ──┘
//! ```
//!
//! Every step except `Submitting` can be abandoned back to `Cart`.
//! [`assemble`] turns the basket and draft into the payload sent to the
//! backend.

use crate::error::CheckoutError;
use crate::model::{FinalOrder, OrderDraft, Product};
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the customer is in the checkout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutStep {
    /// Browsing, basket possibly filled
    #[default]
    Cart,
    /// Choosing payment and delivery address
    AddressStep,
    /// Entering email and phone
    ContactsStep,
    /// Order sent, awaiting the backend
    Submitting,
    /// Order placed
    Done,
}

impl CheckoutStep {
    /// Whether the machine may move from `self` to `to`
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Cart | Self::Done, Self::AddressStep)
                | (Self::AddressStep, Self::ContactsStep)
                | (Self::ContactsStep, Self::Submitting)
                | (Self::Submitting, Self::Done | Self::ContactsStep)
                | (
                    Self::Cart | Self::AddressStep | Self::ContactsStep | Self::Done,
                    Self::Cart
                )
        )
    }

    /// Move to `to`
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] if the move is not allowed.
    pub fn transition(self, to: Self) -> Result<Self, CheckoutError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(CheckoutError::InvalidTransition { from: self, to })
        }
    }

    /// Whether the draft may be read as a finished order
    #[must_use]
    pub const fn allows_assembly(self) -> bool {
        matches!(self, Self::ContactsStep | Self::Submitting)
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cart => "cart",
            Self::AddressStep => "address",
            Self::ContactsStep => "contacts",
            Self::Submitting => "submitting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Sum of basket prices; priceless entries count as zero.
///
/// Saturates at `u64::MAX` instead of overflowing.
#[must_use]
pub fn basket_total(basket: &[Product]) -> u64 {
    basket
        .iter()
        .filter_map(|product| product.price)
        .fold(0, u64::saturating_add)
}

/// Build the order payload from the basket and a filled-in draft.
///
/// `items` keeps basket order.
///
/// # Errors
///
/// - [`CheckoutError::EmptyBasket`] if there is nothing to buy
/// - [`CheckoutError::InvalidDraft`] with the errors of both field groups
///   if the draft does not validate
pub fn assemble(draft: &OrderDraft, basket: &[Product], validator: &Validator) -> Result<FinalOrder, CheckoutError> {
    if basket.is_empty() {
        return Err(CheckoutError::EmptyBasket);
    }

    let errors = validator.validate_all(draft);
    let Some(payment) = draft.payment.filter(|_| errors.is_valid()) else {
        return Err(CheckoutError::InvalidDraft(errors));
    };

    Ok(FinalOrder {
        payment,
        email: draft.email.clone(),
        phone: draft.phone.clone(),
        address: draft.address.clone(),
        total: basket_total(basket),
        items: basket.iter().map(|product| product.id.clone()).collect(),
    })
}
