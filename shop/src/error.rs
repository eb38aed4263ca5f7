//! Error types for the storefront.

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::model::{FormErrors, ProductId};
use crate::order::CheckoutStep;
use crate::validation::ValidatorError;
use larek_core::EventBusError;
use larek_runtime::StoreError;
use thiserror::Error;

/// Basket operations the store refuses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BasketError {
    /// The product is already in the basket
    #[error("product {0} is already in the basket")]
    AlreadyInBasket(ProductId),

    /// The product has no price and cannot be bought
    #[error("product {0} has no price")]
    Priceless(ProductId),

    /// The product is not part of the current catalog
    #[error("product {0} is not in the catalog")]
    NotInCatalog(ProductId),
}

/// Checkout operations the store refuses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The checkout cannot move from `from` to `to`
    #[error("cannot move checkout from {from} to {to}")]
    InvalidTransition {
        /// Current step
        from: CheckoutStep,
        /// Requested step
        to: CheckoutStep,
    },

    /// Nothing to order
    #[error("basket is empty")]
    EmptyBasket,

    /// The order form does not validate
    #[error("order form is invalid: {}", .0.summary())]
    InvalidDraft(FormErrors),
}

/// Any storefront failure
#[derive(Error, Debug)]
pub enum ShopError {
    /// Basket precondition failed
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// Checkout precondition failed
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Backend call failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation rules failed to compile
    #[error(transparent)]
    Validator(#[from] ValidatorError),

    /// Subscription refused by the event bus
    #[error("Event bus error: {0}")]
    Bus(#[from] EventBusError),

    /// An action was sent while the state was borrowed
    #[error("Store is busy")]
    StoreBusy,
}

impl From<StoreError<Self>> for ShopError {
    fn from(error: StoreError<Self>) -> Self {
        match error {
            StoreError::Rejected(error) => error,
            StoreError::Busy => Self::StoreBusy,
        }
    }
}

impl ShopError {
    /// The basket rejection, if this is one
    #[must_use]
    pub const fn as_basket(&self) -> Option<&BasketError> {
        match self {
            Self::Basket(error) => Some(error),
            _ => None,
        }
    }

    /// The checkout rejection, if this is one
    #[must_use]
    pub const fn as_checkout(&self) -> Option<&CheckoutError> {
        match self {
            Self::Checkout(error) => Some(error),
            _ => None,
        }
    }
}
