//! Actions accepted by the storefront store.

use crate::model::{ContactsField, OrderField, OrderResult, PaymentMethod, Product};

/// Every change the store can make.
///
/// Sent through [`AppData`](crate::app::AppData), which exposes one method
/// per action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShopAction {
    /// Replace the catalog
    SetCatalog(Vec<Product>),
    /// Append a product to the basket
    AddToBasket(Product),
    /// Remove a product from the basket
    RemoveFromBasket(Product),
    /// Add if absent, remove if present
    ToggleBasket(Product),
    /// Empty the basket
    InitBasket,

    /// Show a product in the preview
    SetPreview(Product),
    /// Close the preview
    ClearPreview,

    /// Choose the payment method
    SetPayment(PaymentMethod),
    /// Set the delivery address
    SetAddress(String),
    /// Set the contact email
    SetEmail(String),
    /// Set the contact phone
    SetPhone(String),
    /// Raw input on the address step
    SetOrderField {
        /// Edited field
        field: OrderField,
        /// Raw input value
        value: String,
    },
    /// Raw input on the contacts step
    SetContactsField {
        /// Edited field
        field: ContactsField,
        /// Raw input value
        value: String,
    },

    /// Open the address step
    BeginCheckout,
    /// Leave the address step for the contacts step
    ProceedToContacts,
    /// Freeze the order for submission
    BeginSubmit,
    /// The backend accepted the order
    CompleteOrder(OrderResult),
    /// The backend refused the order or could not be reached
    FailOrder {
        /// What went wrong, for the log
        reason: String,
    },
    /// Abandon the checkout
    CancelCheckout,
}
