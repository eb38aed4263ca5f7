//! Storefront state.

use crate::model::{FinalOrder, FormErrors, OrderDraft, Product, ProductId};
use crate::order::{CheckoutStep, basket_total};

/// Everything the storefront tracks.
///
/// Owned by the store; only the reducer mutates it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Products on sale, in display order
    pub catalog: Vec<Product>,
    /// Products chosen for purchase, in insertion order, no duplicate ids
    pub basket: Vec<Product>,
    /// Checkout form contents
    pub draft: OrderDraft,
    /// Errors of the most recently validated field group
    pub form_errors: FormErrors,
    /// Product shown in the preview
    pub preview: Option<ProductId>,
    /// Checkout progress
    pub step: CheckoutStep,
    /// The order being submitted, while `step` is `Submitting`
    pub pending_order: Option<FinalOrder>,
}

impl AppState {
    /// Sum of basket prices
    #[must_use]
    pub fn total(&self) -> u64 {
        basket_total(&self.basket)
    }

    /// Whether a product with this id is in the basket
    #[must_use]
    pub fn in_basket(&self, id: &ProductId) -> bool {
        self.basket.iter().any(|product| &product.id == id)
    }

    /// Catalog entry with this id
    #[must_use]
    pub fn catalog_product(&self, id: &ProductId) -> Option<&Product> {
        self.catalog.iter().find(|product| &product.id == id)
    }

    /// The previewed product, resolved against the catalog
    #[must_use]
    pub fn preview_product(&self) -> Option<&Product> {
        self.preview.as_ref().and_then(|id| self.catalog_product(id))
    }
}
