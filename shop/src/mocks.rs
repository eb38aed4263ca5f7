//! In-memory stand-ins for tests and demos.

use crate::api::{ApiError, ApiFuture, ShopApi};
use crate::model::{FinalOrder, OrderResult, Product, ProductId};
use std::sync::Mutex;

/// A catalog product with placeholder text fields
#[must_use]
pub fn product(id: &str, price: Option<u64>) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        description: None,
        category: "other".to_string(),
        price,
        image: format!("/{id}.svg"),
    }
}

/// [`ShopApi`] answering from memory
///
/// Records every submitted order so tests can inspect what was sent.
#[derive(Debug)]
pub struct MockShopApi {
    catalog: Result<Vec<Product>, ApiError>,
    order_result: Option<Result<OrderResult, ApiError>>,
    submitted: Mutex<Vec<FinalOrder>>,
}

impl MockShopApi {
    /// Serve `catalog` and accept every order, charging its total
    #[must_use]
    pub const fn new(catalog: Vec<Product>) -> Self {
        Self {
            catalog: Ok(catalog),
            order_result: None,
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Answer order submissions with `result`
    #[must_use]
    pub fn with_order_result(mut self, result: OrderResult) -> Self {
        self.order_result = Some(Ok(result));
        self
    }

    /// Fail order submissions with `error`
    #[must_use]
    pub fn with_order_error(mut self, error: ApiError) -> Self {
        self.order_result = Some(Err(error));
        self
    }

    /// Fail catalog requests with `error`
    #[must_use]
    pub fn with_catalog_error(mut self, error: ApiError) -> Self {
        self.catalog = Err(error);
        self
    }

    /// Orders received so far
    #[must_use]
    pub fn submitted(&self) -> Vec<FinalOrder> {
        self.submitted.lock().map(|orders| orders.clone()).unwrap_or_default()
    }
}

impl ShopApi for MockShopApi {
    fn fetch_catalog(&self) -> ApiFuture<'_, Vec<Product>> {
        let result = self.catalog.clone();
        Box::pin(async move { result })
    }

    fn fetch_product<'a>(&'a self, id: &'a ProductId) -> ApiFuture<'a, Product> {
        let result = match &self.catalog {
            Ok(catalog) => catalog.iter().find(|product| &product.id == id).cloned().ok_or_else(|| ApiError::Status {
                status: 404,
                message: "NotFound".to_string(),
            }),
            Err(error) => Err(error.clone()),
        };
        Box::pin(async move { result })
    }

    fn submit_order<'a>(&'a self, order: &'a FinalOrder) -> ApiFuture<'a, OrderResult> {
        let count = self.submitted.lock().map_or(0, |mut submitted| {
            submitted.push(order.clone());
            submitted.len()
        });
        let result = self.order_result.clone().unwrap_or_else(|| {
            Ok(OrderResult {
                id: format!("mock-order-{count}"),
                total: order.total,
            })
        });
        Box::pin(async move { result })
    }
}
