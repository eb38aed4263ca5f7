//! Backend access.
//!
//! [`ShopApi`] is the capability the presenter needs: load the catalog, load
//! one product, place an order. [`HttpShopApi`] implements it against the
//! Larek REST backend with `reqwest`.

use crate::config::ShopConfig;
use crate::model::{FinalOrder, OrderResult, Product, ProductId};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors talking to the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never got a response
    #[error("Request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error text from the body
        message: String,
    },

    /// The response body was not what we expected
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Boxed future returned by [`ShopApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Backend operations the storefront needs.
///
/// Returns boxed futures so the trait stays object-safe.
pub trait ShopApi {
    /// Every product on sale, with resolved image URLs
    fn fetch_catalog(&self) -> ApiFuture<'_, Vec<Product>>;

    /// One product, with a resolved image URL
    fn fetch_product<'a>(&'a self, id: &'a ProductId) -> ApiFuture<'a, Product>;

    /// Place an order
    fn submit_order<'a>(&'a self, order: &'a FinalOrder) -> ApiFuture<'a, OrderResult>;
}

/// `{ total, items }` list envelope
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    total: u64,
    items: Vec<T>,
}

/// `{ error }` body of a failed request
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`ShopApi`] over HTTP
#[derive(Clone, Debug)]
pub struct HttpShopApi {
    client: Client,
    api_url: String,
    cdn_url: String,
}

impl HttpShopApi {
    /// Create a client for the backend described by `config`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] if the HTTP client cannot be built.
    pub fn new(config: &ShopConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            cdn_url: config.cdn_url.clone(),
        })
    }

    /// Join a relative image path onto the CDN base. Absolute URLs pass through.
    fn resolve_image(&self, mut product: Product) -> Product {
        if !product.image.starts_with("http://") && !product.image.starts_with("https://") {
            product.image = format!(
                "{}/{}",
                self.cdn_url.trim_end_matches('/'),
                product.image.trim_start_matches('/')
            );
        }
        product
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let response = self
            .client
            .get(format!("{}{path}", self.api_url))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body).map_or(body, |parsed| parsed.error);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl ShopApi for HttpShopApi {
    fn fetch_catalog(&self) -> ApiFuture<'_, Vec<Product>> {
        Box::pin(async move {
            let list: ListResponse<Product> = self.get("/product").await?;
            tracing::debug!(total = list.total, "Catalog fetched");
            Ok(list.items.into_iter().map(|product| self.resolve_image(product)).collect())
        })
    }

    fn fetch_product<'a>(&'a self, id: &'a ProductId) -> ApiFuture<'a, Product> {
        Box::pin(async move {
            let product: Product = self.get(&format!("/product/{id}")).await?;
            Ok(self.resolve_image(product))
        })
    }

    fn submit_order<'a>(&'a self, order: &'a FinalOrder) -> ApiFuture<'a, OrderResult> {
        Box::pin(async move {
            tracing::debug!(items = order.items.len(), total = order.total, "POST /order");
            let response = self
                .client
                .post(format!("{}/order", self.api_url))
                .json(order)
                .send()
                .await
                .map_err(|e| ApiError::Request(e.to_string()))?;

            Self::decode(response).await
        })
    }
}
