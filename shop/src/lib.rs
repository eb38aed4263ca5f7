//! # Larek Shop
//!
//! Client-side state for the Larek storefront: catalog, basket, checkout
//! form and its validation, published to the views over an event bus.
//!
//! ## Overview
//!
//! - [`AppData`]: the store. Every mutation goes through the reducer and
//!   announces itself with an event (`basket:change`, `order:ready`, ...).
//! - [`Validator`]: address and contact rules, producing [`FormErrors`].
//! - [`order`]: the checkout state machine and order assembly.
//! - [`Presenter`]: routes view events into the store and runs the
//!   catalog-load and order-submit flows against a [`ShopApi`].
//!
//! ## Example
//!
//! ```no_run
//! use larek_shop::{AppData, HttpShopApi, Presenter, ShopConfig, ShopError};
//!
//! # async fn run() -> Result<(), ShopError> {
//! let app = AppData::new()?;
//! app.events().on("basket:change", |_| Ok(()))?;
//!
//! let api = HttpShopApi::new(&ShopConfig::from_env()?)?;
//! let mut presenter = Presenter::new(app.clone(), api);
//! presenter.wire()?;
//! presenter.load_catalog().await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod mocks;
pub mod model;
pub mod order;
pub mod presenter;
pub mod reducer;
pub mod state;
pub mod validation;

pub use actions::ShopAction;
pub use api::{ApiError, HttpShopApi, ShopApi};
pub use app::AppData;
pub use config::{ConfigError, ShopConfig};
pub use error::{BasketError, CheckoutError, ShopError};
pub use events::ShopEvent;
pub use model::{
    ContactsField, FinalOrder, FormErrors, FormField, OrderDraft, OrderField, OrderResult, PaymentMethod, Product,
    ProductId,
};
pub use order::{CheckoutStep, assemble};
pub use presenter::Presenter;
pub use reducer::{AppReducer, ShopEnvironment};
pub use state::AppState;
pub use validation::{FieldGroup, Validator};
