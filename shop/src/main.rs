//! `larek`: load the storefront catalog and print it.
//!
//! Reads the backend location from `LAREK_API_ORIGIN` (see
//! [`ShopConfig::from_env`]).

use larek_shop::{AppData, HttpShopApi, Presenter, ShopConfig, ShopEvent};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "larek=info,larek_shop=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ShopConfig::from_env()?;
    tracing::info!(api = %config.api_url, cdn = %config.cdn_url, "Starting");

    let app = AppData::new()?;
    app.events().on("products:change", |event| {
        if let ShopEvent::ProductsChanged { catalog } = event {
            tracing::info!(count = catalog.len(), "Catalog rendered");
        }
        Ok(())
    })?;

    let api = HttpShopApi::new(&config)?;
    let mut presenter = Presenter::new(app.clone(), api);
    presenter.wire()?;
    presenter.load_catalog().await?;

    println!("=== Larek catalog ===\n");
    for product in app.catalog() {
        let price = product
            .price
            .map_or_else(|| "priceless".to_string(), |price| format!("{price} synapses"));
        println!("{:<40} {:<14} {price}", product.title, product.category);
    }

    Ok(())
}
