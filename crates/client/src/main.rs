//! Headless client entry point: restore state and report the cart.

use novashop_client::{ClientConfig, ClientContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env()?;
    config.init_logging();

    let context = ClientContext::open(config).await?;
    let summary = context.summary();

    tracing::info!(
        authenticated = context.is_authenticated(),
        lines = context.cart().lines().len(),
        items = summary.item_count,
        subtotal = %summary.subtotal,
        shipping = %summary.shipping,
        total = %summary.total,
        "cart restored"
    );

    match context.catalog().list_products().await {
        Ok(products) => tracing::info!(count = products.len(), "catalog reachable"),
        Err(err) => tracing::warn!("catalog unavailable: {err}"),
    }

    context.close().await;
    Ok(())
}
