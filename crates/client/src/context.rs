//! Per-process client state: storage, session, cart and API.

use std::sync::Arc;

use anyhow::Context as _;

use novashop_cart::CartStore;
use novashop_catalog::{CatalogApi, Product};
use novashop_core::{ApiError, ProductId};
use novashop_orders::{Checkout, CheckoutDetails, CheckoutError, CheckoutSummary, Order, OrderApi};
use novashop_storage::{KeyValueStore, SqliteKeyValueStore};

use crate::auth::{AuthApi, LoginRequest, RegisterRequest, User};
use crate::config::ClientConfig;
use crate::http::HttpApiClient;
use crate::session::SessionStore;

/// Everything a client front end needs, wired once at startup.
#[derive(Debug)]
pub struct ClientContext {
    config: ClientConfig,
    api: Arc<HttpApiClient>,
    session: SessionStore,
    cart: CartStore,
    checkout: Checkout,
}

impl ClientContext {
    /// Open the SQLite store from `config` and restore cart and session.
    pub async fn open(config: ClientConfig) -> anyhow::Result<Self> {
        let storage = match &config.data_dir {
            Some(dir) => SqliteKeyValueStore::in_data_dir(dir.clone()),
            None => SqliteKeyValueStore::at_default_location()
                .context("failed to locate the application data directory")?,
        };
        tracing::info!(db_path = ?storage.db_path(), api_url = %config.api_url, "opening client");
        Self::with_storage(config, Arc::new(storage)).await
    }

    /// Same as [`ClientContext::open`] over an arbitrary store.
    pub async fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> anyhow::Result<Self> {
        let api = Arc::new(HttpApiClient::new(config.api_url.clone()));
        let session = SessionStore::new(storage.clone());

        let saved = match session.token().await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!("failed to read saved session: {err:?}");
                None
            }
        };
        api.set_token(saved.or_else(|| config.auth_token.clone()));

        let cart = CartStore::open(storage).await;
        let checkout = Checkout::new(api.clone());

        Ok(Self {
            config,
            api,
            session,
            cart,
            checkout,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    pub fn catalog(&self) -> &dyn CatalogApi {
        &*self.api
    }

    pub fn orders(&self) -> &dyn OrderApi {
        &*self.api
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.token().is_some()
    }

    pub async fn current_user(&self) -> anyhow::Result<Option<User>> {
        self.session.user().await
    }

    /// Fetch the product and add it to the cart with the current price snapshot.
    pub async fn add_to_cart(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Product, ApiError> {
        let product = self.api.get_product(product_id).await?;
        self.cart.add_item(product.clone(), quantity);
        Ok(product)
    }

    pub async fn login(
        &mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> anyhow::Result<User> {
        let request = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let auth = self.api.login(&request).await?;
        self.api.set_token(Some(auth.token.clone()));

        // The server accepted the login; a local write failure only costs
        // the session on the next launch.
        if let Err(err) = self.session.save(&auth).await {
            tracing::error!("failed to persist session: {err:?}");
        }
        Ok(User::from(&auth))
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.api.register(request).await
    }

    /// Forget the session. The cart is kept for the next sign-in.
    pub async fn logout(&mut self) -> anyhow::Result<()> {
        self.session.logout().await?;
        self.api.set_token(None);
        Ok(())
    }

    /// Estimated totals for the checkout screen.
    pub fn summary(&self) -> CheckoutSummary {
        CheckoutSummary::from_cart(self.cart.cart(), &self.config.shipping)
    }

    /// Submit the cart as an order; clears it only on success.
    pub async fn place_order(&mut self, details: CheckoutDetails) -> Result<Order, CheckoutError> {
        self.checkout.submit(&mut self.cart, details).await
    }

    /// Flush pending cart writes and stop the background writer.
    pub async fn close(self) {
        self.cart.close().await;
    }
}
