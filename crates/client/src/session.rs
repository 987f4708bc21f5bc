//! Persisted login session.

use std::sync::Arc;

use novashop_storage::{KeyValueStore, load_json, save_json};

use crate::auth::{AuthResponse, User};

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "user_data";

/// Token and user profile kept across launches.
///
/// Independent of the cart: signing out leaves `cart_data` alone.
#[derive(Debug, Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, auth: &AuthResponse) -> anyhow::Result<User> {
        let user = User::from(auth);
        self.store.put(TOKEN_KEY, &auth.token).await?;
        save_json(self.store.as_ref(), USER_KEY, &user).await?;
        tracing::info!(email = %user.email, "session saved");
        Ok(user)
    }

    pub async fn token(&self) -> anyhow::Result<Option<String>> {
        self.store.get(TOKEN_KEY).await
    }

    pub async fn user(&self) -> anyhow::Result<Option<User>> {
        load_json(self.store.as_ref(), USER_KEY).await
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(self.token().await, Ok(Some(_)))
    }

    pub async fn logout(&self) -> anyhow::Result<()> {
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(USER_KEY).await?;
        tracing::info!("session cleared");
        Ok(())
    }
}
