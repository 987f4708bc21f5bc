//! `reqwest` implementation of the marketplace API seams.

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use novashop_catalog::{CatalogApi, Category, Product};
use novashop_core::{ApiError, OrderId, ProductId};
use novashop_orders::{CreateOrderRequest, Order, OrderApi};

use crate::auth::{AuthApi, AuthResponse, LoginRequest, RegisterRequest};

/// HTTP client for the marketplace REST API.
///
/// Attaches `Authorization: Bearer <token>` whenever a token is set.
#[derive(Debug)]
pub struct HttpApiClient {
    api_url: String,
    client: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl HttpApiClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            token: RwLock::new(None),
        }
    }

    pub fn with_token(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = Self::new(api_url);
        client.set_token(Some(token.into()));
        client
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder, fallback: &str) -> Result<Response, ApiError> {
        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| fallback.to_string());
        tracing::debug!(status = status.as_u16(), %message, "api request failed");
        Err(ApiError::status(status.as_u16(), message))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let resp = self.send(req, fallback).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// The server's error text: `message` of a JSON body, else the trimmed body.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            if !message.trim().is_empty() {
                return Some(message.to_string());
            }
        }
    }
    Some(body.to_string())
}

#[async_trait]
impl CatalogApi for HttpApiClient {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let req = self.client.get(self.url("products"));
        self.send_json(req, "failed to load products").await
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let req = self.client.get(self.url(&format!("products/{id}")));
        self.send_json(req, "failed to load product").await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let req = self.client.get(self.url("categories"));
        self.send_json(req, "failed to load categories").await
    }
}

#[async_trait]
impl OrderApi for HttpApiClient {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        if self.token().is_none() {
            return Err(ApiError::Unauthenticated);
        }
        let req = self.client.post(self.url("orders")).json(request);
        self.send_json(req, "failed to create order").await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        if self.token().is_none() {
            return Err(ApiError::Unauthenticated);
        }
        let req = self.client.get(self.url("orders"));
        self.send_json(req, "failed to load orders").await
    }

    async fn cancel_order(&self, id: OrderId) -> Result<(), ApiError> {
        if self.token().is_none() {
            return Err(ApiError::Unauthenticated);
        }
        let req = self.client.patch(self.url(&format!("orders/{id}/cancel")));
        self.send(req, "failed to cancel order").await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let req = self.client.post(self.url("auth/login")).json(request);
        self.send_json(req, "invalid credentials").await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let req = self.client.post(self.url("auth/register")).json(request);
        self.send(req, "registration failed").await?;
        Ok(())
    }
}
