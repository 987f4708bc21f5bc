//! Drives the HTTP client and `ClientContext` against an in-process axum backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use novashop_catalog::CatalogApi;
use novashop_client::{ClientConfig, ClientContext, HttpApiClient};
use novashop_core::{ApiError, Money, OrderId, ProductId};
use novashop_orders::{CheckoutDetails, CheckoutError, OrderApi, PaymentMethod, ShippingAddress};
use novashop_storage::{KeyValueStore, MemoryKeyValueStore};

const TOKEN: &str = "tok-1";

#[derive(Clone, Default)]
struct Backend {
    orders: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    cancelled: Arc<Mutex<Vec<i64>>>,
}

impl Backend {
    fn orders(&self) -> Vec<(Option<String>, Value)> {
        self.orders.lock().unwrap().clone()
    }
}

fn product_json(id: i64) -> Option<Value> {
    match id {
        1 => Some(json!({ "id": 1, "name": "Camiseta", "price": 59.9, "stockQuantity": 8 })),
        2 => Some(json!({ "id": 2, "name": "Boné", "price": 35.0, "stockQuantity": 1,
                          "category": { "id": 3, "name": "Acessórios" } })),
        _ => None,
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

async fn list_products() -> Json<Value> {
    Json(json!([product_json(1), product_json(2)]))
}

async fn get_product(Path(id): Path<i64>) -> Result<Json<Value>, (StatusCode, String)> {
    product_json(id).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            json!({ "status": 404, "message": format!("Produto não encontrado: {id}") }).to_string(),
        )
    })
}

async fn list_categories() -> Json<Value> {
    Json(json!([{ "id": 3, "name": "Acessórios" }]))
}

async fn login(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if body["password"] == "secret" {
        Ok(Json(json!({
            "token": TOKEN,
            "name": "Ana",
            "email": body["email"],
            "role": "CUSTOMER"
        })))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn create_order(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, String::new()));
    }

    let items = body["items"].as_array().cloned().unwrap_or_default();
    for item in &items {
        let id = item["productId"].as_i64().unwrap_or_default();
        let stock = product_json(id).map(|p| p["stockQuantity"].as_u64().unwrap_or(0));
        if item["quantity"].as_u64() > stock {
            return Err((
                StatusCode::CONFLICT,
                "Estoque insuficiente para o produto Boné".to_string(),
            ));
        }
    }

    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    backend.orders.lock().unwrap().push((auth, body.clone()));

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": 501,
            "orderNumber": "ORD-501",
            "status": "PENDING_PAYMENT",
            "items": items,
            "paymentMethod": body["paymentMethod"]
        })),
    ))
}

async fn list_orders(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!([{ "id": 501, "status": "SHIPPED", "items": [] }])))
}

async fn cancel_order(State(backend): State<Backend>, Path(id): Path<i64>) -> StatusCode {
    backend.cancelled.lock().unwrap().push(id);
    StatusCode::NO_CONTENT
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/:id", get(get_product))
        .route("/api/categories", get(list_categories))
        .route("/api/auth/login", post(login))
        .route("/api/orders", post(create_order).get(list_orders))
        .route("/api/orders/:id/cancel", patch(cancel_order))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api"), backend)
}

/// Every call fails, like an unreachable or locked database file.
#[derive(Debug)]
struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("disk unavailable")
    }

    async fn put(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("disk unavailable")
    }

    async fn remove(&self, _key: &str) -> anyhow::Result<()> {
        anyhow::bail!("disk unavailable")
    }
}

/// Reads succeed (nothing saved yet); writes fail, like a full disk.
#[derive(Debug, Default)]
struct ReadOnlyStore {
    inner: MemoryKeyValueStore,
}

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }

    async fn remove(&self, _key: &str) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
}

fn config_for(api_url: &str) -> ClientConfig {
    ClientConfig {
        api_url: api_url.to_string(),
        ..ClientConfig::default()
    }
}

fn details() -> CheckoutDetails {
    CheckoutDetails::new(
        ShippingAddress {
            street: "Rua das Flores".to_string(),
            number: "120".to_string(),
            complement: Some("apto 3".to_string()),
            neighborhood: "Centro".to_string(),
            city: "Curitiba".to_string(),
            state: "PR".to_string(),
            zip_code: "80010-000".to_string(),
        },
        PaymentMethod::Pix,
    )
}

#[tokio::test]
async fn catalog_calls_decode_products_and_surface_not_found() {
    let (url, _backend) = spawn_backend().await;
    let client = HttpApiClient::new(url);

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].category.as_ref().map(|c| c.name.as_str()), Some("Acessórios"));

    let product = client.get_product(ProductId::new(1)).await.unwrap();
    assert_eq!(product.price, Money::from_minor(59_90));
    assert_eq!(product.stock_quantity, 8);

    let err = client.get_product(ProductId::new(99)).await.unwrap_err();
    assert_eq!(err, ApiError::status(404, "Produto não encontrado: 99"));

    assert_eq!(client.list_categories().await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_error_body_falls_back_to_default_message() {
    let (url, _backend) = spawn_backend().await;
    let mut context = ClientContext::with_storage(config_for(&url), Arc::new(MemoryKeyValueStore::new()))
        .await
        .unwrap();

    let err = context.login("ana@example.com", "wrong").await.unwrap_err();
    let api_err = err.downcast_ref::<ApiError>().unwrap();
    assert_eq!(api_err, &ApiError::status(401, "invalid credentials"));
    assert!(!context.is_authenticated());
}

#[tokio::test]
async fn checkout_sends_bearer_token_and_clears_cart() {
    let (url, backend) = spawn_backend().await;
    let kv = Arc::new(MemoryKeyValueStore::new());
    let mut context = ClientContext::with_storage(config_for(&url), kv.clone())
        .await
        .unwrap();

    let user = context.login("ana@example.com", "secret").await.unwrap();
    assert_eq!(user.name, "Ana");

    context.add_to_cart(ProductId::new(1), 2).await.unwrap();
    context.add_to_cart(ProductId::new(2), 1).await.unwrap();
    assert_eq!(context.cart().total(), Money::from_minor(154_80));

    let order = context.place_order(details()).await.unwrap();
    assert_eq!(order.id, OrderId::new(501));
    assert_eq!(order.item_count(), 3);
    assert!(context.cart().is_empty());

    let orders = backend.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].0.as_deref(), Some("Bearer tok-1"));
    assert_eq!(
        orders[0].1["items"],
        json!([{ "productId": 1, "quantity": 2 }, { "productId": 2, "quantity": 1 }])
    );
    assert_eq!(orders[0].1["paymentMethod"], "PIX");

    context.cart().flush().await;
    assert!(kv.get("cart_data").await.unwrap().is_none());
}

#[tokio::test]
async fn rejected_order_keeps_cart_and_shows_server_message() {
    let (url, backend) = spawn_backend().await;
    let mut context = ClientContext::with_storage(config_for(&url), Arc::new(MemoryKeyValueStore::new()))
        .await
        .unwrap();
    context.login("ana@example.com", "secret").await.unwrap();

    context.add_to_cart(ProductId::new(2), 3).await.unwrap();
    let before = context.cart().snapshot();

    let err = context.place_order(details()).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Api(ApiError::Status { status: 409, .. })));
    assert_eq!(err.to_string(), "Estoque insuficiente para o produto Boné");
    assert_eq!(context.cart().snapshot(), before);
    assert!(backend.orders().is_empty());
}

#[tokio::test]
async fn order_endpoints_use_configured_token() {
    let (url, backend) = spawn_backend().await;
    let config = ClientConfig {
        auth_token: Some(TOKEN.to_string()),
        ..config_for(&url)
    };
    let context = ClientContext::with_storage(config, Arc::new(MemoryKeyValueStore::new()))
        .await
        .unwrap();
    assert!(context.is_authenticated());

    let orders = context.orders().list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);

    context.orders().cancel_order(OrderId::new(501)).await.unwrap();
    assert_eq!(*backend.cancelled.lock().unwrap(), vec![501]);
}

#[tokio::test]
async fn logout_keeps_the_persisted_cart() {
    let (url, _backend) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..config_for(&url)
    };

    let mut context = ClientContext::open(config.clone()).await.unwrap();
    context.login("ana@example.com", "secret").await.unwrap();
    context.add_to_cart(ProductId::new(1), 2).await.unwrap();
    context.logout().await.unwrap();
    assert!(!context.is_authenticated());
    context.close().await;

    let reopened = ClientContext::open(config).await.unwrap();
    assert!(!reopened.is_authenticated());
    assert!(reopened.current_user().await.unwrap().is_none());
    assert_eq!(reopened.cart().item_count(), 2);
    assert_eq!(reopened.cart().total(), Money::from_minor(119_80));
    reopened.close().await;
}

#[tokio::test]
async fn unreadable_storage_still_opens_a_working_client() {
    let (url, _backend) = spawn_backend().await;
    let config = ClientConfig {
        auth_token: Some(TOKEN.to_string()),
        ..config_for(&url)
    };

    let mut context = ClientContext::with_storage(config, Arc::new(BrokenStore))
        .await
        .unwrap();
    assert!(context.is_authenticated());
    assert!(context.cart().is_empty());

    context.add_to_cart(ProductId::new(1), 2).await.unwrap();
    context.cart_mut().update_quantity(ProductId::new(1), 3);
    context.cart().flush().await;

    assert_eq!(context.cart().item_count(), 3);
    assert_eq!(context.cart().total(), Money::from_minor(179_70));

    let order = context.place_order(details()).await.unwrap();
    assert_eq!(order.id, OrderId::new(501));
    assert!(context.cart().is_empty());
}

#[tokio::test]
async fn login_survives_a_failed_session_write() {
    let (url, backend) = spawn_backend().await;
    let mut context = ClientContext::with_storage(config_for(&url), Arc::new(ReadOnlyStore::default()))
        .await
        .unwrap();

    let user = context.login("ana@example.com", "secret").await.unwrap();
    assert_eq!(user.email, "ana@example.com");
    assert!(context.is_authenticated());

    context.add_to_cart(ProductId::new(2), 1).await.unwrap();
    context.place_order(details()).await.unwrap();
    assert_eq!(backend.orders()[0].0.as_deref(), Some("Bearer tok-1"));
}
