//! Shared helpers for HTTP API tests.
//!
//! Every test app runs on fresh in-memory backends, so tests are
//! independent and need no external services.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use diskquota_api::{AppState, build_app};
use diskquota_core::config::{AppConfig, DatabaseBackend};
use diskquota_core::types::id::{AccountId, CollectionId, ItemId};
use diskquota_database::{MemoryInventory, MemorySettingsStore};
use diskquota_entity::asset::Asset;
use diskquota_entity::units::mb_to_bytes;
use diskquota_service::QuotaEngine;

/// Admin token configured for every test app.
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Shared state, for inspecting the engine directly
    pub state: AppState,
    /// Settings store behind the engine
    pub settings: MemorySettingsStore,
    /// Asset inventory behind the engine
    pub inventory: MemoryInventory,
}

impl TestApp {
    /// Create a test app with the default seeds (500 MB per account,
    /// 1000 MB per collection, 15% warning threshold).
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Memory;
        config.api.admin_token = ADMIN_TOKEN.to_string();

        let settings = MemorySettingsStore::new();
        let inventory = MemoryInventory::new();

        let engine = QuotaEngine::new(
            Arc::new(settings.clone()),
            Arc::new(inventory.clone()),
            &config.quota,
        )
        .await
        .expect("Failed to build quota engine");

        let cors = config.server.cors.clone();
        let state = AppState::new(config, engine);
        let router = build_app(state.clone(), &cors);

        Self {
            router,
            state,
            settings,
            inventory,
        }
    }

    /// Store an asset of `mb` megabytes owned by `owner`.
    pub async fn add_usage(&self, owner: Uuid, item: Option<Uuid>, mb: u64) {
        self.inventory
            .add_asset(Asset::new(
                AccountId::from_uuid(owner),
                item.map(ItemId::from_uuid),
                mb_to_bytes(mb),
            ))
            .await;
    }

    /// Attach an item directly to a collection.
    pub async fn assign_item(&self, item: Uuid, collection: Uuid) {
        self.inventory
            .assign_item(ItemId::from_uuid(item), CollectionId::from_uuid(collection))
            .await;
    }

    /// Set an override through the admin API, asserting success.
    pub async fn set_quota(&self, kind: &str, id: Uuid, limit_mb: i64) {
        let response = self
            .admin_request(
                "PUT",
                &format!("/api/admin/quotas/{kind}/{id}"),
                Some(serde_json::json!({ "limit_mb": limit_mb })),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Setting quota failed: {:?}",
            response.body
        );
    }

    /// Submit an admission check for a creation.
    pub async fn check(&self, owner: Uuid, item: Option<Uuid>, size_bytes: u64) -> TestResponse {
        self.request(
            "POST",
            "/api/admissions",
            Some(serde_json::json!({
                "owner_id": owner,
                "item_id": item,
                "size_bytes": size_bytes,
            })),
            None,
        )
        .await
    }

    /// Make a request carrying the configured admin token.
    pub async fn admin_request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> TestResponse {
        self.request(method, path, body, Some(ADMIN_TOKEN)).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        admin_token: Option<&str>,
    ) -> TestResponse {
        send(self.router.clone(), method, path, body, admin_token).await
    }
}

/// Send one request through `router`. Usable from spawned tasks.
pub async fn send(
    router: Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    admin_token: Option<&str>,
) -> TestResponse {
    let body_str = body
        .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
        .unwrap_or_default();

    let mut req = Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json");

    if let Some(token) = admin_token {
        req = req.header("x-admin-token", token);
    }

    let req = req
        .body(Body::from(body_str))
        .expect("Failed to build request");

    let response = router.oneshot(req).await.expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    TestResponse { status, body }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` payload of a successful response.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}
