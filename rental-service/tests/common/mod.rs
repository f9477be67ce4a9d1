//! In-process harness: the full router over an in-memory store.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use rental_service::{
    build_router,
    config::{
        DatabaseConfig, Environment, JwtConfig, RateLimitConfig, RentalConfig, SecurityConfig,
    },
    services::{MemoryStore, Store},
    AppState,
};
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const PASSWORD: &str = "secreto123";

pub fn test_config() -> RentalConfig {
    RentalConfig {
        common: service_core::config::Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "rental-service-test".to_string(),
        service_version: "test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            url: Secret::new("postgres://unused".to_string()),
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: Secret::new(TEST_JWT_SECRET.to_string()),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        rate_limit: RateLimitConfig {
            login_attempts: 1000,
            login_window_seconds: 60,
            register_attempts: 1000,
            register_window_seconds: 60,
            global_ip_limit: 10_000,
            global_ip_window_seconds: 60,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct Response {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: RentalConfig) -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        Self::with_store(config, store).await
    }

    pub async fn with_store(config: RentalConfig, store: Arc<dyn Store>) -> Self {
        let state = AppState::new(config, store);
        let router = build_router(state.clone())
            .await
            .expect("Failed to build router");
        Self { router, state }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.7");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        Response {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Option<Value>) -> Response {
        self.request(Method::PATCH, uri, Some(token), body).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Self-register an owner; returns `(user_id, token)`.
    pub async fn register_owner(&self, email: &str) -> (i64, String) {
        let res = self
            .post(
                "/auth/registro",
                None,
                json!({"nombre": "Olga Pérez", "email": email, "password": PASSWORD}),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
        (
            res.body["usuario"]["id"].as_i64().unwrap(),
            res.body["token"].as_str().unwrap().to_string(),
        )
    }

    /// Owner creates a tenant who then logs in; returns `(tenant_id, tenant_user_id, token)`.
    pub async fn create_tenant(&self, owner_token: &str, email: &str) -> (i64, i64, String) {
        let res = self
            .post(
                "/auth/crear-inquilino",
                Some(owner_token),
                json!({
                    "nombre": "Tomás Ruiz",
                    "email": email,
                    "password": PASSWORD,
                    "telefono": "600000000"
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
        let tenant_id = res.body["inquilino"]["id"].as_i64().unwrap();
        let user_id = res.body["inquilino"]["id_usuario"].as_i64().unwrap();
        let token = self.login(email, None).await;
        (tenant_id, user_id, token)
    }

    pub async fn login(&self, email: &str, expected_role: Option<&str>) -> String {
        let mut body = json!({"email": email, "password": PASSWORD});
        if let Some(role) = expected_role {
            body["rolEsperado"] = json!(role);
        }
        let res = self.post("/auth/login", None, body).await;
        assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
        res.body["token"].as_str().unwrap().to_string()
    }

    /// Owner creates a pending payment for a tenant; returns the payment id.
    pub async fn create_payment(
        &self,
        owner_token: &str,
        tenant_id: i64,
        amount: &str,
        due_date: &str,
    ) -> i64 {
        let res = self
            .post(
                "/pagos",
                Some(owner_token),
                json!({"id_inquilino": tenant_id, "monto": amount, "fecha_vencimiento": due_date}),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
        res.body["pago"]["id"].as_i64().unwrap()
    }
}
