//! Shared harness: a router wired to the in-memory store and a recording
//! mailer, exercised through tower's oneshot.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use reproot_api::config::{
    Environment, GmailConfig, GoogleOAuthConfig, JwtConfig, MongoConfig, PortalConfig,
    SecurityConfig,
};
use reproot_api::models::{ApprovalStatus, Principal, Role};
use reproot_api::services::MockMailer;
use reproot_api::store::{MemoryStore, PortalStore};
use reproot_api::{build_router, AppState};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<MockMailer>,
}

pub fn test_config() -> PortalConfig {
    PortalConfig {
        common: reproot_core::config::Config { port: 0 },
        environment: Environment::Dev,
        service_name: "reproot-api".to_string(),
        service_version: "test".to_string(),
        log_level: "info".to_string(),
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "reproot_test".to_string(),
        },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            verification_token_expiry_minutes: 10,
            session_token_expiry_days: 3,
            otp_expiry_minutes: 10,
        },
        google: GoogleOAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_uri: "http://localhost:8080/api/auth/google/callback".to_string(),
        },
        gmail: GmailConfig {
            user: "noreply@example.com".to_string(),
            app_password: "app-password".to_string(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            frontend_url: "http://localhost:3000".to_string(),
        },
    }
}

pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(MockMailer::new());

    let state = AppState::new(
        test_config(),
        Arc::clone(&store) as Arc<dyn PortalStore>,
        Arc::clone(&mailer) as Arc<dyn reproot_api::services::Mailer>,
    );
    let router = build_router(state.clone());

    TestApp {
        router,
        state,
        store,
        mailer,
    }
}

impl TestApp {
    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body), None).await
    }

    pub async fn post_json_auth(
        &self,
        uri: &str,
        body: Value,
        token: &str,
    ) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body), Some(token)).await
    }

    pub async fn put_json_auth(&self, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(body), Some(token)).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None, None).await
    }

    pub async fn get_auth(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None, Some(token)).await
    }

    pub async fn delete_auth(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None, Some(token)).await
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
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
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Register and verify a principal directly through the store, returning
    /// its id and a session token.
    pub async fn seed_principal(
        &self,
        name: &str,
        email: &str,
        role: Role,
        verified: bool,
        status: ApprovalStatus,
    ) -> (String, String) {
        let hash =
            reproot_api::utils::password::hash_password(&reproot_api::utils::password::Password::new(
                "password123".to_string(),
            ))
            .unwrap();
        let mut principal = Principal::new(name.to_string(), email.to_string(), hash, role);
        principal.is_verified = verified;
        principal.approval_status = status;

        self.store.insert_principal(&principal).await.unwrap();
        let token = self
            .state
            .jwt
            .generate_session_token(&principal.id)
            .unwrap();
        (principal.id, token)
    }
}
