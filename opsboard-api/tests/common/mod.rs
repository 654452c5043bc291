/// Common test utilities for integration tests
///
/// Shared infrastructure for driving the full router in-process:
/// - an in-memory store instead of a live database
/// - test user/admin creation
/// - session-cookie minting
/// - request building and JSON response decoding

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use tower::Service as _;

use opsboard_api::app::{build_router, AppState};
use opsboard_api::config::{ApiConfig, AuthConfig, Config, DatabaseConfig, GoogleConfig};
use opsboard_shared::auth::password::hash_password;
use opsboard_shared::auth::token::{create_token, Claims};
use opsboard_shared::models::user::{CreateUser, Role, User};
use opsboard_shared::store::memory::MemoryStore;
use opsboard_shared::store::UserStore;

/// Signing key used by every integration test
pub const TEST_SECRET: &str = "integration-test-signing-key-32-bytes!!";

/// Test context containing the app and direct store access
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a fresh context with an empty in-memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), store.clone(), test_config());
        let app = build_router(state.clone());

        TestContext { store, state, app }
    }

    /// Creates a local (password) user directly in the store
    pub async fn create_user(&self, email: &str, password: &str) -> User {
        self.store
            .create_user(CreateUser {
                email: email.to_string(),
                password_hash: Some(hash_password(password).unwrap()),
                name: "Test User".to_string(),
                google_id: None,
                is_verified: false,
                verification_token: None,
                verification_token_expires_at: None,
            })
            .await
            .unwrap()
    }

    /// Creates a user and promotes them to Admin
    pub async fn create_admin(&self, email: &str, password: &str) -> User {
        let user = self.create_user(email, password).await;
        self.store
            .update_role(user.id, Role::Admin)
            .await
            .unwrap()
            .unwrap()
    }

    /// Mints a `Cookie` header value carrying a fresh session token
    pub fn session_cookie(&self, user: &User) -> String {
        let claims = Claims::new(user.id, user.role);
        let token = create_token(&claims, TEST_SECRET).unwrap();
        format!("token={}", token)
    }

    /// Sends a request and decodes the JSON response
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, HeaderMap, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, headers, json)
    }
}

/// Configuration with the test signing key and a dummy provider client
fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgresql://unused-in-tests".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            token_secret: TEST_SECRET.to_string(),
        },
        google: GoogleConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            redirect_uri: "http://localhost:5000/auth/google/callback".to_string(),
        },
        client_url: "http://localhost:5173".to_string(),
    }
}

/// Extracts the value of a named cookie from a `Set-Cookie` response
pub fn set_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", name)))
        .and_then(|v| {
            v.split(';')
                .next()
                .and_then(|pair| pair.split_once('='))
                .map(|(_, value)| value.to_string())
        })
}
