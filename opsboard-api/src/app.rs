/// Application state and router builder
///
/// Defines the shared application state and assembles the Axum router:
/// route groups, the session/role gates per group, CORS, request tracing,
/// and the JSON 404 fallback.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use opsboard_api::{app::{build_router, AppState}, config::Config};
/// use opsboard_shared::store::postgres::PgStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = sqlx::PgPool::connect(&config.database.url).await?;
/// let store = Arc::new(PgStore::new(pool));
/// let state = AppState::new(store.clone(), store, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use opsboard_shared::auth::identity::IdentityVerifier;
use opsboard_shared::auth::session::SessionStore;
use opsboard_shared::store::{TaskStore, UserStore};

use crate::{
    config::Config,
    error::ErrorResponse,
    middleware::session::{require_admin, session_gate},
    routes,
};

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; the store handles and
/// config are behind `Arc`s so the clone is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Credential store (user accounts)
    pub users: Arc<dyn UserStore>,

    /// Task store
    pub tasks: Arc<dyn TaskStore>,

    /// Server-side federated sessions
    pub sessions: SessionStore,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>, config: Config) -> Self {
        Self {
            users,
            tasks,
            sessions: SessionStore::new(),
            config: Arc::new(config),
        }
    }

    /// Builds an identity verifier over the user store
    pub fn verifier(&self) -> IdentityVerifier {
        IdentityVerifier::new(self.users.clone())
    }
}

/// Builds the complete Axum router
///
/// # Architecture
///
/// ```text
/// /
/// ├── /                              # Welcome banner (public)
/// ├── /health                        # Health check (public)
/// ├── /api/auth/                     # Local authentication (public)
/// │   ├── POST /signup
/// │   ├── POST /login
/// │   └── POST /logout
/// ├── /auth/                         # Federated authentication (public)
/// │   ├── GET /google
/// │   ├── GET /google/callback
/// │   ├── GET /login/success
/// │   └── GET /login/failed
/// ├── /api/user/                     # Session gate
/// │   ├── GET   /user-dashboard
/// │   └── PATCH /update-task/:task_id
/// └── /api/admin/                    # Session gate (+ role gate below)
///     ├── GET    /tasks/:user_id     # any authenticated role
///     ├── GET    /users/:user_id     # Admin only
///     ├── DELETE /delete/user/:user_id
///     ├── PATCH  /update/user/:user_id
///     └── POST   /assign/task/:user_id
/// ```
pub fn build_router(state: AppState) -> Router {
    // Public: health + welcome
    let public_routes = Router::new()
        .route("/", get(welcome))
        .route("/health", get(routes::health::health_check));

    // Local authentication (no session required)
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    // Federated authentication (no session required)
    let oauth_routes = Router::new()
        .route("/google", get(routes::oauth::google_redirect))
        .route("/google/callback", get(routes::oauth::google_callback))
        .route("/login/success", get(routes::oauth::login_success))
        .route("/login/failed", get(routes::oauth::login_failed));

    // Admin-only operations: session gate + role gate
    let admin_only_routes = Router::new()
        .route("/users/:user_id", get(routes::admin::get_all_users))
        .route("/delete/user/:user_id", delete(routes::admin::delete_user))
        .route("/update/user/:user_id", patch(routes::admin::update_user_role))
        .route("/assign/task/:user_id", post(routes::admin::assign_task))
        .layer(axum::middleware::from_fn(require_admin));

    // Task listing sits under /api/admin but only requires authentication
    let admin_routes = admin_only_routes
        .merge(Router::new().route("/tasks/:user_id", get(routes::admin::get_user_tasks)))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_gate,
        ));

    // User operations: session gate
    let user_routes = Router::new()
        .route("/user-dashboard", get(routes::user::user_dashboard))
        .route("/update-task/:task_id", patch(routes::user::update_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_gate,
        ));

    // CORS: single browser origin, credentialed (cookies)
    let cors = match state.config.client_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => CorsLayer::new(),
    };

    Router::new()
        .merge(public_routes)
        .nest("/api/auth", auth_routes)
        .nest("/api/user", user_routes)
        .nest("/api/admin", admin_routes)
        .nest("/auth", oauth_routes)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Root banner
async fn welcome() -> &'static str {
    "Welcome to the RBAC system!"
}

/// JSON 404 for unmatched routes
async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            message: "Not Found".to_string(),
        }),
    )
}
