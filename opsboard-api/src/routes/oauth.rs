/// Federated (Google) authentication endpoints
///
/// Drives the consent flow: redirect to the provider, handle the callback,
/// and expose the session-status endpoints the browser client polls after
/// the redirect.
///
/// # Endpoints
///
/// - `GET /auth/google` - Redirect to the provider's consent screen
/// - `GET /auth/google/callback` - Exchange the code, establish a federated
///   session, redirect to the client origin
/// - `GET /auth/login/success` - Report the federated session's user
/// - `GET /auth/login/failed` - Terminal failure endpoint
///
/// The callback establishes a *server-side* session keyed by the
/// `opsboard.sid` cookie, distinct from the signed-token cookie local
/// login uses. Both paths converge in the session gate.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use opsboard_shared::auth::oauth::GoogleOAuthService;
use opsboard_shared::auth::session::FEDERATED_COOKIE;
use opsboard_shared::models::user::User;

use crate::{app::AppState, error::ApiResult};

/// Cookie that carries the consent-flow CSRF state between the redirect
/// and the callback
const STATE_COOKIE: &str = "oauth_state";

/// Query parameters the provider appends to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange
    pub code: Option<String>,

    /// Echo of the state set at redirect time
    pub state: Option<String>,
}

/// Session-status response for `/auth/login/success`
#[derive(Debug, Serialize)]
pub struct LoginStatusResponse {
    /// Whether a federated session is active
    pub success: bool,

    /// Human-readable status
    pub message: String,

    /// The session's user, when one is active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Redirect to the provider's consent screen
///
/// Generates a random state value, stores it in a short-lived cookie, and
/// sends the browser to the provider with the same state attached.
pub async fn google_redirect(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let oauth_state = generate_oauth_state();
    let service = GoogleOAuthService::new(state.config.google_oauth());
    let url = service.authorization_url(&oauth_state);

    let state_cookie = Cookie::build((STATE_COOKIE, oauth_state))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();

    (jar.add(state_cookie), Redirect::to(&url))
}

/// Handle the provider callback
///
/// Verifies the echoed state, exchanges the code for a profile, resolves
/// the profile to an account (creating or linking as needed), establishes a
/// federated session, and redirects to the client origin. Every failure
/// redirects to the failure endpoint instead of surfacing an error body:
/// the browser is mid-redirect-chain here.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> (CookieJar, Redirect) {
    let expected_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/"));
    let state_matches = match (&query.state, &expected_state) {
        (Some(echoed), Some(expected)) => echoed == expected,
        _ => false,
    };

    let code = match (&query.code, state_matches) {
        (Some(code), true) => code.clone(),
        _ => {
            tracing::warn!("consent callback with missing code or state mismatch");
            return (jar, Redirect::to("/auth/login/failed"));
        }
    };

    let service = GoogleOAuthService::new(state.config.google_oauth());
    let profile = match service.exchange_code(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("provider exchange failed: {}", e);
            return (jar, Redirect::to("/auth/login/failed"));
        }
    };

    let user = match state.verifier().verify_federated(profile).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("federated identity resolution failed: {}", e);
            return (jar, Redirect::to("/auth/login/failed"));
        }
    };

    let sid = state.sessions.create(user.id).await;
    let session_cookie = Cookie::build((FEDERATED_COOKIE, sid))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();

    tracing::info!(user_id = %user.id, "federated login");

    (jar.add(session_cookie), Redirect::to(&state.config.client_url))
}

/// Report whether a federated session is active
///
/// Returns the session's user when the `opsboard.sid` cookie maps to a
/// live session, `{success: false}` otherwise. Always 200: the client
/// polls this after the consent redirect.
pub async fn login_success(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<Json<LoginStatusResponse>> {
    let user = match jar.get(FEDERATED_COOKIE) {
        Some(cookie) => match state.sessions.get(cookie.value()).await {
            Some(user_id) => state.users.find_user_by_id(user_id).await?,
            None => None,
        },
        None => None,
    };

    Ok(Json(match user {
        Some(user) => LoginStatusResponse {
            success: true,
            message: "Successfully authenticated".to_string(),
            user: Some(user),
        },
        None => LoginStatusResponse {
            success: false,
            message: "Not authenticated".to_string(),
            user: None,
        },
    }))
}

/// Terminal failure endpoint for the consent flow
pub async fn login_failed() -> (StatusCode, Json<LoginStatusResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(LoginStatusResponse {
            success: false,
            message: "Authentication failed".to_string(),
            user: None,
        }),
    )
}

/// Generates a random state string for the consent round-trip
fn generate_oauth_state() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
