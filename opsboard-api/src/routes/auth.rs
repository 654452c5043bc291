/// Authentication endpoints
///
/// Local (password) authentication: account creation, login, logout.
/// Successful signup and login bind a signed session cookie to the
/// response; the federated flow lives in `routes::oauth`.
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - Create account
/// - `POST /api/auth/login` - Verify credentials and start a session
/// - `POST /api/auth/logout` - Clear session cookies

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use validator::Validate;

use opsboard_shared::auth::session::{
    issue_session_cookie, FEDERATED_COOKIE, SESSION_COOKIE,
};
use opsboard_shared::auth::verification::generate_verification_code;
use opsboard_shared::auth::password;
use opsboard_shared::models::user::{CreateUser, User};

use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
};

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Signup response
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// Always true on success
    pub success: bool,

    /// Human-readable confirmation
    pub message: String,

    /// The created account (credential material excluded by serialization)
    pub user: User,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Always true on success
    pub success: bool,

    /// Human-readable confirmation
    pub message: String,

    /// The authenticated account
    pub user: User,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Always true
    pub success: bool,

    /// Human-readable confirmation
    pub message: String,
}

/// Create a new account
///
/// The account starts with the default `User` role and a pending
/// email-verification code; the password is stored as an Argon2id hash.
/// A session cookie is bound to the response so the client is logged in
/// immediately.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or email already registered
/// - `500 Internal Server Error`: hashing or persistence failure
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<SignupResponse>)> {
    req.validate().map_err(validation_error)?;

    let password_hash = password::hash_password(&req.password)?;
    let (verification_token, verification_expires_at) = generate_verification_code();

    let user = state
        .users
        .create_user(CreateUser {
            email: req.email,
            password_hash: Some(password_hash),
            name: req.name,
            google_id: None,
            is_verified: false,
            verification_token: Some(verification_token),
            verification_token_expires_at: Some(verification_expires_at),
        })
        .await?;

    let cookie = issue_session_cookie(user.id, user.role, &state.config.auth.token_secret)?;

    tracing::info!(user_id = %user.id, "account created");

    Ok((
        StatusCode::CREATED,
        jar.add(cookie),
        Json(SignupResponse {
            success: true,
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// Verify credentials and start a session
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or invalid email/password
/// - `500 Internal Server Error`: persistence failure
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    req.validate().map_err(validation_error)?;

    let user = state
        .verifier()
        .verify_password(&req.email, &req.password)
        .await?;

    let cookie = issue_session_cookie(user.id, user.role, &state.config.auth.token_secret)?;

    tracing::info!(user_id = %user.id, "login");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            message: "Logged in successfully".to_string(),
            user,
        }),
    ))
}

/// Clear session cookies
///
/// Removes both the signed-token cookie and the federated session cookie;
/// any server-side federated session is destroyed as well.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<LogoutResponse>)> {
    if let Some(sid) = jar.get(FEDERATED_COOKIE) {
        state.sessions.destroy(sid.value()).await;
    }

    let jar = jar
        .remove(Cookie::build(SESSION_COOKIE).path("/"))
        .remove(Cookie::build(FEDERATED_COOKIE).path("/"));

    Ok((
        jar,
        Json(LogoutResponse {
            success: true,
            message: "Logged out successfully".to_string(),
        }),
    ))
}
