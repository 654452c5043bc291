/// Session gate and role gate middleware
///
/// `session_gate` runs on every protected route. It builds a
/// [`SessionProof`] from the request (the signed `token` cookie when
/// present, otherwise a caller-supplied user id from the `user_id` path
/// parameter or the `userId` JSON body field), resolves it, and inserts the
/// resulting [`Identity`] into the request extensions for handlers and the
/// role gate downstream.
///
/// `require_admin` layers on top of the session gate for Admin-only route
/// groups and applies the policy gate to the bound identity.
///
/// The fallback branch trusts the caller-supplied id without cryptographic
/// proof; see the session module for why that is kept.

use axum::{
    body::{to_bytes, Body},
    extract::{RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use opsboard_shared::auth::policy::{self, ADMIN_ONLY};
use opsboard_shared::auth::session::{Identity, SessionProof, SESSION_COOKIE};

use crate::{app::AppState, error::ApiError};

/// Largest request body the fallback branch will buffer while looking for
/// the `userId` field
const FALLBACK_BODY_LIMIT: usize = 64 * 1024;

/// Session validation middleware
///
/// On success the request proceeds with an [`Identity`] extension; on
/// failure the request is answered with 401 before reaching any handler.
pub async fn session_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    params: Option<RawPathParams>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (proof, req) = match jar.get(SESSION_COOKIE) {
        Some(cookie) => (SessionProof::SignedToken(cookie.value().to_string()), req),
        None => {
            let (user_id, req) = fallback_user_id(params, req).await?;
            (SessionProof::FederatedFallback(user_id), req)
        }
    };

    let identity = proof
        .resolve(&state.config.auth.token_secret, &state.users)
        .await?;

    let mut req = req;
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Role gate for Admin-only route groups
///
/// Must run after `session_gate` (the identity extension is its input).
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .copied()
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized - no session".to_string()))?;

    policy::authorize(identity.role, ADMIN_ONLY)?;

    Ok(next.run(req).await)
}

/// Extracts the federated-fallback user id from the path or the body
///
/// The body is buffered (bounded) and restored so the handler can still
/// read it.
async fn fallback_user_id(
    params: Option<RawPathParams>,
    req: Request,
) -> Result<(Uuid, Request), ApiError> {
    // Path parameter first
    if let Some(params) = &params {
        if let Some((_, value)) = params.iter().find(|(name, _)| *name == "user_id") {
            if let Ok(user_id) = Uuid::parse_str(value) {
                return Ok((user_id, req));
            }
        }
    }

    // Then the JSON body field
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, FALLBACK_BODY_LIMIT).await.map_err(|_| {
        ApiError::Unauthorized("Unauthenticated - invalid or missing token or userId".to_string())
    })?;

    let user_id = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|v| {
            v.get("userId")
                .and_then(|id| id.as_str())
                .and_then(|id| Uuid::parse_str(id).ok())
        });

    let req = Request::from_parts(parts, Body::from(bytes));

    match user_id {
        Some(user_id) => Ok((user_id, req)),
        None => Err(ApiError::Unauthorized(
            "Unauthenticated - invalid or missing token or userId".to_string(),
        )),
    }
}
