/// Session issuance and validation
///
/// Two parallel session mechanisms share one downstream authorization path:
///
/// 1. **Signed token** (cookie `token`): stateless HS256 credential carrying
///    {user id, role}. Verified without a store round-trip.
/// 2. **Federated session** (cookie `opsboard.sid`): a server-side map from
///    a random session id to a user id, established by the OAuth callback.
///    Protected requests that arrive without a signed token instead supply
///    a user id out-of-band (path parameter or body field), which is looked
///    up in the user store.
///
/// The two are unified behind [`SessionProof`], a tagged union dispatched by
/// which credential is present; resolving a proof yields an [`Identity`]
/// that downstream policy checks consume.
///
/// The fallback branch trusts the caller-supplied id without cryptographic
/// proof. That mirrors the source system and is a documented gap, not an
/// oversight.

use std::collections::HashMap;
use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite};
use rand::RngCore;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::token::{self, Claims, TokenError};
use crate::models::user::Role;
use crate::store::{StoreError, UserStore};

/// Name of the signed-token cookie
pub const SESSION_COOKIE: &str = "token";

/// Name of the federated session-id cookie
pub const FEDERATED_COOKIE: &str = "opsboard.sid";

/// Error type for session resolution
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No valid session proof could be established
    #[error("Unauthorized - {0}")]
    Unauthorized(String),

    /// Store failure while resolving the fallback branch
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Identity resolved from a session proof
///
/// Bound to the request context by the gate middleware and consumed by the
/// policy gate and the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role the session carries
    pub role: Role,
}

/// Session proof presented by a request
///
/// Exactly one variant applies per request, chosen by which credential is
/// present.
#[derive(Debug, Clone)]
pub enum SessionProof {
    /// Signed token from the `token` cookie
    SignedToken(String),

    /// Caller-supplied user id (path parameter or body field), used when no
    /// signed token is present
    FederatedFallback(Uuid),
}

impl SessionProof {
    /// Resolves the proof to an identity
    ///
    /// The signed-token branch verifies signature and expiry and reads
    /// {user id, role} straight from the claims. The fallback branch looks
    /// the user up by id and reads the role from the persisted record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Unauthorized` for invalid/expired tokens and
    /// for fallback ids that resolve to no user.
    pub async fn resolve(
        &self,
        secret: &str,
        users: &Arc<dyn UserStore>,
    ) -> Result<Identity, SessionError> {
        match self {
            SessionProof::SignedToken(raw) => {
                let claims = token::validate_token(raw, secret).map_err(|e| match e {
                    TokenError::Expired => {
                        SessionError::Unauthorized("token expired".to_string())
                    }
                    _ => SessionError::Unauthorized("invalid token".to_string()),
                })?;

                Ok(Identity {
                    user_id: claims.sub,
                    role: claims.role,
                })
            }
            SessionProof::FederatedFallback(user_id) => {
                let user = users
                    .find_user_by_id(*user_id)
                    .await?
                    .ok_or_else(|| {
                        SessionError::Unauthorized("federated sign-in not found".to_string())
                    })?;

                Ok(Identity {
                    user_id: user.id,
                    role: user.role,
                })
            }
        }
    }
}

/// Mints a signed session token and binds it to an HTTP-only cookie
///
/// Used at signup, login, and role update. Setting the cookie again
/// overwrites the previous one atomically from the client's perspective;
/// the old token stays cryptographically valid until its own expiry.
pub fn issue_session_cookie(
    user_id: Uuid,
    role: Role,
    secret: &str,
) -> Result<Cookie<'static>, TokenError> {
    let claims = Claims::new(user_id, role);
    let token = token::create_token(&claims, secret)?;

    Ok(Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build())
}

/// Server-side store for federated sessions
///
/// Maps a random session id (the `opsboard.sid` cookie value) to a user id.
/// This is the only in-process shared state in the service; entries are
/// independent and live behind a single async `RwLock`.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl SessionStore {
    /// Creates an empty session store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for a user, returning the new session id
    pub async fn create(&self, user_id: Uuid) -> String {
        let sid = random_session_id();
        self.inner.write().await.insert(sid.clone(), user_id);
        sid
    }

    /// Looks up the user bound to a session id
    pub async fn get(&self, sid: &str) -> Option<Uuid> {
        self.inner.read().await.get(sid).copied()
    }

    /// Destroys a session (logout)
    pub async fn destroy(&self, sid: &str) {
        self.inner.write().await.remove(sid);
    }
}

/// Generates a random 32-hex-character session id
fn random_session_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::CreateUser;
    use crate::store::memory::MemoryStore;

    const SECRET: &str = "test-signing-key-at-least-32-bytes-long";

    fn user_store() -> Arc<dyn UserStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_signed_token_resolves_without_store_lookup() {
        let users = user_store();
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, Role::Admin);
        let raw = token::create_token(&claims, SECRET).unwrap();

        // The user does not exist in the store; the token alone is proof
        let identity = SessionProof::SignedToken(raw)
            .resolve(SECRET, &users)
            .await
            .unwrap();

        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let users = user_store();

        let result = SessionProof::SignedToken("garbage".to_string())
            .resolve(SECRET, &users)
            .await;
        assert!(matches!(result, Err(SessionError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_wrong_key_token_is_unauthorized() {
        let users = user_store();
        let claims = Claims::new(Uuid::new_v4(), Role::User);
        let raw = token::create_token(&claims, "some-other-32-byte-signing-key!!").unwrap();

        let result = SessionProof::SignedToken(raw).resolve(SECRET, &users).await;
        assert!(matches!(result, Err(SessionError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let users = user_store();
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            Role::User,
            chrono::Duration::seconds(-60),
        );
        let raw = token::create_token(&claims, SECRET).unwrap();

        let result = SessionProof::SignedToken(raw).resolve(SECRET, &users).await;
        assert!(matches!(result, Err(SessionError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_fallback_reads_role_from_the_record() {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .create_user(CreateUser {
                email: "fed@example.com".to_string(),
                password_hash: None,
                name: "Federated".to_string(),
                google_id: Some("google-sub-1".to_string()),
                is_verified: true,
                verification_token: None,
                verification_token_expires_at: None,
            })
            .await
            .unwrap();
        let users: Arc<dyn UserStore> = store;

        let identity = SessionProof::FederatedFallback(user.id)
            .resolve(SECRET, &users)
            .await
            .unwrap();

        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role, Role::User);
    }

    #[tokio::test]
    async fn test_fallback_unknown_user_is_unauthorized() {
        let users = user_store();

        let result = SessionProof::FederatedFallback(Uuid::new_v4())
            .resolve(SECRET, &users)
            .await;
        assert!(matches!(result, Err(SessionError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_issue_session_cookie_round_trip() {
        let user_id = Uuid::new_v4();
        let cookie = issue_session_cookie(user_id, Role::Admin, SECRET).unwrap();

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));

        // A freshly issued token always validates immediately
        let claims = token::validate_token(cookie.value(), SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_session_store_lifecycle() {
        let sessions = SessionStore::new();
        let user_id = Uuid::new_v4();

        let sid = sessions.create(user_id).await;
        assert_eq!(sid.len(), 32);
        assert_eq!(sessions.get(&sid).await, Some(user_id));

        sessions.destroy(&sid).await;
        assert_eq!(sessions.get(&sid).await, None);

        // Unknown ids never resolve
        assert_eq!(sessions.get("deadbeef").await, None);
    }

    #[tokio::test]
    async fn test_session_ids_are_unique() {
        let sessions = SessionStore::new();
        let a = sessions.create(Uuid::new_v4()).await;
        let b = sessions.create(Uuid::new_v4()).await;
        assert_ne!(a, b);
    }
}
