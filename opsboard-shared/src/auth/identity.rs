/// Identity verifier
///
/// Resolves a presented credential to a user account. Two paths exist:
///
/// - **Password**: email + plaintext password, verified against the stored
///   Argon2id hash.
/// - **Federated**: a profile asserted by the identity provider (subject
///   id, verified email, display name). Lookup is by provider id first,
///   then by email, so a federated sign-in with an email that matches an
///   existing local account resolves to that account instead of creating a
///   duplicate. When neither matches, a new pre-verified account is created
///   with the default role.
///
/// The verifier is an explicitly constructed value holding its store; there
/// is no process-global strategy registration. Both paths record the login
/// timestamp on success. Failures are reported to the caller and never
/// retried.

use std::sync::Arc;

use super::password::{self, PasswordError};
use crate::models::user::{CreateUser, User};
use crate::store::{StoreError, UserStore};

/// Error type for identity verification
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Unknown email, missing credential, or password mismatch
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Stored hash could not be processed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Profile asserted by the federated identity provider
#[derive(Debug, Clone)]
pub struct FederatedProfile {
    /// Provider subject id
    pub provider_id: String,

    /// Email address, already verified by the provider
    pub email: String,

    /// Display name
    pub name: String,
}

/// Resolves credentials to user accounts
pub struct IdentityVerifier {
    users: Arc<dyn UserStore>,
}

impl IdentityVerifier {
    /// Creates a verifier over a user store
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Verifies an email + password pair
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidCredentials` when the email is
    /// unknown, the account has no password (federated-only), or the
    /// password does not match. The three cases are indistinguishable to
    /// the caller.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<User, IdentityError> {
        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(IdentityError::InvalidCredentials)?;

        if !password::verify_password(password, hash)? {
            return Err(IdentityError::InvalidCredentials);
        }

        self.users.record_login(user.id).await?;
        Ok(user)
    }

    /// Resolves a federated profile to an account
    ///
    /// Lookup order is provider id, then email (account linking); a new
    /// account is created when neither matches. The created account is
    /// pre-verified (the provider already verified the email) and starts
    /// with the default role.
    pub async fn verify_federated(&self, profile: FederatedProfile) -> Result<User, IdentityError> {
        let existing = match self
            .users
            .find_user_by_google_id(&profile.provider_id)
            .await?
        {
            Some(user) => Some(user),
            None => self.users.find_user_by_email(&profile.email).await?,
        };

        let user = match existing {
            Some(user) => user,
            None => {
                self.users
                    .create_user(CreateUser {
                        email: profile.email,
                        password_hash: None,
                        name: profile.name,
                        google_id: Some(profile.provider_id),
                        is_verified: true,
                        verification_token: None,
                        verification_token_expires_at: None,
                    })
                    .await?
            }
        };

        self.users.record_login(user.id).await?;
        Ok(user)
    }
}
