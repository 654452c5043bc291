/// User model and account records
///
/// This module provides the immutable User record, the `Role` enum used for
/// access-control decisions, and the input/projection types consumed by the
/// user store.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('User', 'Admin');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255),
///     name VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'User',
///     google_id VARCHAR(255) UNIQUE,
///     is_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     last_login_at TIMESTAMPTZ,
///     reset_password_token VARCHAR(255),
///     reset_password_expires_at TIMESTAMPTZ,
///     verification_token VARCHAR(255),
///     verification_token_expires_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `password_hash` is nullable: accounts created through the federated
/// sign-in path carry a `google_id` instead. At least one of the two is
/// always present; both coexist after account linking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access-control role assigned to every user
///
/// Wire representation is the variant name (`"User"` / `"Admin"`), which is
/// also what clients submit to the role-update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    /// Default role: owns a dashboard and the tasks assigned to them
    User,

    /// Can manage users and assign tasks
    Admin,
}

impl Role {
    /// Converts role to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }

    /// Parses a client-submitted role string
    ///
    /// Returns `None` for anything outside the enumerated set, which the
    /// role-update endpoint reports as `Invalid role`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "User" => Some(Role::User),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// User account record
///
/// Sensitive fields (password hash, reset/verification tokens) are excluded
/// from serialization, so a `User` can be embedded in a response body
/// without a manual stripping step.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive, unique)
    pub email: String,

    /// Argon2id password hash; `None` for federated-only accounts
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,

    /// Display name
    pub name: String,

    /// Access-control role
    pub role: Role,

    /// Federated provider subject id (sparse unique)
    pub google_id: Option<String>,

    /// Whether the email address has been verified
    ///
    /// Pre-set true for federated sign-ins: the provider already verified
    /// the address.
    pub is_verified: bool,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,

    /// Password-reset token, if a reset is pending
    #[serde(skip_serializing, default)]
    pub reset_password_token: Option<String>,

    /// Expiry of the pending password-reset token
    pub reset_password_expires_at: Option<DateTime<Utc>>,

    /// Email-verification code, if verification is pending
    #[serde(skip_serializing, default)]
    pub verification_token: Option<String>,

    /// Expiry of the pending verification code
    pub verification_token_expires_at: Option<DateTime<Utc>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// Role is never accepted from a caller: every account starts as
/// [`Role::User`] and only the Admin role-update operation changes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id hash (NOT a plaintext password); `None` for federated accounts
    pub password_hash: Option<String>,

    /// Display name
    pub name: String,

    /// Federated provider subject id, when created via federated sign-in
    pub google_id: Option<String>,

    /// Initial verification state (true for federated sign-ins)
    pub is_verified: bool,

    /// Pending email-verification code
    pub verification_token: Option<String>,

    /// Expiry of the verification code
    pub verification_token_expires_at: Option<DateTime<Utc>>,
}

/// Projection returned by the Admin user listing
///
/// Carries identity and role only; credential material is excluded by
/// projection rather than by stripping a full record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Access-control role
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("User"), Some(Role::User));
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::User.as_str(), "User");
        assert_eq!(Role::Admin.as_str(), "Admin");
    }

    #[test]
    fn test_role_rejects_unknown_values() {
        assert_eq!(Role::parse("SuperAdmin"), None);
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_role_defaults_to_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_sensitive_fields_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            password_hash: Some("$argon2id$secret".to_string()),
            name: "Test User".to_string(),
            role: Role::User,
            google_id: None,
            is_verified: false,
            last_login_at: None,
            reset_password_token: Some("reset-token".to_string()),
            reset_password_expires_at: None,
            verification_token: Some("123456".to_string()),
            verification_token_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$argon2id$"));
        assert!(!json.contains("reset-token"));
        assert!(!json.contains("123456"));
        assert!(json.contains("\"role\":\"User\""));
    }
}
