/// Access policy gate
///
/// Role-based access decisions as a pure function: an operation declares
/// the set of roles permitted to perform it, and a resolved role either is
/// in the set or the operation fails with a forbidden error. No state, no
/// side effects, no store access.
///
/// # Example
///
/// ```
/// use opsboard_shared::auth::policy::{authorize, ADMIN_ONLY, ANY_ROLE};
/// use opsboard_shared::models::user::Role;
///
/// assert!(authorize(Role::Admin, ADMIN_ONLY).is_ok());
/// assert!(authorize(Role::User, ADMIN_ONLY).is_err());
/// assert!(authorize(Role::User, ANY_ROLE).is_ok());
/// ```

use crate::models::user::Role;

/// Operations restricted to administrators
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Operations open to every authenticated role
pub const ANY_ROLE: &[Role] = &[Role::User, Role::Admin];

/// Error type for policy decisions
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Authenticated, but the role is not in the permitted set
    #[error("Forbidden - role {actual:?} lacks the necessary permissions")]
    Forbidden {
        /// Role resolved from the session
        actual: Role,
    },
}

/// Permits or denies an operation for a role
///
/// # Errors
///
/// Returns `PolicyError::Forbidden` when `role` is not in `permitted`,
/// regardless of anything else about the request.
pub fn authorize(role: Role, permitted: &[Role]) -> Result<(), PolicyError> {
    if permitted.contains(&role) {
        Ok(())
    } else {
        Err(PolicyError::Forbidden { actual: role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_only_denies_user() {
        assert!(authorize(Role::Admin, ADMIN_ONLY).is_ok());
        assert!(matches!(
            authorize(Role::User, ADMIN_ONLY),
            Err(PolicyError::Forbidden { actual: Role::User })
        ));
    }

    #[test]
    fn test_any_role_permits_both() {
        assert!(authorize(Role::User, ANY_ROLE).is_ok());
        assert!(authorize(Role::Admin, ANY_ROLE).is_ok());
    }

    #[test]
    fn test_empty_set_denies_everything() {
        assert!(authorize(Role::Admin, &[]).is_err());
        assert!(authorize(Role::User, &[]).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = authorize(Role::User, ADMIN_ONLY).unwrap_err();
        assert!(err.to_string().contains("Forbidden"));
    }
}
