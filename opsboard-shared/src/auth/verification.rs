/// Email-verification code generation
///
/// Signup stores a short numeric code with a fixed expiry on the new
/// account. Code delivery is out of scope here; this module only mints the
/// code and its deadline.
///
/// # Example
///
/// ```
/// use opsboard_shared::auth::verification::generate_verification_code;
///
/// let (code, expires_at) = generate_verification_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_digit()));
/// assert!(expires_at > chrono::Utc::now());
/// ```

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// How long a verification code stays valid
const CODE_TTL_HOURS: i64 = 24;

/// Generates a 6-digit verification code and its expiry
pub fn generate_verification_code() -> (String, DateTime<Utc>) {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    let expires_at = Utc::now() + Duration::hours(CODE_TTL_HOURS);

    (code.to_string(), expires_at)
}
