/// Google OAuth service
///
/// Drives the consent-flow round-trip against Google's OAuth2 endpoints:
/// building the authorization URL, exchanging the callback code for an
/// access token, and fetching the userinfo document. The result is a
/// [`FederatedProfile`] handed to the identity verifier; nothing here
/// touches the store.
///
/// The exchange is implemented directly over reqwest rather than through an
/// OAuth client crate; the flow is two POST/GET calls and the manual form
/// keeps the dependency surface flat.

use serde::Deserialize;

use super::identity::FederatedProfile;

/// Error type for the consent-flow exchange
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Token or userinfo endpoint could not be reached or answered non-JSON
    #[error("Provider exchange failed: {0}")]
    Exchange(String),

    /// Provider answered without the fields the profile needs
    #[error("Provider returned an incomplete profile: {0}")]
    IncompleteProfile(String),
}

/// Google OAuth client configuration
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    /// OAuth client id
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Callback URL registered with the provider
    pub redirect_uri: String,
}

/// Google OAuth service
pub struct GoogleOAuthService {
    config: GoogleOAuthConfig,
}

impl GoogleOAuthService {
    /// Creates a service from client configuration
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self { config }
    }

    /// Builds the consent-flow authorization URL
    ///
    /// `state` is echoed back by the provider and must be verified by the
    /// callback handler.
    pub fn authorization_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "openid email profile"),
            ("state", state),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("https://accounts.google.com/o/oauth2/v2/auth?{}", query)
    }

    /// Exchanges an authorization code for the user's federated profile
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::Exchange` for transport/JSON failures and
    /// `OAuthError::IncompleteProfile` when the userinfo document lacks an
    /// email address.
    pub async fn exchange_code(&self, code: &str) -> Result<FederatedProfile, OAuthError> {
        let client = reqwest::Client::new();

        let token_response: GoogleTokenResponse = client
            .post("https://oauth2.googleapis.com/token")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::Exchange(format!("code exchange failed: {}", e)))?
            .json()
            .await
            .map_err(|e| OAuthError::Exchange(format!("bad token response: {}", e)))?;

        let user_info: GoogleUserInfo = client
            .get("https://www.googleapis.com/oauth2/v3/userinfo")
            .bearer_auth(&token_response.access_token)
            .send()
            .await
            .map_err(|e| OAuthError::Exchange(format!("userinfo fetch failed: {}", e)))?
            .json()
            .await
            .map_err(|e| OAuthError::Exchange(format!("bad userinfo response: {}", e)))?;

        if user_info.email.is_empty() {
            return Err(OAuthError::IncompleteProfile("no email".to_string()));
        }

        Ok(FederatedProfile {
            provider_id: user_info.sub,
            email: user_info.email,
            name: user_info.name.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    #[serde(default)]
    email: String,
    name: Option<String>,
}

/// URL encoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        let mut result = String::new();
        for c in s.chars() {
            match c {
                'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
                ' ' => result.push_str("%20"),
                _ => {
                    for byte in c.to_string().as_bytes() {
                        result.push_str(&format!("%{:02X}", byte));
                    }
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> GoogleOAuthService {
        GoogleOAuthService::new(GoogleOAuthConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://localhost:5000/auth/google/callback".to_string(),
        })
    }

    #[test]
    fn test_authorization_url_carries_required_params() {
        let url = service().authorization_url("csrf-state");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("state=csrf-state"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A5000%2Fauth%2Fgoogle%2Fcallback"
        ));
    }

    #[test]
    fn test_url_encoding() {
        assert_eq!(urlencoding::encode("hello world"), "hello%20world");
        assert_eq!(urlencoding::encode("a@x.com"), "a%40x.com");
        assert_eq!(urlencoding::encode("safe-._~"), "safe-._~");
    }
}
