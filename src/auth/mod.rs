//! Verifies the bearer tokens that clients get from the identity provider.

mod claims;
mod middleware;
mod user;

pub use claims::Claims;
pub use middleware::{AuthState, auth_guard};
pub use user::UserId;

/// Settings for verifying bearer tokens.
#[derive(Clone)]
pub struct AuthConfig {
    /// The secret the identity provider signs tokens with.
    pub secret: String,
    /// The expected `iss` claim, if tokens should be checked for one.
    pub issuer: Option<String>,
}

impl AuthConfig {
    /// Create the settings for tokens signed with `secret`.
    pub fn new(secret: impl Into<String>, issuer: Option<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"********")
            .field("issuer", &self.issuer)
            .finish()
    }
}
