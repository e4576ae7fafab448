//! Decoding of the JSON Web Tokens issued by the identity provider.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserId};

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: String,
    /// The expiry time of the token as a Unix timestamp.
    pub exp: usize,
    /// Who issued the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// The user the token was issued to.
    pub fn user_id(&self) -> UserId {
        UserId::new(self.sub.clone())
    }
}

/// Build the validation rules for HS256 tokens, requiring the `iss` claim to
/// equal `issuer` if one is given.
pub fn build_validation(issuer: Option<&str>) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);

    if let Some(issuer) = issuer {
        validation.set_issuer(&[issuer]);
        // Without this, a token that omits `iss` skips the issuer check.
        validation.set_required_spec_claims(&["exp", "iss"]);
    }

    validation
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
/// Returns [Error::Unauthorized] if the token is malformed, expired, signed
/// with a different key, or has the wrong issuer, or if its subject is empty.
pub fn decode_token(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<Claims, Error> {
    let claims = decode::<Claims>(token, key, validation)
        .map_err(|error| {
            tracing::debug!("Rejected token: {error}");
            Error::Unauthorized
        })?
        .claims;

    if claims.sub.is_empty() {
        tracing::debug!("Rejected token with empty subject");
        return Err(Error::Unauthorized);
    }

    Ok(claims)
}
