//! Authentication middleware that validates bearer tokens.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, Validation};

use crate::{
    AppState, Error,
    auth::{
        AuthConfig,
        claims::{build_validation, decode_token},
    },
};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The key used to verify token signatures.
    pub decoding_key: DecodingKey,
    /// The rules a token must pass.
    pub validation: Validation,
}

impl AuthState {
    /// Create the auth state for verifying tokens signed with `config.secret`.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation: build_validation(config.issuer.as_deref()),
        }
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Middleware function that checks for a valid bearer token.
///
/// The user ID is placed into the request and the request executed normally
/// if the token is valid, otherwise a 401 response is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserId>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let bearer =
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &state).await {
            Ok(TypedHeader(Authorization(bearer))) => bearer,
            Err(error) => {
                tracing::debug!("Missing or malformed authorization header: {error}");
                return Error::Unauthorized.into_response();
            }
        };

    let user_id = match decode_token(bearer.token(), &state.decoding_key, &state.validation) {
        Ok(claims) => claims.user_id(),
        Err(error) => return error.into_response(),
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{Extension, Router, http::StatusCode, middleware, routing::get};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        auth::{AuthConfig, AuthState, UserId, auth_guard},
        test_utils::{TEST_SECRET, expired_token_for, token_for},
    };

    const TEST_PROTECTED_ROUTE: &str = "/protected";

    async fn test_handler(Extension(user_id): Extension<UserId>) -> String {
        user_id.to_string()
    }

    fn get_test_server() -> TestServer {
        let state = AuthState::new(&AuthConfig::new(TEST_SECRET, None));

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn passes_user_id_to_handler() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token_for("user-42"))
            .await;

        response.assert_status_ok();
        response.assert_text("user-42");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let server = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "error": "Unauthorized" }));
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let server = get_test_server();

        server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(expired_token_for("user-42"))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let server = get_test_server();

        server
            .get(TEST_PROTECTED_ROUTE)
            .authorization("Basic dXNlcjpwYXNz")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
