//! Bearer-token authentication extractor.
//!
//! LearnHub does not issue tokens. The external auth provider signs HS256
//! JWTs with a shared secret; this module validates them and turns the
//! claims into a [`RequestContext`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_core::config::AuthConfig;
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_entity::user::UserRole;
use learnhub_service::RequestContext;

use crate::state::AppState;

/// Claims carried in access tokens minted by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject, the user id.
    pub sub: Uuid,
    /// Role claim. Tokens without one are plain users.
    #[serde(default = "default_role")]
    pub role: UserRole,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

fn default_role() -> UserRole {
    UserRole::User
}

/// Validates provider-issued JWTs.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        if !config.issuer.is_empty() {
            validation.set_issuer(&[config.issuer.as_str()]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a token, returning its claims.
    pub fn verify(&self, token: &str) -> AppResult<TokenClaims> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthenticated("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::unauthenticated("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::unauthenticated("Invalid token format")
                }
                _ => AppError::unauthenticated(format!("Token validation failed: {e}")),
            },
        )?;

        Ok(data.claims)
    }

    /// Validate a token and build the request context from its claims.
    pub fn context_from_token(&self, token: &str) -> AppResult<RequestContext> {
        let claims = self.verify(token)?;
        Ok(RequestContext::new(claims.sub, claims.role))
    }
}

/// Extracted authenticated caller context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::unauthenticated("Missing or malformed Authorization header")
                })?;

        let ctx = state.token_verifier.context_from_token(bearer.token())?;
        Ok(AuthUser(ctx))
    }
}
