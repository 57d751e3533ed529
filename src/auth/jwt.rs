use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{config::JwtConfig, error::ApiError, state::AppState, users::repo::User};

/// JWT payload: the username as subject plus the numeric user id.
/// Session tokens carry no expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i32,
}

/// Holds JWT signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig { secret } = state.config.jwt.clone();
        Self::from_secret(&secret)
    }
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, username: &str, user_id: i32) -> anyhow::Result<String> {
        let claims = Claims {
            sub: username.to_string(),
            user_id,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens are unbounded in time, so the default exp requirement is lifted
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

/// Extracts and verifies the bearer token, then resolves its subject to a
/// stored user. Any handler taking this extractor is a protected route.
pub struct AuthUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingBearerToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(ApiError::MissingBearerToken)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token verification failed");
            ApiError::UnauthorizedRequest
        })?;

        let user = User::find_by_username(&state.db, &claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(sub = %claims.sub, "token subject does not match any user");
                ApiError::UnauthorizedRequest
            })?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = JwtKeys::from_secret("dev-secret");
        let token = keys.sign("janedoe", 1).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, "janedoe");
        assert_eq!(claims.user_id, 1);
    }

    #[test]
    fn tokens_without_expiry_still_verify() {
        let keys = JwtKeys::from_secret("dev-secret");
        let token = keys.sign("janedoe", 1).expect("sign");
        // The payload has no exp claim at all
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let keys = JwtKeys::from_secret("dev-secret");
        let other = JwtKeys::from_secret("bad-secret");
        let token = keys.sign("janedoe", 1).expect("sign");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = JwtKeys::from_secret("dev-secret");
        assert!(keys.verify("not-a-token").is_err());
        assert!(keys.verify("").is_err());
    }

    #[tokio::test]
    async fn keys_derive_from_app_state() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys.sign("johndoe", 2).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.user_id, 2);
    }
}
