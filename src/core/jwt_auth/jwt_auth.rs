use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::errors::Error as AppError;
use crate::presentation::view::SIGNED_OUT_MESSAGE;

use super::types::TokenClaims;

/// HS256 signing secret shared by the extractor and token issuers.
#[derive(Clone)]
pub struct JwtSecret(Arc<String>);

impl JwtSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Arc::new(secret.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// JWT decode function
pub fn decode_jwt(
    token: &str,
    secret: &JwtSecret,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    decode::<TokenClaims>(token, &decoding_key, &validation).map(|data| data.claims)
}

// Generate JWT token
pub fn generate_jwt(
    user_id: &str,
    secret: &JwtSecret,
    expiration_seconds: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::seconds(expiration_seconds)).timestamp() as usize;

    let claims = TokenClaims {
        user_id: user_id.to_string(),
        iat,
        exp,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// The signed-in station owner. Requests without a valid bearer token are
/// rejected as signed out.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtAuth(pub TokenClaims);

impl<S> FromRequestParts<S> for JwtAuth
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized(SIGNED_OUT_MESSAGE))?;

        let secret = JwtSecret::from_ref(state);
        let token_data = decode_jwt(bearer.token(), &secret).map_err(|e| {
            tracing::debug!("rejected bearer token: {e}");
            AppError::unauthorized(SIGNED_OUT_MESSAGE)
        })?;

        Ok(JwtAuth(token_data))
    }
}
