use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token claims carried by authenticated requests. `sub` holds the requester
/// identifier as a 24-character hex ObjectId.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn create_jwt(
    requester: ObjectId,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: requester.to_hex(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Identity of the caller making the request.
///
/// Authentication middleware verifies the bearer token with [`verify_jwt`]
/// and stores the [`Claims`] in the request extensions; this extractor reads
/// them back. When the claims are missing or the subject is not a valid hex
/// identifier the extraction yields [`RequesterId::EMPTY`] instead of
/// rejecting, so handlers always receive a well-formed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequesterId(pub ObjectId);

impl RequesterId {
    pub const EMPTY: Self = Self(ObjectId::from_bytes([0; 12]));

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequesterId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let requester = parts
            .extensions
            .get::<Claims>()
            .and_then(|claims| ObjectId::parse_str(&claims.sub).ok())
            .map_or(RequesterId::EMPTY, RequesterId);

        Ok(requester)
    }
}
