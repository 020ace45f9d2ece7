use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::domain::entities::auth_user::UserRole;

/// Claims carried by an access token. Wire names are fixed by the issuer
/// contract: `sub` holds the numeric user id as a string (JWT standard),
/// the role travels in the custom `userRole` claim.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(rename = "userRole")]
    pub user_role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Validation outcome taxonomy. Every variant is terminal for the request;
/// the HTTP mapping lives with the verification middleware.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature checked out but `exp` is in the past. Carries the claimed
    /// subject for diagnostics.
    #[error("token expired")]
    Expired { sub: Option<String> },

    /// Malformed, unsupported, or signed with a different secret.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Anything the two classes above don't cover.
    #[error("token validation failed: {0}")]
    Unexpected(String),
}

pub fn issue(
    user_id: i64,
    email: &str,
    role: UserRole,
    secret: &secrecy::SecretString,
    ttl: Duration,
) -> Result<String, TokenError> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        user_role: role.to_string(),
        iat: now,
        exp: now + ttl.whole_seconds(),
    };
    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| TokenError::Unexpected(e.to_string()))
}

pub fn verify(token: &str, secret: &secrecy::SecretString) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    match decode::<Claims>(token, &key, &validation()) {
        Ok(data) => Ok(data.claims),
        Err(err) => match err.kind() {
            ErrorKind::ExpiredSignature => Err(TokenError::Expired {
                sub: expired_subject(token, &key),
            }),
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Err(TokenError::Invalid(err.to_string())),
            _ => Err(TokenError::Unexpected(err.to_string())),
        },
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // An `exp` strictly in the past must fail; the default 60s leeway would
    // let recently-expired tokens through.
    validation.leeway = 0;
    validation
}

/// Pull the claimed subject out of an expired token for logging. The
/// signature has already been verified by the time expiry is reported, so
/// re-decoding with expiry validation off only re-reads the payload.
fn expired_subject(token: &str, key: &DecodingKey) -> Option<String> {
    let mut validation = validation();
    validation.validate_exp = false;
    decode::<Claims>(token, key, &validation)
        .ok()
        .map(|data| data.claims.sub)
}
