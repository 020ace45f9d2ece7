use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{app_error::AppError, domain::entities::auth_user::AuthUser};

/// Hands a handler the principal installed by the verification middleware.
///
/// Rejects with 401 when the request reached the handler unauthenticated
/// (no bearer header was presented, or the route sits outside the
/// middleware stack).
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::MissingCredentials)
    }
}
