use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppError,
    application::jwt::{self, Claims, TokenError},
    domain::entities::auth_user::{AuthUser, UserRole},
};

const BEARER_PREFIX: &str = "Bearer ";

/// Verifies the bearer token on every request and installs the
/// authenticated principal into the request extensions.
///
/// Requests without an `Authorization: Bearer ...` header pass through
/// unauthenticated; whether that is acceptable is the downstream handler's
/// decision. Any token that is presented must validate, or the request is
/// rejected before it reaches a handler.
pub async fn jwt_auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if app_state
        .config
        .auth_whitelist
        .matches(request.uri().path())
    {
        return Ok(next.run(request).await);
    }

    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX));

    let Some(token) = bearer else {
        // No bearer credential presented: not an error at this layer.
        return Ok(next.run(request).await);
    };

    let uri = request.uri().clone();

    let claims = match jwt::verify(token, &app_state.config.jwt_secret) {
        Ok(claims) => claims,
        Err(TokenError::Expired { sub }) => {
            tracing::info!(user_id = ?sub, uri = %uri, "expired access token");
            return Err(AppError::ExpiredToken);
        }
        Err(TokenError::Invalid(detail)) => {
            tracing::error!(error = %detail, uri = %uri, "access token rejected");
            return Err(AppError::InvalidToken(detail));
        }
        Err(TokenError::Unexpected(detail)) => {
            tracing::error!(error = %detail, uri = %uri, "access token verification failed");
            return Err(AppError::Internal(detail));
        }
    };

    let auth_user = match principal_from_claims(&claims) {
        Ok(user) => user,
        Err(detail) => {
            tracing::error!(error = %detail, uri = %uri, "access token rejected");
            return Err(AppError::InvalidToken(detail));
        }
    };

    // A principal installed by an earlier stage wins; re-authentication
    // must not clobber it.
    if request.extensions().get::<AuthUser>().is_none() {
        request.extensions_mut().insert(auth_user);
    }

    Ok(next.run(request).await)
}

/// Map validated claims onto a principal. The subject must be a numeric
/// user id and the role must be a known one; anything else is a client
/// error, not a server fault.
fn principal_from_claims(claims: &Claims) -> Result<AuthUser, String> {
    let id: i64 = claims
        .sub
        .parse()
        .map_err(|_| format!("subject is not a user id: {:?}", claims.sub))?;
    let role: UserRole = claims
        .user_role
        .parse()
        .map_err(|_| format!("unknown role: {:?}", claims.user_role))?;
    Ok(AuthUser::new(id, claims.email.clone(), role))
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Json, Router,
        http::{StatusCode, header},
        middleware,
        routing::get,
    };
    use axum_test::TestServer;
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde_json::{Value, json};
    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::{
        infra::config::PathWhitelist,
        test_utils::{TEST_SECRET, test_app_state},
    };

    async fn whoami(user: Option<Extension<AuthUser>>) -> Json<Value> {
        match user {
            Some(Extension(user)) => Json(json!({
                "authenticated": true,
                "id": user.id,
                "email": user.email,
                "role": user.role.to_string(),
                "authorities": user.authorities,
            })),
            None => Json(json!({ "authenticated": false })),
        }
    }

    fn test_server(app_state: AppState) -> TestServer {
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(app_state, jwt_auth_middleware));
        TestServer::new(app).unwrap()
    }

    /// Sign arbitrary claims with the test secret, bypassing `jwt::issue`
    /// so malformed claim sets can be produced.
    fn sign_raw(claims: &Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn issue_test_token(id: i64, email: &str, role: UserRole, ttl: Duration) -> String {
        let state = test_app_state(|_| {});
        jwt::issue(id, email, role, &state.config.jwt_secret, ttl).unwrap()
    }

    #[tokio::test]
    async fn missing_header_passes_through_unauthenticated() {
        let server = test_server(test_app_state(|_| {}));

        let response = server.get("/whoami").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn non_bearer_header_passes_through_unauthenticated() {
        let server = test_server(test_app_state(|_| {}));

        let response = server
            .get("/whoami")
            .add_header("Authorization", "Basic dXNlcjpwdw==")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "authenticated": false }));
    }

    #[tokio::test]
    async fn valid_token_installs_principal() {
        let server = test_server(test_app_state(|_| {}));
        let token = issue_test_token(7, "a@b.com", UserRole::User, Duration::hours(1));

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "authenticated": true,
            "id": 7,
            "email": "a@b.com",
            "role": "USER",
            "authorities": ["USER"],
        }));
    }

    #[tokio::test]
    async fn expired_token_is_rejected_with_401() {
        let server = test_server(test_app_state(|_| {}));
        let token = issue_test_token(7, "a@b.com", UserRole::User, Duration::seconds(-300));

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({
            "status": "UNAUTHORIZED",
            "code": 401,
            "message": "authentication required",
        }));
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json; charset=UTF-8"
        );
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected_with_400() {
        let server = test_server(test_app_state(|_| {}));
        let foreign = secrecy::SecretString::from("not-the-configured-secret".to_string());
        let token = jwt::issue(7, "a@b.com", UserRole::User, &foreign, Duration::hours(1)).unwrap();

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "status": "BAD_REQUEST",
            "code": 400,
            "message": "authentication required",
        }));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_with_400() {
        let server = test_server(test_app_state(|_| {}));

        let response = server
            .get("/whoami")
            .add_header("Authorization", "Bearer not.a.jwt")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_role_is_rejected_with_400() {
        let server = test_server(test_app_state(|_| {}));
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let token = sign_raw(&json!({
            "sub": "7",
            "email": "a@b.com",
            "userRole": "BOGUS",
            "iat": now,
            "exp": now + 3600,
        }));

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_role_claim_is_rejected_with_400() {
        let server = test_server(test_app_state(|_| {}));
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let token = sign_raw(&json!({
            "sub": "7",
            "email": "a@b.com",
            "iat": now,
            "exp": now + 3600,
        }));

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_numeric_subject_is_rejected_with_400() {
        let server = test_server(test_app_state(|_| {}));
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let token = sign_raw(&json!({
            "sub": "seven",
            "email": "a@b.com",
            "userRole": "USER",
            "iat": now,
            "exp": now + 3600,
        }));

        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn preinstalled_principal_is_not_overwritten() {
        async fn preinstall(mut request: Request, next: Next) -> Response {
            request
                .extensions_mut()
                .insert(AuthUser::new(999, "first@example.com", UserRole::Admin));
            next.run(request).await
        }

        let app_state = test_app_state(|_| {});
        // Outer layer runs first, so the preinstalled principal is already
        // present when verification sees the request.
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(app_state, jwt_auth_middleware))
            .layer(middleware::from_fn(preinstall));
        let server = TestServer::new(app).unwrap();

        let token = issue_test_token(7, "a@b.com", UserRole::User, Duration::hours(1));
        let response = server
            .get("/whoami")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "authenticated": true,
            "id": 999,
            "email": "first@example.com",
            "role": "ADMIN",
            "authorities": ["ADMIN"],
        }));
    }

    #[tokio::test]
    async fn whitelisted_path_skips_verification() {
        let server = test_server(test_app_state(|config| {
            config.auth_whitelist = PathWhitelist::new(["/whoami"]);
        }));

        let response = server
            .get("/whoami")
            .add_header("Authorization", "Bearer not.a.jwt")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "authenticated": false }));
    }
}
