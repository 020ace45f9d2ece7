use crate::app_error::{AppError, ErrorStatus};
use axum::Json;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::ExpiredToken | AppError::MissingCredentials => error_resp(
                StatusCode::UNAUTHORIZED,
                ErrorStatus::Unauthorized,
                "authentication required",
            ),
            AppError::InvalidToken(_) => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorStatus::BadRequest,
                "authentication required",
            ),
            // Internal detail stays in the logs, never in the body.
            AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorStatus::InternalServerError,
                "error while processing request",
            ),
        }
    }
}

fn error_resp(code: StatusCode, status: ErrorStatus, message: &str) -> Response {
    let body = serde_json::json!({
        "status": status.as_str(),
        "code": code.as_u16(),
        "message": message,
    });
    let mut response = (code, Json(body)).into_response();
    // The wire contract pins the charset; axum's Json sets bare `application/json`.
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json; charset=UTF-8"),
    );
    response
}
