use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::{
    adapters::http::{app_state::AppState, extract::CurrentUser},
    app_error::AppResult,
    domain::entities::auth_user::UserRole,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[derive(Serialize)]
struct MeResponse {
    id: i64,
    email: String,
    #[serde(rename = "userRole")]
    user_role: UserRole,
    authorities: Vec<String>,
}

async fn get_me(CurrentUser(user): CurrentUser) -> AppResult<impl IntoResponse> {
    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        user_role: user.role,
        authorities: user.authorities,
    }))
}
