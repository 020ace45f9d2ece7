use serde::Serialize;
use strum::{Display, EnumString};

/// Closed role set carried in the `userRole` token claim.
///
/// Parsing from the wire string is fail-fast: an unrecognized value is an
/// error, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

/// The authenticated identity of the current request.
///
/// Built fresh from validated token claims, carried in the request
/// extensions, discarded when the request ends. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    #[serde(rename = "userRole")]
    pub role: UserRole,
    pub authorities: Vec<String>,
}

impl AuthUser {
    pub fn new(id: i64, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            email: email.into(),
            role,
            // One authority per role, named after the role itself.
            authorities: vec![role.to_string()],
        }
    }
}
