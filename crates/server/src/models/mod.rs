mod conversation;
mod hiring;
mod notification;
mod post;
mod user;

pub use conversation::*;
pub use hiring::*;
pub use notification::*;
pub use post::*;
pub use user::*;

use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Identity resolved from a session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}
