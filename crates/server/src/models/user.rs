use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Homeowner,
    Architect,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Homeowner => "homeowner",
            Role::Architect => "architect",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "homeowner" => Ok(Role::Homeowner),
            "architect" => Ok(Role::Architect),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub image: Option<String>,
}

/// Public profile fields, used wherever another user is shown.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub image: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub image: Option<String>,
    pub location: Option<String>,
    pub created_at: String,
    #[sqlx(default)]
    pub follower_count: i64,
    #[sqlx(default)]
    pub following_count: i64,
}

/// Follow state after a follow/unfollow, with counts re-derived from the store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowState {
    pub following: bool,
    /// False when the call was a no-op (already following / not following).
    pub changed: bool,
    pub follower_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub following: bool,
    pub followed_by: bool,
    pub follower_count: i64,
    pub following_count: i64,
    pub hiring_status: Option<super::HireStatus>,
    pub hired: bool,
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// `None` when the field is absent, `Some(None)` for an explicit null.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,
    pub role: Option<String>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
