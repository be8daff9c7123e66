use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: String,
}

/// Ledger-derived counters plus the caller's own flags.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostStats {
    pub like_count: i64,
    pub save_count: i64,
    pub liked: bool,
    pub saved: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWithStats {
    #[serde(flatten)]
    pub post: Post,
    pub stats: PostStats,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
}
