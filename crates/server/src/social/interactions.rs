use sqlx::SqlitePool;

use archlink_shared::validation;

use crate::error::{AppError, AppResult};
use crate::models::{AuthUser, CreatePostRequest, NotificationKind, Post, PostStats, PostWithStats, Role};
use crate::AppState;

use super::notifications;

#[derive(Debug, Clone, Copy)]
enum Ledger {
    Likes,
    Saves,
}

impl Ledger {
    fn table(self) -> &'static str {
        match self {
            Ledger::Likes => "likes",
            Ledger::Saves => "saved_posts",
        }
    }
}

/// Inserts one ledger row. Returns false when the row already existed.
///
/// No existence check runs first; the (user, post) unique index settles races
/// and the resulting conflict counts as the "already there" outcome.
async fn record(db: &SqlitePool, ledger: Ledger, user_id: &str, post_id: &str) -> AppResult<bool> {
    let sql = format!(
        "INSERT INTO {} (id, user_id, post_id, created_at) VALUES (?, ?, ?, ?)",
        ledger.table()
    );
    let result = sqlx::query(&sql)
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(post_id)
        .bind(crate::db::now())
        .execute(db)
        .await
        .map_err(AppError::from);

    match result {
        Ok(_) => Ok(true),
        Err(e) if e.is_conflict() => Ok(false),
        Err(e) => Err(e),
    }
}

async fn erase(db: &SqlitePool, ledger: Ledger, user_id: &str, post_id: &str) -> AppResult<bool> {
    let sql = format!("DELETE FROM {} WHERE user_id = ? AND post_id = ?", ledger.table());
    let result = sqlx::query(&sql)
        .bind(user_id)
        .bind(post_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn require_post_id(post_id: &str) -> AppResult<&str> {
    let post_id = post_id.trim();
    if post_id.is_empty() {
        return Err(AppError::Validation("Post id is required".into()));
    }
    Ok(post_id)
}

/// Likes a post. A fresh like on a known post notifies its author.
pub async fn like(state: &AppState, user: &AuthUser, post_id: &str) -> AppResult<PostStats> {
    let post_id = require_post_id(post_id)?;
    let fresh = record(&state.db, Ledger::Likes, &user.id, post_id).await?;

    if fresh {
        if let Some(post) = find_post(&state.db, post_id).await? {
            if post.author_id != user.id {
                notifications::notify(
                    state,
                    &post.author_id,
                    NotificationKind::Like,
                    &format!("{} liked your post \"{}\"", user.name, post.title),
                    Some(&post.id),
                )
                .await?;
            }
        }
    } else {
        tracing::debug!(user = %user.id, post = %post_id, "Post already liked");
    }

    post_stats(&state.db, post_id, Some(&user.id)).await
}

pub async fn unlike(db: &SqlitePool, user_id: &str, post_id: &str) -> AppResult<PostStats> {
    let post_id = require_post_id(post_id)?;
    erase(db, Ledger::Likes, user_id, post_id).await?;
    post_stats(db, post_id, Some(user_id)).await
}

pub async fn save(db: &SqlitePool, user_id: &str, post_id: &str) -> AppResult<PostStats> {
    let post_id = require_post_id(post_id)?;
    record(db, Ledger::Saves, user_id, post_id).await?;
    post_stats(db, post_id, Some(user_id)).await
}

pub async fn unsave(db: &SqlitePool, user_id: &str, post_id: &str) -> AppResult<PostStats> {
    let post_id = require_post_id(post_id)?;
    erase(db, Ledger::Saves, user_id, post_id).await?;
    post_stats(db, post_id, Some(user_id)).await
}

/// Counters are always recomputed from the ledger.
pub async fn post_stats(db: &SqlitePool, post_id: &str, viewer_id: Option<&str>) -> AppResult<PostStats> {
    let (like_count, save_count, liked, saved) = sqlx::query_as::<_, (i64, i64, bool, bool)>(
        r#"SELECT
               (SELECT COUNT(*) FROM likes WHERE post_id = ?1),
               (SELECT COUNT(*) FROM saved_posts WHERE post_id = ?1),
               EXISTS(SELECT 1 FROM likes WHERE post_id = ?1 AND user_id = ?2),
               EXISTS(SELECT 1 FROM saved_posts WHERE post_id = ?1 AND user_id = ?2)"#,
    )
    .bind(post_id)
    .bind(viewer_id)
    .fetch_one(db)
    .await?;

    Ok(PostStats {
        like_count,
        save_count,
        liked,
        saved,
    })
}

pub async fn create_post(
    db: &SqlitePool,
    author: &AuthUser,
    body: CreatePostRequest,
) -> AppResult<PostWithStats> {
    if author.role != Role::Architect {
        return Err(AppError::Forbidden("Only architects can publish posts".into()));
    }
    validation::validate_post_title(&body.title).map_err(AppError::Validation)?;
    validation::validate_post_description(&body.description).map_err(AppError::Validation)?;

    let post = Post {
        id: uuid::Uuid::new_v4().to_string(),
        author_id: author.id.clone(),
        title: body.title.trim().to_string(),
        description: body.description.trim().to_string(),
        image: body.image.filter(|i| !i.trim().is_empty()),
        created_at: crate::db::now(),
    };

    sqlx::query(
        r#"INSERT INTO posts (id, author_id, title, description, image, created_at)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&post.id)
    .bind(&post.author_id)
    .bind(&post.title)
    .bind(&post.description)
    .bind(&post.image)
    .bind(&post.created_at)
    .execute(db)
    .await?;

    tracing::info!(post = %post.id, author = %author.id, "Post created");

    Ok(PostWithStats {
        post,
        stats: PostStats {
            like_count: 0,
            save_count: 0,
            liked: false,
            saved: false,
        },
    })
}

async fn find_post(db: &SqlitePool, post_id: &str) -> AppResult<Option<Post>> {
    let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(db)
        .await?;
    Ok(post)
}

pub async fn get_post(db: &SqlitePool, post_id: &str, viewer_id: Option<&str>) -> AppResult<PostWithStats> {
    let post = find_post(db, post_id)
        .await?
        .ok_or_else(|| AppError::not_found("Post"))?;
    let stats = post_stats(db, &post.id, viewer_id).await?;
    Ok(PostWithStats { post, stats })
}

/// Newest first, optionally restricted to one author.
pub async fn list_posts(
    db: &SqlitePool,
    author_id: Option<&str>,
    viewer_id: Option<&str>,
) -> AppResult<Vec<PostWithStats>> {
    let posts = match author_id {
        Some(author_id) => {
            sqlx::query_as::<_, Post>(
                "SELECT * FROM posts WHERE author_id = ? ORDER BY created_at DESC, rowid DESC",
            )
            .bind(author_id)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, Post>("SELECT * FROM posts ORDER BY created_at DESC, rowid DESC")
                .fetch_all(db)
                .await?
        }
    };

    let mut result = Vec::with_capacity(posts.len());
    for post in posts {
        let stats = post_stats(db, &post.id, viewer_id).await?;
        result.push(PostWithStats { post, stats });
    }
    Ok(result)
}
