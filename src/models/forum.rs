use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tags a forum post may carry. The backend rejects unknown tags, so
/// the picker offers exactly this list.
pub const FORUM_TAGS: &[&str] = &[
    "Ação policial",
    "Arrastão",
    "Ataque a civis",
    "Briga",
    "Homicídio/Tentativa",
];

/// True when every tag is one the backend knows
pub fn tags_are_known(tags: &[String]) -> bool {
    tags.iter().all(|t| FORUM_TAGS.contains(&t.as_str()))
}

/// Body for POST /forums
#[derive(Debug, Clone, Serialize)]
pub struct CreateForum {
    pub subject: String,
    pub city: String,
    pub tags: Vec<String>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forum {
    pub id: String,
    pub subject: String,
    pub city: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForumOwner {
    pub name: String,
}

/// Forum detail with its owner's display name (GET /forums/:id)
#[derive(Debug, Clone, Deserialize)]
pub struct ForumWithOwner {
    #[serde(flatten)]
    pub forum: Forum,
    pub owner: ForumOwner,
}

/// Body for POST /forums/comments
#[derive(Debug, Clone, Serialize)]
pub struct CreateComment {
    pub content: String,
    #[serde(rename = "forumId")]
    pub forum_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentOwner {
    pub name: String,
    /// Compared against the session's user id for delete permission
    pub id: String,
}

/// Comment with its owner (GET /forums/:forumId/comments)
#[derive(Debug, Clone, Deserialize)]
pub struct CommentWithOwner {
    #[serde(flatten)]
    pub comment: Comment,
    pub owner: CommentOwner,
}
