use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post owned by the user who created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Owner. Bound at creation, never reassigned.
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_draft: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller may supply when creating a post.
///
/// There is deliberately no owner field here: the owner always comes from
/// the authenticated principal.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub is_draft: bool,
    pub published_at: Option<DateTime<Utc>>,
}

/// Partial update of a post. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_draft: Option<bool>,
    /// `Some(None)` clears the publication timestamp.
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl Post {
    /// Create a new post owned by `user_id`.
    pub fn new(user_id: Uuid, input: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            content: input.content,
            is_draft: input.is_draft,
            published_at: input.published_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the post is live at `now`: not a draft and published at or before `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_draft && self.published_at.is_some_and(|at| at <= now)
    }

    /// Apply a partial update and bump `updated_at`.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(is_draft) = changes.is_draft {
            self.is_draft = is_draft;
        }
        if let Some(published_at) = changes.published_at {
            self.published_at = published_at;
        }
        self.updated_at = Utc::now();
    }
}
