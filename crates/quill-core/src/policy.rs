//! Post access policy.
//!
//! Decides who may see and who may change a post. Every decision is a pure
//! function of the post, the calling principal and the evaluation time, so the
//! policy is a plain value handed to whoever needs it.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Post, Principal};

/// Why an access decision went against the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// The operation needs a principal and there is none.
    #[error("authentication required")]
    Unauthenticated,

    /// A principal is present but is not allowed to act on the post.
    #[error("not allowed to modify this post")]
    Forbidden,

    /// The post exists but must not be revealed to the caller.
    #[error("post not found")]
    NotFound,
}

/// Visibility and ownership rules for posts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostAccessPolicy;

impl PostAccessPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Whether an anonymous reader may see `post` at `now`.
    pub fn is_publicly_visible(&self, post: &Post, now: DateTime<Utc>) -> bool {
        post.is_live_at(now)
    }

    /// Whether `principal` may see `post` through a single-item lookup.
    ///
    /// Same rule as anonymous visibility: authors get no preview of their own
    /// drafts or scheduled posts.
    pub fn can_view(
        &self,
        post: &Post,
        _principal: Option<&Principal>,
        now: DateTime<Utc>,
    ) -> bool {
        self.is_publicly_visible(post, now)
    }

    /// Whether `principal` may update or delete `post`.
    pub fn can_mutate(&self, post: &Post, principal: Option<&Principal>) -> bool {
        principal.is_some_and(|p| p.id == post.user_id)
    }

    /// Visibility check for single-item retrieval. Hidden posts are reported
    /// as `NotFound` so drafts never leak their existence.
    pub fn authorize_view(
        &self,
        post: &Post,
        principal: Option<&Principal>,
        now: DateTime<Utc>,
    ) -> Result<(), AccessDenied> {
        if self.can_view(post, principal, now) {
            Ok(())
        } else {
            Err(AccessDenied::NotFound)
        }
    }

    /// Ownership check for update and delete.
    pub fn authorize_mutation(
        &self,
        post: &Post,
        principal: Option<&Principal>,
    ) -> Result<(), AccessDenied> {
        match principal {
            None => Err(AccessDenied::Unauthenticated),
            Some(_) if self.can_mutate(post, principal) => Ok(()),
            Some(p) => {
                tracing::warn!(post_id = %post.id, principal_id = %p.id, "Mutation denied: not the owner");
                Err(AccessDenied::Forbidden)
            }
        }
    }
}
