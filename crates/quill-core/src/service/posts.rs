//! Post use cases.
//!
//! Every operation that targets a single post looks it up explicitly first,
//! then runs the relevant policy check, and only then touches the store.
//! Visibility is decided before ownership so hidden posts come back as
//! `NotFound`, never `Forbidden`.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewPost, Page, PageRequest, Post, PostChanges, Principal};
use crate::error::{DomainError, RepoError};
use crate::policy::PostAccessPolicy;
use crate::ports::{Clock, PostRepository};

/// A post the caller has been authorized to change.
///
/// Only [`PostService::authorize_mutation`] hands these out.
#[derive(Debug)]
pub struct OwnedPost(Post);

impl OwnedPost {
    pub fn post(&self) -> &Post {
        &self.0
    }
}

/// Post operations exposed to the HTTP layer.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
    policy: PostAccessPolicy,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        clock: Arc<dyn Clock>,
        policy: PostAccessPolicy,
    ) -> Self {
        Self {
            posts,
            clock,
            policy,
        }
    }

    /// One page of live posts.
    pub async fn list(&self, page: PageRequest) -> Result<Page<Post>, DomainError> {
        let now = self.clock.now();
        let page = self.posts.find_live_page(now, page).await?;

        // The store filters already; re-check so a lax backend cannot leak drafts.
        let policy = self.policy;
        let items = page
            .items
            .into_iter()
            .filter(|post| policy.is_publicly_visible(post, now))
            .collect();

        Ok(Page { items, ..page })
    }

    /// A single live post.
    pub async fn show(&self, id: Uuid, principal: Option<&Principal>) -> Result<Post, DomainError> {
        let post = self.find(id).await?;

        self.policy
            .authorize_view(&post, principal, self.clock.now())
            .map_err(|denial| {
                tracing::debug!(post_id = %id, "Post hidden from caller");
                DomainError::from_denial(denial, id)
            })?;

        Ok(post)
    }

    /// Create a post owned by `principal`.
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        input: NewPost,
    ) -> Result<Post, DomainError> {
        let owner = principal.ok_or(DomainError::Unauthenticated)?;

        let post = Post::new(owner.id, input);
        let saved = self.posts.insert(post).await?;

        tracing::info!(post_id = %saved.id, owner_id = %owner.id, "Post created");
        Ok(saved)
    }

    /// Apply `changes` to a post owned by `principal`.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let owned = self.authorize_mutation(principal, id).await?;
        self.update_owned(owned, changes).await
    }

    /// Apply `changes` to a post whose ownership was already checked.
    pub async fn update_owned(
        &self,
        owned: OwnedPost,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let mut post = owned.0;
        let id = post.id;

        post.apply(changes);
        let saved = self.posts.update(post).await.map_err(|e| missing_as(e, id))?;

        tracing::info!(post_id = %id, "Post updated");
        Ok(saved)
    }

    /// Delete a post owned by `principal`.
    pub async fn delete(&self, principal: Option<&Principal>, id: Uuid) -> Result<(), DomainError> {
        self.authorize_mutation(principal, id).await?;

        self.posts.delete(id).await.map_err(|e| missing_as(e, id))?;

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Load post `id` and check that `principal` may change it.
    ///
    /// Lets callers reject a non-owner before looking at the request body,
    /// then hand the result to [`PostService::update_owned`].
    pub async fn authorize_mutation(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
    ) -> Result<OwnedPost, DomainError> {
        let principal = principal.ok_or(DomainError::Unauthenticated)?;
        let post = self.find(id).await?;

        self.policy
            .authorize_mutation(&post, Some(principal))
            .map_err(|denial| DomainError::from_denial(denial, id))?;

        Ok(OwnedPost(post))
    }

    async fn find(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }
}

/// A row that vanished between lookup and write is reported as not found.
fn missing_as(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::post_not_found(id),
        other => other.into(),
    }
}
