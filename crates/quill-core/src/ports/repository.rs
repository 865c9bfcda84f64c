use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewPost, Post, PostId};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist changes to an existing entity.
    ///
    /// Fails with [`RepoError::NotFound`] when no row carries the entity's ID.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    /// Insert a new post; storage assigns the ID.
    async fn create(&self, post: NewPost, now: DateTime<Utc>) -> Result<Post, RepoError>;

    /// All posts, newest `created_at` first, ties broken by descending ID.
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError>;
}
