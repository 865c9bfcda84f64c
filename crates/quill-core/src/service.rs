//! Post store - validated CRUD over a [`PostRepository`].

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::domain::{Post, PostId};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;
use crate::validation::{validate_new_post, validate_post_changes};

/// Entry point for every post operation.
///
/// Payloads are validated before the repository is touched. Repository
/// failures surface as [`DomainError::Storage`], missing rows as
/// [`DomainError::NotFound`].
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, body: &Map<String, Value>) -> Result<Post, DomainError> {
        let new_post = validate_new_post(body)?;
        let post = self.repo.create(new_post, Utc::now()).await?;
        tracing::info!(post_id = post.id, "Post created");
        Ok(post)
    }

    pub async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.repo.find_all_newest_first().await?)
    }

    pub async fn find_by_id(&self, id: PostId) -> Result<Post, DomainError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            tracing::debug!(post_id = id, "Post not found");
            DomainError::post_not_found(id)
        })
    }

    /// Merge the supplied fields into an existing post.
    ///
    /// Read-then-write without locking: concurrent updates of the same post
    /// are last-write-wins.
    pub async fn update(&self, id: PostId, body: &Map<String, Value>) -> Result<Post, DomainError> {
        let changes = validate_post_changes(body)?;
        let mut post = self.find_by_id(id).await?;
        post.apply(changes, Utc::now());

        let saved = self.repo.save(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(id),
            other => DomainError::Storage(other),
        })?;
        tracing::info!(post_id = id, "Post updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: PostId) -> Result<(), DomainError> {
        self.find_by_id(id).await?;
        self.repo.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(id),
            other => DomainError::Storage(other),
        })?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    use super::*;
    use crate::domain::NewPost;
    use crate::ports::BaseRepository;

    /// Counts calls and fails every one of them like a dropped connection.
    #[derive(Default)]
    struct BrokenRepo {
        calls: AtomicUsize,
    }

    impl BrokenRepo {
        fn fail<T>(&self) -> Result<T, RepoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(RepoError::Connection("connection reset".to_string()))
        }
    }

    #[async_trait]
    impl BaseRepository<Post, PostId> for BrokenRepo {
        async fn find_by_id(&self, _id: PostId) -> Result<Option<Post>, RepoError> {
            self.fail()
        }

        async fn save(&self, _post: Post) -> Result<Post, RepoError> {
            self.fail()
        }

        async fn delete(&self, _id: PostId) -> Result<(), RepoError> {
            self.fail()
        }
    }

    #[async_trait]
    impl PostRepository for BrokenRepo {
        async fn create(&self, _post: NewPost, _now: DateTime<Utc>) -> Result<Post, RepoError> {
            self.fail()
        }

        async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
            self.fail()
        }
    }

    fn body(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_invalid_payload_never_reaches_storage() {
        let repo = Arc::new(BrokenRepo::default());
        let service = PostService::new(repo.clone());

        let err = service
            .create(&body(json!({ "title": "ab" })))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .update(1, &body(json!({ "imageUrl": "ftp://x.png" })))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_storage_failures_surface_as_storage_errors() {
        let service = PostService::new(Arc::new(BrokenRepo::default()));

        let err = service.find_all().await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(RepoError::Connection(_))));

        let err = service.delete(1).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
