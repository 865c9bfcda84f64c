//! In-memory post repository - used when no database is configured.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use quill_core::domain::{NewPost, Post, PostId};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

#[derive(Default)]
struct Table {
    rows: BTreeMap<PostId, Post>,
    last_id: PostId,
}

/// In-memory post table guarded by an async RwLock.
///
/// IDs come from a counter that only moves forward, so a deleted post's ID is
/// never handed out again. Data is lost on process restart.
pub struct InMemoryPostRepository {
    table: RwLock<Table>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::default()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        let row = table.rows.get_mut(&post.id).ok_or(RepoError::NotFound)?;

        // created_at is owned by the row, mirroring the database mapping.
        let created_at = row.created_at;
        *row = Post { created_at, ..post };
        Ok(row.clone())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let post = new_post.into_post(table.last_id, now);
        table.rows.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let table = self.table.read().await;
        let mut posts: Vec<Post> = table.rows.values().cloned().collect();
        posts.sort_by_key(|p| Reverse((p.created_at, p.id)));
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeDelta;
    use quill_core::{DomainError, PostService};
    use serde_json::{Map, Value, json};

    use super::*;

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            author: "Test Author".to_string(),
            content: "Test Content".to_string(),
            image_url: None,
        }
    }

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn service() -> PostService {
        PostService::new(Arc::new(InMemoryPostRepository::new()))
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryPostRepository::new();
        let first = repo.create(new_post("First"), Utc::now()).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.create(new_post("Second"), Utc::now()).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryPostRepository::new();
        let base = Utc::now();
        for (i, title) in ["One", "Two", "Three"].into_iter().enumerate() {
            repo.create(new_post(title), base + TimeDelta::seconds(i as i64))
                .await
                .unwrap();
        }

        let titles: Vec<_> = repo
            .find_all_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Three", "Two", "One"]);
    }

    #[tokio::test]
    async fn test_save_missing_row_is_not_found() {
        let repo = InMemoryPostRepository::new();
        let ghost = new_post("Ghost").into_post(42, Utc::now());
        assert!(matches!(repo.save(ghost).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_service_create_sets_equal_timestamps() {
        let post = service()
            .create(&body(json!({
                "title": "Test Post",
                "author": "Test Author",
                "content": "Test Content"
            })))
            .await
            .unwrap();

        assert_eq!(post.title, "Test Post");
        assert_eq!(post.created_at, post.updated_at);
    }

    #[tokio::test]
    async fn test_service_unknown_id_is_not_found() {
        let err = service().find_by_id(999_999).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { id: 999_999, .. }));
    }

    #[tokio::test]
    async fn test_service_update_title_only() {
        let service = service();
        let created = service
            .create(&body(json!({
                "title": "Test Post",
                "author": "Test Author",
                "content": "Test Content"
            })))
            .await
            .unwrap();

        let updated = service
            .update(created.id, &body(json!({ "title": "Renamed Post" })))
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed Post");
        assert_eq!(updated.author, created.author);
        assert_eq!(updated.content, created.content);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > updated.created_at);
    }

    #[tokio::test]
    async fn test_service_empty_update_only_refreshes_timestamp() {
        let service = service();
        let created = service
            .create(&body(json!({
                "title": "Test Post",
                "author": "Test Author",
                "content": "Test Content",
                "imageUrl": "https://x.com/a.webp"
            })))
            .await
            .unwrap();

        let updated = service.update(created.id, &Map::new()).await.unwrap();

        assert_eq!(updated.title, created.title);
        assert_eq!(updated.author, created.author);
        assert_eq!(updated.content, created.content);
        assert_eq!(updated.image_url, created.image_url);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_service_delete_then_fetch_is_not_found() {
        let service = service();
        let created = service
            .create(&body(json!({
                "title": "Test Post",
                "author": "Test Author",
                "content": "Test Content"
            })))
            .await
            .unwrap();

        service.delete(created.id).await.unwrap();

        assert!(matches!(
            service.find_by_id(created.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete(created.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_service_update_missing_post_is_not_found() {
        let err = service()
            .update(7, &body(json!({ "title": "Valid Title" })))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { id: 7, .. }));
    }
}
