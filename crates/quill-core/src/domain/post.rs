use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned post identifier.
pub type PostId = i64;

/// Post entity - a titled, authored, timestamped blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// A validated partial update. `None` leaves the field untouched.
///
/// `image_url` is tri-state: `None` keeps the current image, `Some(None)`
/// removes it, `Some(Some(url))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.content.is_none()
            && self.image_url.is_none()
    }
}

impl NewPost {
    /// Stamp the post with an id and identical creation/update timestamps.
    pub fn into_post(self, id: PostId, now: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            author: self.author,
            content: self.content,
            image_url: self.image_url,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Post {
    /// Merge the supplied fields and refresh `updated_at`.
    ///
    /// The refreshed timestamp is strictly later than the previous one, even
    /// when the clock has not advanced between two writes.
    pub fn apply(&mut self, changes: PostChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(author) = changes.author {
            self.author = author;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(image_url) = changes.image_url {
            self.image_url = image_url;
        }
        self.updated_at = now.max(self.updated_at + TimeDelta::microseconds(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        NewPost {
            title: "Test Post".to_string(),
            author: "Test Author".to_string(),
            content: "Test Content".to_string(),
            image_url: Some("https://x.com/a.png".to_string()),
        }
        .into_post(1, Utc::now())
    }

    #[test]
    fn test_apply_merges_only_supplied_fields() {
        let mut post = sample();
        let before = post.clone();

        post.apply(
            PostChanges {
                title: Some("New Title".to_string()),
                ..Default::default()
            },
            before.updated_at,
        );

        assert_eq!(post.title, "New Title");
        assert_eq!(post.author, before.author);
        assert_eq!(post.content, before.content);
        assert_eq!(post.image_url, before.image_url);
        assert_eq!(post.created_at, before.created_at);
        assert!(post.updated_at > post.created_at);
    }

    #[test]
    fn test_apply_can_clear_image() {
        let mut post = sample();
        post.apply(
            PostChanges {
                image_url: Some(None),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(post.image_url, None);
    }

    #[test]
    fn test_serializes_camel_case_and_omits_missing_image() {
        let mut post = sample();
        post.image_url = None;
        let json = serde_json::to_value(&post).unwrap();

        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("imageUrl").is_none());
        assert!(json.get("created_at").is_none());
    }
}
