//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use quill_core::domain::{NewPost, Post};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub author: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            content: model.content,
            image_url: model.image_url,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
///
/// `created_at` is left unset so an update can never rewrite it.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            author: Set(post.author),
            content: Set(post.content),
            image_url: Set(post.image_url),
            created_at: NotSet,
            updated_at: Set(post.updated_at.into()),
        }
    }
}

/// Build an insertable row; the database sequence assigns the ID.
pub fn new_active_model(post: NewPost, now: DateTimeUtc) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        title: Set(post.title),
        author: Set(post.author),
        content: Set(post.content),
        image_url: Set(post.image_url),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
}
