//! Post handlers - the `/posts` resource.

use actix_web::{HttpResponse, web};
use quill_core::domain::PostId;
use serde_json::{Map, Value};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn parse_id(raw: &str) -> AppResult<PostId> {
    raw.parse().map_err(|_| {
        AppError::BadRequest("Validation failed (numeric string is expected)".to_string())
    })
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<Map<String, Value>>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(&body.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_all().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let post = state.posts.find_by_id(id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PATCH /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let post = state.posts.update(id, &body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.posts.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
