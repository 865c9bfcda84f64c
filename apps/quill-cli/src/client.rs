//! HTTP client for the `/posts` API.

use quill_core::domain::{Post, PostId};
use quill_shared::ErrorResponse;
use quill_shared::dto::{CreatePostRequest, UpdatePostRequest};
use reqwest::{Response, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", .problem.message())]
    Api { status: u16, problem: ErrorResponse },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// Typed wrapper over the posts endpoints.
pub struct PostsClient {
    http: reqwest::Client,
    base_url: String,
}

impl PostsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    fn post_url(&self, id: PostId) -> String {
        format!("{}/posts/{}", self.base_url, id)
    }

    pub async fn list(&self) -> Result<Vec<Post>, ClientError> {
        let resp = self.http.get(self.posts_url()).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn get(&self, id: PostId) -> Result<Post, ClientError> {
        let resp = self.http.get(self.post_url(id)).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn create(&self, request: &CreatePostRequest) -> Result<Post, ClientError> {
        let resp = self.http.post(self.posts_url()).json(request).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn update(
        &self,
        id: PostId,
        request: &UpdatePostRequest,
    ) -> Result<Post, ClientError> {
        let resp = self.http.patch(self.post_url(id)).json(request).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn delete(&self, id: PostId) -> Result<(), ClientError> {
        let resp = self.http.delete(self.post_url(id)).send().await?;
        check(resp).await?;
        Ok(())
    }
}

/// Pass successful responses through; turn the rest into [`ClientError::Api`].
async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.bytes().await?;
    tracing::debug!(status = status.as_u16(), "API returned an error");
    Err(ClientError::Api {
        status: status.as_u16(),
        problem: decode_problem(status, &body),
    })
}

/// Parse a problem document, falling back to the status line for other bodies.
fn decode_problem(status: StatusCode, body: &[u8]) -> ErrorResponse {
    serde_json::from_slice(body).unwrap_or_else(|_| {
        let reason = status.canonical_reason().unwrap_or("Unexpected response");
        let problem = ErrorResponse::new(status.as_u16(), reason);
        match std::str::from_utf8(body) {
            Ok(text) if !text.trim().is_empty() => problem.with_detail(text.trim()),
            _ => problem,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let client = PostsClient::new("http://localhost:3000/");
        assert_eq!(client.posts_url(), "http://localhost:3000/posts");
        assert_eq!(client.post_url(7), "http://localhost:3000/posts/7");
    }

    #[test]
    fn test_decode_problem_document() {
        let body = br#"{
            "type": "about:blank",
            "title": "Bad Request",
            "status": 400,
            "detail": "Title must be at least 3 characters long",
            "errors": [{ "field": "title", "message": "Title must be at least 3 characters long" }]
        }"#;

        let problem = decode_problem(StatusCode::BAD_REQUEST, body);
        assert_eq!(problem.message(), "Title must be at least 3 characters long");
        assert_eq!(problem.errors.len(), 1);
        assert_eq!(problem.errors[0].field, "title");
    }

    #[test]
    fn test_decode_plain_text_body() {
        let problem = decode_problem(StatusCode::BAD_GATEWAY, b"upstream down\n");
        assert_eq!(problem.status, 502);
        assert_eq!(problem.title, "Bad Gateway");
        assert_eq!(problem.message(), "upstream down");

        let problem = decode_problem(StatusCode::NOT_FOUND, b"");
        assert_eq!(problem.message(), "Not Found");
    }

    #[test]
    fn test_not_found_detection() {
        let err = ClientError::Api {
            status: 404,
            problem: ErrorResponse::not_found("Post with ID 3 not found"),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Post with ID 3 not found");
    }
}
