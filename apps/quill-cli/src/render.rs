//! Plain-text views of posts and API errors.

use chrono::{DateTime, Utc};
use quill_core::domain::Post;
use quill_shared::ErrorResponse;

/// Characters of content shown in a list card.
const EXCERPT_CHARS: usize = 150;

/// "Jan 5, 2026"
pub fn short_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// "Monday, January 5, 2026"
pub fn long_date(at: &DateTime<Utc>) -> String {
    at.format("%A, %B %-d, %Y").to_string()
}

/// The first 150 characters of `content`, with "..." appended when cut.
pub fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Compact block used by `quill list`.
pub fn card(post: &Post) -> String {
    let mut out = format!(
        "#{} {}\n   by {} on {}\n",
        post.id,
        post.title,
        post.author,
        short_date(&post.created_at)
    );
    if post.image_url.is_some() {
        out.push_str("   [image]\n");
    }
    out.push_str("   ");
    out.push_str(&excerpt(&post.content));
    out.push('\n');
    out
}

/// Full view used by `quill show`.
pub fn detail(post: &Post) -> String {
    let mut out = format!(
        "{}\nBy {} | {}\n",
        post.title,
        post.author,
        long_date(&post.created_at)
    );
    if post.updated_at != post.created_at {
        out.push_str(&format!("Updated {}\n", long_date(&post.updated_at)));
    }
    if let Some(url) = &post.image_url {
        out.push_str(&format!("Image: {}\n", url));
    }
    out.push('\n');
    out.push_str(&post.content);
    out.push('\n');
    out
}

/// A problem document as one line per field error, or its message.
pub fn problem(problem: &ErrorResponse) -> String {
    if problem.errors.is_empty() {
        return format!("Error {}: {}", problem.status, problem.message());
    }
    problem
        .errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}
