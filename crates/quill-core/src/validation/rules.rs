//! Field rule tables for post payloads.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://.*\.(?:png|jpg|jpeg|gif|webp)$").expect("image url pattern")
});

/// A single constraint a field value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present, not null, not blank after trimming.
    Required,
    /// A JSON string.
    IsString,
    /// At least this many characters after trimming.
    MinLength(usize),
    /// At most this many characters after trimming.
    MaxLength(usize),
    /// An http(s) URL ending in a known image extension.
    ImageUrl,
}

impl Rule {
    /// Check an already-trimmed string against the rule.
    pub(crate) fn accepts(self, value: &str) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::IsString => true,
            Rule::MinLength(min) => value.chars().count() >= min,
            Rule::MaxLength(max) => value.chars().count() <= max,
            Rule::ImageUrl => IMAGE_URL.is_match(value),
        }
    }
}

/// Ordered rules for one payload field.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Whether create accepts the field being absent.
    pub optional: bool,
    /// Whether update accepts `null` to clear the stored value.
    pub nullable: bool,
    pub rules: &'static [(Rule, &'static str)],
}

impl FieldSpec {
    pub(crate) fn message_for(&self, rule: Rule) -> &'static str {
        self.rules
            .iter()
            .find(|(r, _)| *r == rule)
            .map(|(_, message)| *message)
            .unwrap_or("Invalid value")
    }
}

pub const TITLE: FieldSpec = FieldSpec {
    name: "title",
    optional: false,
    nullable: false,
    rules: &[
        (Rule::Required, "Title is required"),
        (Rule::IsString, "Title must be a string"),
        (Rule::MinLength(3), "Title must be at least 3 characters long"),
        (Rule::MaxLength(100), "Title cannot exceed 100 characters"),
    ],
};

pub const AUTHOR: FieldSpec = FieldSpec {
    name: "author",
    optional: false,
    nullable: false,
    rules: &[
        (Rule::Required, "Author is required"),
        (Rule::IsString, "Author must be a string"),
        (Rule::MinLength(2), "Author name must be at least 2 characters long"),
        (Rule::MaxLength(50), "Author name cannot exceed 50 characters"),
    ],
};

pub const CONTENT: FieldSpec = FieldSpec {
    name: "content",
    optional: false,
    nullable: false,
    rules: &[
        (Rule::Required, "Content is required"),
        (Rule::IsString, "Content must be a string"),
        (Rule::MinLength(10), "Content must be at least 10 characters long"),
    ],
};

pub const IMAGE_URL_FIELD: FieldSpec = FieldSpec {
    name: "imageUrl",
    optional: true,
    nullable: true,
    rules: &[
        (Rule::IsString, "Image URL must be a string"),
        (
            Rule::ImageUrl,
            "Invalid image URL format. Must be a valid URL ending with png, jpg, jpeg, gif, or webp",
        ),
    ],
};

/// Every post field in evaluation order.
pub const POST_FIELDS: [&FieldSpec; 4] = [&TITLE, &AUTHOR, &CONTENT, &IMAGE_URL_FIELD];

/// One rejected field and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// All violations found in a payload, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.violations))]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn summary(&self) -> String {
        summarize(&self.violations)
    }

    /// Message for a single field, if it was rejected.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_pattern() {
        assert!(Rule::ImageUrl.accepts("https://x.com/a.webp"));
        assert!(Rule::ImageUrl.accepts("http://x.com/photo.JPEG"));
        assert!(!Rule::ImageUrl.accepts("ftp://x.png"));
        assert!(!Rule::ImageUrl.accepts("https://x.com/a.svg"));
        assert!(!Rule::ImageUrl.accepts("https://x.com/a.png?size=2"));
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(Rule::MinLength(3).accepts("äöü"));
        assert!(Rule::MaxLength(2).accepts("日本"));
        assert!(!Rule::MaxLength(2).accepts("日本語"));
    }
}
