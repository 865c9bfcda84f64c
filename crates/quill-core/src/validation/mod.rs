//! Post payload validation - pure logic, no storage access.
//!
//! Payloads arrive as raw JSON objects so that type mismatches can be
//! reported per field. Unknown keys are ignored. Every field is checked and
//! the first failing rule of each field is reported.

mod rules;

use serde_json::{Map, Value};

use crate::domain::{NewPost, PostChanges};

pub use rules::{
    AUTHOR, CONTENT, FieldSpec, FieldViolation, IMAGE_URL_FIELD, POST_FIELDS, Rule, TITLE,
    ValidationErrors,
};

/// What a single field resolved to after its rules ran.
#[derive(Debug)]
enum Checked {
    Absent,
    Null,
    Value(String),
}

/// Validate a create payload into a trimmed [`NewPost`].
pub fn validate_new_post(body: &Map<String, Value>) -> Result<NewPost, ValidationErrors> {
    let mut violations = Vec::new();
    let [title, author, content, image_url] =
        POST_FIELDS.map(|spec| check_field(spec, body.get(spec.name), true, &mut violations));

    if !violations.is_empty() {
        return Err(ValidationErrors { violations });
    }

    Ok(NewPost {
        title: required(title),
        author: required(author),
        content: required(content),
        image_url: optional(image_url),
    })
}

/// Validate an update payload. Absent fields stay `None`.
pub fn validate_post_changes(body: &Map<String, Value>) -> Result<PostChanges, ValidationErrors> {
    let mut violations = Vec::new();
    let [title, author, content, image_url] =
        POST_FIELDS.map(|spec| check_field(spec, body.get(spec.name), false, &mut violations));

    if !violations.is_empty() {
        return Err(ValidationErrors { violations });
    }

    Ok(PostChanges {
        title: optional(title),
        author: optional(author),
        content: optional(content),
        image_url: match image_url {
            Checked::Absent => None,
            Checked::Null => Some(None),
            Checked::Value(url) => Some(Some(url)),
        },
    })
}

fn check_field(
    spec: &FieldSpec,
    value: Option<&Value>,
    creating: bool,
    violations: &mut Vec<FieldViolation>,
) -> Checked {
    let mut reject = |message: &str| {
        violations.push(FieldViolation {
            field: spec.name.to_string(),
            message: message.to_string(),
        });
        Checked::Absent
    };

    let raw = match value {
        None if creating && !spec.optional => return reject(spec.message_for(Rule::Required)),
        None => return Checked::Absent,
        Some(Value::Null) if creating && spec.optional => return Checked::Absent,
        Some(Value::Null) if !creating && spec.nullable => return Checked::Null,
        Some(Value::Null) => return reject(spec.message_for(Rule::Required)),
        Some(Value::String(s)) => s,
        Some(_) => return reject(spec.message_for(Rule::IsString)),
    };

    let trimmed = raw.trim();
    for &(rule, message) in spec.rules {
        if !rule.accepts(trimmed) {
            return reject(message);
        }
    }

    Checked::Value(trimmed.to_string())
}

fn required(checked: Checked) -> String {
    match checked {
        Checked::Value(value) => value,
        Checked::Absent | Checked::Null => String::new(),
    }
}

fn optional(checked: Checked) -> Option<String> {
    match checked {
        Checked::Value(value) => Some(value),
        Checked::Absent | Checked::Null => None,
    }
}
