//! Placeholder substitution for rule path templates.
//!
//! A template is a path pattern with `{{field}}` placeholders. Only the claim
//! fields listed in [`ClaimField`] can be interpolated; substituted values are
//! regex-escaped so they always match literally.

use thiserror::Error;

use crate::claims::Claims;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder '{0}'")]
    UnknownPlaceholder(String),

    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),
}

/// Claim fields that may appear in a path template.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClaimField {
    UserId,
    Email,
    Role,
}

impl ClaimField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user_id" => Some(ClaimField::UserId),
            "email" => Some(ClaimField::Email),
            "role" => Some(ClaimField::Role),
            _ => None,
        }
    }

    fn value(&self, claims: &Claims) -> String {
        match self {
            ClaimField::UserId => claims.user_id.to_string(),
            ClaimField::Email => claims.email.clone(),
            ClaimField::Role => claims.role.to_string(),
        }
    }
}

enum Segment<'a> {
    Literal(&'a str),
    Field(ClaimField),
}

fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        if start > 0 {
            segments.push(Segment::Literal(&rest[..start]));
        }
        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or(TemplateError::Unterminated(offset + start))?;

        let name = after_open[..end].trim();
        let field = ClaimField::from_name(name)
            .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;
        segments.push(Segment::Field(field));

        let consumed = start + OPEN.len() + end + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }

    Ok(segments)
}

/// Check a template's placeholder syntax without rendering it.
pub fn check(template: &str) -> Result<(), TemplateError> {
    parse(template).map(|_| ())
}

/// Render `template` against `claims`.
pub fn render(template: &str, claims: &Claims) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    for segment in parse(template)? {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Field(field) => out.push_str(&regex::escape(&field.value(claims))),
        }
    }
    Ok(out)
}
