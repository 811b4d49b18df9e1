use regex::Regex;
use thiserror::Error;

use crate::claims::Claims;
use crate::rules::Rule;
use crate::template::{self, TemplateError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("path template '{template}': {source}")]
    Template {
        template: String,
        #[source]
        source: TemplateError,
    },

    #[error("invalid path pattern '{pattern}': {message}")]
    InvalidPathPattern { pattern: String, message: String },

    #[error("invalid action pattern '{pattern}': {message}")]
    InvalidActionPattern { pattern: String, message: String },
}

/// A rule rendered for one caller and compiled into matchers.
///
/// Path patterns are anchored at the start and must end either at the end of
/// the request path or at a `/` boundary, so a grant on `/v1/resources/<id>`
/// covers `/v1/resources/<id>/<rid>` but never `/v1/resources/<id>7`.
/// Action patterns must match the whole method name.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    path: Regex,
    action: Regex,
}

impl CompiledRule {
    pub fn compile(rule: &Rule, claims: &Claims) -> Result<Self, RuleError> {
        Ok(Self {
            path: path_matcher(rule, claims)?,
            action: action_matcher(rule)?,
        })
    }

    pub fn matches(&self, path: &str, method: &str) -> bool {
        self.path.is_match(path) && self.action.is_match(method)
    }
}

fn path_matcher(rule: &Rule, claims: &Claims) -> Result<Regex, RuleError> {
    let rendered = template::render(&rule.path, claims).map_err(|source| RuleError::Template {
        template: rule.path.clone(),
        source,
    })?;
    Regex::new(&format!("^(?:{rendered})(?:/.*)?$")).map_err(|e| RuleError::InvalidPathPattern {
        pattern: rendered,
        message: e.to_string(),
    })
}

fn action_matcher(rule: &Rule) -> Result<Regex, RuleError> {
    Regex::new(&format!("^(?:{})$", rule.action)).map_err(|e| RuleError::InvalidActionPattern {
        pattern: rule.action.clone(),
        message: e.to_string(),
    })
}
