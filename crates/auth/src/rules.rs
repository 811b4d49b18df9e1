//! Authorization rules.
//!
//! A [`RuleSet`] is an ordered, immutable list of grants built once at
//! startup. Order is precedence: the engine stops at the first rule that
//! matches. The embedded default can be replaced by a JSON document of the form
//! `[{"path": "...", "action": "..."}]`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::{self, TemplateError};

/// One grant: requests whose path matches the rendered `path` template and
/// whose method matches `action` are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub path: String,
    pub action: String,
}

impl Rule {
    pub fn new(path: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            action: action.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("failed to read rule set from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule set: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rule {index} has an invalid path template: {source}")]
    Template {
        index: usize,
        #[source]
        source: TemplateError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set as-is. Template problems surface at evaluation time.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Parse a JSON rule document, rejecting malformed templates up front.
    pub fn from_json_str(json: &str) -> Result<Self, RuleSetError> {
        let rules: Vec<Rule> = serde_json::from_str(json)?;
        for (index, rule) in rules.iter().enumerate() {
            template::check(&rule.path).map_err(|source| RuleSetError::Template { index, source })?;
        }
        Ok(Self { rules })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleSetError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RuleSetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    /// Grants for `user`-role callers: browse the catalog, manage their own
    /// resources and account, read their own quotas.
    fn default() -> Self {
        Self::from_rules(vec![
            Rule::new(r"/v\d+/catalog", "GET"),
            Rule::new(r"/v\d+/resources/{{user_id}}", ".*"),
            Rule::new(r"/v\d+/quotas/{{user_id}}", "GET"),
            Rule::new(r"/v\d+/users/{{user_id}}", ".*"),
        ])
    }
}
