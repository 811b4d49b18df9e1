use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::claims::Claims;
use crate::matcher::{CompiledRule, RuleError};
use crate::rules::RuleSet;

/// Outcome of one authorization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionReason {
    /// Admins are allowed without consulting any rule.
    AdminBypass,
    /// The rule at `index` was the first to match.
    RuleMatched { index: usize },
    NoMatchingRule,
}

impl Decision {
    fn allow(reason: DecisionReason) -> Self {
        Self { allowed: true, reason }
    }

    fn deny(reason: DecisionReason) -> Self {
        Self { allowed: false, reason }
    }
}

impl core::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecisionReason::AdminBypass => f.write_str("admin bypass"),
            DecisionReason::RuleMatched { index } => write!(f, "rule {index} matched"),
            DecisionReason::NoMatchingRule => f.write_str("no matching rule"),
        }
    }
}

/// A misconfigured rule. Never a denial: it must surface as a server error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("rule {index} is misconfigured: {source}")]
pub struct AuthzError {
    pub index: usize,
    #[source]
    pub source: RuleError,
}

/// Decide whether `claims` may perform `method` on `path`.
///
/// - No IO
/// - No panics
/// - First matching rule wins; no match means deny
pub fn authorize(
    rules: &RuleSet,
    claims: &Claims,
    path: &str,
    method: &str,
) -> Result<Decision, AuthzError> {
    if claims.role.is_admin() {
        return Ok(Decision::allow(DecisionReason::AdminBypass));
    }

    // Compiled per call: templates depend on the caller's claims.
    for (index, rule) in rules.rules().iter().enumerate() {
        let compiled =
            CompiledRule::compile(rule, claims).map_err(|source| AuthzError { index, source })?;
        if compiled.matches(path, method) {
            return Ok(Decision::allow(DecisionReason::RuleMatched { index }));
        }
    }

    Ok(Decision::deny(DecisionReason::NoMatchingRule))
}

/// Authorization engine bound to the process-wide rule set.
#[derive(Debug, Clone)]
pub struct Authorizer {
    rules: Arc<RuleSet>,
}

impl Authorizer {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn authorize(&self, claims: &Claims, path: &str, method: &str) -> Result<Decision, AuthzError> {
        let decision = authorize(&self.rules, claims, path, method)?;
        tracing::debug!(
            user_id = %claims.user_id,
            role = %claims.role,
            %method,
            %path,
            allowed = decision.allowed,
            reason = %decision.reason,
            "authorization decision"
        );
        Ok(decision)
    }
}
