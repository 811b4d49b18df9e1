//! Process configuration, built once at startup from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Duration;

use tenantgate_auth::{RuleSet, SigningSecret, TokenConfig};

const DEV_SECRET: &str = "dev-secret";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";
const DEFAULT_LIFETIME_SECS: i64 = 900;
/// Upper bound on token lifetime: thirty days.
const MAX_LIFETIME_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub token: TokenConfig,
    /// JSON rule document replacing the embedded default rule set.
    pub rules_path: Option<PathBuf>,
    pub seed_sample_data: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = SigningSecret::new(lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_SECRET.to_string()
        }));
        if secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let issuer = lookup("TOKEN_ISSUER").unwrap_or_else(|| TokenConfig::DEFAULT_ISSUER.to_string());
        if issuer.is_empty() {
            bail!("TOKEN_ISSUER must not be empty");
        }

        let lifetime_secs = match lookup("TOKEN_LIFETIME_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("TOKEN_LIFETIME_SECS is not an integer: {raw}"))?,
            None => DEFAULT_LIFETIME_SECS,
        };
        if !(1..=MAX_LIFETIME_SECS).contains(&lifetime_secs) {
            bail!("TOKEN_LIFETIME_SECS must be between 1 and {MAX_LIFETIME_SECS}, got {lifetime_secs}");
        }
        let lifetime = Duration::try_seconds(lifetime_secs)
            .with_context(|| format!("TOKEN_LIFETIME_SECS out of range: {lifetime_secs}"))?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR is not a socket address")?;

        let seed_sample_data = match lookup("SEED_SAMPLE_DATA") {
            Some(raw) => raw
                .parse::<bool>()
                .with_context(|| format!("SEED_SAMPLE_DATA must be true or false: {raw}"))?,
            None => true,
        };

        Ok(Self {
            bind_addr,
            token: TokenConfig {
                secret,
                issuer,
                lifetime,
            },
            rules_path: lookup("RBAC_RULES_PATH").map(PathBuf::from),
            seed_sample_data,
        })
    }

    /// The configured rule document, or the embedded default.
    pub fn load_rules(&self) -> anyhow::Result<RuleSet> {
        match &self.rules_path {
            Some(path) => {
                let rules = RuleSet::load(path)?;
                tracing::info!(path = %path.display(), rules = rules.len(), "loaded rule set");
                Ok(rules)
            }
            None => Ok(RuleSet::default()),
        }
    }
}
