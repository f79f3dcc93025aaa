use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Used when `JWT_SECRET` is not set. Development only.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful meal planning assistant.";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// True when `secret` is the development fallback.
    pub dev_fallback: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub system_prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub llm: LlmConfig,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL").context("DATABASE_URL not set")?;

        let jwt = match non_empty("JWT_SECRET") {
            Some(secret) => JwtConfig {
                secret,
                dev_fallback: false,
            },
            None => JwtConfig {
                secret: DEV_JWT_SECRET.into(),
                dev_fallback: true,
            },
        };

        let llm = LlmConfig {
            api_key: non_empty("ANTHROPIC_API_KEY"),
            model: non_empty("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            max_tokens: parsed(lookup("ANTHROPIC_MAX_TOKENS")).unwrap_or(1024),
            timeout_secs: parsed(lookup("LLM_TIMEOUT_SECS")).unwrap_or(60),
            system_prompt: non_empty("LLM_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.into()),
        };

        let allowed_origins = non_empty("ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        Ok(Self {
            database_url,
            db_max_connections: parsed(lookup("DB_MAX_CONNECTIONS")).unwrap_or(10),
            db_timeout_secs: parsed(lookup("DB_TIMEOUT_SECS")).unwrap_or(5),
            jwt,
            llm,
            allowed_origins,
        })
    }

    pub fn db_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout_secs)
    }
}

fn parsed<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|v| v.trim().parse::<T>().ok())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn missing_jwt_secret_falls_back_to_dev_secret() {
        let cfg = load(&[("DATABASE_URL", "postgres://db")]).unwrap();
        assert!(cfg.jwt.dev_fallback);
        assert_eq!(cfg.jwt.secret, DEV_JWT_SECRET);

        let cfg = load(&[("DATABASE_URL", "postgres://db"), ("JWT_SECRET", "   ")]).unwrap();
        assert!(cfg.jwt.dev_fallback);
        assert_eq!(cfg.jwt.secret, DEV_JWT_SECRET);
    }

    #[test]
    fn configured_jwt_secret_is_used() {
        let cfg = load(&[("DATABASE_URL", "postgres://db"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert!(!cfg.jwt.dev_fallback);
        assert_eq!(cfg.jwt.secret, "s3cret");
    }

    #[test]
    fn defaults_apply_and_database_url_is_required() {
        let cfg = load(&[("DATABASE_URL", "postgres://db"), ("DB_TIMEOUT_SECS", "oops")]).unwrap();
        assert_eq!(cfg.db_timeout_secs, 5);
        assert_eq!(cfg.db_max_connections, 10);
        assert_eq!(cfg.llm.max_tokens, 1024);
        assert!(cfg.llm.api_key.is_none());
        assert!(cfg.allowed_origins.is_empty());

        assert!(load(&[]).is_err());
    }

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = parse_origins(" http://localhost:3000, ,https://app.example.com ");
        assert_eq!(
            origins,
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }
}
