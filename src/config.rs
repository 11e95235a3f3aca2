/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, groups rule の groups / users / metadata toggle)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::acl::groups::GroupExpr;
use crate::acl::settings::{GroupsRuleSettings, SettingsError, UserDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
    Settings {
        key: &'static str,
        source: SettingsError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
            ConfigError::Settings { key, source } => {
                write!(f, "invalid configuration: {}: {}", key, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Settings { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// `GROUPS_RULE_METADATA`: anything but `false` (any case) keeps response enrichment on.
pub fn metadata_enabled(raw: Option<&str>) -> bool {
    !raw.is_some_and(|v| v.trim().eq_ignore_ascii_case("false"))
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub request_timeout: Duration,

    pub groups_rule: GroupsRuleSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source (the process environment in production).
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Defaults apply only when a key is absent; a present but unparsable value fails startup.
        let port: u16 = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let request_timeout_seconds = match var("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => 30,
        };

        let name = var("GROUPS_RULE_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "groups".to_string());

        let groups = GroupExpr::parse_list(
            &var("GROUPS_RULE_GROUPS").ok_or(ConfigError::Missing("GROUPS_RULE_GROUPS"))?,
        );
        if groups.is_empty() {
            return Err(ConfigError::Settings {
                key: "GROUPS_RULE_GROUPS",
                source: SettingsError::NoGroupExpressions,
            });
        }

        let users = UserDefinition::parse_list(
            &var("GROUPS_RULE_USERS").ok_or(ConfigError::Missing("GROUPS_RULE_USERS"))?,
        )
        .map_err(|source| ConfigError::Settings {
            key: "GROUPS_RULE_USERS",
            source,
        })?;

        let groups_rule = GroupsRuleSettings::new(name, groups, users)
            .with_metadata(metadata_enabled(var("GROUPS_RULE_METADATA").as_deref()));

        Ok(Self {
            addr,
            app_env,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            groups_rule,
        })
    }
}
