//! Immutable configuration of a groups rule.
//!
//! User specs use the same compact env-var friendly format as the rest of the config:
//!
//! ```text
//! <username>|<group>,<group>|<kind>=<secret>
//! alice|dev,admin|auth_key=alice:secret
//! bob|dev|auth_key_sha256=5e88489...
//! ```
//!
//! Multiple users are separated by `;`.

use std::fmt;

use thiserror::Error;

use crate::acl::groups::GroupExpr;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid user spec '{0}': expected <username>|<groups>|<kind>=<secret>")]
    InvalidUserSpec(String),
    #[error("user '{0}' declares no groups")]
    NoGroups(String),
    #[error("user '{username}' uses unknown credential kind '{kind}'")]
    UnknownCredentialKind { username: String, kind: String },
    #[error("group rule declares no groups")]
    NoGroupExpressions,
    #[error("user '{username}' has group '{group}' which is not printable ASCII")]
    InvalidGroupName { username: String, group: String },
}

/// Group names travel back to clients in response headers, so they are limited to
/// visible ASCII and inner spaces.
fn is_header_safe(group: &str) -> bool {
    group.bytes().all(|b| b == b' ' || b.is_ascii_graphic())
}

/// How a user proves who they are.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSpec {
    /// Plain `user:password` pair compared against Basic credentials.
    AuthKey(String),
    /// Lowercase hex SHA-256 of `user:password`.
    AuthKeySha256(String),
}

impl CredentialSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthKey(_) => "auth_key",
            Self::AuthKeySha256(_) => "auth_key_sha256",
        }
    }

    fn parse(username: &str, raw: &str) -> Result<Self, SettingsError> {
        let (kind, secret) = raw
            .split_once('=')
            .ok_or_else(|| SettingsError::InvalidUserSpec(username.to_string()))?;
        let secret = secret.trim().to_string();
        if secret.is_empty() {
            return Err(SettingsError::InvalidUserSpec(username.to_string()));
        }

        match kind.trim() {
            "auth_key" => Ok(Self::AuthKey(secret)),
            "auth_key_sha256" => Ok(Self::AuthKeySha256(secret)),
            other => Err(SettingsError::UnknownCredentialKind {
                username: username.to_string(),
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Debug for CredentialSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets
        write!(f, "CredentialSpec({})", self.kind())
    }
}

/// A user that may be tried by the groups rule.
///
/// `groups` keeps the configured order with duplicates removed; the first entry is the
/// default acting group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDefinition {
    pub username: String,
    pub groups: Vec<String>,
    pub credentials: CredentialSpec,
}

impl UserDefinition {
    pub fn new<I, S>(username: impl Into<String>, groups: I, credentials: CredentialSpec) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for group in groups {
            let group = group.into();
            if !ordered.contains(&group) {
                ordered.push(group);
            }
        }

        Self {
            username: username.into(),
            groups: ordered,
            credentials,
        }
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Parse one `<username>|<groups>|<kind>=<secret>` entry.
    pub fn parse(spec: &str) -> Result<Self, SettingsError> {
        let mut parts = spec.splitn(3, '|');
        let (Some(username), Some(groups), Some(credentials)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(SettingsError::InvalidUserSpec(spec.trim().to_string()));
        };

        let username = username.trim();
        if username.is_empty() {
            return Err(SettingsError::InvalidUserSpec(spec.trim().to_string()));
        }

        let groups: Vec<&str> = groups
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect();
        if groups.is_empty() {
            return Err(SettingsError::NoGroups(username.to_string()));
        }
        if let Some(bad) = groups.iter().find(|g| !is_header_safe(g)) {
            return Err(SettingsError::InvalidGroupName {
                username: username.to_string(),
                group: bad.to_string(),
            });
        }

        let credentials = CredentialSpec::parse(username, credentials)?;
        Ok(Self::new(username, groups, credentials))
    }

    /// Parse a `;`-separated list of user specs. Blank entries are skipped.
    pub fn parse_list(specs: &str) -> Result<Vec<Self>, SettingsError> {
        specs
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }
}

/// Everything a groups rule instance is built from. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct GroupsRuleSettings {
    pub name: String,
    pub groups: Vec<GroupExpr>,
    pub users: Vec<UserDefinition>,
    /// Write the acting/available group headers on a match.
    pub metadata_enabled: bool,
}

impl GroupsRuleSettings {
    pub fn new(name: impl Into<String>, groups: Vec<GroupExpr>, users: Vec<UserDefinition>) -> Self {
        Self {
            name: name.into(),
            groups,
            users,
            metadata_enabled: true,
        }
    }

    pub fn with_metadata(mut self, enabled: bool) -> Self {
        self.metadata_enabled = enabled;
        self
    }
}
