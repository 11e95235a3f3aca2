/*
 * Responsibility
 * - Per-user credential checks (UserAuth) used by the groups rule
 * - Basic credential decoding shared by the checks and by group expressions (@{user})
 * - Factory that turns UserDefinition settings into runtime checks
 */
use async_trait::async_trait;
use thiserror::Error;

use crate::acl::{MatchOutcome, RequestContext};

pub mod auth_key;
pub mod basic;
pub mod factory;

pub use auth_key::{AuthKey, AuthKeySha256};
pub use basic::BasicCredentials;
pub use factory::{DefaultUserFactory, UserFactory, build_user_runtime};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credential configuration: {0}")]
    InvalidConfig(String),

    /// A credential backend could not give an answer (network, provider outage, ...).
    #[error("credential backend failure: {0}")]
    Backend(String),
}

/// A single user's credential check.
///
/// `Ok(NoMatch)` means "these are not my credentials". `Err` means the check itself broke;
/// callers decide whether that counts as a non-match.
#[async_trait]
pub trait UserAuth: Send + Sync {
    async fn authenticate(&self, ctx: &dyn RequestContext) -> Result<MatchOutcome, AuthError>;
}
