use thiserror::Error;

use crate::services::auth::AuthError;

/// Errors a rule surfaces to its caller.
///
/// Construction-time variants reject the rule; `UnknownUser` is raised while
/// matching and is fatal for the request.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("duplicate user definition: {0}")]
    DuplicateUser(String),

    #[error("user '{username}' could not be built: {source}")]
    UserBuild {
        username: String,
        #[source]
        source: AuthError,
    },

    #[error("no credential check registered for user '{0}'")]
    UnknownUser(String),
}
