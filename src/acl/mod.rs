/*
 * Responsibility
 * - Capability every access rule exposes to the block engine (key + async check)
 * - Shared vocabulary: MatchOutcome, RequestContext, RuleError
 * - Concrete rules live in submodules (groups)
 */
use async_trait::async_trait;

pub mod context;
pub mod error;
pub mod groups;
pub mod settings;

pub use context::RequestContext;
pub use error::RuleError;

/// Result of a single rule (or a single credential check).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Match,
    NoMatch,
}

impl MatchOutcome {
    pub fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }

    pub fn from_bool(matched: bool) -> Self {
        if matched { Self::Match } else { Self::NoMatch }
    }
}

/// An access rule as seen by the surrounding block engine.
///
/// `check` returns `Err` only for conditions the rule could not decide on
/// (misconfiguration, broken invariants). A plain "no" is `Ok(MatchOutcome::NoMatch)`.
#[async_trait]
pub trait Rule: Send + Sync {
    /// Configured name of this rule instance.
    fn key(&self) -> &str;

    async fn check(&self, ctx: &mut dyn RequestContext) -> Result<MatchOutcome, RuleError>;
}
