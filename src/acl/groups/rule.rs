use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::acl::groups::{Candidates, filter_candidates, resolve_groups};
use crate::acl::settings::{GroupsRuleSettings, UserDefinition};
use crate::acl::{MatchOutcome, RequestContext, Rule, RuleError};
use crate::services::auth::{AuthError, UserAuth, UserFactory, build_user_runtime};
use crate::services::sequencer::{Sequenced, run_until_satisfied};

/// Client-declared acting group on the way in; selected acting group on the way out.
pub const CURRENT_GROUP_HEADER: &str = "x-ror-current-group";
/// Every group of the matched user, comma-separated in configured order.
pub const AVAILABLE_GROUPS_HEADER: &str = "x-ror-available-groups";

/// Admits a request when one of the users belonging to the rule's groups
/// authenticates it.
///
/// Users are tried one by one in configuration order; the first one whose
/// credential check matches wins and nobody after it is tried.
pub struct GroupsRule {
    settings: GroupsRuleSettings,
    users: HashMap<String, Arc<dyn UserAuth>>,
}

impl fmt::Debug for GroupsRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupsRule")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl GroupsRule {
    pub fn new(settings: GroupsRuleSettings, factory: &dyn UserFactory) -> Result<Self, RuleError> {
        let users = build_user_runtime(&settings.users, factory)?;
        Ok(Self { settings, users })
    }

    pub fn settings(&self) -> &GroupsRuleSettings {
        &self.settings
    }

    fn write_metadata(
        &self,
        ctx: &mut dyn RequestContext,
        user: &UserDefinition,
        preferred: Option<&str>,
    ) {
        if !self.settings.metadata_enabled {
            return;
        }

        let acting = preferred.or_else(|| user.groups.first().map(String::as_str));
        if let Some(group) = acting {
            ctx.set_response_header(CURRENT_GROUP_HEADER, group.to_string());
        }
        ctx.set_response_header(AVAILABLE_GROUPS_HEADER, user.groups.join(","));
    }
}

#[async_trait]
impl Rule for GroupsRule {
    fn key(&self) -> &str {
        &self.settings.name
    }

    async fn check(&self, ctx: &mut dyn RequestContext) -> Result<MatchOutcome, RuleError> {
        let resolved = resolve_groups(&self.settings.groups, &*ctx);
        let preferred = ctx
            .header(CURRENT_GROUP_HEADER)
            .filter(|g| !g.is_empty())
            .map(str::to_string);

        let candidates = match filter_candidates(&self.settings.users, &resolved, preferred.as_deref()) {
            Candidates::Eligible(users) => users,
            Candidates::PreferredGroupNotResolved => {
                tracing::debug!(
                    rule = %self.key(),
                    preferred = ?preferred,
                    "preferred group is not among the resolved groups"
                );
                return Ok(MatchOutcome::NoMatch);
            }
            Candidates::Empty => {
                tracing::debug!(rule = %self.key(), "no user belongs to the resolved groups");
                return Ok(MatchOutcome::NoMatch);
            }
        };

        let reader: &dyn RequestContext = &*ctx;
        let sequenced = run_until_satisfied(
            candidates,
            |user: &&UserDefinition| {
                let auth = self
                    .users
                    .get(&user.username)
                    .ok_or_else(|| RuleError::UnknownUser(user.username.clone()))?;
                Ok(auth.authenticate(reader))
            },
            |user, err: AuthError| {
                tracing::warn!(
                    rule = %self.key(),
                    user = %user.username,
                    error = %err,
                    "credential check failed; treating as no match"
                );
                MatchOutcome::NoMatch
            },
            |_, outcome| outcome.is_match(),
            || MatchOutcome::NoMatch,
        )
        .await
        .inspect_err(|err| tracing::error!(rule = %self.key(), error = %err, "groups rule aborted"))?;

        match sequenced {
            Sequenced::Satisfied { candidate, outcome } => {
                tracing::debug!(rule = %self.key(), user = %candidate.username, "user matched");
                self.write_metadata(ctx, candidate, preferred.as_deref());
                Ok(outcome)
            }
            Sequenced::Exhausted(outcome) => Ok(outcome),
        }
    }
}
