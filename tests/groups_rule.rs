use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use groups_gate::acl::groups::{AVAILABLE_GROUPS_HEADER, CURRENT_GROUP_HEADER, GroupExpr, GroupsRule};
use groups_gate::acl::settings::{CredentialSpec, GroupsRuleSettings, UserDefinition};
use groups_gate::acl::{MatchOutcome, RequestContext, Rule, RuleError};
use groups_gate::services::auth::{AuthError, UserAuth, UserFactory};

/// In-memory request: inbound headers, expression variables, recorded response headers.
#[derive(Default)]
struct MemoryContext {
    headers: Vec<(String, String)>,
    vars: HashMap<String, String>,
    response: Vec<(String, String)>,
}

impl MemoryContext {
    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    fn response(&self, name: &str) -> Option<&str> {
        self.response
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl RequestContext for MemoryContext {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn variable(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set_response_header(&mut self, name: &str, value: String) {
        self.response.push((name.to_string(), value));
    }
}

#[derive(Debug, Clone, Copy)]
enum Script {
    Accept,
    Reject,
    Fail,
}

/// Credential check with a fixed answer that records every call in a shared log.
struct ScriptedAuth {
    username: String,
    script: Script,
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl UserAuth for ScriptedAuth {
    async fn authenticate(&self, _ctx: &dyn RequestContext) -> Result<MatchOutcome, AuthError> {
        tokio::task::yield_now().await;
        self.calls.lock().unwrap().push(self.username.clone());
        match self.script {
            Script::Accept => Ok(MatchOutcome::Match),
            Script::Reject => Ok(MatchOutcome::NoMatch),
            Script::Fail => Err(AuthError::Backend("identity provider unavailable".into())),
        }
    }
}

#[derive(Default)]
struct ScriptedFactory {
    scripts: HashMap<String, Script>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFactory {
    fn script(mut self, username: &str, script: Script) -> Self {
        self.scripts.insert(username.to_string(), script);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl UserFactory for ScriptedFactory {
    fn build(&self, user: &UserDefinition) -> Result<Arc<dyn UserAuth>, AuthError> {
        let script = self.scripts.get(&user.username).copied().unwrap_or(Script::Reject);
        Ok(Arc::new(ScriptedAuth {
            username: user.username.clone(),
            script,
            calls: self.calls.clone(),
        }))
    }
}

fn user(name: &str, groups: &[&str]) -> UserDefinition {
    UserDefinition::new(
        name,
        groups.iter().copied(),
        CredentialSpec::AuthKey(format!("{name}:pw")),
    )
}

/// Configured groups are `@{admin}` and `@{dev}`; each resolves only when the request
/// carries that variable.
fn rule(users: Vec<UserDefinition>, factory: &ScriptedFactory, metadata: bool) -> GroupsRule {
    let groups = vec![GroupExpr::parse("@{admin}"), GroupExpr::parse("@{dev}")];
    let settings = GroupsRuleSettings::new("groups", groups, users).with_metadata(metadata);
    GroupsRule::new(settings, factory).unwrap()
}

/// Request whose resolved groups are exactly `groups`.
fn request(groups: &[&str]) -> MemoryContext {
    groups
        .iter()
        .fold(MemoryContext::default(), |ctx, g| ctx.with_var(g, g))
}

#[tokio::test]
async fn scenario_a_single_user_matches_and_reports_groups() {
    let factory = ScriptedFactory::default().script("alice", Script::Accept);
    let rule = rule(vec![user("alice", &["dev"])], &factory, true);
    let mut ctx = request(&["dev"]);

    let outcome = rule.check(&mut ctx).await.unwrap();

    assert_eq!(outcome, MatchOutcome::Match);
    assert_eq!(ctx.response(CURRENT_GROUP_HEADER), Some("dev"));
    assert_eq!(ctx.response(AVAILABLE_GROUPS_HEADER), Some("dev"));
    assert_eq!(factory.calls(), vec!["alice"]);
}

#[tokio::test]
async fn scenario_b_unresolved_preferred_group_never_checks_credentials() {
    let factory = ScriptedFactory::default().script("alice", Script::Accept);
    let rule = rule(vec![user("alice", &["dev"])], &factory, true);
    let mut ctx = request(&["dev"]).with_header(CURRENT_GROUP_HEADER, "admin");

    let outcome = rule.check(&mut ctx).await.unwrap();

    assert_eq!(outcome, MatchOutcome::NoMatch);
    assert!(factory.calls().is_empty());
    assert!(ctx.response.is_empty());
}

#[tokio::test]
async fn scenario_c_failing_candidate_does_not_abort_the_sequence() {
    let factory = ScriptedFactory::default()
        .script("alice", Script::Fail)
        .script("bob", Script::Accept);
    let rule = rule(
        vec![user("alice", &["dev"]), user("bob", &["dev"])],
        &factory,
        true,
    );
    let mut ctx = request(&["dev"]);

    let outcome = rule.check(&mut ctx).await.unwrap();

    assert_eq!(outcome, MatchOutcome::Match);
    assert_eq!(factory.calls(), vec!["alice", "bob"]);
    assert_eq!(ctx.response(CURRENT_GROUP_HEADER), Some("dev"));
}

#[tokio::test]
async fn scenario_d_metadata_disabled_matches_without_headers() {
    let factory = ScriptedFactory::default().script("alice", Script::Accept);
    let rule = rule(vec![user("alice", &["dev"])], &factory, false);
    let mut ctx = request(&["dev"]);

    let outcome = rule.check(&mut ctx).await.unwrap();

    assert_eq!(outcome, MatchOutcome::Match);
    assert!(ctx.response.is_empty());
}

#[tokio::test]
async fn nothing_resolved_is_no_match_without_headers() {
    let factory = ScriptedFactory::default().script("alice", Script::Accept);
    let rule = rule(vec![user("alice", &["dev", "admin"])], &factory, true);
    let mut ctx = request(&[]);

    let outcome = rule.check(&mut ctx).await.unwrap();

    assert_eq!(outcome, MatchOutcome::NoMatch);
    assert!(ctx.response.is_empty());
    assert!(factory.calls().is_empty());
}

#[tokio::test]
async fn no_candidate_after_first_match_is_evaluated() {
    let factory = ScriptedFactory::default()
        .script("alice", Script::Reject)
        .script("bob", Script::Accept)
        .script("carol", Script::Accept)
        .script("dave", Script::Accept);
    let rule = rule(
        vec![
            user("alice", &["dev"]),
            user("bob", &["dev"]),
            user("carol", &["dev"]),
            user("dave", &["dev"]),
        ],
        &factory,
        true,
    );
    let mut ctx = request(&["dev"]);

    assert!(rule.check(&mut ctx).await.unwrap().is_match());
    assert_eq!(factory.calls(), vec!["alice", "bob"]);
}

#[tokio::test]
async fn every_candidate_failing_or_rejecting_is_no_match() {
    let factory = ScriptedFactory::default()
        .script("alice", Script::Fail)
        .script("bob", Script::Reject)
        .script("carol", Script::Fail);
    let rule = rule(
        vec![
            user("alice", &["dev"]),
            user("bob", &["admin"]),
            user("carol", &["dev", "admin"]),
        ],
        &factory,
        true,
    );
    let mut ctx = request(&["dev", "admin"]);

    let outcome = rule.check(&mut ctx).await.unwrap();

    assert_eq!(outcome, MatchOutcome::NoMatch);
    assert_eq!(factory.calls(), vec!["alice", "bob", "carol"]);
    assert!(ctx.response.is_empty());
}

#[tokio::test]
async fn preferred_group_narrows_candidates_and_is_mirrored() {
    let factory = ScriptedFactory::default()
        .script("alice", Script::Accept)
        .script("bob", Script::Accept);
    let rule = rule(
        vec![user("alice", &["dev"]), user("bob", &["dev", "admin"])],
        &factory,
        true,
    );
    let mut ctx = request(&["dev", "admin"]).with_header(CURRENT_GROUP_HEADER, "admin");

    let outcome = rule.check(&mut ctx).await.unwrap();

    assert!(outcome.is_match());
    assert_eq!(factory.calls(), vec!["bob"]);
    assert_eq!(ctx.response(CURRENT_GROUP_HEADER), Some("admin"));
    assert_eq!(ctx.response(AVAILABLE_GROUPS_HEADER), Some("dev,admin"));
}

#[tokio::test]
async fn acting_group_defaults_to_users_first_configured_group() {
    let factory = ScriptedFactory::default().script("bob", Script::Accept);
    let rule = rule(vec![user("bob", &["admin", "dev"])], &factory, true);
    let mut ctx = request(&["dev"]);

    assert!(rule.check(&mut ctx).await.unwrap().is_match());
    assert_eq!(ctx.response(CURRENT_GROUP_HEADER), Some("admin"));
    assert_eq!(ctx.response(AVAILABLE_GROUPS_HEADER), Some("admin,dev"));
}

#[tokio::test]
async fn repeated_checks_give_the_same_decision() {
    let factory = ScriptedFactory::default()
        .script("alice", Script::Fail)
        .script("bob", Script::Accept);
    let rule = rule(
        vec![user("alice", &["dev"]), user("bob", &["dev"])],
        &factory,
        true,
    );

    let mut first = request(&["dev"]);
    let mut second = request(&["dev"]);
    let a = rule.check(&mut first).await.unwrap();
    let b = rule.check(&mut second).await.unwrap();

    assert_eq!(a, b);
    assert_eq!(first.response, second.response);
    assert_eq!(factory.calls(), vec!["alice", "bob", "alice", "bob"]);
}

#[tokio::test]
async fn rule_exposes_its_key() {
    let factory = ScriptedFactory::default();
    let settings = GroupsRuleSettings::new("kibana-users", vec![GroupExpr::parse("dev")], Vec::new());
    let rule = GroupsRule::new(settings, &factory).unwrap();

    assert_eq!(rule.key(), "kibana-users");
}

#[test]
fn duplicate_usernames_reject_construction() {
    let factory = ScriptedFactory::default();
    let settings = GroupsRuleSettings::new(
        "groups",
        vec![GroupExpr::parse("dev")],
        vec![user("alice", &["dev"]), user("alice", &["admin"])],
    );

    let err = GroupsRule::new(settings, &factory).unwrap_err();
    assert!(matches!(err, RuleError::DuplicateUser(name) if name == "alice"));
}

#[tokio::test]
async fn templated_groups_resolve_from_request_variables() {
    let factory = ScriptedFactory::default().script("alice", Script::Accept);
    let settings = GroupsRuleSettings::new(
        "groups",
        vec![GroupExpr::parse("team-@{x-team}")],
        vec![user("alice", &["team-blue"])],
    );
    let rule = GroupsRule::new(settings, &factory).unwrap();

    let mut blue = MemoryContext::default().with_var("x-team", "blue");
    assert!(rule.check(&mut blue).await.unwrap().is_match());

    let mut red = MemoryContext::default().with_var("x-team", "red");
    assert!(!rule.check(&mut red).await.unwrap().is_match());

    let mut none = MemoryContext::default();
    assert!(!rule.check(&mut none).await.unwrap().is_match());
}
