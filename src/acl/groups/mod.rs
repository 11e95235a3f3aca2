//! `groups` rule: admit a request when a user from one of the configured groups
//! authenticates it, and report which group it acts as.

mod expr;
mod filter;
mod rule;

pub use expr::{GroupExpr, resolve_groups};
pub use filter::{Candidates, filter_candidates};
pub use rule::{AVAILABLE_GROUPS_HEADER, CURRENT_GROUP_HEADER, GroupsRule};
