use std::collections::HashSet;

use crate::acl::settings::UserDefinition;

/// Outcome of narrowing the configured users down to the ones worth trying.
#[derive(Debug, PartialEq, Eq)]
pub enum Candidates<'a> {
    /// The client asked for a group this request does not resolve to.
    PreferredGroupNotResolved,
    /// Nobody left after filtering.
    Empty,
    /// Users to try, in configuration order.
    Eligible(Vec<&'a UserDefinition>),
}

/// Stable filter over `users`.
///
/// A non-empty `preferred` group must be among `resolved`, and narrows the users to its
/// members. Every remaining user must share at least one group with `resolved`.
pub fn filter_candidates<'a>(
    users: &'a [UserDefinition],
    resolved: &HashSet<String>,
    preferred: Option<&str>,
) -> Candidates<'a> {
    let preferred = preferred.filter(|g| !g.is_empty());

    if let Some(group) = preferred {
        if !resolved.contains(group) {
            return Candidates::PreferredGroupNotResolved;
        }
    }

    let eligible: Vec<&UserDefinition> = users
        .iter()
        .filter(|u| preferred.is_none_or(|g| u.in_group(g)))
        .filter(|u| u.groups.iter().any(|g| resolved.contains(g)))
        .collect();

    if eligible.is_empty() {
        Candidates::Empty
    } else {
        Candidates::Eligible(eligible)
    }
}
