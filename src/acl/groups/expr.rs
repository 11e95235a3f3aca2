use std::collections::HashSet;

use crate::acl::RequestContext;

const OPEN: &str = "@{";
const CLOSE: char = '}';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Var(String),
}

/// A configured group name, optionally templated with request variables.
///
/// `admin` is always present. `team-@{x-team}` is present only when the request
/// carries an `x-team` value; otherwise the expression resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupExpr {
    parts: Vec<Part>,
}

impl GroupExpr {
    pub fn parse(raw: &str) -> Self {
        let mut parts = Vec::new();
        let mut rest = raw;

        while let Some(start) = rest.find(OPEN) {
            let after = &rest[start + OPEN.len()..];
            let Some(end) = after.find(CLOSE) else {
                break;
            };
            if start > 0 {
                parts.push(Part::Text(rest[..start].to_string()));
            }
            parts.push(Part::Var(after[..end].trim().to_string()));
            rest = &after[end + CLOSE.len_utf8()..];
        }
        if !rest.is_empty() {
            parts.push(Part::Text(rest.to_string()));
        }

        Self { parts }
    }

    /// Parse a comma-separated list, skipping blanks.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }

    pub fn resolve(&self, ctx: &dyn RequestContext) -> Option<String> {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Var(name) => out.push_str(&ctx.variable(name)?),
            }
        }
        (!out.is_empty()).then_some(out)
    }
}

/// Groups present for this request. Absent expressions contribute nothing.
pub fn resolve_groups(exprs: &[GroupExpr], ctx: &dyn RequestContext) -> HashSet<String> {
    exprs.iter().filter_map(|e| e.resolve(ctx)).collect()
}
