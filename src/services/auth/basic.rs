use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::acl::RequestContext;

const AUTHORIZATION: &str = "authorization";

/// Decoded `Authorization: Basic ...` credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the password
        f.debug_struct("BasicCredentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl BasicCredentials {
    /// Parse an `Authorization` header value. Anything that is not a well-formed
    /// Basic credential yields `None`.
    pub fn from_header_value(value: &str) -> Option<Self> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user, password) = decoded.split_once(':')?;

        Some(Self {
            user: user.to_string(),
            password: password.to_string(),
        })
    }

    pub fn from_context(ctx: &dyn RequestContext) -> Option<Self> {
        ctx.header(AUTHORIZATION).and_then(Self::from_header_value)
    }

    /// `user:password`, the form auth keys are configured in.
    pub fn as_auth_key(&self) -> String {
        format!("{}:{}", self.user, self.password)
    }
}
