use async_trait::async_trait;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::acl::{MatchOutcome, RequestContext};
use crate::services::auth::{AuthError, BasicCredentials, UserAuth};

/// Whether the request's Basic `user:password` hashes to `expected`.
///
/// Both sides are fixed-size digests compared in constant time, so neither the
/// position of the first differing byte nor the key length shows in timing.
fn credentials_match(ctx: &dyn RequestContext, expected: &[u8; 32]) -> bool {
    BasicCredentials::from_context(ctx).is_some_and(|creds| {
        let actual = Sha256::digest(creds.as_auth_key().as_bytes());
        actual.as_slice().ct_eq(expected).into()
    })
}

/// Matches Basic credentials equal to a configured `user:password` pair.
#[derive(Clone)]
pub struct AuthKey {
    digest: [u8; 32],
}

impl std::fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthKey").finish_non_exhaustive()
    }
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Result<Self, AuthError> {
        let key = key.into();
        if !key.contains(':') {
            return Err(AuthError::InvalidConfig(
                "auth_key must be <user>:<password>".into(),
            ));
        }
        Ok(Self {
            digest: Sha256::digest(key.as_bytes()).into(),
        })
    }
}

#[async_trait]
impl UserAuth for AuthKey {
    async fn authenticate(&self, ctx: &dyn RequestContext) -> Result<MatchOutcome, AuthError> {
        Ok(MatchOutcome::from_bool(credentials_match(ctx, &self.digest)))
    }
}

/// Matches Basic credentials whose `user:password` hashes to a configured SHA-256 digest.
#[derive(Clone)]
pub struct AuthKeySha256 {
    digest: [u8; 32],
}

impl std::fmt::Debug for AuthKeySha256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthKeySha256").finish_non_exhaustive()
    }
}

impl AuthKeySha256 {
    /// `hex_digest` is the hex-encoded SHA-256 of `user:password` (either case).
    pub fn new(hex_digest: &str) -> Result<Self, AuthError> {
        let bytes = hex::decode(hex_digest.trim())
            .map_err(|e| AuthError::InvalidConfig(format!("auth_key_sha256 is not hex: {e}")))?;
        let digest: [u8; 32] = bytes.try_into().map_err(|_| {
            AuthError::InvalidConfig("auth_key_sha256 must be 32 bytes".into())
        })?;
        Ok(Self { digest })
    }
}

#[async_trait]
impl UserAuth for AuthKeySha256 {
    async fn authenticate(&self, ctx: &dyn RequestContext) -> Result<MatchOutcome, AuthError> {
        Ok(MatchOutcome::from_bool(credentials_match(ctx, &self.digest)))
    }
}
