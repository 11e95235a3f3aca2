/// Factory: build runtime credential checks from `UserDefinition` settings.
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::acl::RuleError;
use crate::acl::settings::{CredentialSpec, UserDefinition};
use crate::services::auth::{AuthError, AuthKey, AuthKeySha256, UserAuth};

pub trait UserFactory: Send + Sync {
    fn build(&self, user: &UserDefinition) -> Result<Arc<dyn UserAuth>, AuthError>;
}

/// Builds the credential rules that can be expressed in settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUserFactory;

impl UserFactory for DefaultUserFactory {
    fn build(&self, user: &UserDefinition) -> Result<Arc<dyn UserAuth>, AuthError> {
        let auth: Arc<dyn UserAuth> = match &user.credentials {
            CredentialSpec::AuthKey(key) => Arc::new(AuthKey::new(key.as_str())?),
            CredentialSpec::AuthKeySha256(digest) => Arc::new(AuthKeySha256::new(digest)?),
        };
        Ok(auth)
    }
}

/// Username -> credential check. A username seen twice rejects the whole set.
pub fn build_user_runtime(
    users: &[UserDefinition],
    factory: &dyn UserFactory,
) -> Result<HashMap<String, Arc<dyn UserAuth>>, RuleError> {
    let mut runtime = HashMap::with_capacity(users.len());

    for user in users {
        let auth = factory.build(user).map_err(|source| RuleError::UserBuild {
            username: user.username.clone(),
            source,
        })?;

        match runtime.entry(user.username.clone()) {
            Entry::Occupied(_) => return Err(RuleError::DuplicateUser(user.username.clone())),
            Entry::Vacant(slot) => {
                slot.insert(auth);
            }
        }
    }

    Ok(runtime)
}
