//! IdentityResolver trait 定義

use async_trait::async_trait;

use super::{IdentityError, UserId};

/// Resolves the caller of a connection to a stable user identity.
///
/// `Ok(None)` means the connection is anonymous and identities are taken from
/// event payloads.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, credential: Option<&str>) -> Result<Option<UserId>, IdentityError>;
}
