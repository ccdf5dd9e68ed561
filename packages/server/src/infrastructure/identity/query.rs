//! クエリパラメータ（`/ws?user_id=<id>`）による本人確認
//!
//! 認証情報の検証は行わず、渡された ID をそのまま接続の ID として扱います。

use async_trait::async_trait;

use crate::domain::{IdentityError, IdentityResolver, UserId};

/// `user_id` クエリパラメータから接続の ID を解決する IdentityResolver
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParamIdentityResolver {
    /// true の場合、ID のない接続を拒否する
    require_identity: bool,
}

impl QueryParamIdentityResolver {
    pub fn new(require_identity: bool) -> Self {
        Self { require_identity }
    }
}

#[async_trait]
impl IdentityResolver for QueryParamIdentityResolver {
    async fn resolve(&self, credential: Option<&str>) -> Result<Option<UserId>, IdentityError> {
        match credential {
            Some(raw) => Ok(Some(UserId::new(raw.to_string())?)),
            None if self.require_identity => Err(IdentityError::Missing),
            None => Ok(None),
        }
    }
}
