use async_trait::async_trait;

use super::model::{PrincipalKind, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered for `user.kind`.
    async fn create(&self, user: &User) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    async fn find_by_email(&self, email: &str, kind: PrincipalKind) -> DomainResult<Option<User>>;

    async fn update_profile(&self, user: &User) -> DomainResult<()>;

    async fn count_by_kind(&self, kind: PrincipalKind) -> DomainResult<u64>;
}
