use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use crate::domain::{DomainError, DomainResult, PrincipalKind, User, UserRepository};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn kind_to_domain(kind: user::UserKind) -> PrincipalKind {
    match kind {
        user::UserKind::Admin => PrincipalKind::Admin,
        user::UserKind::Customer => PrincipalKind::Customer,
    }
}

fn kind_to_entity(kind: PrincipalKind) -> user::UserKind {
    match kind {
        PrincipalKind::Admin => user::UserKind::Admin,
        PrincipalKind::Customer => user::UserKind::Customer,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        name: model.name,
        phone: model.phone,
        kind: kind_to_domain(model.kind),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, u: &User) -> DomainResult<()> {
        let new_user = user::ActiveModel {
            id: Set(u.id.clone()),
            email: Set(u.email.clone()),
            password_hash: Set(u.password_hash.clone()),
            name: Set(u.name.clone()),
            phone: Set(u.phone.clone()),
            kind: Set(kind_to_entity(u.kind)),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
        };

        new_user.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
                DomainError::Conflict(format!("{} already exists", u.kind))
            } else {
                e.into()
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_email(&self, email: &str, kind: PrincipalKind) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Kind.eq(kind_to_entity(kind)))
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn update_profile(&self, u: &User) -> DomainResult<()> {
        let Some(existing) = user::Entity::find_by_id(u.id.clone()).one(&self.db).await? else {
            return Err(DomainError::not_found("User", u.id.clone()));
        };

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(u.name.clone());
        active.phone = Set(u.phone.clone());
        active.updated_at = Set(u.updated_at);
        active.update(&self.db).await?;
        Ok(())
    }

    async fn count_by_kind(&self, kind: PrincipalKind) -> DomainResult<u64> {
        let count = user::Entity::find()
            .filter(user::Column::Kind.eq(kind_to_entity(kind)))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
