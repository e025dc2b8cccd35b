//! Identity provider: accounts and bearer tokens
//!
//! HTTP handlers and the auth middleware are thin wrappers around this
//! service. The reservation engine never sees credentials, only the
//! principal ids resolved here.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{DomainError, DomainResult, Principal, PrincipalKind, RepositoryProvider, User};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

const MIN_PASSWORD_LEN: usize = 6;

/// Authentication result returned after a successful login or registration
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: User,
}

/// Input for customer self-registration
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
}

pub struct IdentityService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl IdentityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a customer and sign them in.
    pub async fn register_customer(&self, input: NewCustomer) -> DomainResult<AuthSession> {
        let user = self
            .create_user(
                &input.email,
                &input.password,
                &input.name,
                input.phone,
                PrincipalKind::Customer,
            )
            .await?;
        info!("Customer registered: {}", user.email);
        self.issue(user)
    }

    /// Register another administrator. Callers must already be admins.
    pub async fn register_admin(&self, email: &str, password: &str, name: &str) -> DomainResult<User> {
        let user = self
            .create_user(email, password, name, None, PrincipalKind::Admin)
            .await?;
        info!("Administrator registered: {}", user.email);
        Ok(user)
    }

    /// Seeds the configured administrator when no administrator exists yet.
    /// Returns `true` if one was created.
    pub async fn ensure_default_admin(&self, email: &str, password: &str, name: &str) -> DomainResult<bool> {
        if self.repos.users().count_by_kind(PrincipalKind::Admin).await? > 0 {
            return Ok(false);
        }
        self.register_admin(email, password, name).await?;
        warn!("Default admin created ({}); change its password", email);
        Ok(true)
    }

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        phone: Option<String>,
        kind: PrincipalKind,
    ) -> DomainResult<User> {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Name is required".into()));
        }

        if self.repos.users().find_by_email(&email, kind).await?.is_some() {
            return Err(DomainError::Conflict(format!("{} already exists", kind)));
        }

        let password_hash = hash_password(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        let user = User::new(email, password_hash, name, normalize_phone(phone), kind);
        self.repos.users().create(&user).await?;
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Check email + password for a principal of `kind` and return a token.
    pub async fn login(&self, kind: PrincipalKind, email: &str, password: &str) -> DomainResult<AuthSession> {
        let email = normalize_email(email);
        let Some(user) = self.repos.users().find_by_email(&email, kind).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        info!("{} logged in: {}", kind, user.email);
        self.issue(user)
    }

    /// Resolve a bearer token to the principal it was issued for.
    pub fn authenticate(&self, token: &str) -> DomainResult<Principal> {
        let claims = verify_token(token, &self.jwt_config)
            .map_err(|_| DomainError::Unauthorized("Invalid authentication token".into()))?;
        if claims.is_expired() {
            return Err(DomainError::Unauthorized("Token has expired".into()));
        }

        Ok(Principal {
            user_id: claims.sub,
            email: claims.email,
            kind: claims.kind.parse()?,
        })
    }

    fn issue(&self, user: User) -> DomainResult<AuthSession> {
        let token = create_token(&user.id, &user.email, user.kind, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        Ok(AuthSession {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours(user.kind) * 3600,
            user,
        })
    }

    // ── Profile ─────────────────────────────────────────────────

    pub async fn profile(&self, user_id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    /// Update name and/or phone. Omitted fields keep their value.
    pub async fn update_profile(
        &self,
        user_id: &str,
        name: Option<String>,
        phone: Option<String>,
    ) -> DomainResult<User> {
        let mut user = self.profile(user_id).await?;

        if let Some(name) = name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::Validation("Name cannot be empty".into()));
            }
            user.name = name.to_string();
        }
        if phone.is_some() {
            user.phone = normalize_phone(phone);
        }
        user.updated_at = Utc::now();

        self.repos.users().update_profile(&user).await?;
        Ok(user)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

// ── Tests ──────────────────────────────────────────────────────
