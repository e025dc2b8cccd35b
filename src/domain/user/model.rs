//! User domain entity
//!
//! Administrators and customers share one table and are told apart by
//! `kind`; every credential resolves to exactly one of the two.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::DomainError;

/// Principal kind carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalKind {
    Admin,
    Customer,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

impl FromStr for PrincipalKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            other => Err(DomainError::Unauthorized(format!(
                "Unknown principal kind: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub kind: PrincipalKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        name: impl Into<String>,
        phone: Option<String>,
        kind: PrincipalKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            password_hash: password_hash.into(),
            name: name.into(),
            phone,
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> CustomerSummary {
        CustomerSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// An authenticated caller, as resolved from a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub kind: PrincipalKind,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.kind == PrincipalKind::Admin
    }

    pub fn is_customer(&self) -> bool {
        self.kind == PrincipalKind::Customer
    }
}

/// The part of a customer embedded in administrative reservation views
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_token_string() {
        for kind in [PrincipalKind::Admin, PrincipalKind::Customer] {
            assert_eq!(kind.as_str().parse::<PrincipalKind>().unwrap(), kind);
        }
        assert!(matches!(
            "operator".parse::<PrincipalKind>(),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn summary_omits_credentials() {
        let user = User::new("a@b.c", "hash", "Ann", Some("555".into()), PrincipalKind::Customer);
        let summary = user.summary();
        assert_eq!(summary.id, user.id);
        assert_eq!(summary.phone.as_deref(), Some("555"));
    }
}
