//! JWT Token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::PrincipalKind;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Lifetime of administrator tokens in hours
    pub admin_expiration_hours: i64,
    /// Lifetime of customer tokens in hours
    pub customer_expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "super-secret-key-change-in-production".to_string()),
            admin_expiration_hours: 8,
            customer_expiration_hours: 24,
            issuer: "car-rental".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn expiration_hours(&self, kind: PrincipalKind) -> i64 {
        match kind {
            PrincipalKind::Admin => self.admin_expiration_hours,
            PrincipalKind::Customer => self.customer_expiration_hours,
        }
    }
}

/// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Principal kind: "admin" or "customer"
    pub kind: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    pub fn new(user_id: &str, email: &str, kind: PrincipalKind, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours(kind));

        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            kind: kind.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Create a JWT token for a principal
pub fn create_token(
    user_id: &str,
    email: &str,
    kind: PrincipalKind,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(user_id, email, kind, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            admin_expiration_hours: 8,
            customer_expiration_hours: 24,
            issuer: "car-rental-test".into(),
        }
    }

    #[test]
    fn token_round_trip_keeps_kind() {
        let cfg = config();
        let token = create_token("u-1", "ann@example.com", PrincipalKind::Customer, &cfg).unwrap();
        let claims = verify_token(&token, &cfg).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.kind, "customer");
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn admin_tokens_are_shorter_lived() {
        let claims = Claims::new("a-1", "root@example.com", PrincipalKind::Admin, &config());
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let cfg = config();
        let token = create_token("u-1", "ann@example.com", PrincipalKind::Admin, &cfg).unwrap();
        let other = JwtConfig {
            secret: "other".into(),
            ..config()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let cfg = config();
        let token = create_token("u-1", "ann@example.com", PrincipalKind::Admin, &cfg).unwrap();
        let other = JwtConfig {
            issuer: "someone-else".into(),
            ..config()
        };
        assert!(verify_token(&token, &other).is_err());
    }
}
