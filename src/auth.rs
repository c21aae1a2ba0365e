//! Credential verification and bearer tokens
//!
//! Password hashing (bcrypt) and stateless signed tokens carrying
//! identity and role. Tokens are minted at login and never persisted.

use bcrypt::DEFAULT_COST;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Fixed access tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Sekretaris,
    Bendahara,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Sekretaris => "SEKRETARIS",
            Role::Bendahara => "BENDAHARA",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "SEKRETARIS" => Ok(Role::Sekretaris),
            "BENDAHARA" => Ok(Role::Bendahara),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Token payload: subject id, role and email plus expiry bookkeeping
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: i64, role: Role, email: String, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub,
            role,
            email,
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Hash a plaintext password. Used by provisioning only.
pub fn hash_password(plaintext: &str) -> AppResult<String> {
    bcrypt::hash(plaintext, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Check a plaintext password against a stored hash.
/// Neither the plaintext nor the hash is ever logged.
pub fn verify_password(plaintext: &str, hashed: &str) -> AppResult<bool> {
    bcrypt::verify(plaintext, hashed)
        .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))
}

/// Sign a token for an authenticated user
pub fn issue_token(
    sub: i64,
    role: Role,
    email: &str,
    secret: &str,
    ttl_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(sub, role, email.to_string(), ttl_hours);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token generation failed: {e}")))
}

/// Decode and verify a token. Fails on bad signature or expiry;
/// an unsigned or mismatched-signature token is never partially trusted.
pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn password_roundtrip() {
        // Low cost to keep the test fast
        let hash = bcrypt::hash("rahasia123", 4).unwrap();
        assert!(verify_password("rahasia123", &hash).unwrap());
        assert!(!verify_password("salah", &hash).unwrap());
    }

    #[test]
    fn token_roundtrip_preserves_claims() {
        let token = issue_token(7, Role::Sekretaris, "sekretaris@gmail.com", SECRET, 24).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Sekretaris);
        assert_eq!(claims.email, "sekretaris@gmail.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(1, Role::Admin, "admin@gmail.com", SECRET, 24).unwrap();
        assert!(matches!(
            decode_token(&token, "other-secret"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(1, Role::Admin, "admin@gmail.com", SECRET, 24).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('x');
        assert!(decode_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Two hours in the past clears the default validation leeway
        let token = issue_token(1, Role::Bendahara, "bendahara@gmail.com", SECRET, -2).unwrap();
        assert!(matches!(
            decode_token(&token, SECRET),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn role_parse_roundtrip() {
        for role in [Role::Admin, Role::Sekretaris, Role::Bendahara] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("PENDETA".parse::<Role>().is_err());
    }
}
