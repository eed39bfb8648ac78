//! Bearer token issuing and verification
//!
//! Tokens are HS256-signed JWTs carrying the user id, username and role.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Role, User};

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Failed to get current time: {0}")]
    Clock(String),

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Token issued on login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Signs and verifies access tokens with a shared secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_seconds: u64,
}

impl TokenService {
    pub fn new(secret: &str, expiry_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_seconds,
        }
    }

    /// Issue an access token for `user`
    pub fn issue(&self, user: &User) -> Result<IssuedToken, TokenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TokenError::Clock(e.to_string()))?
            .as_secs();

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iat: now,
            exp: now + self.expiry_seconds,
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            token_type: "Bearer",
            expires_in: self.expiry_seconds,
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Validate a token's signature and expiry and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Biometrics, DietaryProfile, NewUser};

    fn user() -> User {
        User::create(
            NewUser {
                username: "chef".into(),
                name: "Chef".into(),
                password: "Secret1".into(),
                email: "chef@example.com".into(),
                dietary_profile: DietaryProfile::default(),
                biometrics: Biometrics::default(),
            },
            "hash".into(),
            Role::Admin,
        )
    }

    #[test]
    fn test_token_round_trip() {
        let service = TokenService::new("test-secret", 3600);
        let user = user();
        let issued = service.issue(&user).unwrap();
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 3600);

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "chef");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let issued = TokenService::new("one-secret", 60).issue(&user()).unwrap();
        let other = TokenService::new("another-secret", 60);
        assert!(matches!(other.verify(&issued.token), Err(TokenError::Invalid(_))));
        assert!(other.verify("not.a.token").is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let service = TokenService::new("test-secret", 60);
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "late".into(),
            role: Role::Regular,
            iat: 1_000,
            exp: 1_060,
        };
        let token = service.sign(&claims).unwrap();
        assert!(service.verify(&token).is_err());
    }
}
