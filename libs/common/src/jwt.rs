//! JWT service for token generation and validation
//!
//! Access tokens are signed with RS256. The service that issues tokens holds
//! the private key; anything that only verifies them needs the public key.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Private key for signing tokens
    pub private_key: String,
    /// Public key for verifying tokens
    pub public_key: String,
    /// Access token expiration time in seconds
    pub access_token_expiry: u64,
}

impl JwtConfig {
    /// Build a config from PEM text or paths to PEM files
    pub fn new(private_key: &str, public_key: &str, access_token_expiry: u64) -> Result<Self> {
        Ok(JwtConfig {
            private_key: load_pem(private_key, "private")?,
            public_key: load_pem(public_key, "public")?,
            access_token_expiry,
        })
    }
}

/// Return `value` unchanged when it is PEM text, otherwise read it as a file path
fn load_pem(value: &str, kind: &str) -> Result<String> {
    if value.trim_start().starts_with("-----BEGIN") {
        return Ok(value.to_string());
    }

    std::fs::read_to_string(value)
        .map(|contents| contents.trim().to_string())
        .map_err(|e| anyhow::anyhow!("Failed to read {} key file {}: {}", kind, value, e))
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// User role at issue time
    pub role: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())?;
        let decoding_key = DecodingKey::from_rsa_pem(config.public_key.as_bytes())?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user_id: Uuid, role: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            role: role.to_string(),
            iat: now,
            exp: now + self.config.access_token_expiry,
        };

        let token = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Get the access token expiry time
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY: &str = include_str!("../tests/fixtures/jwt_private.pem");
    const PUBLIC_KEY: &str = include_str!("../tests/fixtures/jwt_public.pem");

    fn service() -> JwtService {
        let config = JwtConfig::new(PRIVATE_KEY, PUBLIC_KEY, 900).unwrap();
        JwtService::new(config).unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let jwt = service();
        let user_id = Uuid::new_v4();

        let token = jwt.generate_access_token(user_id, "mentor").unwrap();
        let claims = jwt.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "mentor");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let jwt = service();
        let token = jwt.generate_access_token(Uuid::new_v4(), "mentee").unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(jwt.validate_token(&tampered).is_err());
        assert!(jwt.validate_token("not.a.jwt").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = service();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: "admin".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap(),
        )
        .unwrap();

        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn test_missing_key_file() {
        let err = JwtConfig::new("/definitely/not/here.pem", PUBLIC_KEY, 60).unwrap_err();
        assert!(err.to_string().contains("private key file"));
    }
}
