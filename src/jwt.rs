//! JWT token issuance and verification.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token type for distinguishing access vs refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived access token (15 minutes)
    Access,
    /// Long-lived refresh token (7 days)
    Refresh,
}

/// JWT claims shared by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Token type
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    /// The user ID carried in the subject claim.
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub.parse().map_err(|_| JwtError::InvalidSubject)
    }
}

/// Access token duration: 15 minutes
pub const ACCESS_TOKEN_DURATION_SECS: u64 = 15 * 60;

/// Refresh token duration: 7 days
pub const REFRESH_TOKEN_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Algorithms accepted on incoming tokens. Anything outside the HMAC family is rejected.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Configuration for JWT operations.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub user_id: i64,
    pub access_token: String,
    /// Access token expiry (Unix seconds)
    pub access_expires_at: u64,
    pub refresh_token: String,
    /// Refresh token expiry (Unix seconds)
    pub refresh_expires_at: u64,
}

fn now_secs() -> Result<u64, JwtError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| JwtError::TimeError)?
        .as_secs())
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    fn sign(&self, user_id: i64, token_type: TokenType, now: u64) -> Result<(String, u64), JwtError> {
        let duration = match token_type {
            TokenType::Access => ACCESS_TOKEN_DURATION_SECS,
            TokenType::Refresh => REFRESH_TOKEN_DURATION_SECS,
        };
        let exp = now + duration;

        let claims = Claims {
            sub: user_id.to_string(),
            token_type,
            iat: now,
            exp,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok((token, exp))
    }

    /// Issue an access token and a refresh token for a user.
    pub fn issue(&self, user_id: i64) -> Result<TokenPair, JwtError> {
        let now = now_secs()?;
        let (access_token, access_expires_at) = self.sign(user_id, TokenType::Access, now)?;
        let (refresh_token, refresh_expires_at) = self.sign(user_id, TokenType::Refresh, now)?;

        Ok(TokenPair {
            user_id,
            access_token,
            access_expires_at,
            refresh_token,
            refresh_expires_at,
        })
    }

    /// Validate a token of either type and decode its claims.
    ///
    /// Rejects non-HMAC algorithms, bad signatures, missing or malformed `exp`,
    /// and tokens whose expiry is at or before the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(JwtError::Decoding)?;

        // jsonwebtoken treats exp == now as still valid
        if token_data.claims.exp <= now_secs()? {
            return Err(JwtError::Expired);
        }

        Ok(token_data.claims)
    }

    /// Validate an access token and return the user ID it was issued for.
    pub fn validate_access_token(&self, token: &str) -> Result<i64, JwtError> {
        self.verify_typed(token, TokenType::Access)
    }

    /// Validate a refresh token and return the user ID it was issued for.
    pub fn validate_refresh_token(&self, token: &str) -> Result<i64, JwtError> {
        self.verify_typed(token, TokenType::Refresh)
    }

    fn verify_typed(&self, token: &str, expected: TokenType) -> Result<i64, JwtError> {
        let claims = self.verify(token)?;
        if claims.token_type != expected {
            return Err(JwtError::WrongTokenType);
        }
        claims.user_id()
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Error decoding the token
    Decoding(jsonwebtoken::errors::Error),
    /// Token expiry is at or before now
    Expired,
    /// Subject is not a user ID
    InvalidSubject,
    /// System time error
    TimeError,
    /// Wrong token type (e.g., using refresh token as access token)
    WrongTokenType,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Decoding(e) => write!(f, "Failed to decode token: {}", e),
            JwtError::Expired => write!(f, "Token has expired"),
            JwtError::InvalidSubject => write!(f, "Token subject is not a user ID"),
            JwtError::TimeError => write!(f, "System time error"),
            JwtError::WrongTokenType => write!(f, "Wrong token type"),
        }
    }
}

impl std::error::Error for JwtError {}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

    fn encode_raw(secret: &[u8], header: Header, claims: &serde_json::Value) -> String {
        jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let config = JwtConfig::new(b"test-secret-key-for-testing");

        let pair = config.issue(42).unwrap();
        assert_eq!(pair.user_id, 42);
        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());

        let claims = config.verify(&pair.access_token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_DURATION_SECS);
        assert_eq!(claims.exp, pair.access_expires_at);

        assert_eq!(config.validate_access_token(&pair.access_token).unwrap(), 42);
    }

    #[test]
    fn test_refresh_token_lifetime() {
        let config = JwtConfig::new(b"test-secret-key-for-testing");

        let pair = config.issue(7).unwrap();
        let claims = config.verify(&pair.refresh_token).unwrap();
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.exp - claims.iat, REFRESH_TOKEN_DURATION_SECS);
        assert_eq!(config.validate_refresh_token(&pair.refresh_token).unwrap(), 7);
    }

    #[test]
    fn test_wrong_token_type_rejected() {
        let config = JwtConfig::new(b"test-secret-key-for-testing");
        let pair = config.issue(1).unwrap();

        assert!(matches!(
            config.validate_refresh_token(&pair.access_token),
            Err(JwtError::WrongTokenType)
        ));
        assert!(matches!(
            config.validate_access_token(&pair.refresh_token),
            Err(JwtError::WrongTokenType)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let config = JwtConfig::new(b"test-secret-key-for-testing");
        assert!(config.verify("invalid-token").is_err());
        assert!(config.verify("").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let config1 = JwtConfig::new(b"secret-1");
        let config2 = JwtConfig::new(b"secret-2");

        let pair = config1.issue(1).unwrap();
        assert!(config2.verify(&pair.access_token).is_err());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let config = JwtConfig::new(b"test-secret-key-for-testing");
        let pair = config.issue(1).unwrap();

        let other = config.issue(2).unwrap();
        let parts: Vec<&str> = pair.access_token.split('.').collect();
        let other_parts: Vec<&str> = other.access_token.split('.').collect();
        // Subject 2's payload under subject 1's signature
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(config.verify(&forged).is_err());
    }

    #[test]
    fn test_expired_token() {
        let secret = b"test-secret";
        let now = now_secs().unwrap();

        let token = encode_raw(
            secret,
            Header::default(),
            &serde_json::json!({ "sub": "1", "typ": "access", "iat": now - 100, "exp": now - 50 }),
        );

        let config = JwtConfig::new(secret);
        assert!(config.verify(&token).is_err());
    }

    #[test]
    fn test_token_expiring_now_rejected() {
        let secret = b"test-secret";
        let now = now_secs().unwrap();

        let token = encode_raw(
            secret,
            Header::default(),
            &serde_json::json!({ "sub": "1", "typ": "access", "iat": now - 10, "exp": now }),
        );

        let config = JwtConfig::new(secret);
        assert!(config.verify(&token).is_err());
    }

    #[test]
    fn test_missing_exp_rejected() {
        let secret = b"test-secret";
        let token = encode_raw(
            secret,
            Header::default(),
            &serde_json::json!({ "sub": "1", "typ": "access", "iat": 0 }),
        );

        let config = JwtConfig::new(secret);
        assert!(config.verify(&token).is_err());
    }

    #[test]
    fn test_malformed_exp_rejected() {
        let secret = b"test-secret";
        let token = encode_raw(
            secret,
            Header::default(),
            &serde_json::json!({ "sub": "1", "typ": "access", "iat": 0, "exp": "tomorrow" }),
        );

        let config = JwtConfig::new(secret);
        assert!(config.verify(&token).is_err());
    }

    #[test]
    fn test_other_hmac_algorithms_accepted() {
        let secret = b"test-secret";
        let now = now_secs().unwrap();

        let token = encode_raw(
            secret,
            Header::new(Algorithm::HS512),
            &serde_json::json!({ "sub": "9", "typ": "access", "iat": now, "exp": now + 60 }),
        );

        let config = JwtConfig::new(secret);
        assert_eq!(config.validate_access_token(&token).unwrap(), 9);
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let config = JwtConfig::new(b"test-secret");
        let now = now_secs().unwrap();

        // {"alg":"none","typ":"JWT"}
        let header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        let payload = serde_json::json!({ "sub": "1", "typ": "access", "iat": now, "exp": now + 60 });
        let payload = URL_SAFE_NO_PAD.encode(payload.to_string());

        assert!(config.verify(&format!("{}.{}.", header, payload)).is_err());
    }

    #[test]
    fn test_non_hmac_algorithm_rejected() {
        let config = JwtConfig::new(b"test-secret");
        let pair = config.issue(1).unwrap();

        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let mut parts = pair.access_token.splitn(2, '.');
        parts.next();
        let rest = parts.next().unwrap();

        assert!(config.verify(&format!("{}.{}", header, rest)).is_err());
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let secret = b"test-secret";
        let now = now_secs().unwrap();

        let token = encode_raw(
            secret,
            Header::default(),
            &serde_json::json!({ "sub": "alice", "typ": "access", "iat": now, "exp": now + 60 }),
        );

        let config = JwtConfig::new(secret);
        assert!(config.verify(&token).is_ok());
        assert!(matches!(
            config.validate_access_token(&token),
            Err(JwtError::InvalidSubject)
        ));
    }
}
