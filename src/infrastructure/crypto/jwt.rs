//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::UserRole;

pub const TOKEN_ISSUER: &str = "rental-service";

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
            issuer: TOKEN_ISSUER.to_string(),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    /// Stored role value, e.g. `PROPERTY_MANAGER`
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn new(user_id: &str, username: &str, role: UserRole, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// `None` for a token minted with an unknown role.
    pub fn user_role(&self) -> Option<UserRole> {
        UserRole::parse(&self.role)
    }
}

/// Create a signed token for a user
pub fn create_token(
    user_id: &str,
    username: &str,
    role: UserRole,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::new(user_id, username, role, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
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
        JwtConfig::new("test-secret", 24)
    }

    #[test]
    fn create_and_verify_token() {
        let token = create_token("user-123", "wanjiku", UserRole::Landlord, &config()).unwrap();

        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.username, "wanjiku");
        assert_eq!(claims.role, "LANDLORD");
        assert_eq!(claims.user_role(), Some(UserRole::Landlord));
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert!(!claims.is_expired());
    }

    #[test]
    fn invalid_token_is_rejected() {
        assert!(verify_token("invalid-token", &config()).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token("u", "u", UserRole::Tenant, &config()).unwrap();
        let other = JwtConfig::new("another-secret", 24);
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let dbg = format!("{:?}", config());
        assert!(!dbg.contains("test-secret"));
    }
}
