use crate::config::SecurityConfig;
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// The identity a bearer token asserts.
///
/// Built at login, never stored. Every protected request decodes a fresh copy
/// from its token. Field names on the wire match the tokens the service has
/// always issued (`userId`, `admin`, `exp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(rename = "admin")]
    pub is_admin: bool,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, unparsable, wrong algorithm or bad signature.
    #[error("invalid token")]
    Invalid,
    /// Signature checks out but the expiry has passed.
    #[error("token expired")]
    Expired,
    #[error("could not sign token: {0}")]
    Signing(String),
}

/// Signs a token for `user_id` that stays valid for `security.token_ttl`.
pub fn issue_token(
    user_id: i32,
    is_admin: bool,
    security: &SecurityConfig,
) -> Result<String, TokenError> {
    issue_token_at(user_id, is_admin, Utc::now(), security)
}

/// Same as [`issue_token`] with an explicit issuance time.
pub fn issue_token_at(
    user_id: i32,
    is_admin: bool,
    now: DateTime<Utc>,
    security: &SecurityConfig,
) -> Result<String, TokenError> {
    let exp = now
        .checked_add_signed(security.token_ttl)
        .ok_or_else(|| TokenError::Signing("expiry overflows".to_string()))?
        .timestamp();

    let claims = Claims {
        user_id,
        is_admin,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verifies the signature and expiry of `token` and returns its claims.
pub fn validate_token(token: &str, security: &SecurityConfig) -> Result<Claims, TokenError> {
    validate_token_at(token, Utc::now().timestamp(), security)
}

/// Same as [`validate_token`] against an explicit clock (seconds since epoch).
///
/// A token whose `exp` equals `now` is already expired.
pub fn validate_token_at(
    token: &str,
    now: i64,
    security: &SecurityConfig,
) -> Result<Claims, TokenError> {
    // Pin the algorithm. Expiry is checked below against our own clock so the
    // boundary is exact (jsonwebtoken applies leeway and treats exp == now as live).
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)?;

    if claims.exp <= now {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn security(secret: &str) -> SecurityConfig {
        SecurityConfig::new(secret.as_bytes())
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let security = security("test_secret_key_for_testing_purposes_only");
        let now = Utc::now();

        let token = issue_token_at(42, false, now, &security).unwrap();
        let claims = validate_token(&token, &security).unwrap();

        assert_eq!(claims.user_id, 42);
        assert!(!claims.is_admin);
        assert_eq!(claims.exp, now.timestamp() + 72 * 60 * 60);
    }

    #[test]
    fn test_expired_token() {
        let security = security("test_secret_key_for_testing_purposes_only");
        // 73 hours ago, so a 72 hour token is already dead
        let issued = Utc::now() - Duration::hours(73);

        let token = issue_token_at(7, false, issued, &security).unwrap();

        assert_eq!(
            validate_token(&token, &security),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let security = security("boundary");
        let issued = Utc::now();
        let token = issue_token_at(1, false, issued, &security).unwrap();
        let exp = issued.timestamp() + 72 * 60 * 60;

        assert!(validate_token_at(&token, exp - 1, &security).is_ok());
        assert_eq!(
            validate_token_at(&token, exp, &security),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_bad_signature() {
        let token = issue_token(9, false, &security("secret-A")).unwrap();

        assert_eq!(
            validate_token(&token, &security("secret-B")),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let security = security("secret");
        let token = issue_token(1, false, &security).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let forged = issue_token(2, true, &security).unwrap();
        parts[1] = forged.split('.').nth(1).unwrap().to_string();

        assert_eq!(
            validate_token(&parts.join("."), &security),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        let security = security("secret");

        assert_eq!(validate_token("", &security), Err(TokenError::Invalid));
        assert_eq!(
            validate_token("not.a.token", &security),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS512),
            &Claims {
                user_id: 1,
                is_admin: false,
                exp: Utc::now().timestamp() + 60,
            },
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(
            validate_token(&token, &security("secret")),
            Err(TokenError::Invalid)
        );
    }
}
