//! Service account authentication
//!
//! Signs an RS256 JWT assertion with the service account private key and
//! exchanges it for an OAuth access token (JWT bearer grant).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::http::HttpTransport;
use crate::config::ServiceAccountKey;
use crate::errors::{PrintlinkerError, Result};

/// Admin API 写权限
pub const SCOPE_ANALYTICS_EDIT: &str = "https://www.googleapis.com/auth/analytics.edit";
/// Data API 只读权限
pub const SCOPE_ANALYTICS_READONLY: &str = "https://www.googleapis.com/auth/analytics.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Google 允许的最长断言有效期
const ASSERTION_LIFETIME_MINUTES: i64 = 60;

/// JWT assertion claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

/// OAuth access token
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            PrintlinkerError::credentials(format!(
                "Invalid private key for {}: {}",
                key.client_email, e
            ))
        })?;
        Ok(Self { key, encoding_key })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    pub fn claims(&self, scope: &str, now: DateTime<Utc>) -> AssertionClaims {
        AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: scope.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ASSERTION_LIFETIME_MINUTES)).timestamp(),
        }
    }

    /// Sign the assertion for `scope`.
    pub fn build_assertion(&self, scope: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = self.claims(scope, now);
        Ok(encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// 换取 access token
    pub fn fetch_access_token(&self, http: &HttpTransport, scope: &str) -> Result<AccessToken> {
        let now = Utc::now();
        let assertion = self.build_assertion(scope, now)?;
        debug!("Requesting access token for {}", self.key.client_email);

        let resp: TokenResponse = http
            .post_form(
                &self.key.token_uri,
                &[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())],
            )
            .map_err(|e| match e {
                e @ PrintlinkerError::Network(_) => e,
                other => PrintlinkerError::authentication(other.message().to_string()),
            })?;

        info!("Authenticated as {}", self.key.client_email);
        Ok(AccessToken {
            token: resp.access_token,
            expires_at: now + Duration::seconds(resp.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_with(private_key: &str) -> ServiceAccountKey {
        serde_json::from_value(serde_json::json!({
            "client_email": "reporter@demo.iam.gserviceaccount.com",
            "private_key": private_key,
        }))
        .unwrap()
    }

    #[test]
    fn test_invalid_private_key_rejected() {
        let err = ServiceAccountAuth::new(key_with("not a pem"))
            .err()
            .expect("expected credentials error");
        assert!(matches!(err, PrintlinkerError::Credentials(_)));
        assert!(err.message().contains("reporter@demo"));
    }

    #[test]
    fn test_claims_shape() {
        // claims() 不依赖私钥内容，用 HMAC key 构造一个实例
        let auth = ServiceAccountAuth {
            key: key_with("unused"),
            encoding_key: EncodingKey::from_secret(b"unused"),
        };
        let now = Utc::now();
        let claims = auth.claims(SCOPE_ANALYTICS_READONLY, now);
        assert_eq!(claims.iss, "reporter@demo.iam.gserviceaccount.com");
        assert_eq!(claims.aud, crate::config::platform::DEFAULT_TOKEN_URI);
        assert_eq!(claims.scope, SCOPE_ANALYTICS_READONLY);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(auth.client_email(), "reporter@demo.iam.gserviceaccount.com");
    }
}
