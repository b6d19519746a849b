//! Signed, time-bound identity tokens.
//!
//! Tokens are compact RS256 JWTs carrying `sub` (decimal user id), `name`,
//! `iat` and `exp`. Expiry is checked against an injected [`Clock`] rather
//! than the library's wall clock so tests can move time.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use super::user::{UserId, UserName};

/// Token lifetime in hours unless configured otherwise.
pub const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 24;

/// Failures raised while issuing or validating tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("key material is unusable: {message}")]
    KeyMaterial { message: String },
    #[error("failed to sign token: {message}")]
    SigningFailure { message: String },
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    MalformedToken,
    #[error("token has no subject")]
    MissingSubject,
    #[error("token has no expiration")]
    MissingExpiration,
    #[error("token lifetime overflows the clock range")]
    ExpiryOutOfRange,
}

/// RSA key pair used to sign and verify tokens. Immutable once loaded.
#[derive(Clone)]
pub struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    /// Parse a PEM private key (PKCS#1 or PKCS#8) and PEM public key.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, TokenError> {
        let encoding =
            EncodingKey::from_rsa_pem(private_pem).map_err(|err| TokenError::KeyMaterial {
                message: format!("private key: {err}"),
            })?;
        let decoding =
            DecodingKey::from_rsa_pem(public_pem).map_err(|err| TokenError::KeyMaterial {
                message: format!("public key: {err}"),
            })?;
        Ok(Self { encoding, decoding })
    }
}

impl fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKeys(<redacted>)")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Issues and validates identity tokens.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use food_api::domain::{SigningKeys, TokenService, UserId, UserName};
/// use mockable::DefaultClock;
///
/// # fn demo(keys: SigningKeys) -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(Arc::new(keys), Arc::new(DefaultClock));
/// let token = tokens.issue(UserId::new(1)?, &UserName::new("admin")?)?;
/// assert_eq!(tokens.validate(&token)?, "1");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<SigningKeys>,
    clock: Arc<dyn Clock>,
    validity: TimeDelta,
}

impl TokenService {
    pub fn new(keys: Arc<SigningKeys>, clock: Arc<dyn Clock>) -> Self {
        Self {
            keys,
            clock,
            validity: TimeDelta::hours(DEFAULT_TOKEN_VALIDITY_HOURS),
        }
    }

    /// Override the token lifetime.
    pub fn with_validity(mut self, validity: TimeDelta) -> Self {
        self.validity = validity;
        self
    }

    /// Sign a token for `subject`, valid from now for the configured lifetime.
    pub fn issue(&self, subject: UserId, name: &UserName) -> Result<String, TokenError> {
        let now = self.clock.utc();
        let expires = now
            .checked_add_signed(self.validity)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: Some(subject.to_string()),
            name: Some(name.to_string()),
            iat: Some(now.timestamp()),
            exp: Some(expires.timestamp()),
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.keys.encoding).map_err(|err| {
            TokenError::SigningFailure {
                message: err.to_string(),
            }
        })
    }

    /// Verify `token` and return its subject unmodified.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        let data =
            decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|err| {
                match err.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        TokenError::InvalidSignature
                    }
                    _ => TokenError::MalformedToken,
                }
            })?;
        let claims = data.claims;

        let expires = claims.exp.ok_or(TokenError::MissingExpiration)?;
        if self.clock.utc().timestamp() >= expires {
            return Err(TokenError::Expired);
        }

        claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(TokenError::MissingSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MutableClock, test_signing_keys};
    use chrono::{DateTime, Utc};
    use rstest::{fixture, rstest};

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    struct Harness {
        clock: Arc<MutableClock>,
        tokens: TokenService,
    }

    #[fixture]
    fn harness() -> Harness {
        let clock = Arc::new(MutableClock::new(start()));
        let tokens = TokenService::new(test_signing_keys(), clock.clone());
        Harness { clock, tokens }
    }

    fn admin() -> (UserId, UserName) {
        (
            UserId::new(42).expect("id"),
            UserName::new("admin").expect("name"),
        )
    }

    fn sign_raw(claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::RS256),
            claims,
            &test_signing_keys().encoding,
        )
        .expect("sign")
    }

    #[rstest]
    fn issued_token_validates_to_subject(harness: Harness) {
        let (id, name) = admin();
        let token = harness.tokens.issue(id, &name).expect("issue");
        assert_eq!(harness.tokens.validate(&token), Ok("42".to_owned()));
    }

    #[rstest]
    fn token_is_valid_until_just_before_expiry(harness: Harness) {
        let (id, name) = admin();
        let token = harness.tokens.issue(id, &name).expect("issue");

        harness.clock.advance_seconds(24 * 60 * 60 - 1);
        assert!(harness.tokens.validate(&token).is_ok());

        harness.clock.advance_seconds(1);
        assert_eq!(harness.tokens.validate(&token), Err(TokenError::Expired));
    }

    #[rstest]
    fn custom_validity_is_honoured(harness: Harness) {
        let tokens = harness.tokens.clone().with_validity(TimeDelta::minutes(5));
        let (id, name) = admin();
        let token = tokens.issue(id, &name).expect("issue");

        harness.clock.advance_seconds(5 * 60);
        assert_eq!(tokens.validate(&token), Err(TokenError::Expired));
    }

    #[rstest]
    fn unrepresentable_expiry_is_an_error(harness: Harness) {
        let tokens = harness.tokens.with_validity(TimeDelta::MAX);
        let (id, name) = admin();

        assert_eq!(tokens.issue(id, &name), Err(TokenError::ExpiryOutOfRange));
    }

    #[rstest]
    fn tampered_payload_fails_signature(harness: Harness) {
        let (id, name) = admin();
        let token = harness.tokens.issue(id, &name).expect("issue");
        let other = harness
            .tokens
            .issue(UserId::new(1).expect("id"), &name)
            .expect("issue");

        let mut parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let forged = parts.join(".");

        assert_eq!(
            harness.tokens.validate(&forged),
            Err(TokenError::InvalidSignature)
        );
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("a.b.c")]
    fn garbage_is_malformed(harness: Harness, #[case] token: &str) {
        assert_eq!(
            harness.tokens.validate(token),
            Err(TokenError::MalformedToken)
        );
    }

    #[rstest]
    fn missing_expiration_is_rejected(harness: Harness) {
        let token = sign_raw(&Claims {
            sub: Some("42".to_owned()),
            name: None,
            iat: Some(start().timestamp()),
            exp: None,
        });
        assert_eq!(
            harness.tokens.validate(&token),
            Err(TokenError::MissingExpiration)
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    fn missing_subject_is_rejected(harness: Harness, #[case] sub: Option<String>) {
        let token = sign_raw(&Claims {
            sub,
            name: None,
            iat: None,
            exp: Some(start().timestamp() + 60),
        });
        assert_eq!(
            harness.tokens.validate(&token),
            Err(TokenError::MissingSubject)
        );
    }

    #[rstest]
    fn subject_is_returned_unparsed(harness: Harness) {
        let token = sign_raw(&Claims {
            sub: Some("not-a-number".to_owned()),
            name: None,
            iat: None,
            exp: Some(start().timestamp() + 60),
        });
        assert_eq!(
            harness.tokens.validate(&token),
            Ok("not-a-number".to_owned())
        );
    }

    #[rstest]
    fn rejects_unusable_pem() {
        let result = SigningKeys::from_pem(b"nope", b"nope");
        assert!(matches!(result, Err(TokenError::KeyMaterial { .. })));
    }
}
