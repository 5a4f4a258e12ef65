use std::fmt;

use chrono::{DateTime, Duration, Utc};
use reqwest::blocking::RequestBuilder;
use serde::Deserialize;

use crate::error::{ClientError, Result};

pub const TOKEN_CREATE_PATH: &str = "/v0/auth/token/create";

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Exchanged for short lived bearer tokens.
    Basic { username: String, password: String },
    /// Sent on every request as the user half of a basic auth pair.
    Token { token: String },
}

impl Credentials {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Credentials::Token {
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::Token { .. } => f.debug_struct("Token").field("token", &"***").finish(),
        }
    }
}

/// Source of the current time for token expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct CachedToken {
    pub(crate) access_token: String,
    pub(crate) expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// A token is usable only while its expiry is strictly in the future.
    pub(crate) fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    pub(crate) fn issued(response: TokenResponse, now: DateTime<Utc>) -> Result<Self> {
        let expires_at = Duration::try_seconds(response.expires_in)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                ClientError::Deserialization(format!(
                    "expires_in out of range: {}",
                    response.expires_in
                ))
            })?;

        Ok(Self {
            access_token: response.access_token,
            expires_at,
        })
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

pub(crate) enum Authorization {
    Bearer(String),
    Token(String),
}

impl Authorization {
    pub(crate) fn apply(self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Authorization::Bearer(access_token) => request.bearer_auth(access_token),
            Authorization::Token(token) => request.basic_auth(token, None::<&str>),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_token_expiry_is_strict() {
        let response = TokenResponse {
            access_token: "tok".to_string(),
            expires_in: 60,
        };
        let token = CachedToken::issued(response, noon()).unwrap();

        assert_eq!(token.expires_at, noon() + Duration::seconds(60));
        assert!(token.is_valid_at(noon() + Duration::seconds(59)));
        assert!(!token.is_valid_at(noon() + Duration::seconds(60)));
        assert!(!token.is_valid_at(noon() + Duration::seconds(61)));
    }

    #[test]
    fn test_token_with_huge_lifetime_rejected() {
        let response = TokenResponse {
            access_token: "tok".to_string(),
            expires_in: i64::MAX,
        };
        let result = CachedToken::issued(response, noon());
        assert!(matches!(result, Err(ClientError::Deserialization(_))));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let basic = format!("{:?}", Credentials::basic("admin", "p4ssw0rd"));
        assert!(basic.contains("admin"));
        assert!(!basic.contains("p4ssw0rd"));

        let token = format!("{:?}", Credentials::token("s3cr3t"));
        assert!(!token.contains("s3cr3t"));
    }
}
