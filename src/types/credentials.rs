//! Authentication newtypes for the Bugsnag data access API.

use super::ValidationError;
use std::fmt;

/// Personal auth token for the Bugsnag data access API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Create a new token with validation
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        let trimmed = token.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::InvalidToken {
                reason: "token cannot be empty".to_string(),
            });
        }

        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::InvalidToken {
                reason: "token cannot contain whitespace".to_string(),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact token in display
        let visible: String = self.0.chars().take(4).collect();
        write!(f, "{}...", visible)
    }
}

/// How requests authenticate against the API.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `Authorization: token <token>`
    Token(ApiToken),
    /// HTTP basic auth with a Bugsnag username and password.
    Basic { username: String, password: String },
}

impl Credentials {
    /// Builds basic-auth credentials, rejecting empty parts.
    pub fn basic(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(ValidationError::EmptyField("username"));
        }
        if password.is_empty() {
            return Err(ValidationError::EmptyField("password"));
        }
        Ok(Self::Basic { username, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => write!(f, "Token({})", token),
            Self::Basic { username, .. } => write!(f, "Basic({}, ****)", username),
        }
    }
}
