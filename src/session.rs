// src/session.rs

use crate::errors::ClientError;

/// Token sesji przekazywany jawnie do każdej operacji wymagającej logowania.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    token: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        Self {
            token: (!token.is_empty()).then(|| token.to_string()),
        }
    }

    pub fn from_optional(token: Option<String>) -> Self {
        match token {
            Some(token) => Self::with_token(token),
            None => Self::anonymous(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Zwraca token albo błąd autoryzacji, zanim cokolwiek pójdzie do sieci.
    pub fn bearer(&self) -> Result<&str, ClientError> {
        self.token.as_deref().ok_or_else(|| {
            tracing::warn!("Próba wywołania chronionej operacji bez tokenu sesji");
            ClientError::MissingToken
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_treated_as_missing() {
        let ctx = AuthContext::with_token("   ");
        assert!(!ctx.is_authenticated());
        assert!(matches!(ctx.bearer(), Err(ClientError::MissingToken)));
    }

    #[test]
    fn token_is_trimmed() {
        let ctx = AuthContext::from_optional(Some(" abc123 \n".to_string()));
        assert_eq!(ctx.bearer().unwrap(), "abc123");
    }
}
