// src/errors.rs

use reqwest::StatusCode;
use thiserror::Error;
use validator::ValidationErrors;

/// Tekst pokazywany użytkownikowi, gdy nie mamy nic lepszego.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Form validation failed")]
    InvalidForm(#[from] ValidationErrors),

    #[error("{0} not found")]
    NotFound(String),

    #[error("You are not signed in. Please log in and try again.")]
    MissingToken,

    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed server response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid API address: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Tekst błędu w formie, w jakiej trafia do powiadomień w UI.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation { message, .. } => message.clone(),
            ClientError::InvalidForm(errors) => {
                let mut messages = Vec::new();
                for (field, field_errors) in errors.field_errors() {
                    for error in field_errors {
                        let msg = error.message.as_ref().map_or_else(
                            || format!("Field '{}' is invalid", field),
                            |m| m.to_string(),
                        );
                        messages.push(msg);
                    }
                }
                messages.sort();
                messages.join("; ")
            }
            ClientError::MissingToken | ClientError::NotFound(_) => self.to_string(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::UnexpectedShape(_)
            | ClientError::Transport(_)
            | ClientError::MalformedResponse(_) => {
                tracing::error!("Nieoczekiwany błąd klienta: {:?}", self);
                GENERIC_ERROR_MESSAGE.to_string()
            }
            ClientError::Io(e) => format!("Could not read file: {}", e),
            ClientError::InvalidUrl(e) => format!("Invalid API address: {}", e),
        }
    }

    pub fn is_auth_error(&self) -> bool {
        match self {
            ClientError::MissingToken => true,
            ClientError::Api { status, .. } => {
                *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn api_error_message_is_shown_verbatim() {
        let err = ClientError::Api {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "The price field must be a number.".to_string(),
        };
        assert_eq!(err.user_message(), "The price field must be a number.");
        assert!(!err.is_auth_error());
    }

    #[test]
    fn malformed_json_falls_back_to_generic_text() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ClientError::from(json_err);
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn form_errors_are_joined_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "email",
            ValidationError::new("email").with_message("Invalid email address".into()),
        );
        errors.add("name", ValidationError::new("length"));
        let text = ClientError::from(errors).user_message();
        assert_eq!(text, "Field 'name' is invalid; Invalid email address");
    }

    #[test]
    fn unauthorized_status_counts_as_auth_error() {
        let err = ClientError::Api {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthenticated.".to_string(),
        };
        assert!(err.is_auth_error());
        assert!(ClientError::MissingToken.is_auth_error());
    }
}
