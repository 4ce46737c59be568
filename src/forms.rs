// src/forms.rs
use std::borrow::Cow;

use validator::{Validate, ValidationError};

use crate::errors::ClientError;
use crate::models::{CreateAdminPayload, LoginPayload, RegistrationPayload};

const SPECIAL_CHARACTERS: &str = "!@#$%^&*";
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordRequirement {
    pub label: &'static str,
    pub met: bool,
}

/// Lista wymagań dla hasła, w kolejności wyświetlania pod polem.
pub fn password_requirements(password: &str) -> Vec<PasswordRequirement> {
    vec![
        PasswordRequirement {
            label: "At least 8 characters",
            met: password.chars().count() >= MIN_PASSWORD_LEN,
        },
        PasswordRequirement {
            label: "Contains uppercase letter",
            met: password.chars().any(|c| c.is_ascii_uppercase()),
        },
        PasswordRequirement {
            label: "Contains lowercase letter",
            met: password.chars().any(|c| c.is_ascii_lowercase()),
        },
        PasswordRequirement {
            label: "Contains number",
            met: password.chars().any(|c| c.is_ascii_digit()),
        },
        PasswordRequirement {
            label: "Contains special character",
            met: password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        },
    ]
}

#[allow(clippy::ptr_arg)]
fn validate_password_strength(password: &String) -> Result<(), ValidationError> {
    let missing: Vec<&str> = password_requirements(password)
        .into_iter()
        .filter(|req| !req.met)
        .map(|req| req.label)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(Cow::Owned(format!(
            "Password does not meet requirements: {}",
            missing.join(", ")
        ))))
    }
}

fn validate_terms_accepted(accepted: &bool) -> Result<(), ValidationError> {
    if *accepted {
        Ok(())
    } else {
        Err(ValidationError::new("terms")
            .with_message("You must accept the Terms of Service".into()))
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub remember_me: bool,
}

impl LoginForm {
    pub fn into_payload(self) -> Result<LoginPayload, ClientError> {
        let form = LoginForm {
            email: self.email.trim().to_string(),
            ..self
        };
        form.validate()?;
        Ok(LoginPayload {
            email: form.email,
            password: form.password,
            remember: form.remember_me,
        })
    }
}

#[derive(Debug, Clone, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub phone: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,

    #[validate(custom(function = "validate_terms_accepted"))]
    pub terms_accepted: bool,

    pub newsletter: bool,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            terms_accepted: false,
            // Zapis do newslettera jest domyślnie zaznaczony
            newsletter: true,
        }
    }
}

impl RegistrationForm {
    pub fn password_requirements(&self) -> Vec<PasswordRequirement> {
        password_requirements(&self.password)
    }

    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }

    /// Odpowiada stanowi przycisku "Create Account".
    pub fn can_submit(&self) -> bool {
        self.password_requirements().iter().all(|req| req.met)
            && self.terms_accepted
            && self.passwords_match()
    }

    pub fn into_payload(self) -> Result<RegistrationPayload, ClientError> {
        let form = RegistrationForm {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            ..self
        };
        form.validate()?;
        Ok(RegistrationPayload {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone: (!form.phone.is_empty()).then_some(form.phone),
            password_confirmation: form.confirm_password,
            password: form.password,
            newsletter: form.newsletter,
        })
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct NewAdminForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl NewAdminForm {
    pub fn into_payload(self) -> Result<CreateAdminPayload, ClientError> {
        let form = NewAdminForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        };
        form.validate()?;
        Ok(CreateAdminPayload {
            name: form.name,
            email: form.email,
            password: form.password,
        })
    }
}
