use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

/// Per-field messages, rendered as the `errors` object of a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// Signup input after trimming. Email case is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_email(email: &str) -> Option<String> {
    if email.is_empty() {
        Some("Email is required".into())
    } else if !is_valid_email(email) {
        Some("Please enter a valid email address".into())
    } else {
        None
    }
}

fn check_name(name: &str) -> Option<String> {
    if name.is_empty() {
        Some("Name is required".into())
    } else if name.chars().count() < MIN_NAME_LEN {
        Some(format!("Name must be at least {MIN_NAME_LEN} characters long"))
    } else {
        None
    }
}

/// `min_len` of 0 only checks presence.
fn check_password(password: &str, min_len: usize) -> Option<String> {
    if password.trim().is_empty() {
        Some("Password is required".into())
    } else if password.chars().count() < min_len {
        Some(format!("Password must be at least {min_len} characters long"))
    } else {
        None
    }
}

pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<SignupInput, FieldErrors> {
    let name = name.trim();
    let email = email.trim();

    let errors = FieldErrors {
        name: check_name(name),
        email: check_email(email),
        password: check_password(password, MIN_PASSWORD_LEN),
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SignupInput {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// No length rule on login: a short wrong password is a credential failure, not bad input.
pub fn validate_login(email: &str, password: &str) -> Result<LoginInput, FieldErrors> {
    let email = email.trim();

    let errors = FieldErrors {
        name: None,
        email: check_email(email),
        password: check_password(password, 0),
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(LoginInput {
        email: email.to_string(),
        password: password.to_string(),
    })
}
