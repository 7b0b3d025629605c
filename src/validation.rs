use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please fill in all fields and upload a PDF file")]
    IncompleteSubmission,
    #[error("Please upload a PDF file")]
    NotPdf,
    #[error("Score must be between 1 and 10")]
    ScoreOutOfRange,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if blank(email) || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    if blank(name) || blank(email) || password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !email_regex().is_match(email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Only the filename is kept, so the PDF check goes by its extension.
pub fn validate_submission(
    title: &str,
    abstract_text: &str,
    filename: &str,
) -> Result<(), ValidationError> {
    if blank(title) || blank(abstract_text) || blank(filename) {
        return Err(ValidationError::IncompleteSubmission);
    }
    let mime = mime_guess::from_path(filename).first_raw();
    if mime != Some("application/pdf") {
        return Err(ValidationError::NotPdf);
    }
    Ok(())
}

pub fn validate_score(score: i64) -> Result<u8, ValidationError> {
    u8::try_from(score)
        .ok()
        .filter(|s| (MIN_SCORE..=MAX_SCORE).contains(s))
        .ok_or(ValidationError::ScoreOutOfRange)
}
