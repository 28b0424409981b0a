use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::{RegisterRequest, UpdateProfileRequest};
use crate::error::AppError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Field-level checks for registration. The caller trims and lowercases the
/// email first; the store's CHECK and UNIQUE constraints remain the final
/// arbiter.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if !is_valid_email(&req.email) {
        return Err(AppError::Validation("email: not a valid address".into()));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "password: must be at least 8 characters".into(),
        ));
    }
    validate_display_name(&req.display_name)?;
    if req.age < 0 {
        return Err(AppError::Validation("age: must be non-negative".into()));
    }
    // TODO: product has not settled an eligibility age band; until then
    // only minor consent is enforced.
    if req.age < 18 && !req.parent_consent {
        return Err(AppError::Validation(
            "parent_consent: required for users under 18".into(),
        ));
    }
    Ok(())
}

pub fn validate_profile_update(req: &UpdateProfileRequest) -> Result<(), AppError> {
    if let Some(name) = &req.display_name {
        validate_display_name(name)?;
    }
    Ok(())
}

fn validate_display_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("display_name: must not be empty".into()));
    }
    if name.chars().count() > 64 {
        return Err(AppError::Validation(
            "display_name: at most 64 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            email: "alice@example.com".into(),
            password: "Secret123!".into(),
            display_name: "Alice".into(),
            age: 20,
            parent_consent: false,
        }
    }

    #[test]
    fn accepts_a_well_formed_registration() {
        assert!(validate_registration(&request()).is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["", "no-at-sign", "a@b", "two@@example.com", "a b@example.com"] {
            let mut req = request();
            req.email = email.into();
            assert!(validate_registration(&req).is_err(), "accepted {email:?}");
        }
    }

    #[test]
    fn rejects_short_passwords() {
        let mut req = request();
        req.password = "short".into();
        let err = validate_registration(&req).unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn rejects_blank_display_name() {
        let mut req = request();
        req.display_name = "   ".into();
        assert!(validate_registration(&req).is_err());
    }

    #[test]
    fn rejects_negative_age() {
        let mut req = request();
        req.age = -1;
        let err = validate_registration(&req).unwrap_err();
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn minor_requires_parental_consent() {
        let mut req = request();
        req.age = 15;
        assert!(validate_registration(&req).is_err());
        req.parent_consent = true;
        assert!(validate_registration(&req).is_ok());
    }
}
