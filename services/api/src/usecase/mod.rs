pub mod auth;
pub mod bootstrap;
pub mod clase;
pub mod cliente;
pub mod config;
pub mod profesional;
pub mod usuario;

use crate::domain::types::{Caller, MIN_PASSWORD_LEN, validate_email, validate_password};
use crate::error::{ApiError, FieldErrors};

/// Fail with 403 unless the caller is an administrator.
pub fn require_admin(caller: &Caller) -> Result<(), ApiError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Record a message when `value` exceeds `max` characters.
pub(crate) fn check_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("ensure this field has no more than {max} characters"));
    }
}

/// Record a message when `value` is blank.
pub(crate) fn check_required(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "this field may not be blank");
    }
}

pub(crate) fn check_email(errors: &mut FieldErrors, field: &str, value: &str) {
    if !validate_email(value) {
        errors.add(field, "enter a valid email address");
    } else {
        check_len(errors, field, value, 254);
    }
}

pub(crate) fn check_password(errors: &mut FieldErrors, field: &str, value: &str) {
    if !validate_password(value) {
        errors.add(
            field,
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
}

/// Record a reference to a row that does not exist.
pub(crate) fn add_missing_ref(errors: &mut FieldErrors, field: &str, id: i32) {
    errors.add(field, format!("invalid pk \"{id}\" - object does not exist"));
}
