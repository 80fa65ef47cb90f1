//! # Form Validation
//!
//! Static validation rules for backoffice forms:
//!
//! - Account fields (username, e-mail, display name, phone, password)
//! - Moderation fields (block reason, publication schedule, regions)
//! - Search text
//!
//! Field validators return `None` when the value is valid and a [`FieldError`]
//! otherwise. Form validators run every field validator and aggregate the
//! results into a [`FormValidation`]. Nothing here touches the network, so the
//! rules are cheap enough to run on every keystroke.
//!
//! ## Usage
//!
//! ```rust
//! use beatdesk_types::validation::{validate_email, validate_create_user};
//! use beatdesk_types::CreateUserRequest;
//!
//! assert!(validate_email("dj@example.com").is_none());
//!
//! let form = validate_create_user(&CreateUserRequest::default());
//! assert!(!form.is_valid);
//! ```

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

use crate::{CreateUserRequest, ScheduleRequest, UpdateUserRequest};

/// Usernames start with a letter or digit and contain letters, digits, `_`, `.` and `-`.
pub static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$").expect("Invalid regex"));

/// Pragmatic e-mail shape check.
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("Invalid regex")
});

/// E.164-like phone numbers, separators allowed.
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ().-]{6,19}$").expect("Invalid regex"));

/// ISO 3166-1 alpha-2 region code.
pub static REGION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("Invalid regex"));

/// Maximum lengths and bounds for various fields.
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 30;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MIN_DISPLAY_NAME_LENGTH: usize = 2;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MIN_REASON_LENGTH: usize = 5;
pub const MAX_REASON_LENGTH: usize = 500;
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name.
    pub field: String,
    /// Error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    fn from_validation(field: &str, error: ValidationError) -> Self {
        Self {
            field: field.to_string(),
            code: error.code.to_string(),
            message: error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Validation failed for field '{}'", field)),
        }
    }
}

/// Aggregated result of a multi-field validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValidation {
    /// True when no field failed.
    pub is_valid: bool,
    /// One entry per failing field.
    pub errors: Vec<FieldError>,
}

impl FormValidation {
    /// Builds the aggregate from individual field results.
    pub fn collect(results: impl IntoIterator<Item = Option<FieldError>>) -> Self {
        let errors: Vec<FieldError> = results.into_iter().flatten().collect();
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// The error for a field, if it failed.
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

fn rule_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn check(field: &str, result: Result<(), ValidationError>) -> Option<FieldError> {
    result
        .err()
        .map(|e| FieldError::from_validation(field, e))
}

fn length_rule(label: &str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 && min > 0 {
        return Err(rule_error("required", format!("{} is required", label)));
    }
    if len < min {
        return Err(rule_error(
            "length",
            format!("{} must be at least {} characters", label, min),
        ));
    }
    if len > max {
        return Err(rule_error(
            "length",
            format!("{} must be at most {} characters", label, max),
        ));
    }
    Ok(())
}

/// Validate a username.
pub fn validate_username(value: &str) -> Option<FieldError> {
    let value = value.trim();
    check(
        "username",
        length_rule("Username", value, MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH).and_then(|_| {
            if USERNAME_REGEX.is_match(value) {
                Ok(())
            } else {
                Err(rule_error(
                    "pattern",
                    "Username must start with a letter or number and contain only letters, numbers, dots, hyphens, and underscores".to_string(),
                ))
            }
        }),
    )
}

/// Validate an e-mail address.
pub fn validate_email(value: &str) -> Option<FieldError> {
    let value = value.trim();
    check(
        "email",
        length_rule("Email", value, 1, MAX_EMAIL_LENGTH).and_then(|_| {
            if EMAIL_REGEX.is_match(value) {
                Ok(())
            } else {
                Err(rule_error("pattern", "Email address is not valid".to_string()))
            }
        }),
    )
}

/// Validate a display name. Empty is allowed.
pub fn validate_display_name(value: &str) -> Option<FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    check(
        "displayName",
        length_rule(
            "Display name",
            value,
            MIN_DISPLAY_NAME_LENGTH,
            MAX_DISPLAY_NAME_LENGTH,
        ),
    )
}

/// Validate a phone number. Empty is allowed.
pub fn validate_phone(value: &str) -> Option<FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let digits = value.chars().filter(char::is_ascii_digit).count();
    check(
        "phone",
        if PHONE_REGEX.is_match(value) && (7..=15).contains(&digits) {
            Ok(())
        } else {
            Err(rule_error("pattern", "Phone number is not valid".to_string()))
        },
    )
}

/// Validate a new password.
pub fn validate_password(value: &str) -> Option<FieldError> {
    check(
        "password",
        length_rule("Password", value, MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH).and_then(|_| {
            let has_letter = value.chars().any(char::is_alphabetic);
            let has_digit = value.chars().any(|c| c.is_ascii_digit());
            if has_letter && has_digit {
                Ok(())
            } else {
                Err(rule_error(
                    "strength",
                    "Password must contain at least one letter and one number".to_string(),
                ))
            }
        }),
    )
}

/// Validate the reason given when blocking a user or a catalog item.
pub fn validate_block_reason(value: &str) -> Option<FieldError> {
    check(
        "reason",
        length_rule("Reason", value.trim(), MIN_REASON_LENGTH, MAX_REASON_LENGTH),
    )
}

/// Validate a single ISO 3166-1 alpha-2 region code.
pub fn validate_region_code(value: &str) -> Option<FieldError> {
    check(
        "region",
        if REGION_REGEX.is_match(value) {
            Ok(())
        } else {
            Err(rule_error(
                "pattern",
                format!("'{}' is not a two-letter region code", value),
            ))
        },
    )
}

/// Validate a country field. Empty is allowed.
pub fn validate_country(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return None;
    }
    validate_region_code(value).map(|mut e| {
        e.field = "country".to_string();
        e
    })
}

/// Validate free-text search input.
pub fn validate_search(value: &str) -> Option<FieldError> {
    check(
        "search",
        length_rule("Search", value, 0, MAX_SEARCH_LENGTH),
    )
}

/// Validate a list of region codes: every code valid and no duplicates.
pub fn validate_regions(regions: &[String]) -> Option<FieldError> {
    let mut seen = HashSet::new();
    for region in regions {
        if let Some(mut err) = validate_region_code(region) {
            err.field = "regions".to_string();
            return Some(err);
        }
        if !seen.insert(region.as_str()) {
            return check(
                "regions",
                Err(rule_error(
                    "duplicate",
                    format!("Region '{}' is listed more than once", region),
                )),
            );
        }
    }
    None
}

/// Validate a publication window.
pub fn validate_schedule(schedule: &ScheduleRequest) -> FormValidation {
    let order = schedule.unpublish_at.and_then(|end| {
        if end > schedule.publish_at {
            None
        } else {
            check(
                "unpublishAt",
                Err(rule_error(
                    "order",
                    "Unpublish date must be after the publish date".to_string(),
                )),
            )
        }
    });
    FormValidation::collect([order])
}

/// Validate the create-user form.
pub fn validate_create_user(req: &CreateUserRequest) -> FormValidation {
    FormValidation::collect([
        validate_username(&req.username),
        validate_email(&req.email),
        validate_password(&req.password),
        req.display_name.as_deref().and_then(validate_display_name),
        req.phone.as_deref().and_then(validate_phone),
        req.country.as_deref().and_then(validate_country),
    ])
}

/// Validate the edit-user form. Only the provided fields are checked.
pub fn validate_update_user(req: &UpdateUserRequest) -> FormValidation {
    FormValidation::collect([
        req.email.as_deref().and_then(validate_email),
        req.display_name.as_deref().and_then(validate_display_name),
        req.phone.as_deref().and_then(validate_phone),
        req.country.as_deref().and_then(validate_country),
    ])
}
