//! Request body validation for the register and login routes.
//!
//! Pure shape checks over the raw JSON body: no I/O, and malformed
//! input produces error messages rather than a fault. Fields are
//! checked in declaration order and every applicable error is
//! collected, so a response can report all problems at once.

use serde_json::Value;

use crate::user::models::EmailAddress;

/// Outcome of validating one request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

struct FieldRule {
    field: &'static str,
    required_message: &'static str,
    invalid_message: &'static str,
    is_valid: fn(&str) -> bool,
}

const REGISTER_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        required_message: "A first name is required.",
        invalid_message: "First name is not valid.",
        is_valid: is_valid_name,
    },
    FieldRule {
        field: "lastName",
        required_message: "A last name is required.",
        invalid_message: "Last name is not valid.",
        is_valid: is_valid_last_name,
    },
    FieldRule {
        field: "email",
        required_message: "An email address is required.",
        invalid_message: "Email address is not valid.",
        is_valid: EmailAddress::is_valid_format,
    },
    FieldRule {
        field: "password",
        required_message: "A password is required.",
        invalid_message: "Password must be at least 8 characters and include an uppercase letter, a lowercase letter, a digit, and a special character.",
        is_valid: is_valid_password,
    },
];

const LOGIN_RULES: &[FieldRule] = &[
    FieldRule {
        field: "email",
        required_message: "An email address is required.",
        invalid_message: "Email address is not valid.",
        is_valid: EmailAddress::is_valid_format,
    },
    FieldRule {
        field: "password",
        required_message: "A password is required.",
        invalid_message: "Password format is not valid.",
        is_valid: is_valid_password,
    },
];

/// Validate a registration body.
///
/// Checks `name`, `lastName`, `email`, and `password` in order, then
/// appends the `confirmPassword` check last: the confirmation must be
/// present and exactly equal to `password`.
pub fn validate_register_body(body: &Value) -> ValidationResult {
    let mut errors = validate_fields(body, REGISTER_RULES);

    match string_field(body, "confirmPassword") {
        None => errors.push("Password confirmation is required.".to_string()),
        Some(confirmation) => {
            if string_field(body, "password") != Some(confirmation) {
                errors.push("Passwords do not match.".to_string());
            }
        }
    }

    ValidationResult::from_errors(errors)
}

/// Validate a login body (`email` and `password`).
pub fn validate_login_body(body: &Value) -> ValidationResult {
    ValidationResult::from_errors(validate_fields(body, LOGIN_RULES))
}

fn validate_fields(body: &Value, rules: &[FieldRule]) -> Vec<String> {
    rules
        .iter()
        .filter_map(|rule| validate_field(body, rule))
        .collect()
}

fn validate_field(body: &Value, rule: &FieldRule) -> Option<String> {
    // A field that is absent, not a string, or empty is missing; the
    // format check only runs on present values.
    let Some(value) = string_field(body, rule.field) else {
        return Some(rule.required_message.to_string());
    };

    if !(rule.is_valid)(value) {
        return Some(rule.invalid_message.to_string());
    }

    None
}

fn string_field<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{C0}'..='\u{FF}').contains(&c) || c.is_whitespace()
}

fn is_valid_name(value: &str) -> bool {
    value.chars().count() >= 3 && value.chars().all(is_name_char)
}

fn is_valid_last_name(value: &str) -> bool {
    value.chars().count() >= 2 && value.chars().all(is_name_char)
}

const PASSWORD_SPECIAL_CHARS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];

fn is_valid_password(value: &str) -> bool {
    value.chars().count() >= 8
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIAL_CHARS.contains(&c))
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(&c))
}
