//! Field validation for request inputs
//!
//! Errors are collected per field (keyed by the camelCase wire name) so a
//! client sees every problem in one response.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::ServiceError;

/// Summary message returned alongside field errors
pub const VALIDATION_MESSAGE: &str = "One or more validation errors occurred.";

/// Maximum length of user names and email addresses
pub const MAX_USER_FIELD_LEN: usize = 100;
/// Maximum length of blog and article text fields
pub const MAX_TITLE_FIELD_LEN: usize = 50;
/// Maximum length of a commentator name
pub const MAX_COMMENTATOR_NAME_LEN: usize = 255;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern is valid")
});

/// Field name → messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for `field`
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Non-blank check
    pub fn require(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, format!("The {} field is required.", field));
            return false;
        }
        true
    }

    /// Length check in characters, on the trimmed value that gets stored
    pub fn max_length(&mut self, field: &str, value: &str, max: usize) -> bool {
        if value.trim().chars().count() > max {
            self.add(
                field,
                format!(
                    "The field {} must be a string with a maximum length of {}.",
                    field, max
                ),
            );
            return false;
        }
        true
    }

    /// Required, bounded text field
    pub fn text(&mut self, field: &str, value: &str, max: usize) {
        if self.require(field, value) {
            self.max_length(field, value, max);
        }
    }

    /// Required, bounded, `local@domain` shaped address
    pub fn email(&mut self, field: &str, value: &str) {
        if !self.require(field, value) || !self.max_length(field, value, MAX_USER_FIELD_LEN) {
            return;
        }
        if !is_valid_email(value) {
            self.add(
                field,
                format!("The {} field is not a valid e-mail address.", field),
            );
        }
    }

    /// Finish validation: `Ok` when nothing was recorded
    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "{} ({})", VALIDATION_MESSAGE, fields.join(", "))
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_require() {
        let mut errors = ValidationErrors::new();
        assert!(errors.require("userName", "ann"));
        assert!(errors.is_empty());

        assert!(!errors.require("userName", "   "));
        assert_eq!(
            errors.field("userName"),
            Some(&["The userName field is required.".to_string()][..])
        );
    }

    #[test]
    fn test_max_length_counts_characters() {
        let mut errors = ValidationErrors::new();
        assert!(errors.max_length("blogTitle", &"é".repeat(50), 50));
        assert!(!errors.max_length("blogTitle", &"é".repeat(51), 50));
        assert_eq!(errors.field("blogTitle").map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_max_length_ignores_surrounding_whitespace() {
        let mut errors = ValidationErrors::new();
        let padded = format!("  {} ", "a".repeat(MAX_TITLE_FIELD_LEN));
        errors.text("blogTitle", &padded, MAX_TITLE_FIELD_LEN);
        assert!(errors.is_empty());

        errors.email("emailAddress", " ann@example.com ");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_text_reports_one_error_per_problem() {
        let mut errors = ValidationErrors::new();
        errors.text("blogTitle", "", 50);
        errors.text("blogAuthor", &"a".repeat(60), 50);
        errors.text("blogCategory", "Tech", 50);

        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["blogAuthor", "blogTitle"]);
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("a@b"));
        assert!(!is_valid_email("ann"));
        assert!(!is_valid_email("ann@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@b@c"));

        let mut errors = ValidationErrors::new();
        errors.email("emailAddress", "nope");
        assert!(errors.field("emailAddress").is_some());
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("content", "The content field is required.");
        assert!(matches!(
            errors.into_result(),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn test_serializes_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("userName", "too long");
        errors.add("userName", "also bad");

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value, serde_json::json!({"userName": ["too long", "also bad"]}));
    }

    proptest! {
        #[test]
        fn property_text_accepts_exactly_bounded_input(value in "[a-zA-Z0-9]{1,80}") {
            let mut errors = ValidationErrors::new();
            errors.text("articleTitle", &value, MAX_TITLE_FIELD_LEN);
            prop_assert_eq!(errors.is_empty(), value.chars().count() <= MAX_TITLE_FIELD_LEN);
        }

        #[test]
        fn property_whitespace_is_never_enough(value in "[ \t]{0,20}") {
            let mut errors = ValidationErrors::new();
            errors.text("comment", &value, 10);
            prop_assert!(errors.field("comment").is_some());
        }

        #[test]
        fn property_simple_addresses_are_valid(local in "[a-z0-9._]{1,20}", domain in "[a-z]{1,20}\\.[a-z]{2,5}") {
            let address = format!("{}@{}", local, domain);
            prop_assert!(is_valid_email(&address));
        }
    }
}
