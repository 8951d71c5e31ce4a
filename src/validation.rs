//! Length rules for the two editable page fields.
//!
//! Lengths are counted in chars (Unicode scalar values), so a title made of
//! fifty accented letters passes even though it is longer than fifty bytes.

use std::fmt;

use thiserror::Error;

/// One of the two editable fields of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Body,
}

impl Field {
    pub const ALL: [Self; 2] = [Self::Title, Self::Body];

    /// Lowercase name used in messages and on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Body => "body",
        }
    }

    /// The other field.
    pub const fn other(self) -> Self {
        match self {
            Self::Title => Self::Body,
            Self::Body => Self::Title,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failed length check, carrying the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

/// Inclusive length bounds for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRule {
    pub min: usize,
    pub max: usize,
}

impl LengthRule {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Check `value` against the bounds, reporting failures against `field`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `value` is shorter than `min` or
    /// longer than `max` chars.
    pub fn check(&self, field: Field, value: &str) -> Result<(), ValidationError> {
        let len = value.chars().count();
        if len < self.min {
            return Err(ValidationError {
                field,
                message: format!(
                    "{field} must be at least {} {}",
                    self.min,
                    characters(self.min)
                ),
            });
        }
        if len > self.max {
            return Err(ValidationError {
                field,
                message: format!(
                    "{field} must be at most {} {}",
                    self.max,
                    characters(self.max)
                ),
            });
        }
        Ok(())
    }
}

const fn characters(count: usize) -> &'static str {
    if count == 1 { "character" } else { "characters" }
}

/// The rule set for both fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub title: LengthRule,
    pub body: LengthRule,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            title: LengthRule::new(1, 50),
            body: LengthRule::new(10, 2000),
        }
    }
}

impl Rules {
    pub const fn rule(&self, field: Field) -> LengthRule {
        match field {
            Field::Title => self.title,
            Field::Body => self.body,
        }
    }

    /// Validate `value` as the given field.
    ///
    /// # Errors
    ///
    /// Returns the field's [`ValidationError`] when the length is out of bounds.
    pub fn validate(&self, field: Field, value: &str) -> Result<(), ValidationError> {
        self.rule(field).check(field, value)
    }
}

/// Validate against the default rules.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the length is out of bounds.
pub fn validate(field: Field, value: &str) -> Result<(), ValidationError> {
    Rules::default().validate(field, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn message(field: Field, value: &str) -> Option<String> {
        validate(field, value).err().map(|e| e.message)
    }

    #[test]
    fn test_title_boundaries_pass() {
        assert!(validate(Field::Title, "a").is_ok());
        assert!(validate(Field::Title, &"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        assert_eq!(
            message(Field::Title, ""),
            Some("title must be at least 1 character".to_string())
        );
    }

    #[test]
    fn test_long_title_rejected() {
        assert_eq!(
            message(Field::Title, &"a".repeat(51)),
            Some("title must be at most 50 characters".to_string())
        );
    }

    #[test]
    fn test_body_boundaries_pass() {
        assert!(validate(Field::Body, &"a".repeat(10)).is_ok());
        assert!(validate(Field::Body, &"a".repeat(2000)).is_ok());
    }

    #[test]
    fn test_short_body_rejected() {
        assert_eq!(
            message(Field::Body, "short"),
            Some("body must be at least 10 characters".to_string())
        );
    }

    #[test]
    fn test_long_body_rejected() {
        assert_eq!(
            message(Field::Body, &"a".repeat(2001)),
            Some("body must be at most 2000 characters".to_string())
        );
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        let title = "é".repeat(50);
        assert!(title.len() > 50);
        assert!(validate(Field::Title, &title).is_ok());

        let body = "日本語のテキスト本文です";
        assert!(body.chars().count() >= 10);
        assert!(validate(Field::Body, body).is_ok());
    }

    #[test]
    fn test_error_reports_field() {
        let err = validate(Field::Body, "").unwrap_err();
        assert_eq!(err.field, Field::Body);
        assert_eq!(err.to_string(), err.message);
    }

    #[test]
    fn test_custom_rules_are_used() {
        let rules = Rules {
            title: LengthRule::new(3, 5),
            ..Rules::default()
        };
        assert_eq!(
            rules.validate(Field::Title, "ab").unwrap_err().message,
            "title must be at least 3 characters"
        );
        assert!(rules.validate(Field::Title, "abcde").is_ok());
    }

    proptest! {
        #[test]
        fn prop_titles_within_bounds_pass(title in "\\PC{1,50}") {
            prop_assert!(validate(Field::Title, &title).is_ok());
        }

        #[test]
        fn prop_titles_over_max_fail(title in "\\PC{51,80}") {
            prop_assert_eq!(
                message(Field::Title, &title),
                Some("title must be at most 50 characters".to_string())
            );
        }

        #[test]
        fn prop_bodies_within_bounds_pass(body in "\\PC{10,300}") {
            prop_assert!(validate(Field::Body, &body).is_ok());
        }

        #[test]
        fn prop_bodies_under_min_fail(body in "\\PC{0,9}") {
            prop_assert_eq!(
                message(Field::Body, &body),
                Some("body must be at least 10 characters".to_string())
            );
        }
    }
}
