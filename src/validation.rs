//! Validation System - Field Rules
//!
//! Rules check one raw field value and describe what they expected.
//! The schema decides which rules apply to which field; the first
//! failing rule aborts construction of the whole entity.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?1?\d{9,15}$").expect("BUG: invalid PHONE_RE regex literal")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("BUG: invalid EMAIL_RE regex literal")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?i:https?)://",
        r"(?:[^\s/?#@]+@)?",
        r"(?:\[[0-9A-Fa-f:.]+\]|[\p{L}\p{N}_](?:[\p{L}\p{N}_.-]*[\p{L}\p{N}_])?)",
        r"(?::\d{1,5})?(?:[/?#]\S*)?$",
    ))
    .expect("BUG: invalid URL_RE regex literal")
});

static YEAR_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}$").expect("BUG: invalid YEAR_MONTH_RE regex literal")
});

/// Literal accepted in place of an end (or start) month for ongoing ranges.
pub const PRESENT: &str = "Present";

/// A single broken constraint, tied to the entity and field it was found on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationViolation {
    /// Path of the entity, e.g. `Jobs.job1` or `General`.
    pub entity: String,
    pub field: String,
    pub rule: String,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {} (rule: {})", self.entity, self.field, self.message, self.rule)?;
        if let Some(expected) = &self.expected {
            write!(f, ", expected {}", expected)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required section: {0}")]
    MissingSection(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Malformed input at {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Validation failed: {0}")]
    Violation(ValidationViolation),
}

impl From<ValidationViolation> for ValidationError {
    fn from(v: ValidationViolation) -> Self {
        ValidationError::Violation(v)
    }
}

impl ValidationError {
    /// Structural errors mean the input shape was wrong, not a field value.
    pub fn is_structural(&self) -> bool {
        !matches!(self, ValidationError::Violation(_))
    }

    pub fn violation(&self) -> Option<&ValidationViolation> {
        match self {
            ValidationError::Violation(v) => Some(v),
            _ => None,
        }
    }
}

/// Why a rule rejected a value.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    pub message: String,
    pub expected: Option<String>,
}

impl RuleFailure {
    fn new(message: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: Some(expected.into()),
        }
    }
}

/// Field rule trait - checks one raw value
pub trait FieldRule {
    fn name(&self) -> &'static str;
    fn check(&self, value: &str) -> Result<(), RuleFailure>;
}

// --- Concrete Rules ---

pub struct NonEmpty;

impl FieldRule for NonEmpty {
    fn name(&self) -> &'static str { "non_empty" }

    fn check(&self, value: &str) -> Result<(), RuleFailure> {
        if value.is_empty() {
            Err(RuleFailure::new("Value must not be empty", "at least 1 character"))
        } else {
            Ok(())
        }
    }
}

pub struct MinLength(pub usize);

impl FieldRule for MinLength {
    fn name(&self) -> &'static str { "min_length" }

    fn check(&self, value: &str) -> Result<(), RuleFailure> {
        if value.chars().count() < self.0 {
            Err(RuleFailure::new(
                "Text is too short",
                format!("at least {} characters", self.0),
            ))
        } else {
            Ok(())
        }
    }
}

pub struct EmailAddress;

impl FieldRule for EmailAddress {
    fn name(&self) -> &'static str { "email" }

    fn check(&self, value: &str) -> Result<(), RuleFailure> {
        if EMAIL_RE.is_match(value) {
            Ok(())
        } else {
            Err(RuleFailure::new("Invalid email address", "local@domain.tld"))
        }
    }
}

pub struct AbsoluteUrl;

impl FieldRule for AbsoluteUrl {
    fn name(&self) -> &'static str { "url" }

    fn check(&self, value: &str) -> Result<(), RuleFailure> {
        if URL_RE.is_match(value) {
            Ok(())
        } else {
            Err(RuleFailure::new("Invalid URL", "absolute http(s) URL"))
        }
    }
}

pub struct PhoneNumber;

impl FieldRule for PhoneNumber {
    fn name(&self) -> &'static str { "phone" }

    fn check(&self, value: &str) -> Result<(), RuleFailure> {
        if PHONE_RE.is_match(value) {
            Ok(())
        } else {
            Err(RuleFailure::new(
                "Invalid phone number format",
                "optional '+', optional '1', then 9-15 digits",
            ))
        }
    }
}

pub struct YearMonth;

impl FieldRule for YearMonth {
    fn name(&self) -> &'static str { "year_month" }

    fn check(&self, value: &str) -> Result<(), RuleFailure> {
        if is_year_month(value) {
            Ok(())
        } else {
            Err(RuleFailure::new("Invalid date format. Use YYYY-MM", "YYYY-MM"))
        }
    }
}

pub struct YearMonthOrPresent;

impl FieldRule for YearMonthOrPresent {
    fn name(&self) -> &'static str { "year_month_or_present" }

    fn check(&self, value: &str) -> Result<(), RuleFailure> {
        if value == PRESENT || is_year_month(value) {
            Ok(())
        } else {
            Err(RuleFailure::new(
                "Invalid date format. Use YYYY-MM or \"Present\"",
                "YYYY-MM or Present",
            ))
        }
    }
}

pub struct GpaScale;

impl FieldRule for GpaScale {
    fn name(&self) -> &'static str { "gpa" }

    fn check(&self, value: &str) -> Result<(), RuleFailure> {
        match value.trim().parse::<f64>() {
            Ok(gpa) if gpa.is_finite() && (0.0..=4.0).contains(&gpa) => Ok(()),
            Ok(_) => Err(RuleFailure::new("GPA must be between 0.0 and 4.0", "0.0..=4.0")),
            Err(_) => Err(RuleFailure::new("Invalid GPA format", "decimal number")),
        }
    }
}

/// Case-sensitive membership in a fixed value set.
pub struct OneOf(pub &'static [&'static str]);

impl FieldRule for OneOf {
    fn name(&self) -> &'static str { "one_of" }

    fn check(&self, value: &str) -> Result<(), RuleFailure> {
        if self.0.contains(&value) {
            Ok(())
        } else {
            Err(RuleFailure::new(
                format!("Invalid value. Must be one of: {}", self.0.join(", ")),
                self.0.join(" | "),
            ))
        }
    }
}

/// Calendar months from year 1 onwards.
pub(crate) fn is_year_month(value: &str) -> bool {
    YEAR_MONTH_RE.is_match(value)
        && NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").is_ok_and(|d| d.year() >= 1)
}

/// Applies rules field by field for one entity, stopping at the first failure.
pub struct FieldCheck<'a> {
    entity: &'a str,
}

impl<'a> FieldCheck<'a> {
    pub fn new(entity: &'a str) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &str {
        self.entity
    }

    pub fn check(
        &self,
        field: &str,
        value: &str,
        rules: &[&dyn FieldRule],
    ) -> Result<(), ValidationViolation> {
        for rule in rules {
            if let Err(failure) = rule.check(value) {
                return Err(ValidationViolation {
                    entity: self.entity.to_string(),
                    field: field.to_string(),
                    rule: rule.name().to_string(),
                    message: failure.message,
                    expected: failure.expected,
                    actual: Some(value.to_string()),
                });
            }
        }
        Ok(())
    }

    /// Absent optional values always pass.
    pub fn check_opt(
        &self,
        field: &str,
        value: Option<&str>,
        rules: &[&dyn FieldRule],
    ) -> Result<(), ValidationViolation> {
        match value {
            Some(v) => self.check(field, v, rules),
            None => Ok(()),
        }
    }

    /// Violation not tied to a single rule, e.g. a wrong element count.
    pub fn violation(
        &self,
        field: &str,
        rule: &str,
        message: impl Into<String>,
        expected: Option<String>,
        actual: Option<String>,
    ) -> ValidationViolation {
        ValidationViolation {
            entity: self.entity.to_string(),
            field: field.to_string(),
            rule: rule.to_string(),
            message: message.into(),
            expected,
            actual,
        }
    }
}
