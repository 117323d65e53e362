//! Field-level validation for request bodies.
//!
//! Every rule records its failures into a [`Violations`] collector instead of
//! returning early, so a single request reports every broken constraint at once.
//! The per-resource inputs ([`CategoryInput`], [`RecipeInput`], [`ReviewInput`])
//! are the raw JSON bodies; they turn into the validated types in
//! [`crate::models`] through `into_new` (create) and `into_changes` (update).

mod category;
mod recipe;
mod review;

pub use category::CategoryInput;
pub use recipe::{IngredientInput, RecipeInput};
pub use review::ReviewInput;

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Which constraint a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum ViolationKind {
    MissingField,
    OutOfRange,
    InvalidEnumValue,
    InvalidFormat,
    EmptyCollection,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::MissingField => "MissingField",
            ViolationKind::OutOfRange => "OutOfRange",
            ViolationKind::InvalidEnumValue => "InvalidEnumValue",
            ViolationKind::InvalidFormat => "InvalidFormat",
            ViolationKind::EmptyCollection => "EmptyCollection",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `ingredients[1].unit`
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

/// All violations found in one submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summary(.violations))]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

fn summary(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn has(&self, field: &str, kind: ViolationKind) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.kind == kind)
    }
}

/// Collector the rules write into.
#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn push(&mut self, field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) {
        self.0.push(Violation {
            field: field.into(),
            kind,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_errors(self) -> ValidationErrors {
        ValidationErrors { violations: self.0 }
    }
}

/// Whether an absent field is a violation (create) or simply left alone (update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Trims a text field. Absent-but-required and blank values are `MissingField`.
pub fn text(
    v: &mut Violations,
    field: &str,
    raw: Option<String>,
    presence: Presence,
) -> Option<String> {
    match raw {
        None => {
            if presence == Presence::Required {
                v.push(field, ViolationKind::MissingField, format!("{field} is required"));
            }
            None
        }
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                v.push(
                    field,
                    ViolationKind::MissingField,
                    format!("{field} cannot be empty"),
                );
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}

/// Length bounds in characters, inclusive.
pub fn text_length(v: &mut Violations, field: &str, value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    if len < min {
        v.push(
            field,
            ViolationKind::OutOfRange,
            format!("{field} must be at least {min} characters long (got {len})"),
        );
        false
    } else if len > max {
        v.push(
            field,
            ViolationKind::OutOfRange,
            format!("{field} must be at most {max} characters long (got {len})"),
        );
        false
    } else {
        true
    }
}

/// Required-ness plus inclusive numeric bounds; returns the value narrowed to `i32`.
pub fn int_range(
    v: &mut Violations,
    field: &str,
    raw: Option<i64>,
    min: i32,
    max: i32,
    presence: Presence,
) -> Option<i32> {
    let value = match raw {
        Some(value) => value,
        None => {
            if presence == Presence::Required {
                v.push(field, ViolationKind::MissingField, format!("{field} is required"));
            }
            return None;
        }
    };

    if value < i64::from(min) {
        v.push(
            field,
            ViolationKind::OutOfRange,
            format!("{field} must be at least {min} (got {value})"),
        );
        None
    } else if value > i64::from(max) {
        v.push(
            field,
            ViolationKind::OutOfRange,
            format!("{field} must be at most {max} (got {value})"),
        );
        None
    } else {
        i32::try_from(value).ok()
    }
}

/// Exact, case-sensitive match against an enumerated set.
pub fn one_of<T>(
    v: &mut Violations,
    field: &str,
    value: &str,
    allowed: &[T],
    name_of: fn(T) -> &'static str,
) -> Option<T>
where
    T: Copy,
{
    if let Some(found) = allowed.iter().copied().find(|item| name_of(*item) == value) {
        return Some(found);
    }

    let names: Vec<&str> = allowed.iter().map(|item| name_of(*item)).collect();
    v.push(
        field,
        ViolationKind::InvalidEnumValue,
        format!(
            "'{value}' is not a valid {field}; expected one of: {}",
            names.join(", ")
        ),
    );
    None
}

/// Every character must satisfy `allowed`.
pub fn charset(
    v: &mut Violations,
    field: &str,
    value: &str,
    allowed: fn(char) -> bool,
    description: &str,
) -> bool {
    if value.chars().all(allowed) {
        true
    } else {
        v.push(
            field,
            ViolationKind::InvalidFormat,
            format!("{field} may only contain {description}"),
        );
        false
    }
}

pub fn non_empty<T>(v: &mut Violations, field: &str, items: &[T]) -> bool {
    if items.is_empty() {
        v.push(
            field,
            ViolationKind::EmptyCollection,
            format!("{field} must contain at least one entry"),
        );
        false
    } else {
        true
    }
}

/// A reference to another entity, carried as text in the body.
pub fn identifier(
    v: &mut Violations,
    field: &str,
    raw: Option<String>,
    presence: Presence,
) -> Option<Uuid> {
    let raw = text(v, field, raw, presence)?;
    match Uuid::parse_str(&raw) {
        Ok(id) => Some(id),
        Err(_) => {
            v.push(
                field,
                ViolationKind::InvalidFormat,
                format!("'{raw}' is not a valid identifier for {field}"),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_trims_and_requires() {
        let mut v = Violations::default();
        assert_eq!(
            text(&mut v, "name", Some("  Soup  ".to_string()), Presence::Required),
            Some("Soup".to_string())
        );
        assert!(v.is_empty());

        assert_eq!(text(&mut v, "name", Some("   ".to_string()), Presence::Required), None);
        assert_eq!(text(&mut v, "title", None, Presence::Required), None);
        assert_eq!(text(&mut v, "comment", None, Presence::Optional), None);

        let errors = v.into_errors();
        assert_eq!(errors.violations().len(), 2);
        assert!(errors.has("name", ViolationKind::MissingField));
        assert!(errors.has("title", ViolationKind::MissingField));
    }

    #[test]
    fn test_text_length_reports_violated_bound() {
        let mut v = Violations::default();
        assert!(text_length(&mut v, "name", "ab", 2, 30));
        assert!(!text_length(&mut v, "name", "a", 2, 30));
        assert!(!text_length(&mut v, "name", &"x".repeat(31), 2, 30));

        let errors = v.into_errors();
        assert!(errors.violations()[0].message.contains("at least 2"));
        assert!(errors.violations()[1].message.contains("at most 30"));
    }

    #[test]
    fn test_text_length_counts_characters_not_bytes() {
        let mut v = Violations::default();
        // 3 characters, 6 bytes
        assert!(text_length(&mut v, "title", "été", 3, 3));
        assert!(v.is_empty());
    }

    #[test]
    fn test_int_range_bounds_are_inclusive() {
        let mut v = Violations::default();
        assert_eq!(int_range(&mut v, "rating", Some(1), 1, 5, Presence::Required), Some(1));
        assert_eq!(int_range(&mut v, "rating", Some(5), 1, 5, Presence::Required), Some(5));
        assert_eq!(int_range(&mut v, "rating", Some(0), 1, 5, Presence::Required), None);
        assert_eq!(int_range(&mut v, "rating", Some(6), 1, 5, Presence::Required), None);
        assert_eq!(int_range(&mut v, "rating", None, 1, 5, Presence::Optional), None);

        let errors = v.into_errors();
        assert_eq!(errors.violations().len(), 2);
        assert!(errors
            .violations()
            .iter()
            .all(|v| v.kind == ViolationKind::OutOfRange));
    }

    #[test]
    fn test_int_range_handles_huge_values() {
        let mut v = Violations::default();
        assert_eq!(
            int_range(&mut v, "prepTime", Some(i64::MAX), 0, 1440, Presence::Required),
            None
        );
        assert!(v.into_errors().has("prepTime", ViolationKind::OutOfRange));
    }

    #[test]
    fn test_one_of_names_value_and_allowed_set() {
        let mut v = Violations::default();
        let allowed = crate::models::Difficulty::ALL;
        let name_of: fn(crate::models::Difficulty) -> &'static str =
            crate::models::Difficulty::as_str;

        assert!(one_of(&mut v, "difficulty", "Hard", &allowed, name_of).is_some());
        assert!(one_of(&mut v, "difficulty", "hard", &allowed, name_of).is_none());

        let errors = v.into_errors();
        let message = &errors.violations()[0].message;
        assert!(message.contains("'hard'"));
        assert!(message.contains("Easy, Medium, Hard"));
    }

    #[test]
    fn test_charset_and_non_empty() {
        let mut v = Violations::default();
        let allowed = |c: char| c.is_ascii_alphanumeric();
        assert!(charset(&mut v, "name", "abc123", allowed, "letters"));
        assert!(!charset(&mut v, "name", "abc!", allowed, "letters"));
        assert!(non_empty(&mut v, "steps", &[1]));
        assert!(!non_empty::<i32>(&mut v, "steps", &[]));

        let errors = v.into_errors();
        assert!(errors.has("name", ViolationKind::InvalidFormat));
        assert!(errors.has("steps", ViolationKind::EmptyCollection));
    }

    #[test]
    fn test_identifier_parses_uuid() {
        let mut v = Violations::default();
        let id = Uuid::new_v4();
        assert_eq!(
            identifier(&mut v, "recipeId", Some(format!(" {id} ")), Presence::Required),
            Some(id)
        );
        assert_eq!(
            identifier(&mut v, "recipeId", Some("nope".to_string()), Presence::Required),
            None
        );
        assert!(v.into_errors().has("recipeId", ViolationKind::InvalidFormat));
    }

    #[test]
    fn test_errors_display_joins_messages() {
        let mut v = Violations::default();
        v.push("a", ViolationKind::MissingField, "a is required");
        v.push("b", ViolationKind::MissingField, "b is required");
        assert_eq!(
            v.into_errors().to_string(),
            "validation failed: a is required; b is required"
        );
    }
}
