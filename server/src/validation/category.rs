use super::{charset, text, text_length, Presence, ValidationErrors, Violations};
use crate::models::{CategoryChanges, NewCategory};
use serde::Deserialize;
use utoipa::ToSchema;

pub const NAME_LEN: (usize, usize) = (2, 30);
pub const DESCRIPTION_LEN: (usize, usize) = (10, 200);

/// Request body for creating or updating a category.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '-'
}

impl CategoryInput {
    pub fn into_new(self) -> Result<NewCategory, ValidationErrors> {
        let mut v = Violations::default();
        let (name, description) = self.check(&mut v, Presence::Required);

        match (name, description) {
            (Some(name), Some(description)) if v.is_empty() => Ok(NewCategory { name, description }),
            _ => Err(v.into_errors()),
        }
    }

    pub fn into_changes(self) -> Result<CategoryChanges, ValidationErrors> {
        let mut v = Violations::default();
        let (name, description) = self.check(&mut v, Presence::Optional);

        if v.is_empty() {
            Ok(CategoryChanges { name, description })
        } else {
            Err(v.into_errors())
        }
    }

    fn check(self, v: &mut Violations, presence: Presence) -> (Option<String>, Option<String>) {
        let name = text(v, "name", self.name, presence).filter(|name| {
            let sized = text_length(v, "name", name, NAME_LEN.0, NAME_LEN.1);
            let formed = charset(
                v,
                "name",
                name,
                name_char,
                "letters, digits, spaces and hyphens",
            );
            sized && formed
        });

        let description = text(v, "description", self.description, presence).filter(|d| {
            text_length(v, "description", d, DESCRIPTION_LEN.0, DESCRIPTION_LEN.1)
        });

        (name, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ViolationKind;

    fn input(name: Option<&str>, description: Option<&str>) -> CategoryInput {
        CategoryInput {
            name: name.map(str::to_string),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_category_is_trimmed() {
        let new = input(Some("  Breakfast "), Some(" Morning meals and more  "))
            .into_new()
            .unwrap();
        assert_eq!(new.name, "Breakfast");
        assert_eq!(new.description, "Morning meals and more");
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let errors = input(None, Some("  ")).into_new().unwrap_err();
        assert!(errors.has("name", ViolationKind::MissingField));
        assert!(errors.has("description", ViolationKind::MissingField));
    }

    #[test]
    fn test_name_format_and_length_collected_together() {
        let errors = input(Some("!"), Some("short")).into_new().unwrap_err();
        assert!(errors.has("name", ViolationKind::OutOfRange));
        assert!(errors.has("name", ViolationKind::InvalidFormat));
        assert!(errors.has("description", ViolationKind::OutOfRange));
        assert_eq!(errors.violations().len(), 3);
    }

    #[test]
    fn test_name_allows_spaces_and_hyphens() {
        assert!(input(Some("Main Dishes"), Some("Hearty and satisfying"))
            .into_new()
            .is_ok());
        assert!(input(Some("Gluten-free 2"), Some("Hearty and satisfying"))
            .into_new()
            .is_ok());
        assert!(input(Some("Soups & Stews"), Some("Hearty and satisfying"))
            .into_new()
            .is_err());
    }

    #[test]
    fn test_changes_keep_absent_fields_absent() {
        let changes = input(None, Some("A brand new description")).into_changes().unwrap();
        assert_eq!(changes.name, None);
        assert_eq!(changes.description.as_deref(), Some("A brand new description"));

        assert!(input(None, None).into_changes().unwrap().is_empty());
    }

    #[test]
    fn test_changes_reject_blank_name() {
        let errors = input(Some("   "), None).into_changes().unwrap_err();
        assert!(errors.has("name", ViolationKind::MissingField));
    }

    #[test]
    fn test_created_at_in_body_is_ignored() {
        let input: CategoryInput = serde_json::from_str(
            r#"{"name": "Desserts", "description": "Sweet treats", "createdAt": "2001-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let changes = input.into_changes().unwrap();
        assert_eq!(changes.name.as_deref(), Some("Desserts"));
    }
}
