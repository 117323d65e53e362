use super::{identifier, int_range, text, text_length, Presence, ValidationErrors, Violations};
use crate::models::{NewReview, ReviewChanges};
use serde::Deserialize;
use utoipa::ToSchema;

pub const RATING: (i32, i32) = (1, 5);
pub const COMMENT_LEN: (usize, usize) = (5, 500);
pub const USER_NAME_LEN: (usize, usize) = (2, 50);

/// Request body for creating or updating a review.
///
/// Updates only look at `rating` and `comment`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub recipe_id: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub user_name: Option<String>,
}

impl ReviewInput {
    pub fn into_new(self) -> Result<NewReview, ValidationErrors> {
        let mut v = Violations::default();

        let recipe_id = identifier(&mut v, "recipeId", self.recipe_id, Presence::Required);
        let rating = int_range(&mut v, "rating", self.rating, RATING.0, RATING.1, Presence::Required);
        let comment = check_comment(&mut v, self.comment, Presence::Required);
        let user_name = text(&mut v, "userName", self.user_name, Presence::Required)
            .filter(|u| text_length(&mut v, "userName", u, USER_NAME_LEN.0, USER_NAME_LEN.1));

        match (recipe_id, rating, comment, user_name) {
            (Some(recipe_id), Some(rating), Some(comment), Some(user_name)) if v.is_empty() => {
                Ok(NewReview {
                    recipe_id,
                    rating,
                    comment,
                    user_name,
                })
            }
            _ => Err(v.into_errors()),
        }
    }

    pub fn into_changes(self) -> Result<ReviewChanges, ValidationErrors> {
        let mut v = Violations::default();

        let rating = int_range(&mut v, "rating", self.rating, RATING.0, RATING.1, Presence::Optional);
        let comment = check_comment(&mut v, self.comment, Presence::Optional);

        if v.is_empty() {
            Ok(ReviewChanges { rating, comment })
        } else {
            Err(v.into_errors())
        }
    }
}

fn check_comment(v: &mut Violations, raw: Option<String>, presence: Presence) -> Option<String> {
    text(v, "comment", raw, presence)
        .filter(|c| text_length(v, "comment", c, COMMENT_LEN.0, COMMENT_LEN.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ViolationKind;
    use serde_json::json;
    use uuid::Uuid;

    fn parse(value: serde_json::Value) -> ReviewInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_review() {
        let recipe_id = Uuid::new_v4();
        let review = parse(json!({
            "recipeId": recipe_id.to_string(),
            "rating": 5,
            "comment": "Absolutely delicious! Will make again.",
            "userName": " FoodLover1 "
        }))
        .into_new()
        .unwrap();

        assert_eq!(review.recipe_id, recipe_id);
        assert_eq!(review.user_name, "FoodLover1");
    }

    #[test]
    fn test_invalid_review_collects_all() {
        let errors = parse(json!({
            "rating": 9,
            "comment": "meh",
            "userName": "x"
        }))
        .into_new()
        .unwrap_err();

        assert!(errors.has("recipeId", ViolationKind::MissingField));
        assert!(errors.has("rating", ViolationKind::OutOfRange));
        assert!(errors.has("comment", ViolationKind::OutOfRange));
        assert!(errors.has("userName", ViolationKind::OutOfRange));
    }

    #[test]
    fn test_comment_upper_bound() {
        let errors = parse(json!({"comment": "a".repeat(501)}))
            .into_changes()
            .unwrap_err();
        assert!(errors.has("comment", ViolationKind::OutOfRange));
    }

    #[test]
    fn test_changes_ignore_recipe_and_user() {
        let changes = parse(json!({
            "recipeId": "garbage",
            "userName": "",
            "rating": 2
        }))
        .into_changes()
        .unwrap();

        assert_eq!(changes.rating, Some(2));
        assert_eq!(changes.comment, None);
    }
}
