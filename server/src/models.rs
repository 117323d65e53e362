use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Queryable, Selectable, Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub category_id: Option<Uuid>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    /// Minutes
    pub prep_time: i32,
    /// Minutes
    pub cook_time: i32,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

// Ingredient structure for JSONB storage
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    pub unit: Unit,
}

/// Measuring units accepted for an ingredient.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Cups,
    Tablespoons,
    Teaspoons,
    Ounces,
    Pounds,
    Grams,
    Pieces,
    #[serde(rename = "to taste")]
    ToTaste,
}

impl Unit {
    pub const ALL: [Unit; 8] = [
        Unit::Cups,
        Unit::Tablespoons,
        Unit::Teaspoons,
        Unit::Ounces,
        Unit::Pounds,
        Unit::Grams,
        Unit::Pieces,
        Unit::ToTaste,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Cups => "cups",
            Unit::Tablespoons => "tablespoons",
            Unit::Teaspoons => "teaspoons",
            Unit::Ounces => "ounces",
            Unit::Pounds => "pounds",
            Unit::Grams => "grams",
            Unit::Pieces => "pieces",
            Unit::ToTaste => "to taste",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == name)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Validated inputs. Text is already trimmed and every field has passed its rules.

#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(description) = self.description {
            category.description = description;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub category_id: Option<Uuid>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub prep_time: i32,
    pub cook_time: i32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub category_id: Option<Uuid>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<String>>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub difficulty: Option<Difficulty>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category_id.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.prep_time.is_none()
            && self.cook_time.is_none()
            && self.difficulty.is_none()
    }

    pub fn apply(self, recipe: &mut Recipe) {
        if let Some(title) = self.title {
            recipe.title = title;
        }
        if let Some(category_id) = self.category_id {
            recipe.category_id = Some(category_id);
        }
        if let Some(ingredients) = self.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(instructions) = self.instructions {
            recipe.instructions = instructions;
        }
        if let Some(prep_time) = self.prep_time {
            recipe.prep_time = prep_time;
        }
        if let Some(cook_time) = self.cook_time {
            recipe.cook_time = cook_time;
        }
        if let Some(difficulty) = self.difficulty {
            recipe.difficulty = difficulty;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub recipe_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewChanges {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

impl ReviewChanges {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.comment.is_none()
    }

    pub fn apply(self, review: &mut Review) {
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(comment) = self.comment {
            review.comment = comment;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_wire_names_match_as_str() {
        for unit in Unit::ALL {
            assert_eq!(serde_json::to_value(unit).unwrap(), unit.as_str());
        }
    }

    #[test]
    fn test_unit_serializes_to_taste_with_space() {
        let json = serde_json::to_string(&Unit::ToTaste).unwrap();
        assert_eq!(json, "\"to taste\"");
    }

    #[test]
    fn test_recipe_serializes_camel_case() {
        let recipe = Recipe {
            id: Uuid::new_v4(),
            title: "Pancakes".to_string(),
            category_id: None,
            ingredients: vec![Ingredient {
                name: "flour".to_string(),
                amount: "2".to_string(),
                unit: Unit::Cups,
            }],
            instructions: vec!["Mix everything together".to_string()],
            prep_time: 5,
            cook_time: 10,
            difficulty: Difficulty::Easy,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["prepTime"], 5);
        assert_eq!(value["cookTime"], 10);
        assert_eq!(value["difficulty"], "Easy");
        assert!(value.get("createdAt").is_some());
        assert!(value["categoryId"].is_null());
    }

    #[test]
    fn test_review_changes_leave_other_fields_alone() {
        let mut review = Review {
            id: Uuid::new_v4(),
            recipe_id: Uuid::new_v4(),
            rating: 3,
            comment: "Pretty good".to_string(),
            user_name: "ChefJohn".to_string(),
            created_at: Utc::now(),
        };
        let before = review.clone();

        ReviewChanges {
            rating: Some(5),
            comment: None,
        }
        .apply(&mut review);

        assert_eq!(review.rating, 5);
        assert_eq!(review.comment, before.comment);
        assert_eq!(review.created_at, before.created_at);
    }
}
