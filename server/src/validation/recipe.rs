use super::{
    identifier, int_range, non_empty, one_of, text, text_length, Presence, ValidationErrors,
    ViolationKind, Violations,
};
use crate::models::{Difficulty, Ingredient, NewRecipe, RecipeChanges, Unit};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub const TITLE_LEN: (usize, usize) = (3, 100);
pub const STEP_MIN_LEN: usize = 10;
/// Prep and cook times are minutes within one day.
pub const MINUTES: (i32, i32) = (0, 1440);

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInput {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub unit: Option<String>,
}

/// Request body for creating or updating a recipe.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    pub title: Option<String>,
    pub category_id: Option<String>,
    pub ingredients: Option<Vec<IngredientInput>>,
    pub instructions: Option<Vec<String>>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub difficulty: Option<String>,
}

struct Checked {
    title: Option<String>,
    category_id: Option<Uuid>,
    ingredients: Option<Vec<Ingredient>>,
    instructions: Option<Vec<String>>,
    prep_time: Option<i32>,
    cook_time: Option<i32>,
    difficulty: Option<Difficulty>,
}

impl RecipeInput {
    /// `require_category` decides whether a recipe may be filed without a category.
    pub fn into_new(self, require_category: bool) -> Result<NewRecipe, ValidationErrors> {
        let mut v = Violations::default();
        let category_presence = if require_category {
            Presence::Required
        } else {
            Presence::Optional
        };
        let checked = self.check(&mut v, Presence::Required, category_presence);

        match checked {
            Checked {
                title: Some(title),
                category_id,
                ingredients: Some(ingredients),
                instructions: Some(instructions),
                prep_time: Some(prep_time),
                cook_time: Some(cook_time),
                difficulty: Some(difficulty),
            } if v.is_empty() => Ok(NewRecipe {
                title,
                category_id,
                ingredients,
                instructions,
                prep_time,
                cook_time,
                difficulty,
            }),
            _ => Err(v.into_errors()),
        }
    }

    pub fn into_changes(self) -> Result<RecipeChanges, ValidationErrors> {
        let mut v = Violations::default();
        let checked = self.check(&mut v, Presence::Optional, Presence::Optional);

        if !v.is_empty() {
            return Err(v.into_errors());
        }

        Ok(RecipeChanges {
            title: checked.title,
            category_id: checked.category_id,
            ingredients: checked.ingredients,
            instructions: checked.instructions,
            prep_time: checked.prep_time,
            cook_time: checked.cook_time,
            difficulty: checked.difficulty,
        })
    }

    fn check(self, v: &mut Violations, presence: Presence, category_presence: Presence) -> Checked {
        let title = text(v, "title", self.title, presence)
            .filter(|title| text_length(v, "title", title, TITLE_LEN.0, TITLE_LEN.1));

        let category_id = identifier(v, "categoryId", self.category_id, category_presence);

        let ingredients = collection(v, "ingredients", self.ingredients, presence)
            .and_then(|items| check_ingredients(v, items));

        let instructions = collection(v, "instructions", self.instructions, presence)
            .and_then(|steps| check_instructions(v, steps));

        let prep_time = int_range(v, "prepTime", self.prep_time, MINUTES.0, MINUTES.1, presence);
        let cook_time = int_range(v, "cookTime", self.cook_time, MINUTES.0, MINUTES.1, presence);

        let difficulty = text(v, "difficulty", self.difficulty, presence)
            .and_then(|d| one_of(v, "difficulty", &d, &Difficulty::ALL, Difficulty::as_str));

        Checked {
            title,
            category_id,
            ingredients,
            instructions,
            prep_time,
            cook_time,
            difficulty,
        }
    }
}

fn collection<T>(
    v: &mut Violations,
    field: &str,
    raw: Option<Vec<T>>,
    presence: Presence,
) -> Option<Vec<T>> {
    match raw {
        Some(items) => non_empty(v, field, &items).then_some(items),
        None => {
            if presence == Presence::Required {
                v.push(field, ViolationKind::MissingField, format!("{field} is required"));
            }
            None
        }
    }
}

fn check_ingredients(v: &mut Violations, items: Vec<IngredientInput>) -> Option<Vec<Ingredient>> {
    let mut ingredients = Vec::with_capacity(items.len());
    let mut complete = true;

    for (i, item) in items.into_iter().enumerate() {
        let name = text(v, &format!("ingredients[{i}].name"), item.name, Presence::Required);
        let amount = text(v, &format!("ingredients[{i}].amount"), item.amount, Presence::Required);
        let unit_field = format!("ingredients[{i}].unit");
        let unit = text(v, &unit_field, item.unit, Presence::Required)
            .and_then(|u| one_of(v, &unit_field, &u, &Unit::ALL, Unit::as_str));

        match (name, amount, unit) {
            (Some(name), Some(amount), Some(unit)) => {
                ingredients.push(Ingredient { name, amount, unit })
            }
            _ => complete = false,
        }
    }

    complete.then_some(ingredients)
}

fn check_instructions(v: &mut Violations, steps: Vec<String>) -> Option<Vec<String>> {
    let mut instructions = Vec::with_capacity(steps.len());
    let mut complete = true;

    for (i, step) in steps.into_iter().enumerate() {
        let field = format!("instructions[{i}]");
        match text(v, &field, Some(step), Presence::Required) {
            Some(step) if step.chars().count() >= STEP_MIN_LEN => instructions.push(step),
            Some(step) => {
                v.push(
                    &field,
                    ViolationKind::OutOfRange,
                    format!(
                        "{field} must be at least {STEP_MIN_LEN} characters long (got {})",
                        step.chars().count()
                    ),
                );
                complete = false;
            }
            None => complete = false,
        }
    }

    complete.then_some(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> RecipeInput {
        serde_json::from_value(value).unwrap()
    }

    fn pancakes() -> serde_json::Value {
        json!({
            "title": "Classic Pancakes",
            "categoryId": Uuid::new_v4().to_string(),
            "ingredients": [
                {"name": "flour", "amount": "2", "unit": "cups"},
                {"name": "salt", "amount": "1", "unit": "to taste"}
            ],
            "instructions": ["Mix dry ingredients", "Cook on griddle until golden brown"],
            "prepTime": 10,
            "cookTime": 15,
            "difficulty": "Easy"
        })
    }

    #[test]
    fn test_valid_recipe() {
        let recipe = parse(pancakes()).into_new(true).unwrap();
        assert_eq!(recipe.title, "Classic Pancakes");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[1].unit, Unit::ToTaste);
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert!(recipe.category_id.is_some());
    }

    #[test]
    fn test_empty_ingredients_rejected() {
        let mut body = pancakes();
        body["ingredients"] = json!([]);
        body["instructions"] = json!(["Mix"]);

        let errors = parse(body).into_new(true).unwrap_err();
        assert!(errors.has("ingredients", ViolationKind::EmptyCollection));
        assert!(errors.has("instructions[0]", ViolationKind::OutOfRange));
    }

    #[test]
    fn test_empty_instructions_rejected() {
        let mut body = pancakes();
        body["instructions"] = json!([]);

        let errors = parse(body).into_new(true).unwrap_err();
        assert!(errors.has("instructions", ViolationKind::EmptyCollection));
    }

    #[test]
    fn test_category_requirement_is_configurable() {
        let mut body = pancakes();
        body.as_object_mut().unwrap().remove("categoryId");

        let errors = parse(body.clone()).into_new(true).unwrap_err();
        assert!(errors.has("categoryId", ViolationKind::MissingField));

        let recipe = parse(body).into_new(false).unwrap();
        assert_eq!(recipe.category_id, None);
    }

    #[test]
    fn test_malformed_category_id() {
        let mut body = pancakes();
        body["categoryId"] = json!("not-an-id");

        let errors = parse(body).into_new(false).unwrap_err();
        assert!(errors.has("categoryId", ViolationKind::InvalidFormat));
    }

    #[test]
    fn test_every_violation_is_reported() {
        let errors = parse(json!({
            "title": "Hi",
            "ingredients": [{"name": "", "amount": "1", "unit": "handful"}],
            "instructions": ["Stir well until smooth"],
            "prepTime": -1,
            "cookTime": 2000,
            "difficulty": "Impossible"
        }))
        .into_new(false)
        .unwrap_err();

        assert!(errors.has("title", ViolationKind::OutOfRange));
        assert!(errors.has("ingredients[0].name", ViolationKind::MissingField));
        assert!(errors.has("ingredients[0].unit", ViolationKind::InvalidEnumValue));
        assert!(errors.has("prepTime", ViolationKind::OutOfRange));
        assert!(errors.has("cookTime", ViolationKind::OutOfRange));
        assert!(errors.has("difficulty", ViolationKind::InvalidEnumValue));
        assert_eq!(errors.violations().len(), 6);
    }

    #[test]
    fn test_missing_everything() {
        let errors = RecipeInput::default().into_new(true).unwrap_err();
        for field in [
            "title",
            "categoryId",
            "ingredients",
            "instructions",
            "prepTime",
            "cookTime",
            "difficulty",
        ] {
            assert!(errors.has(field, ViolationKind::MissingField), "{field}");
        }
    }

    #[test]
    fn test_changes_only_touch_supplied_fields() {
        let changes = parse(json!({"cookTime": 30, "difficulty": "Hard"}))
            .into_changes()
            .unwrap();
        assert_eq!(changes.cook_time, Some(30));
        assert_eq!(changes.difficulty, Some(Difficulty::Hard));
        assert_eq!(changes.title, None);
        assert_eq!(changes.ingredients, None);
    }

    #[test]
    fn test_changes_still_reject_empty_collections() {
        let errors = parse(json!({"ingredients": []})).into_changes().unwrap_err();
        assert!(errors.has("ingredients", ViolationKind::EmptyCollection));
    }
}
