use crate::client::{ApiClient, Created};
use anyhow::{Context, Result};
use serde_json::json;

const SAMPLE_CATEGORIES: &[(&str, &str)] = &[
    (
        "Breakfast",
        "Start your day with these delicious breakfast recipes",
    ),
    ("Main Dishes", "Hearty and satisfying main course recipes"),
    (
        "Desserts",
        "Sweet treats and dessert recipes for any occasion",
    ),
    ("Appetizers", "Perfect starters and party snacks"),
    ("Vegetarian", "Delicious meat-free recipes for everyone"),
    (
        "Quick Meals",
        "Fast and easy recipes ready in 30 minutes or less",
    ),
];

struct SeedRecipe {
    title: &'static str,
    category: &'static str,
    ingredients: &'static [(&'static str, &'static str, &'static str)], // (name, amount, unit)
    instructions: &'static [&'static str],
    prep_time: u32,
    cook_time: u32,
    difficulty: &'static str,
}

const SAMPLE_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        title: "Classic Pancakes",
        category: "Breakfast",
        ingredients: &[
            ("flour", "2", "cups"),
            ("milk", "1", "cups"),
            ("eggs", "2", "pieces"),
        ],
        instructions: &[
            "Mix dry ingredients",
            "Combine with wet ingredients",
            "Cook on griddle until golden brown",
        ],
        prep_time: 10,
        cook_time: 15,
        difficulty: "Easy",
    },
    SeedRecipe {
        title: "Spaghetti Carbonara",
        category: "Main Dishes",
        ingredients: &[
            ("spaghetti", "1", "pounds"),
            ("eggs", "3", "pieces"),
            ("parmesan", "1", "cups"),
        ],
        instructions: &[
            "Boil pasta according to package",
            "Prepare sauce with eggs and cheese",
            "Combine and serve hot",
        ],
        prep_time: 15,
        cook_time: 20,
        difficulty: "Medium",
    },
    SeedRecipe {
        title: "Banana Bread",
        category: "Desserts",
        ingredients: &[
            ("ripe bananas", "3", "pieces"),
            ("butter", "1/3", "cups"),
            ("sugar", "3/4", "cups"),
            ("all-purpose flour", "1.5", "cups"),
            ("salt", "1", "to taste"),
        ],
        instructions: &[
            "Mash the bananas until smooth",
            "Stir in melted butter, sugar and egg",
            "Fold in flour until just combined",
            "Bake at 350F for about an hour",
        ],
        prep_time: 15,
        cook_time: 60,
        difficulty: "Easy",
    },
    SeedRecipe {
        title: "Stuffed Mushrooms",
        category: "Appetizers",
        ingredients: &[
            ("button mushrooms", "12", "pieces"),
            ("cream cheese", "4", "ounces"),
            ("parmesan", "2", "tablespoons"),
        ],
        instructions: &[
            "Remove and chop the mushroom stems",
            "Mix stems with cheeses and garlic",
            "Fill caps and bake until golden",
        ],
        prep_time: 15,
        cook_time: 20,
        difficulty: "Easy",
    },
    SeedRecipe {
        title: "Chickpea Curry",
        category: "Vegetarian",
        ingredients: &[
            ("chickpeas", "400", "grams"),
            ("coconut milk", "1", "cups"),
            ("curry powder", "2", "tablespoons"),
            ("onion", "1", "pieces"),
        ],
        instructions: &[
            "Soften the onion in a little oil",
            "Add curry powder and cook until fragrant",
            "Add chickpeas and coconut milk, simmer 20 minutes",
        ],
        prep_time: 10,
        cook_time: 25,
        difficulty: "Medium",
    },
    SeedRecipe {
        title: "Garlic Shrimp Stir-Fry",
        category: "Quick Meals",
        ingredients: &[
            ("shrimp", "1", "pounds"),
            ("garlic", "4", "pieces"),
            ("soy sauce", "2", "tablespoons"),
        ],
        instructions: &[
            "Heat the wok until smoking hot",
            "Stir-fry garlic and shrimp for three minutes",
            "Season with soy sauce and serve at once",
        ],
        prep_time: 10,
        cook_time: 5,
        difficulty: "Easy",
    },
];

const SAMPLE_REVIEWS: &[(i64, &str, &str)] = &[
    (5, "Absolutely delicious! Will make again.", "FoodLover1"),
    (4, "Great recipe, added my own twist.", "ChefJohn"),
];

pub async fn seed(client: &ApiClient, clear: bool) -> Result<()> {
    if clear {
        clear_all(client).await?;
    } else {
        let existing: Vec<Created> = client.get("/api/categories").await?;
        if !existing.is_empty() {
            println!(
                "{} categories already exist, skipping seed (use --clear to reseed)",
                existing.len()
            );
            return Ok(());
        }
    }

    println!("Creating {} categories...", SAMPLE_CATEGORIES.len());
    let mut category_ids = Vec::with_capacity(SAMPLE_CATEGORIES.len());
    for (name, description) in SAMPLE_CATEGORIES {
        let created: Created = client
            .post(
                "/api/categories",
                &json!({ "name": name, "description": description }),
            )
            .await
            .with_context(|| format!("Failed to create category {}", name))?;
        category_ids.push((*name, created.id));
    }

    println!("Creating {} sample recipes...", SAMPLE_RECIPES.len());
    let mut review_count = 0;
    for recipe in SAMPLE_RECIPES {
        let category_id = category_ids
            .iter()
            .find(|(name, _)| *name == recipe.category)
            .map(|(_, id)| id.as_str())
            .with_context(|| format!("Unknown seed category {}", recipe.category))?;

        let ingredients: Vec<_> = recipe
            .ingredients
            .iter()
            .map(|(name, amount, unit)| json!({ "name": name, "amount": amount, "unit": unit }))
            .collect();

        let created: Created = client
            .post(
                "/api/recipes",
                &json!({
                    "title": recipe.title,
                    "categoryId": category_id,
                    "ingredients": ingredients,
                    "instructions": recipe.instructions,
                    "prepTime": recipe.prep_time,
                    "cookTime": recipe.cook_time,
                    "difficulty": recipe.difficulty,
                }),
            )
            .await
            .with_context(|| format!("Failed to create recipe {}", recipe.title))?;

        for (rating, comment, user_name) in SAMPLE_REVIEWS {
            let _: Created = client
                .post(
                    "/api/reviews",
                    &json!({
                        "recipeId": created.id,
                        "rating": rating,
                        "comment": comment,
                        "userName": user_name,
                    }),
                )
                .await
                .with_context(|| format!("Failed to review recipe {}", recipe.title))?;
            review_count += 1;
        }

        println!("  Created: {}", recipe.title);
    }

    println!(
        "Seed complete: {} categories, {} recipes, {} reviews",
        SAMPLE_CATEGORIES.len(),
        SAMPLE_RECIPES.len(),
        review_count
    );

    Ok(())
}

/// Reviews first, then recipes, then categories, so a restrict delete policy
/// never sees a dependent.
async fn clear_all(client: &ApiClient) -> Result<()> {
    for (resource, path) in [
        ("reviews", "/api/reviews"),
        ("recipes", "/api/recipes"),
        ("categories", "/api/categories"),
    ] {
        let items: Vec<Created> = client.get(path).await?;
        for item in &items {
            client.delete(&format!("{}/{}", path, item.id)).await?;
        }
        println!("Deleted {} {}", items.len(), resource);
    }

    Ok(())
}
