//! Template-based recipes for when the oracle is missing or its reply is unusable.
//! Everything here is total: any ingredient list, any category, any mode.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::categories::{resolve_category_label, Category};
use crate::prompt::GenerationMode;
use crate::recipe::Recipe;

const EMPTY_PANTRY_TITLES: &[&str] = &["Pantry Surprise", "Simple Pantry Meal"];
const EMPTY_PANTRY_INGREDIENT: &str = "basic pantry staples";
const FLAVOR_STAPLES: &[&str] = &["salt", "black pepper", "olive oil"];

const QUICK_SUFFIXES: &[&str] = &["Quick Fix", "Skillet", "Stir-Fry"];
const INVENTORY_SUFFIXES: &[&str] = &["Dinner", "Bowl", "Bake"];

fn title_prefixes(category: Option<Category>) -> &'static [&'static str] {
    match category {
        Some(Category::Healthy) => &["Light & Fresh", "Garden"],
        Some(Category::CheatMeal) => &["Indulgent", "Loaded"],
        Some(Category::EasyToCook) => &["Easy One-Pot", "Simple"],
        Some(Category::ComfortFood) => &["Cozy", "Homestyle"],
        Some(Category::HighProtein) => &["Protein-Packed", "Power"],
        None => &["Simple", "Homestyle", "Quick"],
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// "a", "a and b", "a, b and c".
fn natural_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn pick<'a, R: Rng + ?Sized>(options: &[&'a str], rng: &mut R) -> &'a str {
    options.choose(rng).copied().unwrap_or("Simple")
}

/// Title built from the first one or two ingredients and a template chosen by `rng`.
pub fn fallback_title<R: Rng + ?Sized>(
    ingredients: &[String],
    category: Option<&str>,
    mode: GenerationMode,
    rng: &mut R,
) -> String {
    if ingredients.is_empty() {
        return pick(EMPTY_PANTRY_TITLES, rng).to_string();
    }

    let main = ingredients
        .iter()
        .take(2)
        .map(|i| title_case(i))
        .collect::<Vec<_>>()
        .join(" & ");

    let prefix = pick(title_prefixes(category.and_then(Category::parse)), rng);
    let suffix = match mode {
        GenerationMode::Quick => pick(QUICK_SUFFIXES, rng),
        GenerationMode::Inventory => pick(INVENTORY_SUFFIXES, rng),
    };

    format!("{} {} {}", prefix, main, suffix)
}

pub fn synthesize<R: Rng + ?Sized>(
    ingredients: &[String],
    category: Option<&str>,
    mode: GenerationMode,
    rng: &mut R,
) -> Recipe {
    let title = fallback_title(ingredients, category, mode, rng);

    let ingredient_list = if ingredients.is_empty() {
        vec![EMPTY_PANTRY_INGREDIENT.to_string()]
    } else {
        let mut list = ingredients.to_vec();
        for staple in FLAVOR_STAPLES {
            if !list.iter().any(|i| i.eq_ignore_ascii_case(staple)) {
                list.push(staple.to_string());
            }
        }
        list
    };

    let named = if ingredients.is_empty() {
        "your pantry staples".to_string()
    } else {
        natural_list(ingredients)
    };

    let instructions = [
        format!("1. Gather and prep {}: rinse, trim and chop as needed.", named),
        "2. Heat a pan over medium heat with a little olive oil.".to_string(),
        format!("3. Add {} and cook, stirring occasionally, until tender.", named),
        "4. Season with salt, black pepper and any spices you like.".to_string(),
        "5. Taste, adjust the seasoning, then serve warm.".to_string(),
    ]
    .join("\n");

    Recipe {
        title,
        category: resolve_category_label(category, mode),
        ingredients: ingredient_list,
        instructions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keeps_input_ingredients_and_adds_staples() {
        let mut rng = StdRng::seed_from_u64(7);
        let ingredients = strings(&["chicken", "butter", "Salt"]);
        let recipe = synthesize(&ingredients, None, GenerationMode::Quick, &mut rng);
        assert_eq!(
            recipe.ingredients,
            strings(&["chicken", "butter", "Salt", "black pepper", "olive oil"])
        );
        assert!(recipe.instructions.contains("chicken, butter and Salt"));
    }

    #[test]
    fn title_is_deterministic_for_a_fixed_seed() {
        let ingredients = strings(&["chicken", "butter"]);
        let mut first_rng = StdRng::seed_from_u64(42);
        let mut second_rng = StdRng::seed_from_u64(42);
        let first = synthesize(&ingredients, None, GenerationMode::Quick, &mut first_rng);
        let second = synthesize(&ingredients, None, GenerationMode::Quick, &mut second_rng);
        assert_eq!(first, second);
        assert!(first.title.contains("Chicken & Butter"), "unexpected title {}", first.title);
    }

    #[test]
    fn empty_input_is_still_well_formed() {
        let mut rng = StdRng::seed_from_u64(1);
        let recipe = synthesize(&[], None, GenerationMode::Inventory, &mut rng);
        assert!(EMPTY_PANTRY_TITLES.contains(&recipe.title.as_str()));
        assert_eq!(recipe.ingredients, strings(&[EMPTY_PANTRY_INGREDIENT]));
        assert!(recipe.instructions.contains("your pantry staples"));
        assert_eq!(recipe.instructions.lines().count(), 5);
    }

    #[test]
    fn unknown_category_never_leaks_into_recipe() {
        let mut rng = StdRng::seed_from_u64(3);
        let egg = strings(&["egg"]);
        let recipe = synthesize(&egg, Some("xyz"), GenerationMode::Quick, &mut rng);
        assert_eq!(recipe.category, "Quick & Easy");

        let recipe = synthesize(&egg, Some("xyz"), GenerationMode::Inventory, &mut rng);
        assert_eq!(recipe.category, "Easy to Cook");

        let recipe = synthesize(&egg, Some("comfort food"), GenerationMode::Inventory, &mut rng);
        assert_eq!(recipe.category, "Comfort Food");
        assert!(recipe.title.starts_with("Cozy") || recipe.title.starts_with("Homestyle"));
    }

    #[test]
    fn title_case_handles_mixed_input() {
        assert_eq!(title_case("sWEET  potato"), "Sweet Potato");
        assert_eq!(natural_list(&strings(&["a", "b", "c"])), "a, b and c");
        assert_eq!(natural_list(&strings(&["a"])), "a");
    }
}
