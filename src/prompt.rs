use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::categories::Category;

const EMPTY_INGREDIENTS_PHRASE: &str = "basic pantry staples";

/// Where the ingredient list came from. Only affects phrasing, never what counts
/// as a valid recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Ad hoc ingredients typed in by the user, pantry ignored.
    Quick,
    /// Ingredients resolved from the user's pantry.
    Inventory,
}

/// Builds the instruction sent to the oracle. The reply is requested as a single
/// JSON object whose keys appear here in the order the parser expects them.
pub fn build_prompt(
    ingredients: &[String],
    category: Option<&str>,
    mode: GenerationMode,
) -> String {
    let ingredient_text = if ingredients.is_empty() {
        EMPTY_INGREDIENTS_PHRASE.to_string()
    } else {
        ingredients.join(", ")
    };

    let request = match mode {
        GenerationMode::Quick => "Create ONE very quick recipe",
        GenerationMode::Inventory => "Create ONE home-cooked recipe using what is in the pantry",
    };

    let category_clause = match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => format!(" that fits the '{}' category", c),
        None => String::new(),
    };

    let vocabulary = Category::all()
        .iter()
        .map(|c| c.slug())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "/no_thinking
You are an AI chef for a smart pantry app called AppetIte.
{request}{category_clause} with the following ingredients: {ingredient_text}.

Return the recipe as a JSON object. The JSON object must be the only content in your response. Do not include any explanatory text, comments, or markdown formatting before or after it.
The JSON object must have exactly these properties, in this order:
- \"title\": a short recipe title of at most eight words.
- \"category\": one of {vocabulary}.
- \"ingredients\": an array of strings, one ingredient per item.
- \"instructions\": a single string of numbered steps separated by newlines.

Do not add any other properties. Do not repeat steps or ingredients.
Your response must start with {{ and end with }}.
"
    )
}
