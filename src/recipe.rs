use serde::{Deserialize, Serialize};

/// The record handed back to callers. Every field is always populated; the
/// HTTP layer serializes it as-is, so the field names are part of the contract.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    pub title: String,
    pub category: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

impl Recipe {
    /// Key used to decide whether two suggestions are the same recipe.
    pub fn title_key(&self) -> String {
        self.title.trim().to_lowercase()
    }
}

/// Trims every ingredient and drops the blank ones, keeping input order.
pub fn normalize_ingredients<S: AsRef<str>>(ingredients: &[S]) -> Vec<String> {
    ingredients
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_blank_entries() {
        let input = vec!["  chicken ", "", "   ", "butter"];
        assert_eq!(normalize_ingredients(&input), vec!["chicken", "butter"]);
    }

    #[test]
    fn title_key_ignores_case_and_padding() {
        let recipe = Recipe {
            title: "  Pasta Bake ".to_string(),
            category: "Healthy".to_string(),
            ingredients: vec!["pasta".to_string()],
            instructions: "Bake it.".to_string(),
        };
        assert_eq!(recipe.title_key(), "pasta bake");
    }
}
