use serde::{Deserialize, Serialize};

use crate::prompt::GenerationMode;

/// Label used whenever a category is missing or not part of the vocabulary.
pub const DEFAULT_CATEGORY_LABEL: &str = "Easy to Cook";

/// Default label for quick-generate recipes with no usable category.
pub const QUICK_CATEGORY_LABEL: &str = "Quick & Easy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Healthy,
    CheatMeal,
    EasyToCook,
    ComfortFood,
    HighProtein,
}

const ALL_CATEGORIES: &[Category] = &[
    Category::Healthy,
    Category::CheatMeal,
    Category::EasyToCook,
    Category::ComfortFood,
    Category::HighProtein,
];

impl Category {
    pub fn all() -> &'static [Category] {
        ALL_CATEGORIES
    }

    /// Case-insensitive lookup. Spaces, hyphens and underscores are interchangeable,
    /// so "Cheat Meal", "cheat_meal" and "CHEAT-MEAL" all resolve to `CheatMeal`.
    pub fn parse(raw: &str) -> Option<Category> {
        let key: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        ALL_CATEGORIES.iter().copied().find(|c| c.slug() == key)
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Healthy => "healthy",
            Category::CheatMeal => "cheat-meal",
            Category::EasyToCook => "easy-to-cook",
            Category::ComfortFood => "comfort-food",
            Category::HighProtein => "high-protein",
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            Category::Healthy => "Healthy",
            Category::CheatMeal => "Cheat Meal",
            Category::EasyToCook => "Easy to Cook",
            Category::ComfortFood => "Comfort Food",
            Category::HighProtein => "High Protein",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

pub fn default_label_for(mode: GenerationMode) -> &'static str {
    match mode {
        GenerationMode::Quick => QUICK_CATEGORY_LABEL,
        GenerationMode::Inventory => DEFAULT_CATEGORY_LABEL,
    }
}

/// Maps a user-supplied category onto its display label, or the mode default
/// when it is absent, blank or unknown. Never fails.
pub fn resolve_category_label(raw: Option<&str>, mode: GenerationMode) -> String {
    raw.and_then(Category::parse)
        .map(|c| c.display_label())
        .unwrap_or_else(|| default_label_for(mode))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_separator_and_case_variants() {
        assert_eq!(Category::parse("healthy"), Some(Category::Healthy));
        assert_eq!(Category::parse("  Cheat Meal "), Some(Category::CheatMeal));
        assert_eq!(Category::parse("easy_to_cook"), Some(Category::EasyToCook));
        assert_eq!(Category::parse("COMFORT-FOOD"), Some(Category::ComfortFood));
        assert_eq!(Category::parse("high protein"), Some(Category::HighProtein));
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert_eq!(Category::parse("xyz"), None);
        assert_eq!(Category::parse(""), None);
        assert_eq!(Category::parse("healthy-ish"), None);
    }

    #[test]
    fn resolve_uses_display_label_or_mode_default() {
        assert_eq!(
            resolve_category_label(Some("high-protein"), GenerationMode::Quick),
            "High Protein"
        );
        assert_eq!(
            resolve_category_label(Some("xyz"), GenerationMode::Inventory),
            DEFAULT_CATEGORY_LABEL
        );
        assert_eq!(resolve_category_label(Some(""), GenerationMode::Quick), QUICK_CATEGORY_LABEL);
        assert_eq!(resolve_category_label(None, GenerationMode::Inventory), DEFAULT_CATEGORY_LABEL);
    }

    #[test]
    fn slugs_round_trip_through_parse() {
        for category in Category::all() {
            assert_eq!(Category::parse(category.slug()), Some(*category));
            assert_eq!(Category::parse(category.display_label()), Some(*category));
        }
    }
}
