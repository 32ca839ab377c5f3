fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive partial match in either direction. Blank names match nothing.
pub fn names_match(a: &str, b: &str) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    !a.is_empty() && !b.is_empty() && (a.contains(b.as_str()) || b.contains(a.as_str()))
}

/// Recipe ingredients the pantry does not cover, in recipe order and without
/// repeats. Matching is partial in both directions, so "tomato" is covered by
/// "tomato sauce" and "tomato sauce" by "tomato".
pub fn compute_shopping_list_items<S: AsRef<str>, P: AsRef<str>>(
    recipe_ingredients: &[S],
    pantry_names: &[P],
) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for raw in recipe_ingredients {
        let raw = raw.as_ref().trim();
        let ingredient = normalize(raw);
        if ingredient.is_empty() {
            continue;
        }

        let present = pantry_names.iter().any(|p| names_match(raw, p.as_ref()));
        let already_listed = missing.iter().any(|m| normalize(m) == ingredient);

        if !present && !already_listed {
            missing.push(raw.to_string());
        }
    }
    missing
}
