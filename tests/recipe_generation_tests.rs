use appetite::oracle::{OracleSlot, ScriptedOracle};
use appetite::recipe_parser::parse_recipe_output;
use appetite::{GenerationMode, RecipeAssembler, RECOMMEND_ATTEMPTS_PER_RECIPE};
use std::sync::Arc;

fn offline_assembler(seed: u64) -> RecipeAssembler {
    RecipeAssembler::with_seed(OracleSlot::unavailable("integration test"), seed)
}

#[tokio::test]
async fn quick_generate_offline_keeps_user_ingredients() {
    let assembler = offline_assembler(42);
    assert!(!assembler.oracle_available());

    let recipe = assembler.quick_generate(&["chicken", "butter"]).await;
    assert!(recipe.ingredients.iter().any(|i| i == "chicken"));
    assert!(recipe.ingredients.iter().any(|i| i == "butter"));

    let again = offline_assembler(42).quick_generate(&["chicken", "butter"]).await;
    assert_eq!(recipe.title, again.title);
}

#[tokio::test]
async fn recipe_serializes_with_stable_field_names() {
    let recipe = offline_assembler(3)
        .generate_recipe(&["tofu"], Some("healthy"), GenerationMode::Inventory)
        .await;
    let value = serde_json::to_value(&recipe).unwrap();

    for key in ["title", "category", "ingredients", "instructions"] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(value["category"], "Healthy");
    assert!(value["ingredients"].is_array());
}

#[tokio::test]
async fn repeated_title_recommendations_terminate() {
    let oracle = Arc::new(ScriptedOracle::always(
        "Title: Egg Scramble\nIngredients: egg\nInstructions: Scramble.",
    ));
    let assembler = RecipeAssembler::with_seed(OracleSlot::Available(oracle.clone()), 1);

    let recipes = assembler.recommend_recipes(&["egg"], None, 3).await;
    assert!(recipes.len() <= 3);
    assert_eq!(recipes.len(), 1);
    assert_eq!(oracle.call_count(), 3 * RECOMMEND_ATTEMPTS_PER_RECIPE);
}

#[tokio::test]
async fn empty_pantry_short_circuits() {
    let oracle = Arc::new(ScriptedOracle::always("Title: Anything\nInstructions: Cook."));
    let assembler = RecipeAssembler::with_seed(OracleSlot::Available(oracle.clone()), 1);

    let none: Vec<String> = Vec::new();
    assert!(assembler.recommend_recipes(&none, None, 5).await.is_empty());
    assert_eq!(oracle.call_count(), 0);
}

#[test]
fn parser_recovers_envelope_from_chatty_reply() {
    let raw = "Sure! {\"title\":\"Soup\",\"category\":\"healthy\",\"ingredients\":[\"carrot\"],\"instructions\":\"Boil it.\"} Enjoy!";
    let fields = parse_recipe_output(raw);
    assert_eq!(fields.title.as_deref(), Some("Soup"));
    assert_eq!(fields.category.as_deref(), Some("healthy"));
    assert_eq!(fields.ingredients, Some(vec!["carrot".to_string()]));
    assert_eq!(fields.instructions.as_deref(), Some("Boil it."));
}
