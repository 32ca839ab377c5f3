use anyhow::{Context, Result};
use appetite::categories::Category;
use appetite::cli::{parse_args, Command};
use appetite::config::GeneratorSettings;
use appetite::oracle::OracleSlot;
use appetite::pantry::{
    consume_ingredients, expiring_within, load_pantry_csv, pantry_ingredient_names, save_pantry_csv,
};
use appetite::shopping::compute_shopping_list_items;
use appetite::RecipeAssembler;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let cli_args = parse_args();

    let mut settings = GeneratorSettings::from_env();
    if cli_args.seed.is_some() {
        settings.seed = cli_args.seed;
    }

    let build_assembler = || {
        let oracle = if cli_args.offline {
            OracleSlot::unavailable("--offline")
        } else {
            OracleSlot::detect(&settings)
        };
        RecipeAssembler::new(oracle, &settings)
    };

    match &cli_args.command {
        Command::Quick { ingredients } => {
            let recipe = build_assembler().quick_generate(ingredients).await;
            print_json(&recipe)?;
        }
        Command::Generate { ingredients, category, mode } => {
            let recipe = build_assembler()
                .generate_recipe(ingredients, category.as_deref(), *mode)
                .await;
            print_json(&recipe)?;
        }
        Command::Recommend { pantry, category, count } => {
            let items = load_pantry_csv(pantry)
                .with_context(|| format!("Failed to load pantry from '{}'", pantry.display()))?;
            let ingredients = pantry_ingredient_names(&items);
            tracing::info!(items = ingredients.len(), "Loaded pantry");

            let recipes = build_assembler()
                .recommend_recipes(&ingredients, category.as_deref(), *count)
                .await;
            print_json(&recipes)?;
        }
        Command::ShoppingList { pantry, ingredients } => {
            let items = load_pantry_csv(pantry)
                .with_context(|| format!("Failed to load pantry from '{}'", pantry.display()))?;
            let missing =
                compute_shopping_list_items(ingredients, &pantry_ingredient_names(&items));
            print_json(&missing)?;
        }
        Command::Expiring { pantry, days, today } => {
            let items = load_pantry_csv(pantry)
                .with_context(|| format!("Failed to load pantry from '{}'", pantry.display()))?;
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            print_json(&expiring_within(&items, today, *days))?;
        }
        Command::Cook { pantry, ingredients, title, output } => {
            let items = load_pantry_csv(pantry)
                .with_context(|| format!("Failed to load pantry from '{}'", pantry.display()))?;
            let (remaining, removed) = consume_ingredients(&items, ingredients);

            if let Some(output) = output {
                save_pantry_csv(output, &remaining)
                    .with_context(|| format!("Failed to save pantry to '{}'", output.display()))?;
                tracing::info!(path = %output.display(), items = remaining.len(), "Saved pantry");
            }

            let title = title.as_deref().unwrap_or("recipe");
            print_json(&json!({
                "message": format!("Cooked '{}'. Removed {} pantry items.", title, removed.len()),
                "removed_items": removed,
            }))?;
        }
        Command::Categories => {
            for category in Category::all() {
                println!("{}\t{}", category.slug(), category.display_label());
            }
        }
    }

    Ok(())
}
