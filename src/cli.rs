use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::prompt::GenerationMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "AppetIte pantry recipe generator", long_about = None)]
pub struct Cli {
    /// Skip the model and use rule-based recipes only
    #[arg(long, global = true)]
    pub offline: bool,

    /// Seed for the rule-based title templates
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one recipe from ad hoc ingredients, ignoring the pantry
    Quick {
        /// Ingredient to cook with (repeatable)
        #[arg(short, long = "ingredient", required = true)]
        ingredients: Vec<String>,
    },
    /// Generate one recipe with an explicit mode and category
    Generate {
        /// Ingredient to cook with (repeatable)
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,

        /// Preferred category, e.g. healthy or comfort-food
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, value_enum, default_value_t = GenerationMode::Inventory)]
        mode: GenerationMode,
    },
    /// Recommend several distinct recipes from a pantry CSV export
    Recommend {
        /// Pantry CSV with at least a `name` column
        #[arg(short, long)]
        pantry: PathBuf,

        /// Preferred category, e.g. healthy or comfort-food
        #[arg(short, long)]
        category: Option<String>,

        /// Number of recipes to return
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },
    /// List the recipe ingredients missing from the pantry
    ShoppingList {
        /// Pantry CSV with at least a `name` column
        #[arg(short, long)]
        pantry: PathBuf,

        /// Recipe ingredient (repeatable)
        #[arg(short, long = "ingredient", required = true)]
        ingredients: Vec<String>,
    },
    /// List pantry items that expire within the next few days
    Expiring {
        /// Pantry CSV with `name` and `expiry_date` columns
        #[arg(short, long)]
        pantry: PathBuf,

        /// Look-ahead window in days
        #[arg(short, long, default_value_t = 7)]
        days: u32,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Remove the pantry items a cooked recipe used up
    Cook {
        /// Pantry CSV with at least a `name` column
        #[arg(short, long)]
        pantry: PathBuf,

        /// Recipe ingredient (repeatable)
        #[arg(short, long = "ingredient", required = true)]
        ingredients: Vec<String>,

        /// Recipe title, used in the summary message
        #[arg(short, long)]
        title: Option<String>,

        /// Write the remaining pantry to this CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the known recipe categories
    Categories,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
