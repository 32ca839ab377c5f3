pub mod api_connection;
pub mod assembler;
pub mod categories;
pub mod cli;
pub mod config;
pub mod fallback;
pub mod oracle;
pub mod pantry;
pub mod prompt;
pub mod recipe;
pub mod recipe_parser;
pub mod shopping;

pub use assembler::{RecipeAssembler, RECOMMEND_ATTEMPTS_PER_RECIPE};
pub use categories::Category;
pub use oracle::{OracleSlot, RecipeOracle};
pub use prompt::GenerationMode;
pub use recipe::Recipe;
