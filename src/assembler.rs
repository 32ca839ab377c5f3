//! Prompt, oracle, parser and fallback composed into the two public generation
//! operations. Neither operation returns an error: every failure along the way
//! is logged and answered with a rule-based recipe instead.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::categories::resolve_category_label;
use crate::config::GeneratorSettings;
use crate::fallback;
use crate::oracle::{OracleError, OracleSlot};
use crate::prompt::{build_prompt, GenerationMode};
use crate::recipe::{normalize_ingredients, Recipe};
use crate::recipe_parser::{parse_recipe_output, FieldDefaults};

/// `recommend_recipes` gives up after this many generations per requested recipe.
pub const RECOMMEND_ATTEMPTS_PER_RECIPE: usize = 3;

#[derive(Debug)]
pub struct RecipeAssembler {
    oracle: OracleSlot,
    oracle_timeout: Duration,
    rng: Mutex<StdRng>,
}

impl RecipeAssembler {
    pub fn new(oracle: OracleSlot, settings: &GeneratorSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            oracle,
            oracle_timeout: settings.oracle_timeout,
            rng: Mutex::new(rng),
        }
    }

    /// Settings from the environment, oracle detected once here.
    pub fn from_env() -> Self {
        let settings = GeneratorSettings::from_env();
        let oracle = OracleSlot::detect(&settings);
        Self::new(oracle, &settings)
    }

    pub fn with_seed(oracle: OracleSlot, seed: u64) -> Self {
        let settings = GeneratorSettings {
            seed: Some(seed),
            ..GeneratorSettings::default()
        };
        Self::new(oracle, &settings)
    }

    pub fn with_timeout(mut self, oracle_timeout: Duration) -> Self {
        self.oracle_timeout = oracle_timeout;
        self
    }

    pub fn oracle_available(&self) -> bool {
        self.oracle.is_available()
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Generates exactly one fully populated recipe.
    pub async fn generate_recipe<S: AsRef<str>>(
        &self,
        ingredients: &[S],
        category: Option<&str>,
        mode: GenerationMode,
    ) -> Recipe {
        let ingredients = normalize_ingredients(ingredients);

        if let Some(recipe) = self.generate_with_oracle(&ingredients, category, mode).await {
            return recipe;
        }

        let mut rng = self.lock_rng();
        fallback::synthesize(&ingredients, category, mode, &mut *rng)
    }

    /// Quick generate: ad hoc ingredients, no category.
    pub async fn quick_generate<S: AsRef<str>>(&self, ingredients: &[S]) -> Recipe {
        self.generate_recipe(ingredients, None, GenerationMode::Quick).await
    }

    /// Up to `n` recipes with distinct titles, generated from pantry ingredients.
    pub async fn recommend_recipes<S: AsRef<str>>(
        &self,
        ingredients: &[S],
        category: Option<&str>,
        n: usize,
    ) -> Vec<Recipe> {
        let ingredients = normalize_ingredients(ingredients);
        if ingredients.is_empty() || n == 0 {
            debug!("Nothing to recommend from an empty pantry");
            return Vec::new();
        }

        let max_attempts = n.saturating_mul(RECOMMEND_ATTEMPTS_PER_RECIPE);
        let mut recipes = Vec::with_capacity(n);
        let mut seen_titles = HashSet::new();
        let mut attempts = 0;

        while recipes.len() < n && attempts < max_attempts {
            attempts += 1;
            let recipe = self
                .generate_recipe(&ingredients, category, GenerationMode::Inventory)
                .await;

            if seen_titles.insert(recipe.title_key()) {
                recipes.push(recipe);
            } else {
                debug!(title = %recipe.title, attempts, "Skipping duplicate recommendation");
            }
        }

        info!(requested = n, produced = recipes.len(), attempts, "Built recommendation set");
        recipes
    }

    async fn call_oracle(&self, prompt: &str) -> Result<String, OracleError> {
        let oracle = match &self.oracle {
            OracleSlot::Available(oracle) => oracle,
            OracleSlot::Unavailable { reason } => {
                return Err(OracleError::Unavailable(reason.clone()))
            }
        };

        debug!(oracle = oracle.name(), "Requesting recipe from oracle");
        match timeout(self.oracle_timeout, oracle.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(OracleError::Timeout(self.oracle_timeout)),
        }
    }

    /// `None` means the caller should fall back to the synthesizer.
    async fn generate_with_oracle(
        &self,
        ingredients: &[String],
        category: Option<&str>,
        mode: GenerationMode,
    ) -> Option<Recipe> {
        let prompt = build_prompt(ingredients, category, mode);

        let raw = match self.call_oracle(&prompt).await {
            Ok(raw) => raw,
            Err(OracleError::Unavailable(reason)) => {
                debug!(%reason, "Oracle unavailable, using rule-based recipe");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Oracle call failed, using rule-based recipe");
                return None;
            }
        };

        let fields = parse_recipe_output(&raw);
        if !fields.is_usable() {
            warn!("Oracle output had no title or instructions, using rule-based recipe");
            debug!(raw = %raw, "Unusable oracle output");
            return None;
        }

        let fallback_title = {
            let mut rng = self.lock_rng();
            fallback::fallback_title(ingredients, category, mode, &mut *rng)
        };
        let category_label = resolve_category_label(category, mode);

        Some(fields.into_recipe(&FieldDefaults {
            fallback_title: &fallback_title,
            original_ingredients: ingredients,
            category_label: &category_label,
        }))
    }
}
