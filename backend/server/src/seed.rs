//! # Seeding
//!
//! Sample recipes come from a JSON array of `{title, description, image, recipe}`
//! objects, read from a local path or fetched over http(s).
//!
//! - Startup: only seeds a store that holds no recipes yet
//! - `seed` CLI: inserts every entry into whatever the store already holds
//! - Entries are stamped one millisecond apart so listings keep file order
use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use ledger::{LedgerError, NewRecipe, Recipe};
use tracing::info;

use crate::store::RecipeStore;

pub async fn read_recipes(source: &str) -> anyhow::Result<Vec<NewRecipe>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        reqwest::get(source)
            .await
            .with_context(|| format!("Failed to fetch {source}"))?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read {source}"))?
    };

    serde_json::from_slice(&bytes).with_context(|| format!("Invalid recipe list in {source}"))
}

pub fn prepare(drafts: Vec<NewRecipe>, start: DateTime<Utc>) -> Result<Vec<Recipe>, LedgerError> {
    drafts
        .into_iter()
        .zip(0..)
        .map(|(draft, offset)| Recipe::create(draft, start + Duration::milliseconds(offset)))
        .collect()
}

pub async fn seed_if_empty(store: &dyn RecipeStore, source: &str) -> anyhow::Result<usize> {
    let existing = store.count().await?;

    if existing > 0 {
        info!("Store already holds {existing} recipes, skipping seed");
        return Ok(0);
    }

    let recipes = prepare(read_recipes(source).await?, Utc::now())?;

    for recipe in &recipes {
        store.insert(recipe).await?;
    }

    info!("Seeded {} recipes from {source}", recipes.len());
    Ok(recipes.len())
}
