//! # Recipe Loading
//!
//! Bulk import of recipes into the Redis store.
//!
//! ## Input
//! - JSON array of `{title, description, image, recipe}` objects
//! - Local path or http(s) URL
//!
//! ## Behavior
//! 1. Fetch and parse the whole list, then validate every entry before writing anything.
//!
//! 2. Each entry becomes a new recipe with a fresh id, zeroed reactions and a creation
//!    date one millisecond after the previous entry.
//!
//! 3. Insert one by one. Existing recipes are never touched, so running twice loads the list twice.
//!
//! 4. `--dry-run` stops after step 1.
use anyhow::Context;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use ledger::Recipe;
use server::{
    database::init_redis,
    seed::{prepare, read_recipes},
    store::{RecipeStore, RedisStore},
};

pub async fn load_recipes(
    source: &str,
    redis_url: &str,
    redis_key: &str,
    dry_run: bool,
) -> anyhow::Result<usize> {
    let recipes = prepare(read_recipes(source).await?, Utc::now())?;
    println!("Loaded Recipes: {}", recipes.len());

    if dry_run {
        println!("Dry run, nothing written.");
        return Ok(0);
    }

    let connection = init_redis(redis_url)
        .await
        .with_context(|| format!("Failed to connect to {redis_url}"))?;
    let store = RedisStore::new(connection, redis_key);

    let before = store.count().await?;
    let inserted = insert_recipes(&store, &recipes).await?;

    println!("Total New Recipes: {inserted}");
    println!("Recipe Verification: {}", store.count().await? - before);

    Ok(inserted)
}

pub async fn insert_recipes(store: &dyn RecipeStore, recipes: &[Recipe]) -> anyhow::Result<usize> {
    let pb = ProgressBar::new(recipes.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    for recipe in recipes {
        pb.set_message(recipe.title.clone());

        store
            .insert(recipe)
            .await
            .with_context(|| format!("Failed to insert {}", recipe.title))?;

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    Ok(recipes.len())
}
