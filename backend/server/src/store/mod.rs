use async_trait::async_trait;
use ledger::{Query, Recipe, RecipeId};
use thiserror::Error;

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Recipe {0} already exists")]
    Duplicate(RecipeId),

    #[error("Recipe {0} does not exist")]
    Missing(RecipeId),

    #[error("Recipe {id} changed since revision {expected}")]
    Conflict { id: RecipeId, expected: u64 },

    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Corrupt recipe document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistence for whole recipe documents.
///
/// The reaction list and counts are always written together. `save` is a
/// compare-and-swap: it only replaces the stored document when the stored
/// revision equals `recipe.revision`, and returns the bumped revision.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError>;

    async fn find(&self, query: &Query) -> Result<Vec<Recipe>, StoreError>;

    async fn insert(&self, recipe: &Recipe) -> Result<(), StoreError>;

    async fn save(&self, recipe: &Recipe) -> Result<u64, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}
