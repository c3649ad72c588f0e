use std::collections::{HashMap, hash_map::Entry};

use async_trait::async_trait;
use ledger::{Query, Recipe, RecipeId};
use tokio::sync::RwLock;

use super::{RecipeStore, StoreError};

/// Process-local store, used when no Redis URL is configured and in tests.
#[derive(Default)]
pub struct MemoryStore {
    recipes: RwLock<HashMap<RecipeId, Recipe>>,
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError> {
        Ok(self.recipes.read().await.get(&id).cloned())
    }

    async fn find(&self, query: &Query) -> Result<Vec<Recipe>, StoreError> {
        let recipes = self.recipes.read().await;

        Ok(query.apply(recipes.values().cloned()))
    }

    async fn insert(&self, recipe: &Recipe) -> Result<(), StoreError> {
        match self.recipes.write().await.entry(recipe.id) {
            Entry::Vacant(entry) => {
                entry.insert(recipe.clone());
                Ok(())
            }
            Entry::Occupied(_) => Err(StoreError::Duplicate(recipe.id)),
        }
    }

    async fn save(&self, recipe: &Recipe) -> Result<u64, StoreError> {
        let mut recipes = self.recipes.write().await;

        let stored = recipes
            .get_mut(&recipe.id)
            .ok_or(StoreError::Missing(recipe.id))?;

        if stored.revision != recipe.revision {
            return Err(StoreError::Conflict {
                id: recipe.id,
                expected: recipe.revision,
            });
        }

        *stored = recipe.clone();
        stored.revision += 1;

        Ok(stored.revision)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.recipes.read().await.len())
    }
}
