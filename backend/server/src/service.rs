use std::{
    collections::{HashMap, hash_map::Entry},
    sync::{Arc, Mutex as SyncMutex, MutexGuard, PoisonError},
};

use chrono::Utc;
use ledger::{
    Listing, NewRecipe, Query, ReactionCounts, ReactionKind, Recipe, RecipeId, UserId,
    UserReaction,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::{error::AppError, store::RecipeStore};

/// Recipe operations over a [`RecipeStore`].
///
/// Reaction updates are read-modify-write cycles, so they hold a lock keyed by
/// recipe id for the whole cycle. The store's revision check on `save` covers
/// writers in other processes.
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    inflight: SyncMutex<HashMap<RecipeId, LockSlot>>,
}

struct LockSlot {
    lock: Arc<Mutex<()>>,
    holders: usize,
}

/// Holds a recipe's lock, or a place in its queue.
///
/// The map entry is pruned on drop, including when the owning future is
/// cancelled mid-update.
struct RecipeLock<'a> {
    id: RecipeId,
    inflight: &'a SyncMutex<HashMap<RecipeId, LockSlot>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for RecipeLock<'_> {
    fn drop(&mut self) {
        self.guard.take();

        if let Entry::Occupied(mut slot) = lock_map(self.inflight).entry(self.id) {
            slot.get_mut().holders -= 1;

            if slot.get().holders == 0 {
                slot.remove();
            }
        }
    }
}

fn lock_map(
    inflight: &SyncMutex<HashMap<RecipeId, LockSlot>>,
) -> MutexGuard<'_, HashMap<RecipeId, LockSlot>> {
    inflight.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self {
            store,
            inflight: SyncMutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn RecipeStore> {
        &self.store
    }

    pub async fn list(&self, user: Option<&UserId>) -> Result<Listing, AppError> {
        let recipes = self.store.find(&Query::all()).await?;

        Ok(Listing::new(recipes, user))
    }

    pub async fn create(&self, draft: NewRecipe) -> Result<Recipe, AppError> {
        let recipe = Recipe::create(draft, Utc::now())?;
        self.store.insert(&recipe).await?;

        info!("Created recipe {} ({})", recipe.id, recipe.title);
        Ok(recipe)
    }

    pub async fn react(
        &self,
        id: RecipeId,
        user: &UserId,
        kind: ReactionKind,
    ) -> Result<ReactionCounts, AppError> {
        let _lock = self.lock(id).await;

        self.react_locked(id, user, kind).await
    }

    async fn react_locked(
        &self,
        id: RecipeId,
        user: &UserId,
        kind: ReactionKind,
    ) -> Result<ReactionCounts, AppError> {
        let mut recipe = self.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;

        let counts = recipe.react(user, kind)?;
        let revision = self.store.save(&recipe).await?;

        debug!("User {user} sent {kind} to recipe {id}, now at revision {revision}");
        Ok(counts)
    }

    pub async fn recommendations(&self) -> Result<Vec<Recipe>, AppError> {
        Ok(self.store.find(&Query::recommendations()).await?)
    }

    pub async fn user_reactions(&self, user: &UserId) -> Result<Vec<UserReaction>, AppError> {
        let recipes = self.store.find(&Query::reacted_by(user.clone())).await?;

        Ok(UserReaction::collect(&recipes, user))
    }

    async fn lock(&self, id: RecipeId) -> RecipeLock<'_> {
        let lock = {
            let mut inflight = lock_map(&self.inflight);
            let slot = inflight.entry(id).or_insert_with(|| LockSlot {
                lock: Arc::new(Mutex::new(())),
                holders: 0,
            });
            slot.holders += 1;

            Arc::clone(&slot.lock)
        };

        let mut held = RecipeLock {
            id,
            inflight: &self.inflight,
            guard: None,
        };
        held.guard = Some(lock.lock_owned().await);

        held
    }
}
