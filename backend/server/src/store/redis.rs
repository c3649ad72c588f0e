use ::redis::{AsyncCommands, Script, aio::ConnectionManager};
use async_trait::async_trait;
use ledger::{Query, Recipe, RecipeId};
use tracing::debug;

use super::{RecipeStore, StoreError};

/// Replaces `ARGV[1]` in hash `KEYS[1]` with `ARGV[3]` when the stored
/// revision equals `ARGV[2]`.
///
/// Returns 1 on success, -1 when the recipe is missing, -2 on a stale revision.
const SAVE_SCRIPT: &str = r#"
local current = redis.call('HGET', KEYS[1], ARGV[1])
if not current then
    return -1
end
local revision = cjson.decode(current)['revision'] or 0
if tonumber(revision) ~= tonumber(ARGV[2]) then
    return -2
end
redis.call('HSET', KEYS[1], ARGV[1], ARGV[3])
return 1
"#;

pub struct RedisStore {
    connection: ConnectionManager,
    key: String,
    save_script: Script,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager, key: &str) -> Self {
        Self {
            connection,
            key: key.to_string(),
            save_script: Script::new(SAVE_SCRIPT),
        }
    }
}

#[async_trait]
impl RecipeStore for RedisStore {
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.hget(&self.key, id.to_string()).await?;

        Ok(raw.map(|raw| serde_json::from_str(&raw)).transpose()?)
    }

    async fn find(&self, query: &Query) -> Result<Vec<Recipe>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: Vec<String> = connection.hvals(&self.key).await?;

        let recipes = raw
            .iter()
            .map(|raw| serde_json::from_str(raw))
            .collect::<Result<Vec<Recipe>, _>>()?;

        Ok(query.apply(recipes))
    }

    async fn insert(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let document = serde_json::to_string(recipe)?;

        let created: bool = connection
            .hset_nx(&self.key, recipe.id.to_string(), document)
            .await?;

        if !created {
            return Err(StoreError::Duplicate(recipe.id));
        }

        Ok(())
    }

    async fn save(&self, recipe: &Recipe) -> Result<u64, StoreError> {
        let mut connection = self.connection.clone();

        let mut next = recipe.clone();
        next.revision = recipe.revision + 1;
        let document = serde_json::to_string(&next)?;

        let outcome: i64 = self
            .save_script
            .key(&self.key)
            .arg(recipe.id.to_string())
            .arg(recipe.revision)
            .arg(document)
            .invoke_async(&mut connection)
            .await?;

        debug!("Save of recipe {} returned {outcome}", recipe.id);

        match outcome {
            1 => Ok(next.revision),
            -1 => Err(StoreError::Missing(recipe.id)),
            _ => Err(StoreError::Conflict {
                id: recipe.id,
                expected: recipe.revision,
            }),
        }
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let mut connection = self.connection.clone();

        Ok(connection.hlen(&self.key).await?)
    }
}
