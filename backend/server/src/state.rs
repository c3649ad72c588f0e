use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use super::{
    config::Config,
    database::init_redis,
    seed::seed_if_empty,
    service::RecipeService,
    store::{MemoryStore, RecipeStore, RedisStore},
};

pub struct State {
    pub config: Config,
    pub recipes: RecipeService,
}

impl State {
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn RecipeStore> = match &config.redis_url {
            Some(redis_url) => {
                info!("Connecting to Redis...");
                let connection = init_redis(redis_url)
                    .await
                    .context("Failed to connect to Redis")?;

                Arc::new(RedisStore::new(connection, &config.redis_key))
            }
            None => {
                warn!("No Redis configured, recipes are kept in memory");
                Arc::new(MemoryStore::default())
            }
        };

        if let Some(seed_path) = &config.seed_path {
            seed_if_empty(store.as_ref(), seed_path).await?;
        }

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn RecipeStore>) -> Arc<Self> {
        Arc::new(Self {
            config,
            recipes: RecipeService::new(store),
        })
    }
}
