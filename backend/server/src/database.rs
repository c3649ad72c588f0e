//! # Redis
//!
//! Document store for recipes.
//!
//! ## Implementation
//!
//! - Redis hash: 1 big key, then recipe id to recipe JSON pairs
//! - Whole-document reads and replaces, reaction list and counts travel together
//! - Replaces are a compare-and-swap on the recipe **revision**, run as a Lua script so Redis applies it atomically
//! - Listing pulls every value and sorts in process, fine for a catalog of a few thousand recipes
use std::time::Duration;

use redis::{
    Client, RedisResult,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

pub async fn init_redis(redis_url: &str) -> RedisResult<ConnectionManager> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;

    client.get_connection_manager_with_config(config).await
}
