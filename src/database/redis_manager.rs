// Redis client management

use std::sync::Arc;
use anyhow::{Context, Result};
use redis::Client;
use tracing::info;
use crate::config::environment::EnvironmentVariables;

#[derive(Debug, Clone)]
pub struct RedisService {
    client: Client,
}

impl RedisService {
    /// Creates the client without connecting; `initialize()` verifies the server
    pub fn new(env: Arc<EnvironmentVariables>) -> Result<Self> {
        let client = Client::open(env.redis_url.as_ref())
            .context("Failed to create Redis client")?;
        Ok(Self { client })
    }

    pub async fn initialize(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;

        // Simple ping to verify connection
        let _: () = redis::cmd("PING").query_async(&mut conn).await
            .context("Failed to ping Redis")?;

        info!("Redis connection established successfully");
        Ok(())
    }

    pub async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client.get_multiplexed_async_connection().await
            .context("Failed to get Redis multiplexed connection")
    }

    pub async fn shutdown(&self) {
        // Multiplexed connections close when their last handle drops.
        info!("Redis service shutdown (noop)");
    }
}
