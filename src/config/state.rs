// Application state management with singleton pattern

use std::sync::Arc;
use once_cell::sync::Lazy;
use crate::config::environment::EnvironmentVariables;
use crate::database::{DatabaseService, PostgresTopicSearch, RedisForumStore, RedisService};
use crate::topics::SuggestedTopics;

// AppState singleton
#[derive(Debug, Clone)]
pub struct AppState {
    pub environment: Arc<EnvironmentVariables>,
    pub database: DatabaseService,
    pub redis: RedisService,
    pub suggested: Arc<SuggestedTopics>,
}

impl AppState {
    /// Creates a new AppState wired to Redis and PostgreSQL (private constructor)
    fn new() -> anyhow::Result<Self> {
        let environment: EnvironmentVariables = EnvironmentVariables::load()?;
        let environment_arc: Arc<EnvironmentVariables> = Arc::new(environment);

        // Create services
        let database: DatabaseService = DatabaseService::new(environment_arc.clone());
        let redis: RedisService = RedisService::new(environment_arc.clone())?;

        let forum: Arc<RedisForumStore> = Arc::new(RedisForumStore::new(redis.clone()));
        let search: Arc<PostgresTopicSearch> = Arc::new(PostgresTopicSearch::new(database.clone()));
        let suggested: SuggestedTopics = SuggestedTopics::new(
            forum.clone(),
            forum.clone(),
            search,
            forum.clone(),
            forum,
        )
        .with_cutoff_unit_ms(environment_arc.suggested_cutoff_unit_ms);

        Ok(Self {
            environment: environment_arc,
            database,
            redis,
            suggested: Arc::new(suggested),
        })
    }

    /// Builds a state around an already wired suggestion engine.
    /// Database and Redis clients are created but never connected.
    pub fn with_suggested(
        environment: EnvironmentVariables,
        suggested: SuggestedTopics,
    ) -> anyhow::Result<Self> {
        let environment_arc: Arc<EnvironmentVariables> = Arc::new(environment);
        let suggested: SuggestedTopics =
            suggested.with_cutoff_unit_ms(environment_arc.suggested_cutoff_unit_ms);

        Ok(Self {
            database: DatabaseService::new(environment_arc.clone()),
            redis: RedisService::new(environment_arc.clone())?,
            environment: environment_arc,
            suggested: Arc::new(suggested),
        })
    }

    /// Returns the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: Lazy<AppState> = Lazy::new(|| {
            AppState::new().expect("Failed to initialize AppState")
        });
        &INSTANCE
    }

    /// Connects PostgreSQL (creating the search schema) and verifies Redis
    pub async fn init_services() -> anyhow::Result<()> {
        let instance: &'static AppState = Self::instance();

        instance.database.initialize().await?;
        instance.redis.initialize().await?;

        tracing::info!("Services (DB + Redis) initialized successfully");
        Ok(())
    }

    /// Gracefully shutdown all database connections
    pub async fn shutdown() {
        let instance: &'static AppState = Self::instance();
        instance.database.shutdown().await;
        instance.redis.shutdown().await;
    }
}
