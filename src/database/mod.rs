// Redis and PostgreSQL clients and the forum stores built on them

pub mod postgres_search;
pub mod postgres_service;
pub mod redis_forum;
pub mod redis_manager;

pub use postgres_search::PostgresTopicSearch;
pub use postgres_service::DatabaseService;
pub use redis_forum::RedisForumStore;
pub use redis_manager::RedisService;
