// Library root for the suggested topics service

pub mod api;
pub mod config;
pub mod core;
pub mod database;
pub mod topics;
pub mod utils;

pub use crate::config::environment::EnvironmentVariables;
pub use crate::config::state::AppState;
pub use crate::core::server::create_app;
pub use crate::topics::{PageWindow, SuggestedTopics, Topic};
