//! tests/mod.rs
//! Shared helpers: an in-memory forum and the Axum app spawned on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::serve;
use chrono::Utc;
use suggested_topics::config::{environment::EnvironmentVariables, state::AppState};
use suggested_topics::create_app;
use suggested_topics::topics::memory::InMemoryForum;
use suggested_topics::topics::{SuggestedTopics, Topic};
use tokio::net::TcpListener as TokioTcpListener;

pub const DAY_MS: i64 = 86_400_000;

/// Configuration built from explicit variables only, never from `.env`
pub fn test_env(pairs: &[(&str, &str)]) -> EnvironmentVariables {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvironmentVariables::from_vars(&vars).expect("Invalid test configuration")
}

pub fn topic(tid: u64, cid: u64, uid: u64, title: &str, age_days: i64, tags: &[&str]) -> Topic {
    let at: i64 = Utc::now().timestamp_millis() - age_days * DAY_MS - 3_600_000;
    Topic {
        tid,
        cid,
        uid,
        title: title.to_string(),
        slug: format!("{tid}/topic-{tid}"),
        timestamp: at,
        last_post_time: at,
        post_count: 1,
        view_count: 0,
        deleted: false,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        unread: false,
    }
}

/// Topic 1 has tag neighbours 2 and 3, title neighbour 4 and category neighbour 5
pub async fn seeded_forum() -> Arc<InMemoryForum> {
    let forum: Arc<InMemoryForum> = Arc::new(InMemoryForum::default());
    forum.insert_topic(topic(1, 1, 10, "Async traits in Rust", 1, &["rust", "async"])).await;
    forum.insert_topic(topic(2, 1, 11, "Tokio runtime tuning", 2, &["async"])).await;
    forum.insert_topic(topic(3, 2, 12, "Borrow checker puzzles", 3, &["rust"])).await;
    forum.insert_topic(topic(4, 1, 13, "Rust traits explained", 4, &[])).await;
    forum.insert_topic(topic(5, 1, 14, "Gardening tips", 5, &[])).await;
    forum.insert_topic(topic(6, 3, 15, "Cooking pasta", 6, &[])).await;
    forum
}

pub fn engine(forum: &Arc<InMemoryForum>) -> SuggestedTopics {
    SuggestedTopics::new(
        forum.clone(),
        forum.clone(),
        forum.clone(),
        forum.clone(),
        forum.clone(),
    )
}

/// Spawns the app on a random unused port and returns its base URL.
pub fn spawn_app(suggested: SuggestedTopics, env: EnvironmentVariables) -> String {
    let state: AppState = AppState::with_suggested(env, suggested)
        .expect("Failed to build application state");
    let app = create_app(state);

    // * Bind an ephemeral port using std::net::TcpListener.
    let std_listener: std::net::TcpListener = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    std_listener.set_nonblocking(true).unwrap();

    let tokio_listener: TokioTcpListener = TokioTcpListener::from_std(std_listener)
        .expect("Failed to convert to tokio listener");
    let addr: std::net::SocketAddr = tokio_listener.local_addr().unwrap();

    tokio::spawn(async move {
        serve(tokio_listener, app)
            .await
            .expect("Server failed");
    });

    format!("http://{}", addr)
}

/// Spawns the app over the seeded forum with default settings
pub async fn spawn_seeded_app() -> (String, Arc<InMemoryForum>) {
    let forum: Arc<InMemoryForum> = seeded_forum().await;
    let base_url: String = spawn_app(engine(&forum), test_env(&[]));
    (base_url, forum)
}
