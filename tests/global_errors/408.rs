//! tests/global_errors/408.rs
//! A search backend slower than the request timeout yields HTTP 408.

#[path = "../mod.rs"]
mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use suggested_topics::topics::memory::InMemoryForum;
use suggested_topics::topics::sources::{SearchQuery, SearchResult, TopicSearch};
use suggested_topics::topics::SuggestedTopics;

struct SlowSearch;

#[async_trait]
impl TopicSearch for SlowSearch {
    async fn search(&self, _query: &SearchQuery) -> anyhow::Result<SearchResult> {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Ok(SearchResult::default())
    }
}

#[tokio::test]
async fn returns_408_when_suggestions_time_out() {
    let forum: Arc<InMemoryForum> = common::seeded_forum().await;
    let suggested: SuggestedTopics = SuggestedTopics::new(
        forum.clone(),
        forum.clone(),
        Arc::new(SlowSearch),
        forum.clone(),
        forum.clone(),
    );
    let base_url: String = common::spawn_app(
        suggested,
        common::test_env(&[("DEFAULT_TIMEOUT_SECONDS", "1")]),
    );

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/topics/1/suggested", base_url))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "REQUEST_TIMEOUT");
    assert_eq!(json["code"], 408);
}
