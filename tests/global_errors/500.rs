//! tests/global_errors/500.rs
//! A failing collaborator maps to an HTTP 500 with error details.

#[path = "../mod.rs"]
mod common;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use suggested_topics::topics::memory::InMemoryForum;
use suggested_topics::topics::sources::PrivilegeFilter;
use suggested_topics::topics::SuggestedTopics;

struct BrokenPrivileges;

#[async_trait]
impl PrivilegeFilter for BrokenPrivileges {
    async fn filter_tids(&self, _privilege: &str, _tids: Vec<u64>, _uid: u64) -> anyhow::Result<Vec<u64>> {
        Err(anyhow::anyhow!("privilege store unreachable"))
    }
}

#[tokio::test]
async fn returns_500_when_a_collaborator_fails() {
    let forum: Arc<InMemoryForum> = common::seeded_forum().await;
    let suggested: SuggestedTopics = SuggestedTopics::new(
        forum.clone(),
        forum.clone(),
        forum.clone(),
        Arc::new(BrokenPrivileges),
        forum.clone(),
    );
    let base_url: String = common::spawn_app(suggested, common::test_env(&[]));

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/topics/1/suggested", base_url))
        .send()
        .await
        .expect("Failed to make request.");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "INTERNAL_SERVER_ERROR");
    assert_eq!(json["code"], 500);
    assert_eq!(json["data"]["error"], "suggested_topics_failed");
}
