//! tests/suggested/filtering.rs
//! Blocked authors and unreadable categories never reach the viewer.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

async fn suggested_for(base_url: &str, uid: &str) -> Vec<u64> {
    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/topics/1/suggested", base_url))
        .header("x-user-id", uid)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = resp.json().await.unwrap();
    json["data"]["topics"]
        .as_array()
        .expect("topics array")
        .iter()
        .map(|t| t["tid"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn hides_topics_by_blocked_authors() {
    let (base_url, forum) = common::spawn_seeded_app().await;
    forum.block(20, 11).await;

    let found: Vec<u64> = suggested_for(&base_url, "20").await;
    assert!(!found.contains(&2));
    assert!(found.contains(&3));

    // Blocks are per viewer.
    let found: Vec<u64> = suggested_for(&base_url, "21").await;
    assert!(found.contains(&2));
}

#[tokio::test]
async fn hides_topics_in_unreadable_categories() {
    let (base_url, forum) = common::spawn_seeded_app().await;
    forum.restrict_category(2, [30]).await;

    assert!(!suggested_for(&base_url, "20").await.contains(&3));
    assert!(suggested_for(&base_url, "30").await.contains(&3));
}

#[tokio::test]
async fn marks_unread_topics_for_signed_in_viewers() {
    let (base_url, forum) = common::spawn_seeded_app().await;
    forum.mark_read(20, 2, i64::MAX).await;

    let json: Value = reqwest::Client::new()
        .get(format!("{}/topics/1/suggested", base_url))
        .header("x-user-id", "20")
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .unwrap();

    for topic in json["data"]["topics"].as_array().unwrap() {
        let expected_unread: bool = topic["tid"] != 2;
        assert_eq!(topic["unread"], expected_unread);
    }
}
