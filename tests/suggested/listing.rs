//! tests/suggested/listing.rs
//! Suggestions come back in the envelope, newest first, within the window.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

fn tids(json: &Value) -> Vec<u64> {
    json["data"]["topics"]
        .as_array()
        .expect("topics array")
        .iter()
        .map(|t| t["tid"].as_u64().unwrap())
        .collect()
}

fn timestamps(json: &Value) -> Vec<i64> {
    json["data"]["topics"]
        .as_array()
        .expect("topics array")
        .iter()
        .map(|t| t["timestamp"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn lists_related_topics_newest_first() {
    let (base_url, _forum) = common::spawn_seeded_app().await;

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/topics/1/suggested", base_url))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "OK");
    assert_eq!(json["data"]["tid"], 1);

    let mut found: Vec<u64> = tids(&json);
    assert!(!found.contains(&1));
    found.sort();
    assert_eq!(found, vec![2, 3, 4, 5]);

    let stamps: Vec<i64> = timestamps(&json);
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn respects_requested_window() {
    let (base_url, _forum) = common::spawn_seeded_app().await;

    let json: Value = reqwest::Client::new()
        .get(format!("{}/topics/1/suggested?start=0&stop=1", base_url))
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .unwrap();

    assert_eq!(tids(&json).len(), 2);
    let stamps: Vec<i64> = timestamps(&json);
    assert!(stamps[0] >= stamps[1]);
}

#[tokio::test]
async fn unbounded_stop_skips_category_top_up() {
    let (base_url, _forum) = common::spawn_seeded_app().await;

    let json: Value = reqwest::Client::new()
        .get(format!("{}/topics/1/suggested?stop=-1", base_url))
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .unwrap();

    let mut found: Vec<u64> = tids(&json);
    found.sort();
    assert_eq!(found, vec![2, 3, 4]);
}

#[tokio::test]
async fn cutoff_limits_candidates_to_recent_topics() {
    let (base_url, _forum) = common::spawn_seeded_app().await;

    let json: Value = reqwest::Client::new()
        .get(format!("{}/topics/1/suggested?cutoff=3", base_url))
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .unwrap();

    assert_eq!(tids(&json), vec![2]);
}

#[tokio::test]
async fn unknown_topic_has_no_suggestions() {
    let (base_url, _forum) = common::spawn_seeded_app().await;

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/topics/999/suggested", base_url))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = resp.json().await.unwrap();
    assert!(tids(&json).is_empty());
}

#[tokio::test]
async fn health_reports_status() {
    let (base_url, _forum) = common::spawn_seeded_app().await;

    let json: Value = reqwest::Client::new()
        .get(format!("{}/health", base_url))
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .unwrap();

    assert_eq!(json["code"], 200);
    assert_eq!(json["data"]["status"], "healthy");
}
