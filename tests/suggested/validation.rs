//! tests/suggested/validation.rs
//! Malformed requests are rejected with HTTP 400.

#[path = "../mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

async fn get(url: String, uid: Option<&str>) -> reqwest::Response {
    let mut request: reqwest::RequestBuilder = reqwest::Client::new().get(url);
    if let Some(uid) = uid {
        request = request.header("x-user-id", uid);
    }
    request.send().await.expect("Failed to execute request.")
}

#[tokio::test]
async fn rejects_stop_below_minus_one() {
    let (base_url, _forum) = common::spawn_seeded_app().await;

    let resp: reqwest::Response = get(format!("{}/topics/1/suggested?stop=-2", base_url), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "BAD_REQUEST");
    assert_eq!(json["data"]["error"], "invalid_window");
}

#[tokio::test]
async fn rejects_negative_start() {
    let (base_url, _forum) = common::spawn_seeded_app().await;

    let resp: reqwest::Response = get(format!("{}/topics/1/suggested?start=-1", base_url), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejects_malformed_user_id() {
    let (base_url, _forum) = common::spawn_seeded_app().await;

    let resp: reqwest::Response = get(format!("{}/topics/1/suggested", base_url), Some("someone")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["error"], "invalid_user_id");
}

#[tokio::test]
async fn rejects_non_numeric_topic_id() {
    let (base_url, _forum) = common::spawn_seeded_app().await;

    let resp: reqwest::Response = get(format!("{}/topics/abc/suggested", base_url), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["code"], 400);
}
