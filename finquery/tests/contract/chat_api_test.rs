//! Contract Test: POST /chat

use crate::support::{json_request, TestGateway};
use axum::http::{Method, StatusCode};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const CHAT_PROMPT: &str = "You are a chatbot, Please reply politely to the following questions.";

#[tokio::test]
async fn plain_question_uses_chat_persona() {
    let gw = TestGateway::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system", "content": CHAT_PROMPT },
                { "role": "user", "content": "What's the weather like on Mars?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-chat",
            "choices": [{ "message": { "content": "Cold and dusty." } }]
        })))
        .expect(1)
        .mount(&gw.answers)
        .await;

    let (status, _, body) = gw
        .send(json_request(
            Method::POST,
            "/chat",
            json!({ "question": "What's the weather like on Mars?" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Cold and dusty.", "data": null }));
}

#[tokio::test]
async fn finance_keyword_switches_persona_without_logging() {
    let gw = TestGateway::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{ "role": "system", "content": "WealthWhisperer is your personal financial guru, leveraging proprietary data and sophisticated algorithms to deliver tailored financial advice, empowering you to make informed decisions for a prosperous future." }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-fin",
            "choices": [{ "message": { "content": "Write a plan." } }]
        })))
        .expect(1)
        .mount(&gw.answers)
        .await;

    let (status, _, body) = gw
        .send(json_request(
            Method::POST,
            "/chat",
            json!({ "question": "How do I grow my Business?" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Write a plan.");
    assert!(gw.raw_log().is_none());
}

#[tokio::test]
async fn invalid_question_is_400() {
    let gw = TestGateway::start().await;
    for payload in [
        json!({}),
        json!({ "question": ["a"] }),
        json!({ "question": "" }),
        json!({ "question": " \n\t " }),
    ] {
        let (status, _, body) = gw.send(json_request(Method::POST, "/chat", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Invalid question format" }));
    }
    assert!(gw.answers.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_400() {
    let gw = TestGateway::start().await;
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"question\": "))
        .unwrap();
    let (status, _, body) = gw.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid question format");
}

#[tokio::test]
async fn provider_failure_is_500() {
    let gw = TestGateway::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&gw.answers)
        .await;

    let (status, _, body) = gw
        .send(json_request(Method::POST, "/chat", json!({ "question": "hi" })))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Failed to generate response" }));
}
