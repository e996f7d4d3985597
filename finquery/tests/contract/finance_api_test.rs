//! Contract Test: POST /finance

use crate::support::{json_request, member_token, GatewayOptions, TestGateway};
use axum::http::{Method, StatusCode};
use finquery::audit::types::fingerprint;
use finquery::audit::QuestionLogStore;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn answers_and_records_the_question() {
    let gw = TestGateway::start().await;
    gw.mock_answer("Diversify across asset classes.").await;

    let (status, _, body) = gw
        .send(json_request(
            Method::POST,
            "/finance",
            json!({
                "vcJwt": member_token(),
                "info": { "question": "  How should I allocate my savings?  " }
            }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Finance data processed successfully",
            "data": { "answer": "Diversify across asset classes." }
        })
    );

    let entries = QuestionLogStore::new(&gw.log_path).read_all().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].question, "How should I allocate my savings?");
    assert_eq!(
        entries[0].hash,
        fingerprint("How should I allocate my savings?")
    );
    assert!(gw.raw_log().unwrap().ends_with("**"));
}

#[tokio::test]
async fn uses_finance_persona_regardless_of_keywords() {
    let gw = TestGateway::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system", "content": "WealthWhisperer is your personal financial guru, leveraging proprietary data and sophisticated algorithms to deliver tailored financial advice, empowering you to make informed decisions for a prosperous future." },
                { "role": "user", "content": "Is now a good time to buy?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-persona",
            "choices": [{ "message": { "content": "It depends." } }]
        })))
        .expect(1)
        .mount(&gw.answers)
        .await;

    let (status, _, _) = gw
        .send(json_request(
            Method::POST,
            "/finance",
            json!({ "vcJwt": member_token(), "info": { "question": "Is now a good time to buy?" } }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn long_question_is_truncated_in_log_but_hashed_in_full() {
    let gw = TestGateway::start().await;
    gw.mock_answer("ok").await;
    let question = "b".repeat(650);

    let (status, _, _) = gw
        .send(json_request(
            Method::POST,
            "/finance",
            json!({ "vcJwt": member_token(), "info": { "question": question } }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let entries = QuestionLogStore::new(&gw.log_path).read_all().await.unwrap();
    assert_eq!(entries[0].question, "b".repeat(200));
    assert_eq!(entries[0].hash, fingerprint(&"b".repeat(500)));
}

#[tokio::test]
async fn invalid_question_is_400_and_not_logged() {
    let gw = TestGateway::start().await;

    for payload in [
        json!({ "vcJwt": member_token() }),
        json!({ "vcJwt": member_token(), "info": { "question": 42 } }),
        json!({ "vcJwt": member_token(), "info": { "question": "   " } }),
        json!({ "vcJwt": member_token(), "info": "question" }),
    ] {
        let (status, _, body) = gw.send(json_request(Method::POST, "/finance", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Invalid question format" }));
    }
    assert!(gw.raw_log().is_none());
    assert!(gw.answers.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn provider_failure_is_500_and_not_logged() {
    let gw = TestGateway::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream at 10.1.2.3 down"))
        .mount(&gw.answers)
        .await;

    let (status, _, body) = gw
        .send(json_request(
            Method::POST,
            "/finance",
            json!({ "vcJwt": member_token(), "info": { "question": "Should I refinance?" } }),
        ))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Failed to generate response" }));
    assert!(gw.raw_log().is_none());
}

#[tokio::test]
async fn provider_failure_detail_is_exposed_in_development() {
    let gw = TestGateway::start_with(GatewayOptions {
        expose_error_details: true,
        ..Default::default()
    })
    .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&gw.answers)
        .await;

    let (status, _, body) = gw
        .send(json_request(
            Method::POST,
            "/finance",
            json!({ "vcJwt": member_token(), "info": { "question": "Should I refinance?" } }),
        ))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to generate response");
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn log_write_failure_does_not_fail_the_request() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let gw = TestGateway::start_with(GatewayOptions {
        log_path: Some(blocker.join("queries.log")),
        ..Default::default()
    })
    .await;
    gw.mock_answer("Still answered.").await;

    let (status, _, body) = gw
        .send(json_request(
            Method::POST,
            "/finance",
            json!({ "vcJwt": member_token(), "info": { "question": "What is an ETF?" } }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["answer"], "Still answered.");
}
