use anyhow::Result;
use async_trait::async_trait;
use httpmock::prelude::*;
use slot_notifier::adapters::http::hash_code;
use slot_notifier::config::toml_config::{ApiConfig, DEFAULT_USER_AGENT};
use slot_notifier::core::{Prompt, SlotSource};
use slot_notifier::domain::model::{LocationTarget, OtpChallenge};
use slot_notifier::{AppointmentClient, PollingNotifier, WatchError};
use std::sync::Mutex;
use std::time::Duration;

fn client_for(server: &MockServer) -> AppointmentClient {
    let config = ApiConfig {
        base_url: server.base_url(),
        timeout_seconds: Some(5),
        user_agent: None,
    };
    AppointmentClient::new(&config).unwrap()
}

struct ScriptedPrompt {
    answers: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().rev().map(|a| a.to_string()).collect()),
        }
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn ask(&self, _message: &str) -> slot_notifier::Result<String> {
        self.answers
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| WatchError::InputError {
                message: "no scripted answer left".to_string(),
            })
    }
}

#[tokio::test]
async fn test_request_code_sends_mobile_with_browser_headers() -> Result<()> {
    let server = MockServer::start_async().await;
    let otp_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/public/generateOTP")
                .header("accept", "application/json")
                .header("content-type", "application/json")
                .header("user-agent", DEFAULT_USER_AGENT)
                .json_body(serde_json::json!({ "mobile": "9876543210" }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({ "txnId": "a1b2c3d4" }));
        })
        .await;

    let client = client_for(&server);
    let challenge = client.request_code("9876543210").await?;

    otp_mock.assert_async().await;
    assert_eq!(challenge.txn_id, "a1b2c3d4");
    assert_eq!(challenge.phone_number, "9876543210");
    Ok(())
}

#[tokio::test]
async fn test_request_code_without_txn_id_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/public/generateOTP");
            then.status(200).json_body(serde_json::json!({ "message": "ok" }));
        })
        .await;

    let err = client_for(&server)
        .request_code("9876543210")
        .await
        .unwrap_err();

    assert!(matches!(err, WatchError::CodeRequestError { .. }));
}

#[tokio::test]
async fn test_request_code_rejected_by_server() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/public/generateOTP");
            then.status(400)
                .json_body(serde_json::json!({ "errorCode": "USRAUT0001", "error": "Invalid mobile" }));
        })
        .await;

    let err = client_for(&server).request_code("12").await.unwrap_err();

    match err {
        WatchError::CodeRequestError { message } => assert!(message.contains("400")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_confirm_code_sends_sha256_digest() -> Result<()> {
    let server = MockServer::start_async().await;
    let confirm_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/public/confirmOTP")
                .json_body(serde_json::json!({
                    "otp": "8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92",
                    "txnId": "a1b2c3d4"
                }));
            then.status(200)
                .json_body(serde_json::json!({ "token": "eyJhbGciOiJIUzI1NiJ9.test" }));
        })
        .await;

    let challenge = OtpChallenge {
        phone_number: "9876543210".to_string(),
        txn_id: "a1b2c3d4".to_string(),
    };
    let client = client_for(&server);

    // 相同輸入兩次都送出相同摘要
    let first = client.confirm_code(&challenge, "123456").await?;
    let second = client.confirm_code(&challenge, "123456").await?;

    confirm_mock.assert_hits_async(2).await;
    assert_eq!(first.token(), "eyJhbGciOiJIUzI1NiJ9.test");
    assert_eq!(first, second);
    assert_eq!(hash_code("123456"), hash_code("123456"));
    assert_ne!(hash_code("123456"), hash_code("654321"));
    Ok(())
}

#[tokio::test]
async fn test_confirm_code_rejected_is_confirm_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/public/confirmOTP");
            then.status(401).body("Invalid OTP");
        })
        .await;

    let challenge = OtpChallenge {
        phone_number: "9876543210".to_string(),
        txn_id: "a1b2c3d4".to_string(),
    };
    let err = client_for(&server)
        .confirm_code(&challenge, "000000")
        .await
        .unwrap_err();

    assert!(matches!(err, WatchError::ConfirmError { .. }));
}

#[tokio::test]
async fn test_failed_authentication_never_polls() -> Result<()> {
    let server = MockServer::start_async().await;
    let otp_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/public/generateOTP");
            then.status(200).json_body(serde_json::json!({ "txnId": "a1b2c3d4" }));
        })
        .await;
    let confirm_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/public/confirmOTP");
            then.status(200).json_body(serde_json::json!({ "token": "" }));
        })
        .await;
    let sessions_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/appointment/sessions/calendarByDistrict");
            then.status(200).json_body(serde_json::json!({ "centers": [] }));
        })
        .await;

    let poller = PollingNotifier::new(
        client_for(&server),
        vec![LocationTarget::new("Test District", 1, 18)?],
        Duration::ZERO,
    )
    .with_max_rounds(Some(1));
    let prompt = ScriptedPrompt::new(&["9876543210", "123456"]);

    let err = poller.watch(&prompt, None).await.unwrap_err();

    assert!(matches!(err, WatchError::ConfirmError { .. }));
    otp_mock.assert_async().await;
    confirm_mock.assert_async().await;
    assert_eq!(sessions_mock.hits_async().await, 0);
    Ok(())
}
