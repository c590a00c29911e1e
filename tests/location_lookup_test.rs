use httpmock::prelude::*;
use slot_notifier::config::toml_config::ApiConfig;
use slot_notifier::{AppointmentClient, WatchError};

fn client_for(server: &MockServer) -> AppointmentClient {
    let config = ApiConfig {
        base_url: server.base_url(),
        timeout_seconds: Some(5),
        user_agent: None,
    };
    AppointmentClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_list_states() {
    let server = MockServer::start_async().await;
    let states_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/admin/location/states");
            then.status(200).json_body(serde_json::json!({
                "states": [
                    { "state_id": 9, "state_name": "Delhi" },
                    { "state_id": 12, "state_name": "Haryana" }
                ],
                "ttl": 24
            }));
        })
        .await;

    let states = client_for(&server).list_states().await.unwrap();

    states_mock.assert_async().await;
    assert_eq!(states.len(), 2);
    assert_eq!(states[1].state_id, 12);
    assert_eq!(states[1].state_name, "Haryana");
}

#[tokio::test]
async fn test_list_districts_for_state() {
    let server = MockServer::start_async().await;
    let districts_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/admin/location/districts/12");
            then.status(200).json_body(serde_json::json!({
                "districts": [
                    { "district_id": 195, "district_name": "Panipat" },
                    { "district_id": 186, "district_name": "Karnal" }
                ]
            }));
        })
        .await;

    let districts = client_for(&server).list_districts(12).await.unwrap();

    districts_mock.assert_async().await;
    assert_eq!(districts[0].district_id, 195);
    assert_eq!(districts[0].district_name, "Panipat");
}

#[test]
fn test_lookup_failure_is_metadata_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admin/location/states");
        then.status(503);
    });

    let client = client_for(&server);
    let err = tokio_test::block_on(client.list_states()).unwrap_err();

    assert!(matches!(err, WatchError::MetadataError { .. }));
}
