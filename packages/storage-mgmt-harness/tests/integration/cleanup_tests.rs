//! Teardown behaviour, against the emulator and a scripted mock server.

use serde_json::json;
use storage_mgmt_client::{ErrorKind, StorageManagementClient};
use storage_mgmt_core::config::{EmulatorConfig, ManagementConfig};
use storage_mgmt_core::models::{GeoRegionNames, StorageAccountCreateParameters};
use storage_mgmt_harness::{
    delete_accounts_with_prefix, test_account_name, StorageAccountFixture, TestEnvironment,
    TEST_ACCOUNT_PREFIX,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCOUNTS: &str = "/sub-1/services/storageservices";

fn client_for(uri: &str) -> StorageManagementClient {
    StorageManagementClient::new(ManagementConfig {
        subscription_id: "sub-1".to_string(),
        request_timeout_ms: 5000,
        ..ManagementConfig::for_endpoint(uri)
    })
    .unwrap()
}

fn listing(names: &[&str]) -> serde_json::Value {
    let accounts: Vec<_> = names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "uri": format!("https://mgmt.example{}/{}", ACCOUNTS, name),
                "properties": {
                    "label": "label",
                    "location": GeoRegionNames::SOUTHCENTRALUS,
                    "geoReplicationEnabled": false,
                    "status": "Created",
                    "endpoints": []
                },
                "extendedProperties": {}
            })
        })
        .collect();
    json!({"success": true, "data": {"storageAccounts": accounts}})
}

#[tokio::test]
async fn test_teardown_deletes_only_prefixed_accounts() {
    let environment = TestEnvironment::emulated(EmulatorConfig::default())
        .await
        .unwrap();
    let accounts = environment.client().storage_accounts();

    let extra = test_account_name("extra");
    let params = StorageAccountCreateParameters::new(&extra, "extra", GeoRegionNames::WESTUS);
    accounts.create(&params).await.unwrap();
    let params = StorageAccountCreateParameters::new("keepme", "keep", GeoRegionNames::WESTUS);
    accounts.create(&params).await.unwrap();

    let fixture = StorageAccountFixture::set_up_in(environment).await.unwrap();
    let baseline = fixture.account_name().to_string();
    let registry = fixture
        .environment()
        .emulator()
        .map(|emulator| emulator.registry.clone())
        .unwrap();
    assert_eq!(registry.len(), 3);

    let report = fixture.tear_down().await;

    assert!(report.is_clean(), "{}", report);
    assert_eq!(report.deleted.len(), 2);
    assert!(report.deleted.contains(&baseline));
    assert!(report.deleted.contains(&extra));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_list_failure_is_reported_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ACCOUNTS))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": {"code": "InternalError", "message": "listing broke"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = delete_accounts_with_prefix(&client_for(&server.uri()), TEST_ACCOUNT_PREFIX).await;

    assert!(!report.is_clean());
    assert!(report.deleted.is_empty());
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.account, None);
    assert_eq!(failure.kind, ErrorKind::Service);
    assert!(failure.message.contains("listing broke"));
}

#[tokio::test]
async fn test_delete_failure_does_not_stop_the_pass() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ACCOUNTS))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(listing(&["aztstone", "aztsttwo", "other"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/aztstone", ACCOUNTS)))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "error": {"code": "ConflictError", "message": "account is busy"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/aztsttwo", ACCOUNTS)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/other", ACCOUNTS)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = delete_accounts_with_prefix(&client_for(&server.uri()), TEST_ACCOUNT_PREFIX).await;

    assert_eq!(report.deleted, vec!["aztsttwo".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].account.as_deref(), Some("aztstone"));
    assert_eq!(report.failures_of(ErrorKind::Service).count(), 1);
    assert!(report.to_string().contains("aztstone [service]"));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_io_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let report =
        delete_accounts_with_prefix(&client_for(&format!("http://{}", addr)), TEST_ACCOUNT_PREFIX)
            .await;

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, ErrorKind::Io);
    assert!(report.failures[0].account.is_none());
}

#[tokio::test]
async fn test_fixture_against_token_protected_emulator() {
    let environment = TestEnvironment::emulated(EmulatorConfig {
        subscription_id: Some("sub-1".to_string()),
        bearer_token: Some("secret".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();
    assert!(!environment.is_live());
    assert_eq!(environment.client().subscription_id(), "sub-1");

    let fixture = StorageAccountFixture::set_up_in(environment).await.unwrap();
    let keys = fixture
        .accounts()
        .get_keys(fixture.account_name())
        .await
        .unwrap();
    assert_ne!(keys.primary_key, keys.secondary_key);

    // A client without the token is turned away.
    let emulator = fixture.environment().emulator().unwrap();
    let anonymous = StorageManagementClient::new(ManagementConfig {
        subscription_id: "sub-1".to_string(),
        ..ManagementConfig::for_endpoint(emulator.base_uri())
    })
    .unwrap();
    let err = anonymous.storage_accounts().list().await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let report = fixture.tear_down().await;
    assert!(report.is_clean(), "{}", report);
    assert_eq!(report.deleted.len(), 1);
}
