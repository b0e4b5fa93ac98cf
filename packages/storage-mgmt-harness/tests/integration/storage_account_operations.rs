//! Storage account operation tests.
//!
//! Every test sets up its own fixture (one baseline account) and tears it
//! down at the end. Tests are serialized because against a live endpoint
//! they share the account namespace.

use serial_test::serial;
use storage_mgmt_client::ErrorKind;
use storage_mgmt_core::models::{
    GeoRegionNames, StorageAccountCreateParameters, StorageAccountRegenerateKeysParameters,
    StorageAccountUpdateParameters, StorageKeyType,
};
use storage_mgmt_harness::{test_account_name, CleanupReport, StorageAccountFixture};

fn assert_clean(report: &CleanupReport) {
    assert!(report.is_clean(), "teardown failed: {}", report);
}

#[tokio::test]
#[serial]
async fn test_create_storage_account_success() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;
    let account_name = test_account_name("csas");

    // Arrange
    let parameters = StorageAccountCreateParameters::new(
        &account_name,
        "create storage account success",
        GeoRegionNames::SOUTHCENTRALUS,
    )
    .with_geo_replication(false);

    // Act
    let response = fixture.accounts().create(&parameters).await?;

    // Assert
    assert_eq!(response.status_code, 200);
    assert!(response.request_id.is_some());

    let report = fixture.tear_down().await;
    assert_clean(&report);
    assert!(report.deleted.contains(&account_name));
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_get_storage_account_success() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;

    // Act
    let response = fixture.accounts().get(fixture.account_name()).await?;

    // Assert
    assert_eq!(response.status_code, 200);
    assert!(response.request_id.is_some());
    let account = &response.storage_account;
    assert_eq!(account.name, fixture.account_name());
    assert!(!account.uri.is_empty());
    assert_eq!(
        account.properties.location.as_deref(),
        Some(GeoRegionNames::SOUTHCENTRALUS)
    );
    if !fixture.environment().is_live() {
        assert!(account.extended_properties.is_empty());
    }
    assert_eq!(account.properties.label, "Description1");
    assert!(!account.properties.geo_replication_enabled);

    assert_clean(&fixture.tear_down().await);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_check_availability_success() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;

    // Act
    let response = fixture
        .accounts()
        .check_name_availability(&test_account_name("cas"))
        .await?;

    // Assert
    assert!(response.is_available);
    assert!(response.reason.is_none());

    assert_clean(&fixture.tear_down().await);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_name_of_existing_account_is_unavailable() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;

    let response = fixture
        .accounts()
        .check_name_availability(fixture.account_name())
        .await?;

    assert!(!response.is_available);
    assert!(response.reason.is_some());

    assert_clean(&fixture.tear_down().await);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_get_keys_success() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;

    // Act
    let response = fixture.accounts().get_keys(fixture.account_name()).await?;

    // Assert
    assert_eq!(response.status_code, 200);
    assert!(response.request_id.is_some());
    assert!(!response.primary_key.is_empty());
    assert!(!response.secondary_key.is_empty());
    assert_ne!(response.primary_key, response.secondary_key);

    assert_clean(&fixture.tear_down().await);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_regenerate_keys_success() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;

    // Arrange
    let parameters = StorageAccountRegenerateKeysParameters {
        name: fixture.account_name().to_string(),
        key_type: StorageKeyType::Primary,
    };
    let before = fixture.accounts().get_keys(fixture.account_name()).await?;
    assert_eq!(before.status_code, 200);
    assert!(before.request_id.is_some());

    // Act
    let regenerated = fixture.accounts().regenerate_keys(&parameters).await?;

    // Assert
    assert_eq!(regenerated.status_code, 200);
    assert!(regenerated.request_id.is_some());
    assert_ne!(regenerated.primary_key, before.primary_key);
    assert_eq!(regenerated.secondary_key, before.secondary_key);

    let after = fixture.accounts().get_keys(fixture.account_name()).await?;
    assert_eq!(after.primary_key, regenerated.primary_key);

    assert_clean(&fixture.tear_down().await);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_list_storage_accounts_success() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;

    // Act
    let response = fixture.accounts().list().await?;

    // Assert
    assert_eq!(response.status_code, 200);
    assert!(response
        .storage_accounts
        .iter()
        .any(|account| account.name == fixture.account_name()));

    assert_clean(&fixture.tear_down().await);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_update_storage_account_success() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;

    // Arrange
    let account_name = test_account_name("03");
    let create_parameters = StorageAccountCreateParameters::new(
        &account_name,
        "testUpdateLabel3",
        GeoRegionNames::SOUTHCENTRALUS,
    )
    .with_geo_replication(true);

    // Act
    let created = fixture.accounts().create(&create_parameters).await?;
    assert_eq!(created.status_code, 200);

    let update_parameters = StorageAccountUpdateParameters {
        label: Some("testStorageAccountUpdatedLabel3".to_string()),
        description: Some("updatedStorageAccountsuccess3".to_string()),
        geo_replication_enabled: Some(false),
        ..Default::default()
    };
    let updated = fixture
        .accounts()
        .update(&account_name, &update_parameters)
        .await?;

    // Assert
    assert_eq!(updated.status_code, 200);
    assert!(updated.request_id.is_some());

    let fetched = fixture.accounts().get(&account_name).await?;
    let properties = &fetched.storage_account.properties;
    assert_eq!(properties.label, "testStorageAccountUpdatedLabel3");
    assert_eq!(
        properties.description.as_deref(),
        Some("updatedStorageAccountsuccess3")
    );
    assert!(!properties.geo_replication_enabled);

    assert_clean(&fixture.tear_down().await);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_delete_storage_account_success() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;
    let account_name = fixture.account_name().to_string();

    let response = fixture.accounts().delete(&account_name).await?;
    assert_eq!(response.status_code, 200);
    assert!(response.request_id.is_some());

    let err = fixture.accounts().get(&account_name).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
    assert!(err.is_not_found());

    let report = fixture.tear_down().await;
    assert_clean(&report);
    assert!(!report.deleted.contains(&account_name));
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_get_unknown_account_is_not_found() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;

    let err = fixture
        .accounts()
        .get(&test_account_name("missing"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
    assert_eq!(err.status(), Some(404));
    assert!(err.request_id().is_some());

    assert_clean(&fixture.tear_down().await);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_duplicate_create_conflicts() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;

    let parameters = StorageAccountCreateParameters::new(
        fixture.account_name(),
        "duplicate",
        GeoRegionNames::SOUTHCENTRALUS,
    );
    let err = fixture.accounts().create(&parameters).await.unwrap_err();
    assert_eq!(err.status(), Some(409));

    assert_clean(&fixture.tear_down().await);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_invalid_name_is_rejected() -> anyhow::Result<()> {
    let fixture = StorageAccountFixture::set_up().await?;

    let parameters = StorageAccountCreateParameters::new(
        "AZTST_Invalid",
        "invalid",
        GeoRegionNames::SOUTHCENTRALUS,
    );
    let err = fixture.accounts().create(&parameters).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
    assert_eq!(err.status(), Some(400));

    assert_clean(&fixture.tear_down().await);
    Ok(())
}
