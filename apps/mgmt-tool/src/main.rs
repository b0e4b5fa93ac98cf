//! CLI for storage account management operations.
//!
//! Each subcommand issues one management call and prints the response as
//! JSON on stdout. Connection settings come from flags or the
//! `STORAGE_MGMT_*` environment variables.

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde_json::json;
use storage_mgmt_client::StorageManagementClient;
use storage_mgmt_core::config::{ManagementConfig, DEFAULT_API_VERSION, DEFAULT_SUBSCRIPTION_ID};
use storage_mgmt_core::models::{
    StorageAccountCreateParameters, StorageAccountRegenerateKeysParameters,
    StorageAccountUpdateParameters, StorageKeyType,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Command,
}

/// Where and how to reach the management service.
#[derive(ClapArgs, Debug)]
struct Connection {
    /// Base URI of the management service
    #[arg(long, env = "STORAGE_MGMT_ENDPOINT")]
    endpoint: String,

    /// Subscription the accounts live under
    #[arg(long, env = "STORAGE_MGMT_SUBSCRIPTION_ID", default_value = DEFAULT_SUBSCRIPTION_ID)]
    subscription_id: String,

    /// Bearer token sent with every request
    #[arg(long, env = "STORAGE_MGMT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "STORAGE_MGMT_TIMEOUT_MS", default_value_t = 30000)]
    timeout_ms: u64,

    /// Value of the x-ms-version header
    #[arg(long, env = "STORAGE_MGMT_API_VERSION", default_value = DEFAULT_API_VERSION)]
    api_version: String,
}

impl From<Connection> for ManagementConfig {
    fn from(connection: Connection) -> Self {
        ManagementConfig {
            endpoint: connection.endpoint,
            subscription_id: connection.subscription_id,
            bearer_token: connection.token.filter(|t| !t.is_empty()),
            api_version: connection.api_version,
            request_timeout_ms: connection.timeout_ms,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a storage account
    Create {
        name: String,
        #[arg(long)]
        label: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        geo_replication: bool,
        /// Extended property as key=value, repeatable
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Show one storage account
    Get { name: String },
    /// Change label, description, replication or extended properties
    Update {
        name: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        geo_replication: Option<bool>,
        /// Extended property as key=value, repeatable
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Delete a storage account
    Delete { name: String },
    /// List storage accounts
    List {
        /// Only show accounts whose name starts with this
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Show the access keys of an account
    Keys { name: String },
    /// Regenerate one access key
    RegenerateKeys {
        name: String,
        #[arg(long, value_enum, default_value_t = KeyType::Primary)]
        key_type: KeyType,
    },
    /// Check whether a name can be used for a new account
    CheckName { name: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KeyType {
    Primary,
    Secondary,
}

impl From<KeyType> for StorageKeyType {
    fn from(key_type: KeyType) -> Self {
        match key_type {
            KeyType::Primary => StorageKeyType::Primary,
            KeyType::Secondary => StorageKeyType::Secondary,
        }
    }
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = StorageManagementClient::new(cli.connection.into())
        .context("failed to build management client")?;
    let output = run(&client, cli.command).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(client: &StorageManagementClient, command: Command) -> anyhow::Result<serde_json::Value> {
    let accounts = client.storage_accounts();

    let output = match command {
        Command::Create {
            name,
            label,
            location,
            description,
            geo_replication,
            properties,
        } => {
            let mut parameters = StorageAccountCreateParameters::new(&name, label, location)
                .with_geo_replication(geo_replication);
            if let Some(description) = description {
                parameters = parameters.with_description(description);
            }
            for (key, value) in properties {
                parameters = parameters.with_extended_property(key, value);
            }
            let response = accounts
                .create(&parameters)
                .await
                .with_context(|| format!("create {} failed", name))?;
            json!({
                "statusCode": response.status_code,
                "requestId": response.request_id,
            })
        }
        Command::Get { name } => {
            let response = accounts
                .get(&name)
                .await
                .with_context(|| format!("get {} failed", name))?;
            json!({
                "statusCode": response.status_code,
                "requestId": response.request_id,
                "storageAccount": response.storage_account,
            })
        }
        Command::Update {
            name,
            label,
            description,
            geo_replication,
            properties,
        } => {
            let parameters = StorageAccountUpdateParameters {
                label,
                description,
                geo_replication_enabled: geo_replication,
                extended_properties: properties.into_iter().collect(),
            };
            let response = accounts
                .update(&name, &parameters)
                .await
                .with_context(|| format!("update {} failed", name))?;
            json!({
                "statusCode": response.status_code,
                "requestId": response.request_id,
            })
        }
        Command::Delete { name } => {
            let response = accounts
                .delete(&name)
                .await
                .with_context(|| format!("delete {} failed", name))?;
            json!({
                "statusCode": response.status_code,
                "requestId": response.request_id,
            })
        }
        Command::List { prefix } => {
            let response = accounts.list().await.context("list failed")?;
            let storage_accounts: Vec<_> = response
                .storage_accounts
                .into_iter()
                .filter(|account| {
                    prefix
                        .as_deref()
                        .map_or(true, |prefix| account.name.starts_with(prefix))
                })
                .collect();
            json!({
                "statusCode": response.status_code,
                "requestId": response.request_id,
                "storageAccounts": storage_accounts,
            })
        }
        Command::Keys { name } => {
            let response = accounts
                .get_keys(&name)
                .await
                .with_context(|| format!("keys of {} failed", name))?;
            json!({
                "statusCode": response.status_code,
                "requestId": response.request_id,
                "uri": response.uri,
                "primaryKey": response.primary_key,
                "secondaryKey": response.secondary_key,
            })
        }
        Command::RegenerateKeys { name, key_type } => {
            let parameters = StorageAccountRegenerateKeysParameters {
                name: name.clone(),
                key_type: key_type.into(),
            };
            let response = accounts
                .regenerate_keys(&parameters)
                .await
                .with_context(|| format!("regenerate keys of {} failed", name))?;
            json!({
                "statusCode": response.status_code,
                "requestId": response.request_id,
                "uri": response.uri,
                "primaryKey": response.primary_key,
                "secondaryKey": response.secondary_key,
            })
        }
        Command::CheckName { name } => {
            let response = accounts
                .check_name_availability(&name)
                .await
                .with_context(|| format!("check of {} failed", name))?;
            json!({
                "statusCode": response.status_code,
                "requestId": response.request_id,
                "name": name,
                "isAvailable": response.is_available,
                "reason": response.reason,
            })
        }
    };

    Ok(output)
}
