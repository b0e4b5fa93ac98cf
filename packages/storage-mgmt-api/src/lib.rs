//! REST emulator of the storage account management service.
//!
//! Serves the storage account routes (create, get, update, delete, list,
//! keys, key regeneration, name availability) from an in-memory
//! [`storage_mgmt_core::AccountRegistry`].

pub mod handlers;
pub mod router;
pub mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use storage_mgmt_core::config::EmulatorConfig;
use storage_mgmt_core::AccountRegistry;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// An emulator running on a background task.
pub struct RunningEmulator {
    /// Address the emulator accepts connections on
    pub addr: SocketAddr,
    /// Registry the emulator serves from
    pub registry: Arc<AccountRegistry>,
    handle: JoinHandle<()>,
}

impl RunningEmulator {
    /// Base URI clients should target.
    pub fn base_uri(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for RunningEmulator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Binds `addr` (port 0 picks an ephemeral port) and serves on a spawned task.
///
/// `config.public_base_uri` is replaced with the bound address so account
/// URIs point back at this emulator.
pub async fn spawn(addr: SocketAddr, mut config: EmulatorConfig) -> std::io::Result<RunningEmulator> {
    let listener = TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    config.public_base_uri = format!("http://{}", addr);

    let registry = Arc::new(AccountRegistry::new(config.public_base_uri.clone()));
    let router = router::Router::new(registry.clone(), Arc::new(config));
    let server = server::Server::new(router);

    let handle = tokio::spawn(async move {
        if let Err(e) = server.run(listener).await {
            tracing::error!("Emulator stopped: {}", e);
        }
    });

    Ok(RunningEmulator {
        addr,
        registry,
        handle,
    })
}
