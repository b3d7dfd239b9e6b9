// Standalone app server - Axum HTTP server for the prompt builder web app
// Serves the static app shell plus a read-only catalog data endpoint

pub mod routes;

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

/// Shared state for the app server
pub struct AppServerState {
    /// Directory holding the catalog/preset JSON documents
    pub data_dir: PathBuf,
}

/// Holds the running server's shutdown mechanism
pub struct RunningServer {
    pub shutdown_tx: oneshot::Sender<()>,
    pub addr: SocketAddr,
}

/// Start the app server on the given port, serving `static_root` and its
/// `data/` subdirectory. Returns the running server handle (for
/// shutdown) or an error.
pub async fn start_server(port: u16, static_root: PathBuf) -> Result<RunningServer, String> {
    let state = Arc::new(AppServerState {
        data_dir: static_root.join("data"),
    });

    // CORS is permissive: everything served here is read-only public data
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin("*".parse::<HeaderValue>().unwrap());

    // Unknown routes fall through to the app shell so in-app paths
    // survive a reload
    let index_html = static_root.join("index.html");
    let app = Router::new()
        .merge(routes::api_routes())
        .with_state(state)
        .fallback_service(ServeDir::new(&static_root).fallback(ServeFile::new(index_html)))
        .layer(cors);

    let addr = try_bind(port).await?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;
    let actual_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local addr: {}", e))?;

    tracing::info!("App server starting on {}", actual_addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Shutdown signal received, draining connections...");
            })
            .await
            .unwrap_or_else(|e| tracing::error!("Server error: {}", e));
        tracing::info!("Server stopped");
    });

    Ok(RunningServer {
        shutdown_tx,
        addr: actual_addr,
    })
}

/// Try to bind to the given port, with fallback to nearby ports then
/// OS-assigned
async fn try_bind(preferred_port: u16) -> Result<SocketAddr, String> {
    // Try preferred port
    let addr = SocketAddr::from(([0, 0, 0, 0], preferred_port));
    if let Ok(listener) = tokio::net::TcpListener::bind(addr).await {
        drop(listener);
        return Ok(addr);
    }

    // Try ports preferred+1 through preferred+10
    for offset in 1..=10u16 {
        let port = preferred_port.saturating_add(offset);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        if let Ok(listener) = tokio::net::TcpListener::bind(addr).await {
            drop(listener);
            tracing::warn!("Port {} unavailable, using {}", preferred_port, port);
            return Ok(addr);
        }
    }

    // Fall back to OS-assigned port
    let addr = SocketAddr::from(([0, 0, 0, 0], 0u16));
    if let Ok(listener) = tokio::net::TcpListener::bind(addr).await {
        let actual = listener.local_addr().map_err(|e| e.to_string())?;
        drop(listener);
        tracing::warn!(
            "All preferred ports unavailable, OS assigned port {}",
            actual.port()
        );
        return Ok(actual);
    }

    Err("Failed to bind to any port".to_string())
}

/// Get a LAN IP for the startup banner - avoids 127.0.0.1 so other
/// devices on the network can reach the app.
pub fn lan_ip() -> String {
    if let Ok(ip) = local_ip_address::local_ip() {
        if !ip.is_loopback() {
            return ip.to_string();
        }
    }
    // Fallback: scan interfaces for the first non-loopback IPv4
    if let Ok(ifas) = local_ip_address::list_afinet_netifas() {
        for (_name, ip) in ifas {
            if !ip.is_loopback() {
                if let IpAddr::V4(v4) = ip {
                    return v4.to_string();
                }
            }
        }
    }
    "127.0.0.1".to_string()
}

/// Record the running process id for external start/stop tooling.
pub fn write_pid_file(path: &Path) -> Result<(), String> {
    std::fs::write(path, std::process::id().to_string())
        .map_err(|e| format!("Failed to write PID file {}: {}", path.display(), e))
}

/// Remove the PID file on shutdown; a missing file is fine.
pub fn remove_pid_file(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Failed to remove PID file {}: {}", path.display(), e);
        }
    }
}
