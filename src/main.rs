// Prompt builder app server entry point
//
// Configuration comes from the environment: PORT (default 3000),
// STATIC_ROOT (default "public"), PID_FILE (default ".server.pid").

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use promptdeck::server;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    let static_root = std::env::var("STATIC_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("public"));
    let pid_file = std::env::var("PID_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".server.pid"));

    let running = match server::start_server(port, static_root).await {
        Ok(running) => running,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    // PID file lets external tooling find and stop the server
    if let Err(e) = server::write_pid_file(&pid_file) {
        tracing::warn!("{}", e);
    }

    let port = running.addr.port();
    tracing::info!("Photo prompt builder server started");
    tracing::info!("  Local:   http://localhost:{}", port);
    tracing::info!("  Network: http://{}:{}", server::lan_ip(), port);

    wait_for_shutdown().await;

    tracing::info!("Shutting down server...");
    let _ = running.shutdown_tx.send(());
    server::remove_pid_file(&pid_file);
}

/// Wait for ctrl-c or, on unix, SIGTERM.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
