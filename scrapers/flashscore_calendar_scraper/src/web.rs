use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use tower_http::services::ServeDir;
use tracing::{error, info};

/// Exposes the generated calendar directory as plain static files, so
/// calendar clients can subscribe to `http://host:port/<team-slug>.ics`.
pub async fn serve(output_dir: &str, port: u16) -> Result<()> {
    let app = Router::new().fallback_service(ServeDir::new(output_dir.to_string()));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Serving calendars at http://{}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Static file server stopped: {}", e);
        }
    });

    Ok(())
}
