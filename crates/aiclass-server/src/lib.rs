//! HTTP front end for the hybrid classifier.
//!
//! Routes: `GET /`, `GET /health`, `GET /info`, `GET /categories`,
//! `POST /predict` and `POST /predict_batch`. Inference runs on the blocking
//! pool so a slow model never stalls the async workers.

mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use aiclass_ai::HybridEngine;
use tracing::{info, warn};

pub use error::ServerError;
pub use routes::{AppState, router};

/// Bind `addr` and serve until ctrl-c, then release the model.
pub async fn serve(addr: SocketAddr, engine: HybridEngine) -> Result<(), ServerError> {
    let engine = Arc::new(engine);
    let app = router(AppState::new(engine.clone()));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        degraded = engine.is_degraded(),
        threshold = engine.threshold(),
        "classification server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(engine) {
        Ok(mut engine) => engine.cleanup(),
        Err(_) => warn!("engine still shared at shutdown, skipping model release"),
    }
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
