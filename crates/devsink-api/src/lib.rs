mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::post, Router};
use devsink_core::Ingestor;
use tokio::net::TcpListener;
use tracing::info;

pub use routes::ingest;
pub use state::AppState;

pub fn router(ingestor: Ingestor) -> Router {
    let app_state = Arc::new(AppState::new(ingestor));

    Router::new()
        .route("/", post(ingest))
        .with_state(app_state)
}

pub async fn serve(addr: SocketAddr, ingestor: Ingestor) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(
        data_dir = %ingestor.store().root().display(),
        profile = %ingestor.profile(),
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, router(ingestor).into_make_service()).await
}
