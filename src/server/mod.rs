pub mod handlers;
pub mod types;

use crate::{Result, config::Config, predictor::LoanModel};
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(model: LoanModel) -> Router {
    let app_state = handlers::AppState { model };

    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict_form))
        .route("/api/predict", post(handlers::predict_json))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<()> {
    // Load failures are kept in the state, so the server starts regardless
    let model = LoanModel::load(&config.model, config.labels.clone()).await;

    let app = router(model);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
