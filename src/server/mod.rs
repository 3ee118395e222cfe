pub mod handlers;
pub mod types;

use crate::{Result, config::Config, llm::ModelBinding};
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the application router. The `/debug` route is only mounted when the
/// binding was established by probing (diagnostic mode).
pub fn router(state: handlers::AppState, diagnostic: bool) -> Router {
    let mut app = Router::new().route("/agent", post(handlers::agent));

    if diagnostic {
        app = app.route("/debug", get(handlers::debug));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Establish the model binding once; requests only read it afterwards.
    let diagnostic = config.gemini.probe_on_startup;
    let binding = if diagnostic {
        ModelBinding::probe(&config.gemini).await?
    } else {
        ModelBinding::direct(&config.gemini)?
    };

    let state = handlers::AppState {
        model: Arc::new(binding.handle),
        report: Arc::new(binding.report),
    };

    let app = router(state, diagnostic);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
