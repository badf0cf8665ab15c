use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::{Request, Response},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{field, Span};

use crate::meals;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri(),
                status = field::Empty,
            )
        })
        .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
            let status = res.status();
            span.record("status", field::display(status));
            let latency_ms = latency.as_millis() as u64;
            if status.is_server_error() {
                tracing::error!(%status, latency_ms, "response");
            } else {
                tracing::info!(%status, latency_ms, "response");
            }
        });

    Router::new()
        .merge(meals::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(trace)
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for ctrl-c; shutdown signal disabled");
        std::future::pending::<()>().await;
    }
}
