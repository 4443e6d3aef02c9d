use std::net::SocketAddr;

use axum::{routing::get, Router};
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::state::AppState;
use crate::{attendance, auth, courses, marks, students};

pub fn session_layer(cfg: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(cfg.secure)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(cfg.ttl_minutes)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(students::router())
        .merge(courses::router())
        .merge(marks::router())
        .merge(attendance::router())
        .route("/health", get(|| async { "ok" }))
}

pub fn build_app(state: AppState) -> Router {
    with_layers(routes(), state)
}

fn with_layers(routes: Router<AppState>, state: AppState) -> Router {
    let sessions = session_layer(&state.config.session);

    routes
        .with_state(state)
        .layer(sessions)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    let request_id = Uuid::new_v4();
                    tracing::info_span!("http_request", %method, uri = %uri, %request_id, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
