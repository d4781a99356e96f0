pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    // The chat widget is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Issue pipeline
        .route("/processIssue", post(routes::issues::process_issue))
        .route("/generateCode", post(routes::issues::generate_code))
        .route("/reviewCode", post(routes::issues::review_code))
        .route("/pushChanges", post(routes::issues::push_changes))
        .route("/automateIssue", post(routes::issues::automate_issue))
        // Query assistants
        .route(
            "/.netlify/functions/query-ai",
            post(routes::query::query_ai).fallback(routes::method_not_allowed),
        )
        .route(
            "/.netlify/functions/query-ai-secure",
            post(routes::query::query_ai_secure)
                .route_layer(middleware::from_fn(auth::require_authorization))
                .fallback(routes::method_not_allowed),
        )
        // Operations
        .route("/health", get(routes::health::health))
        .route(
            "/api/documents/cache",
            delete(routes::documents::invalidate_cache)
                .route_layer(middleware::from_fn(auth::require_authorization)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the orchestrator server on `0.0.0.0:<port>`.
pub async fn serve(app_state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener).await
}

/// Start the orchestrator server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state);

    tracing::info!("AI orchestrator listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
