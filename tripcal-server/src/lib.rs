//! HTTP surface for tripcal.

pub mod routes;
pub mod state;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::index::router())
        .merge(routes::convert::router())
        .merge(routes::sync::router())
        .fallback(routes::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(routes::internal_error))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tripcal_server=debug,tripcal_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
