use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

#[derive(Serialize)]
pub struct Endpoint {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct ServiceIndex {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<Endpoint>,
}

/// GET / - Describe the service
async fn index() -> Json<ServiceIndex> {
    Json(ServiceIndex {
        name: "tripcal",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            Endpoint {
                method: "GET",
                path: "/api/convert?url=<feed>&timeout=<secs>",
                description: "Convert an iCal feed into trips with nested subevents",
            },
            Endpoint {
                method: "POST",
                path: "/api/sync?url=<feed>&timeout=<secs>",
                description: "Convert a feed and sync trips and events into the remote tables (Bearer token required)",
            },
        ],
    })
}
