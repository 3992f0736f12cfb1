pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod pagination;
pub mod ratelimit;
pub mod routes;
pub mod seed;
pub mod store;
pub mod timestamps;
pub mod validate;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, ratelimit::RateGate, store::EntryStore};

/// Everything a handler needs, passed explicitly instead of living in
/// process-wide globals.
pub struct AppState {
    pub config: Config,
    pub store: EntryStore,
    pub rate: RateGate,
}

pub fn app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/entries", axum::routing::post(routes::create_entry).get(routes::list_entries))
        .route("/entries/search", get(routes::search_entries))
        .route("/entries/stats", get(routes::stats))
        .route(
            "/entries/{id}",
            get(routes::get_entry).put(routes::update_entry).delete(routes::delete_entry),
        )
        .layer(middleware::from_fn_with_state(state.clone(), ratelimit::enforce));

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .nest("/api", api)
        .fallback(routes::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
