use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::handlers::{self, SharedState};
use crate::api::session_handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<SharedState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Patent catalog
        .route("/patents", get(handlers::list_patents::<S>))
        .route("/patents/stats", get(handlers::get_patent_stats::<S>))
        .route(
            "/patents/:patent_id",
            get(handlers::get_patent::<S>).put(handlers::update_patent::<S>),
        )
        // Funding ledger
        .route(
            "/patents/:patent_id/funding",
            get(handlers::get_funding::<S>).put(handlers::replace_funding::<S>),
        )
        // Funding edit sessions
        .route(
            "/patents/:patent_id/funding/sessions",
            post(session_handlers::open_session::<S>),
        )
        .route(
            "/funding-sessions/:session_id",
            get(session_handlers::get_session::<S>).delete(session_handlers::discard_session::<S>),
        )
        .route(
            "/funding-sessions/:session_id/steps",
            post(session_handlers::add_step::<S>),
        )
        .route(
            "/funding-sessions/:session_id/steps/:step_id",
            delete(session_handlers::delete_step::<S>).patch(session_handlers::update_step::<S>),
        )
        .route(
            "/funding-sessions/:session_id/commit",
            post(session_handlers::commit_session::<S>),
        )
        // Grants
        .route("/grants", get(handlers::list_grants::<S>))
        .route("/grants/stats", get(handlers::get_grant_stats::<S>))
}

/// Router with state and the CORS layer the dashboard needs.
pub fn build_app<S: Store + 'static>(state: SharedState<S>) -> Router {
    create_router::<S>()
        .layer(CorsLayer::permissive())
        .with_state(state)
}
