//! Resource lifecycle routes. Ids are pipe-delimited and must be percent-encoded in the path.

use crate::handlers::resource::{create, delete as delete_handler, list_types, read, refresh, update};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

pub fn resource_routes(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/resources", get(list_types))
        .route("/resources/:type_name", post(create))
        .route(
            "/resources/:type_name/:id",
            get(read).patch(update).delete(delete_handler),
        )
        .route("/resources/:type_name/:id/refresh", post(refresh))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(body_limit)))
        .with_state(state)
}
