//! REST route wiring for the Resource Registry module.

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};

use super::handlers;
use crate::domain::service::ResourceService;

/// Builds the resource router over the given service.
#[must_use]
pub fn router(service: Arc<ResourceService>) -> Router {
    Router::new()
        .route(
            "/resource",
            get(handlers::discover_types)
                .post(handlers::create_resource)
                .put(handlers::put_resource),
        )
        .route("/resource/{type_ref}", get(handlers::list_resources))
        .route(
            "/resource/{type_ref}/{name}",
            get(handlers::get_resource)
                .patch(handlers::patch_resource)
                .delete(handlers::delete_resource),
        )
        .layer(Extension(service))
}
