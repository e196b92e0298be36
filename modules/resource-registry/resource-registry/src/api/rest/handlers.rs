//! REST handlers for the Resource Registry module.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query};
use http::StatusCode;

use super::dto::{
    DeleteResponse, DiscoveryResponse, ListResponse, ResourceResponse, VersionQuery,
};
use super::error::ApiResult;
use crate::domain::service::ResourceService;

/// POST /resource
///
/// Create a resource or register a type descriptor.
pub async fn create_resource(
    Extension(service): Extension<Arc<ResourceService>>,
    Json(resource): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<ResourceResponse>)> {
    let stored = service.create(resource).await?;
    Ok((StatusCode::OK, Json(stored.into())))
}

/// PUT /resource
///
/// Store a resource, overwriting any existing document under the same key.
pub async fn put_resource(
    Extension(service): Extension<Arc<ResourceService>>,
    Json(resource): Json<serde_json::Value>,
) -> ApiResult<Json<ResourceResponse>> {
    let stored = service.put(resource).await?;
    Ok(Json(stored.into()))
}

/// GET /resource
///
/// Discovery: plural names of all registered types.
pub async fn discover_types(
    Extension(service): Extension<Arc<ResourceService>>,
) -> Json<DiscoveryResponse> {
    let types = service.plural_names();
    let count = types.len();
    Json(DiscoveryResponse { types, count })
}

/// GET /resource/{type_ref}
///
/// List all instances of a type; the reference must be plural.
pub async fn list_resources(
    Extension(service): Extension<Arc<ResourceService>>,
    Path(type_ref): Path<String>,
) -> ApiResult<Json<ListResponse>> {
    let list = service.list(&type_ref).await?;
    Ok(Json(list.into()))
}

/// GET /resource/{type_ref}/{name}
///
/// Retrieve a single resource.
pub async fn get_resource(
    Extension(service): Extension<Arc<ResourceService>>,
    Path((type_ref, name)): Path<(String, String)>,
    Query(query): Query<VersionQuery>,
) -> ApiResult<Json<ResourceResponse>> {
    let stored = service
        .get(&type_ref, &name, query.version.as_deref())
        .await?;
    Ok(Json(stored.into()))
}

/// PATCH /resource/{type_ref}/{name}
///
/// Apply a partial update; fields unknown to the stored document are
/// dropped, never added.
pub async fn patch_resource(
    Extension(service): Extension<Arc<ResourceService>>,
    Path((type_ref, name)): Path<(String, String)>,
    Json(updates): Json<serde_json::Value>,
) -> ApiResult<Json<ResourceResponse>> {
    let stored = service.patch(&type_ref, &name, updates).await?;
    Ok(Json(stored.into()))
}

/// DELETE /resource/{type_ref}/{name}
pub async fn delete_resource(
    Extension(service): Extension<Arc<ResourceService>>,
    Path((type_ref, name)): Path<(String, String)>,
) -> ApiResult<Json<DeleteResponse>> {
    let key = service.delete(&type_ref, &name).await?;
    Ok(Json(DeleteResponse::deleted(key.as_str())))
}
