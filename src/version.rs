use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Build metadata fixed at process start.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildMeta {
    pub version: String,
    pub commit_hash: String,
    pub build_date: String,
}

/// Router serving the build metadata as static JSON at `/version`.
pub fn router(meta: BuildMeta) -> Router {
    Router::new().route(
        "/version",
        get(move || {
            let meta = meta.clone();
            async move { Json(meta) }
        }),
    )
}
