use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Serialize;
use utoipa::ToSchema;

pub const QUERY_PARAM_LIMIT: &str = "limit";
pub const QUERY_PARAM_SORT: &str = "sort";
pub const QUERY_PARAM_SORT_BY: &str = "sort_by";
pub const QUERY_PARAM_PAGE: &str = "page";

pub const DEFAULT_LIMIT_PER_PAGE: i64 = 30;
pub const DEFAULT_SORT: i64 = 0;
pub const DEFAULT_PAGE: i64 = 0;
pub const DEFAULT_SORT_FIELD: &str = "_id";

/// Paging and sorting requested by a caller.
///
/// `page` is 1-based; values below 1 are clamped to the first page when the
/// skip offset is computed. Sorting is ascending unless `sort_descending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub sort_field: String,
    pub sort_descending: bool,
    pub limit_per_page: i64,
    pub page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_descending: false,
            limit_per_page: DEFAULT_LIMIT_PER_PAGE,
            page: DEFAULT_PAGE,
        }
    }
}

impl PageRequest {
    /// Number of documents to skip to land on the requested page.
    pub(crate) fn skip(&self) -> u64 {
        let page = self.page.max(1) as u64;
        let limit = self.limit_per_page.max(1) as u64;
        (page - 1) * limit
    }

    pub(crate) fn sort_doc(&self) -> bson::Document {
        let direction = if self.sort_descending { -1 } else { 1 };
        bson::doc! { &self.sort_field: direction }
    }
}

/// Extracts `limit`, `sort`, `sort_by` and `page` query parameters.
///
/// Each parameter falls back to its default independently when missing or
/// unparsable, so a malformed value never rejects the request. A negative
/// `sort` selects descending order.
impl<S: Send + Sync> FromRequestParts<S> for PageRequest {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params: HashMap<String, String> = Query::try_from_uri(&parts.uri)
            .map(|Query(params)| params)
            .unwrap_or_default();

        let limit_per_page = params
            .get(QUERY_PARAM_LIMIT)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_LIMIT_PER_PAGE);
        let sort = params
            .get(QUERY_PARAM_SORT)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_SORT);
        let page = params
            .get(QUERY_PARAM_PAGE)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_PAGE);
        let sort_field = params
            .get(QUERY_PARAM_SORT_BY)
            .cloned()
            .unwrap_or_else(|| DEFAULT_SORT_FIELD.to_string());

        Ok(PageRequest {
            sort_field,
            sort_descending: sort < 0,
            limit_per_page,
            page,
        })
    }
}

/// Pagination metadata derived from a paged query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: u64,
    pub total_pages: u64,
    pub page: u64,
    pub has_more: bool,
}

impl PageInfo {
    pub fn compute(total: u64, request: &PageRequest) -> Self {
        let limit = request.limit_per_page.max(1) as u64;
        let page = request.page.max(1) as u64;
        let total_pages = total.div_ceil(limit);

        Self {
            total,
            total_pages,
            page,
            has_more: page < total_pages,
        }
    }
}
