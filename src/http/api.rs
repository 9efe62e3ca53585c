//! JSON API over the category registry and the page router.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::categories::{Category, CategoryInfo};
use crate::error::LookupError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{NavigationError, RouteMatch, RouteSummary};

/// Error body returned by API handlers.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An API failure with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        metrics::record_lookup_miss(err.table());
        tracing::debug!(table = err.table(), error = %err, "Lookup miss");
        Self {
            status: StatusCode::NOT_FOUND,
            message: err.to_string(),
        }
    }
}

impl From<NavigationError> for ApiError {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::Lookup(miss) => miss.into(),
            other => Self {
                status: StatusCode::BAD_REQUEST,
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct LabelLookup {
    pub id: Category,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct HrefResponse {
    pub href: String,
}

pub async fn list_categories(State(state): State<AppState>) -> Json<&'static [CategoryInfo]> {
    Json(state.categories.all())
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<&'static CategoryInfo>, ApiError> {
    Ok(Json(state.categories.info(&id)?))
}

pub async fn category_by_label(
    State(state): State<AppState>,
    Path(label): Path<String>,
) -> Result<Json<LabelLookup>, ApiError> {
    let id = state.categories.id_for_label(&label)?;
    Ok(Json(LabelLookup { id, label }))
}

pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    Json(state.router.routes())
}

pub async fn resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Json<RouteMatch> {
    Json(state.router.resolve(&query.path))
}

pub async fn href(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<HrefResponse>, ApiError> {
    let href = state.router.href(&name, &params)?;
    Ok(Json(HrefResponse { href }))
}

pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::matcher::BuildError;

    #[test]
    fn test_lookup_miss_maps_to_not_found() {
        let err: ApiError = LookupError::UnknownCategory("zzz".into()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "unknown category id: zzz");
    }

    #[test]
    fn test_missing_param_maps_to_bad_request() {
        let err: ApiError = NavigationError::Build {
            route: "EditSpend".into(),
            source: BuildError::MissingParam("id".into()),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "route 'EditSpend': missing parameter 'id'");
    }
}
