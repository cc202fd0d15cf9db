use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::Uri,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::AppError;
use super::response::ApiResponse;
use crate::analysis::DerivedRelease;
use crate::runtime::Runtime;
use crate::service::{DashboardStats, DataService, ReleaseFilter};

type Service<R> = State<Arc<DataService<R>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

pub async fn health_handler() -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::ok(HealthStatus {
        status: "ok".to_string(),
    }))
}

/// `GET /data`: every release, or the subset matching the query filters.
pub async fn data_handler<R: Runtime + 'static>(
    State(service): Service<R>,
    query: Result<Query<ReleaseFilter>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<DerivedRelease>>>, AppError> {
    let Query(filter) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let releases = if filter.is_empty() {
        service.all_releases()?
    } else {
        debug!("Filtering releases with {:?}", filter);
        service.filtered_releases(&filter)?
    };

    Ok(Json(ApiResponse::ok(releases)))
}

/// `GET /stats`
pub async fn stats_handler<R: Runtime + 'static>(
    State(service): Service<R>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    Ok(Json(ApiResponse::ok(service.stats()?)))
}

/// `POST /refresh`: reload the CSV, then answer with the new stats.
pub async fn refresh_handler<R: Runtime + 'static>(
    State(service): Service<R>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    info!("Refreshing release data...");

    let reloading = Arc::clone(&service);
    tokio::task::spawn_blocking(move || reloading.refresh())
        .await
        .map_err(|e| AppError::Internal(format!("Refresh task failed: {}", e)))??;

    Ok(Json(ApiResponse::ok(service.stats()?)))
}

pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::RouteNotFound(uri.path().to_string())
}
