use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{errors::ServiceError, services::catalog::NewCatalogItem, AppState};

pub async fn list_plans(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let plans = state.services.catalog.list_plans().await?;
    Ok(Json(plans))
}

pub async fn create_plan(
    State(state): State<AppState>,
    Json(item): Json<NewCatalogItem>,
) -> Result<impl IntoResponse, ServiceError> {
    let plan = state.services.catalog.add_plan(item).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn list_features(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let features = state.services.catalog.list_features().await?;
    Ok(Json(features))
}

pub async fn create_feature(
    State(state): State<AppState>,
    Json(item): Json<NewCatalogItem>,
) -> Result<impl IntoResponse, ServiceError> {
    let feature = state.services.catalog.add_feature(item).await?;
    Ok((StatusCode::CREATED, Json(feature)))
}
