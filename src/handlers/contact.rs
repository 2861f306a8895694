use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{errors::ServiceError, services::contact::SubmitContactInput, AppState};

pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitContactInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let receipt = state.services.submissions.submit(input).await?;

    let body = json!({
        "status": "success",
        "id": receipt.id,
        "message": format!(
            "¡Gracias {}! Hemos recibido tu consulta sobre el plan {}",
            receipt.name, receipt.plan_selected
        ),
    });
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn list_submissions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let submissions = state.services.submissions.list_submissions().await?;
    Ok(Json(submissions))
}
