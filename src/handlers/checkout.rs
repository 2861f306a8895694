use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::{
    config::AppConfig, errors::ServiceError, services::checkout::CreateCheckoutInput, AppState,
};

#[derive(Debug, Serialize)]
pub struct CheckoutSessionId {
    pub id: String,
}

pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateCheckoutInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let origin = request_origin(&headers, &state.config);
    let id = state
        .services
        .checkout
        .create_checkout_session(input, &origin)
        .await?;
    Ok(Json(CheckoutSessionId { id }))
}

/// Success/cancel redirect URLs are derived from the request's own origin,
/// falling back to the configured bind address.
fn request_origin(headers: &HeaderMap, config: &AppConfig) -> String {
    if let Some(origin) = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
    {
        return origin.trim_end_matches('/').to_string();
    }

    if let Some(host) = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
    {
        return format!("http://{}", host);
    }

    format!("http://{}:{}", config.host, config.port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn test_config() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            3000,
            "test".to_string(),
        )
    }

    #[test]
    fn origin_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ORIGIN,
            HeaderValue::from_static("https://iabot.example/"),
        );
        headers.insert(header::HOST, HeaderValue::from_static("ignored:1234"));

        assert_eq!(
            request_origin(&headers, &test_config()),
            "https://iabot.example"
        );
    }

    #[test]
    fn host_header_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3000"));

        assert_eq!(
            request_origin(&headers, &test_config()),
            "http://localhost:3000"
        );
    }

    #[test]
    fn config_fallback_without_headers() {
        assert_eq!(
            request_origin(&HeaderMap::new(), &test_config()),
            "http://127.0.0.1:3000"
        );
    }
}
