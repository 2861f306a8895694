#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use iabot_api::{
    config::AppConfig,
    db,
    errors::ServiceError,
    handlers::AppServices,
    notifications::{ContactNotification, Notifier},
    payments::{CheckoutGateway, CheckoutSessionRequest},
    AppState,
};

/// Gateway double that records every session request instead of calling the
/// payment provider.
#[derive(Default)]
pub struct RecordingGateway {
    pub sessions: Mutex<Vec<CheckoutSessionRequest>>,
}

#[async_trait]
impl CheckoutGateway for RecordingGateway {
    async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<String, ServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.push(request.clone());
        Ok(format!("cs_test_{}", sessions.len()))
    }
}

/// Gateway double that fails the way a provider transport error does.
pub struct FailingGateway;

#[async_trait]
impl CheckoutGateway for FailingGateway {
    async fn create_session(
        &self,
        _request: &CheckoutSessionRequest,
    ) -> Result<String, ServiceError> {
        Err(ServiceError::InternalError(
            "Stripe API error: connection reset by peer".to_string(),
        ))
    }
}

/// Notifier double that records deliveries, optionally failing each one.
#[derive(Default)]
pub struct RecordingNotifier {
    pub delivered: Mutex<Vec<ContactNotification>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &ContactNotification) -> Result<(), ServiceError> {
        if self.fail {
            return Err(ServiceError::ExternalServiceError(
                "notification endpoint returned 503".to_string(),
            ));
        }
        self.delivered.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Application harness backed by an in-memory SQLite database.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub gateway: Arc<RecordingGateway>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    /// Fresh application state with an empty, migrated database.
    pub async fn new() -> Self {
        Self::build(RecordingNotifier::default(), None).await
    }

    pub async fn with_notifier(notifier: RecordingNotifier) -> Self {
        Self::build(notifier, None).await
    }

    /// Same harness, but checkout sessions fail with a transport error.
    pub async fn with_failing_gateway() -> Self {
        Self::build(RecordingNotifier::default(), Some(Arc::new(FailingGateway))).await
    }

    async fn build(
        notifier: RecordingNotifier,
        gateway_override: Option<Arc<dyn CheckoutGateway>>,
    ) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            3000,
            "test".to_string(),
        );
        // A single pooled connection keeps the in-memory database alive for
        // the harness lifetime.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool).await.expect("migrations failed");

        let db_arc = Arc::new(pool);
        let gateway = Arc::new(RecordingGateway::default());
        let active_gateway: Arc<dyn CheckoutGateway> = match gateway_override {
            Some(override_gateway) => override_gateway,
            None => gateway.clone(),
        };
        let notifier = Arc::new(notifier);
        let services = AppServices::new(db_arc.clone(), &cfg, active_gateway, Some(notifier.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            services,
        };
        let router = Router::new()
            .nest("/api", iabot_api::api_routes())
            .with_state(state.clone());

        Self {
            state,
            router,
            gateway,
            notifier,
        }
    }

    /// Number of sessions the recording gateway has accepted.
    pub fn session_count(&self) -> usize {
        self.gateway.sessions.lock().unwrap().len()
    }

    /// Sends a request through the router and returns status + parsed body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}
