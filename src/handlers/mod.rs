pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    config::AppConfig,
    db::DbPool,
    notifications::Notifier,
    payments::CheckoutGateway,
    services::{catalog::CatalogService, checkout::CheckoutService, contact::SubmissionService},
    AppState,
};

/// Aggregated services used by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub submissions: Arc<SubmissionService>,
    pub checkout: Arc<CheckoutService>,
}

impl AppServices {
    pub fn new(
        db: Arc<DbPool>,
        config: &AppConfig,
        gateway: Arc<dyn CheckoutGateway>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(db.clone())),
            submissions: Arc::new(SubmissionService::new(db.clone(), notifier)),
            checkout: Arc::new(CheckoutService::new(
                db,
                gateway,
                config.checkout_currency.clone(),
            )),
        }
    }
}

/// The `/api` route surface.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/planes",
            get(catalog::list_plans).post(catalog::create_plan),
        )
        .route(
            "/features",
            get(catalog::list_features).post(catalog::create_feature),
        )
        .route("/contacto", post(contact::submit))
        .route("/submissions", get(contact::list_submissions))
        .route(
            "/create-checkout-session",
            post(checkout::create_checkout_session),
        )
}
