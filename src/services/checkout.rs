use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    db::DbPool,
    entities::feature::Entity as Feature,
    entities::plan::{self, Entity as Plan},
    errors::ServiceError,
    payments::{CheckoutGateway, CheckoutSessionRequest, LineItem},
};

/// Checkout request as sent by the front-end.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutInput {
    pub plan: Option<String>,
    /// Stale or unknown ids are tolerated and skipped during resolution.
    #[serde(default)]
    pub selected_features_ids: Vec<i32>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Resolves a plan plus selected features into priced line items and
/// delegates session creation to the payment gateway.
pub struct CheckoutService {
    db: Arc<DbPool>,
    gateway: Arc<dyn CheckoutGateway>,
    currency: String,
}

impl CheckoutService {
    pub fn new(db: Arc<DbPool>, gateway: Arc<dyn CheckoutGateway>, currency: String) -> Self {
        Self {
            db,
            gateway,
            currency,
        }
    }

    #[instrument(skip(self, input), fields(plan = ?input.plan))]
    pub async fn create_checkout_session(
        &self,
        input: CreateCheckoutInput,
        origin: &str,
    ) -> Result<String, ServiceError> {
        let plan_name = input
            .plan
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ServiceError::ValidationError("plan is required".to_string()))?;

        let db = &*self.db;
        let plan = Plan::find()
            .filter(plan::Column::Nombre.eq(plan_name.as_str()))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Plan '{}' not found", plan_name)))?;

        // Plan first, then each resolved feature in input order.
        let mut line_items = vec![LineItem {
            name: plan.nombre.clone(),
            unit_amount: minor_units(plan.precio)?,
        }];

        for feature_id in &input.selected_features_ids {
            match Feature::find_by_id(*feature_id).one(db).await? {
                Some(feature) => line_items.push(LineItem {
                    name: feature.nombre,
                    unit_amount: minor_units(feature.precio)?,
                }),
                None => {
                    warn!(feature_id, "unknown feature id in checkout request; skipping");
                }
            }
        }

        // The plan item above makes this unreachable today; the invariant is
        // that a session is never requested with nothing to charge for.
        if line_items.is_empty() {
            return Err(ServiceError::ValidationError(
                "no line items resolved for checkout".to_string(),
            ));
        }

        let total: i64 = line_items.iter().map(|item| item.unit_amount).sum();

        let mut metadata = vec![
            ("plan".to_string(), plan.nombre.clone()),
            ("total".to_string(), format_minor_units(total)),
        ];
        if let Some(name) = &input.name {
            metadata.push(("customer_name".to_string(), name.clone()));
        }
        if let Some(email) = &input.email {
            metadata.push(("customer_email".to_string(), email.clone()));
        }

        let request = CheckoutSessionRequest {
            line_items,
            currency: self.currency.clone(),
            success_url: format!("{}/success", origin),
            cancel_url: format!("{}/cancel", origin),
            customer_email: input.email.clone(),
            metadata,
        };

        let session_id = self.gateway.create_session(&request).await?;
        info!(%session_id, plan = %plan.nombre, total_minor_units = total, "checkout session created");
        Ok(session_id)
    }
}

/// Converts a decimal price to integer minor units (price × 100, truncated).
pub(crate) fn minor_units(price: Decimal) -> Result<i64, ServiceError> {
    (price * Decimal::ONE_HUNDRED).trunc().to_i64().ok_or_else(|| {
        ServiceError::InternalError(format!("price {} does not fit in minor units", price))
    })
}

/// Renders a minor-unit total back as a decimal string (e.g. 14999 → "149.99").
fn format_minor_units(total: i64) -> String {
    format!("{}.{:02}", total / 100, total % 100)
}
