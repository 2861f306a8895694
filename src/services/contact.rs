use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{parse_price, required};
use crate::{
    db::DbPool,
    entities::contact_submission::{self, Entity as ContactSubmission},
    errors::ServiceError,
    notifications::{ContactNotification, Notifier},
};

/// Contact-form payload as sent by the front-end.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub plan: Option<String>,
    pub message: Option<String>,
    /// Accepted verbatim and stored as-is; never cross-checked against the
    /// feature catalog.
    #[serde(default)]
    pub selected_features: Vec<Value>,
    pub total_price: Option<Value>,
}

/// Stored submission with `selected_features` expanded back to a sequence.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub plan_selected: String,
    pub selected_features: Vec<Value>,
    pub total_price: Decimal,
    pub message: Option<String>,
    /// ISO 8601 creation timestamp.
    pub timestamp: String,
}

impl SubmissionReceipt {
    fn from_model(model: contact_submission::Model) -> Result<Self, ServiceError> {
        let selected_features: Vec<Value> = serde_json::from_str(&model.selected_features)
            .map_err(|e| {
                ServiceError::SerializationError(format!(
                    "stored selected_features for submission {} is not valid JSON: {}",
                    model.id, e
                ))
            })?;

        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            plan_selected: model.plan_selected,
            selected_features,
            total_price: model.total_price,
            message: model.message,
            timestamp: model.created_at.to_rfc3339(),
        })
    }
}

/// Validates and persists contact submissions; notification is a
/// best-effort side effect after the row is committed.
pub struct SubmissionService {
    db: Arc<DbPool>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl SubmissionService {
    pub fn new(db: Arc<DbPool>, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self { db, notifier }
    }

    #[instrument(skip(self, input))]
    pub async fn submit(&self, input: SubmitContactInput) -> Result<SubmissionReceipt, ServiceError> {
        let name = required(input.name, "name")?;
        let email = required(input.email, "email")?;
        let plan = required(input.plan, "plan")?;
        let total_value = input
            .total_price
            .ok_or_else(|| ServiceError::ValidationError("totalPrice is required".to_string()))?;
        let total_price = parse_price(&total_value, "totalPrice")?;

        let features_json = serde_json::to_string(&input.selected_features)
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;

        let row = {
            let (name, email, plan) = (name.clone(), email.clone(), plan.clone());
            let (phone, message) = (input.phone.clone(), input.message.clone());
            self.db
                .transaction::<_, contact_submission::Model, ServiceError>(move |txn| {
                    Box::pin(async move {
                        let row = contact_submission::ActiveModel {
                            name: Set(name),
                            email: Set(email),
                            phone: Set(phone),
                            plan_selected: Set(plan),
                            selected_features: Set(features_json),
                            total_price: Set(total_price),
                            message: Set(message),
                            created_at: Set(Utc::now()),
                            ..Default::default()
                        };
                        Ok(row.insert(txn).await?)
                    })
                })
                .await?
        };

        info!(submission_id = row.id, plan = %row.plan_selected, "contact submission persisted");

        // Best-effort notify: the row above is already committed, so a
        // delivery failure is logged and swallowed.
        if let Some(notifier) = &self.notifier {
            let summary = compose_summary(&row, &input.selected_features);
            if let Err(err) = notifier.notify(&summary).await {
                warn!(submission_id = row.id, error = %err, "contact notification failed");
            }
        }

        SubmissionReceipt::from_model(row)
    }

    /// All submissions, most recent first.
    pub async fn list_submissions(&self) -> Result<Vec<SubmissionReceipt>, ServiceError> {
        let rows = ContactSubmission::find()
            .order_by_desc(contact_submission::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        rows.into_iter().map(SubmissionReceipt::from_model).collect()
    }
}

/// Builds the human-readable summary delivered to the notification target.
fn compose_summary(
    row: &contact_submission::Model,
    selected_features: &[Value],
) -> ContactNotification {
    let mut body = format!(
        "Nueva consulta de {} <{}>\nTeléfono: {}\nPlan: {}\n",
        row.name,
        row.email,
        row.phone.as_deref().unwrap_or("-"),
        row.plan_selected,
    );

    if selected_features.is_empty() {
        body.push_str("Extras: ninguno\n");
    } else {
        body.push_str("Extras:\n");
        for feature in selected_features {
            let nombre = feature
                .get("nombre")
                .or_else(|| feature.get("name"))
                .and_then(Value::as_str)
                .unwrap_or("(sin nombre)");
            let precio = feature
                .get("precio")
                .or_else(|| feature.get("price"))
                .map(Value::to_string)
                .unwrap_or_else(|| "?".to_string());
            body.push_str(&format!("  - {} (${})\n", nombre, precio));
        }
    }

    body.push_str(&format!("Total: ${}\n", row.total_price));
    if let Some(message) = &row.message {
        body.push_str(&format!("Mensaje: {}\n", message));
    }

    ContactNotification {
        subject: format!("Nueva consulta de {} (plan {})", row.name, row.plan_selected),
        body,
    }
}
