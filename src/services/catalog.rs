use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::{parse_price, required};
use crate::{
    db::DbPool,
    entities::feature::{self, Entity as Feature},
    entities::plan::{self, Entity as Plan},
    errors::ServiceError,
};

/// Fixed seed rows inserted when the corresponding table is empty.
const SEED_PLANS: &[(&str, i64, &str)] = &[
    (
        "Básico",
        49,
        "Chatbot web básico, hasta 500 sesiones/mes, soporte por email",
    ),
    (
        "Avanzado",
        149,
        "Chatbot multicanal, hasta 3,000 sesiones/mes, soporte prioritario",
    ),
    (
        "Premium",
        249,
        "Chatbot con IA avanzada, sesiones ilimitadas, soporte 24/7",
    ),
];

const SEED_FEATURES: &[(&str, i64, &str)] = &[
    (
        "Canal WhatsApp",
        25,
        "Integración del bot con WhatsApp Business",
    ),
    (
        "Integración CRM",
        40,
        "Sincronización automática de leads con tu CRM",
    ),
    (
        "Entrenamiento personalizado",
        60,
        "Entrenamiento del bot con tus propios datos",
    ),
    (
        "Analíticas avanzadas",
        30,
        "Panel de métricas detalladas de conversación",
    ),
    (
        "Soporte prioritario",
        20,
        "Atención con tiempos de respuesta garantizados",
    ),
];

/// Incoming catalog item. Fields are optional so missing vs. malformed
/// input can be reported as distinct error kinds.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCatalogItem {
    pub nombre: Option<String>,
    pub precio: Option<Value>,
    pub descripcion: Option<String>,
}

/// Read/create operations over the plan and feature catalog.
pub struct CatalogService {
    db: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// All plans, ordered by ascending id regardless of insertion order.
    pub async fn list_plans(&self) -> Result<Vec<plan::Model>, ServiceError> {
        Ok(Plan::find()
            .order_by_asc(plan::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, item))]
    pub async fn add_plan(&self, item: NewCatalogItem) -> Result<plan::Model, ServiceError> {
        let (nombre, precio, descripcion) = validate_new_item(item)?;

        let created = self
            .db
            .transaction::<_, plan::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = Plan::find()
                        .filter(plan::Column::Nombre.eq(nombre.as_str()))
                        .one(txn)
                        .await?;
                    if existing.is_some() {
                        return Err(ServiceError::Conflict(format!(
                            "Ya existe un plan llamado '{}'",
                            nombre
                        )));
                    }

                    let row = plan::ActiveModel {
                        nombre: Set(nombre),
                        precio: Set(precio),
                        descripcion: Set(descripcion),
                        ..Default::default()
                    };
                    Ok(row.insert(txn).await?)
                })
            })
            .await?;

        info!(plan_id = created.id, nombre = %created.nombre, "plan created");
        Ok(created)
    }

    /// All features, ordered by ascending id.
    pub async fn list_features(&self) -> Result<Vec<feature::Model>, ServiceError> {
        Ok(Feature::find()
            .order_by_asc(feature::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, item))]
    pub async fn add_feature(&self, item: NewCatalogItem) -> Result<feature::Model, ServiceError> {
        let (nombre, precio, descripcion) = validate_new_item(item)?;

        let created = self
            .db
            .transaction::<_, feature::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = Feature::find()
                        .filter(feature::Column::Nombre.eq(nombre.as_str()))
                        .one(txn)
                        .await?;
                    if existing.is_some() {
                        return Err(ServiceError::Conflict(format!(
                            "Ya existe una feature llamada '{}'",
                            nombre
                        )));
                    }

                    let row = feature::ActiveModel {
                        nombre: Set(nombre),
                        precio: Set(precio),
                        descripcion: Set(descripcion),
                        ..Default::default()
                    };
                    Ok(row.insert(txn).await?)
                })
            })
            .await?;

        info!(feature_id = created.id, nombre = %created.nombre, "feature created");
        Ok(created)
    }

    /// Seed bootstrap. Inserts the fixed catalog only when the table is
    /// empty; it never reconciles partial or renamed existing data.
    #[instrument(skip(self))]
    pub async fn seed_catalog(&self) -> Result<(), ServiceError> {
        let db = &*self.db;

        let plan_count = Plan::find().count(db).await?;
        if plan_count == 0 {
            info!("planes table empty; inserting seed plans");
            for (nombre, precio, descripcion) in SEED_PLANS {
                plan::ActiveModel {
                    nombre: Set((*nombre).to_string()),
                    precio: Set(Decimal::from(*precio)),
                    descripcion: Set(Some((*descripcion).to_string())),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
        } else {
            debug!(plan_count, "planes table already populated; skipping seed");
        }

        let feature_count = Feature::find().count(db).await?;
        if feature_count == 0 {
            info!("features table empty; inserting seed features");
            for (nombre, precio, descripcion) in SEED_FEATURES {
                feature::ActiveModel {
                    nombre: Set((*nombre).to_string()),
                    precio: Set(Decimal::from(*precio)),
                    descripcion: Set(Some((*descripcion).to_string())),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
        } else {
            debug!(
                feature_count,
                "features table already populated; skipping seed"
            );
        }

        Ok(())
    }
}

fn validate_new_item(
    item: NewCatalogItem,
) -> Result<(String, Decimal, Option<String>), ServiceError> {
    let nombre = required(item.nombre, "nombre")?;
    let precio_value = item
        .precio
        .ok_or_else(|| ServiceError::ValidationError("precio is required".to_string()))?;
    let precio = parse_price(&precio_value, "precio")?;
    Ok((nombre, precio, item.descripcion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn validate_new_item_happy_path() {
        let (nombre, precio, descripcion) = validate_new_item(NewCatalogItem {
            nombre: Some("Empresarial".into()),
            precio: Some(json!("399.99")),
            descripcion: Some("Plan a medida".into()),
        })
        .unwrap();
        assert_eq!(nombre, "Empresarial");
        assert_eq!(precio, dec!(399.99));
        assert_eq!(descripcion.as_deref(), Some("Plan a medida"));
    }

    #[test]
    fn validate_new_item_missing_fields() {
        let missing_name = validate_new_item(NewCatalogItem {
            nombre: None,
            precio: Some(json!(10)),
            descripcion: None,
        });
        assert!(matches!(missing_name, Err(ServiceError::ValidationError(_))));

        let missing_price = validate_new_item(NewCatalogItem {
            nombre: Some("X".into()),
            precio: None,
            descripcion: None,
        });
        assert!(matches!(
            missing_price,
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn validate_new_item_non_numeric_price() {
        let result = validate_new_item(NewCatalogItem {
            nombre: Some("X".into()),
            precio: Some(json!("mucho")),
            descripcion: None,
        });
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn seed_data_shape() {
        assert_eq!(SEED_PLANS.len(), 3);
        assert_eq!(SEED_FEATURES.len(), 5);
        assert_eq!(SEED_PLANS[0].0, "Básico");
        assert_eq!(SEED_PLANS[0].1, 49);
    }
}
