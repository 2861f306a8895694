use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One contact/quote request, recorded exactly once per form submission.
///
/// `selected_features` is client-supplied free-form data serialized as JSON
/// text. It is NOT validated against the `features` table; the rows here may
/// reference features that never existed. Known gap, kept on purpose.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub email: String,

    pub phone: Option<String>,

    /// Expected to match a plan name, but not foreign-key enforced.
    pub plan_selected: String,

    #[sea_orm(column_type = "Text")]
    pub selected_features: String,

    pub total_price: Decimal,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    /// Set by the server at creation, immutable afterwards.
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
