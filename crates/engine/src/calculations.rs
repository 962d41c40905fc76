//! Stored calculations.
//!
//! A row keeps the JSON of one [`CalculationInput`] snapshot. Results are never
//! stored: they are recomputed on load.
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CalculationInput, ResultEngine};

/// A calculation loaded back from the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCalculation {
    pub id: String,
    #[serde(flatten)]
    pub input: CalculationInput,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<Model> for SavedCalculation {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            input: serde_json::from_str(&model.payload)?,
            id: model.id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            expires_at: model.expires_at,
        })
    }
}

/// New identifier for a stored calculation: `calc_` followed by 32 hex digits.
pub(crate) fn new_calculation_id() -> String {
    format!("calc_{}", Uuid::new_v4().simple())
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "calculations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub expires_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_input(
        id: &str,
        input: &CalculationInput,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: ActiveValue::Set(id.to_string()),
            payload: ActiveValue::Set(serde_json::to_string(input)?),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            expires_at: ActiveValue::Set(expires_at),
        })
    }
}
