use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    CalculationInput, EngineError, ResultEngine,
    calculations::{self, SavedCalculation, new_calculation_id},
};

use super::{Engine, with_tx};

impl Engine {
    /// Store a calculation snapshot and return its id.
    ///
    /// With `existing_id` the row is overwritten in place, keeping its
    /// `created_at`; an unknown `existing_id` is inserted under that id.
    /// Every save pushes `expires_at` to now + TTL.
    pub async fn save_calculation(
        &self,
        input: &CalculationInput,
        existing_id: Option<&str>,
    ) -> ResultEngine<String> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let existing_id = existing_id.map(str::trim).filter(|id| !id.is_empty());

        let id = with_tx!(self, |db_tx| {
            let existing = match existing_id {
                Some(id) => {
                    calculations::Entity::find_by_id(id.to_string())
                        .one(&db_tx)
                        .await?
                }
                None => None,
            };

            match existing {
                Some(model) => {
                    let mut row: calculations::ActiveModel = model.into();
                    row.payload = ActiveValue::Set(serde_json::to_string(input)?);
                    row.updated_at = ActiveValue::Set(now);
                    row.expires_at = ActiveValue::Set(expires_at);
                    let row = row.update(&db_tx).await?;
                    Ok::<_, EngineError>(row.id)
                }
                None => {
                    let id = existing_id.map_or_else(new_calculation_id, ToString::to_string);
                    calculations::ActiveModel::from_input(&id, input, now, expires_at)?
                        .insert(&db_tx)
                        .await?;
                    Ok(id)
                }
            }
        })?;

        tracing::debug!("saved calculation {id}, expires at {expires_at}");
        Ok(id)
    }

    /// Load a stored calculation. Expired rows are treated as missing.
    pub async fn load_calculation(&self, id: &str) -> ResultEngine<SavedCalculation> {
        let model = calculations::Entity::find_by_id(id.to_string())
            .filter(calculations::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;

        tracing::debug!("loaded calculation {id}");
        SavedCalculation::try_from(model)
    }

    /// Delete a stored calculation.
    pub async fn delete_calculation(&self, id: &str) -> ResultEngine<()> {
        let deleted = calculations::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if deleted.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        tracing::debug!("deleted calculation {id}");
        Ok(())
    }

    /// Remove every expired calculation and return how many rows went away.
    pub async fn purge_expired(&self) -> ResultEngine<u64> {
        let purged = calculations::Entity::delete_many()
            .filter(calculations::Column::ExpiresAt.lte(Utc::now()))
            .exec(&self.database)
            .await?;
        tracing::debug!("purged {} expired calculations", purged.rows_affected);
        Ok(purged.rows_affected)
    }
}
