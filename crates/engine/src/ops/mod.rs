use chrono::TimeDelta;
use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod calculations;

/// Days a stored calculation lives after its last save.
pub const DEFAULT_TTL_DAYS: i64 = 30;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Store for calculation snapshots.
///
/// The split itself is pure and lives in [`crate::split`]; `Engine` only
/// persists the inputs so a user can come back to them.
#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
    ttl: TimeDelta,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    ttl: TimeDelta,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            ttl: TimeDelta::days(DEFAULT_TTL_DAYS),
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the expiry of saved calculations.
    pub fn ttl(mut self, ttl: TimeDelta) -> EngineBuilder {
        self.ttl = ttl;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.ttl <= TimeDelta::zero() {
            return Err(EngineError::InvalidAmount(format!(
                "calculation TTL must be positive, got {}s",
                self.ttl.num_seconds()
            )));
        }
        Ok(Engine {
            database: self.database,
            ttl: self.ttl,
        })
    }
}
