use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::{error, info};

use inn_core::StoreError;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Migrations completed successfully.");
        Ok(())
    }
}

/// Translate a driver error, turning the named unique constraints into the
/// domain failures callers branch on.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            match db.constraint() {
                Some("customers_national_id_key") => {
                    return StoreError::UniqueViolation { field: "national_id" }
                }
                Some("accommodations_number_key") => return StoreError::UniqueViolation { field: "number" },
                Some("stays_one_checked_in_per_accommodation") => return StoreError::AccommodationOccupied,
                _ => {}
            }
        }
    }
    error!("Database error: {}", err);
    StoreError::Backend(err.to_string())
}

/// A stored value did not decode into its domain type.
pub(crate) fn corrupt(column: &str, value: &str) -> StoreError {
    error!(column, value, "Unexpected value in database column");
    StoreError::Backend(format!("unexpected {} value: {}", column, value))
}
