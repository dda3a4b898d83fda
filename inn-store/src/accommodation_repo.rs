use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use inn_core::repository::{AccommodationRepository, AccommodationTypeRepository};
use inn_core::{StoreError, StoreResult};
use inn_shared::{Accommodation, AccommodationType};

use crate::database::store_error;

pub struct StoreAccommodationRepository {
    pool: PgPool,
}

impl StoreAccommodationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TypeRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<TypeRow> for AccommodationType {
    fn from(row: TypeRow) -> Self {
        AccommodationType {
            id: row.id,
            name: row.name,
            description: row.description,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AccommodationRow {
    id: Uuid,
    name: String,
    number: String,
    nightly_rate_cents: i64,
    max_occupancy: i32,
    type_id: Uuid,
    has_minibar: bool,
    has_parking: bool,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccommodationRow> for Accommodation {
    fn from(row: AccommodationRow) -> Self {
        Accommodation {
            id: row.id,
            name: row.name,
            number: row.number,
            nightly_rate_cents: row.nightly_rate_cents,
            max_occupancy: row.max_occupancy,
            type_id: row.type_id,
            has_minibar: row.has_minibar,
            has_parking: row.has_parking,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TYPE_COLUMNS: &str = "id, name, description, active, created_at";
const ACCOMMODATION_COLUMNS: &str = "id, name, number, nightly_rate_cents, max_occupancy, type_id, \
     has_minibar, has_parking, active, created_at, updated_at";

#[async_trait]
impl AccommodationTypeRepository for StoreAccommodationRepository {
    async fn list_types(&self) -> StoreResult<Vec<AccommodationType>> {
        let rows: Vec<TypeRow> =
            sqlx::query_as(&format!("SELECT {} FROM accommodation_types ORDER BY name", TYPE_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(store_error)?;
        Ok(rows.into_iter().map(AccommodationType::from).collect())
    }

    async fn get_type(&self, id: Uuid) -> StoreResult<Option<AccommodationType>> {
        let row: Option<TypeRow> =
            sqlx::query_as(&format!("SELECT {} FROM accommodation_types WHERE id = $1", TYPE_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
        Ok(row.map(AccommodationType::from))
    }

    async fn insert_type(&self, accommodation_type: &AccommodationType) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO accommodation_types (id, name, description, active, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(accommodation_type.id)
        .bind(&accommodation_type.name)
        .bind(&accommodation_type.description)
        .bind(accommodation_type.active)
        .bind(accommodation_type.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn update_type(&self, accommodation_type: &AccommodationType) -> StoreResult<()> {
        let result = sqlx::query("UPDATE accommodation_types SET name = $2, description = $3 WHERE id = $1")
            .bind(accommodation_type.id)
            .bind(&accommodation_type.name)
            .bind(&accommodation_type.description)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("accommodation type {}", accommodation_type.id)));
        }
        Ok(())
    }

    async fn set_type_active(&self, id: Uuid, active: bool) -> StoreResult<AccommodationType> {
        let row: Option<TypeRow> = sqlx::query_as(&format!(
            "UPDATE accommodation_types SET active = $2 WHERE id = $1 RETURNING {}",
            TYPE_COLUMNS
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(AccommodationType::from)
            .ok_or_else(|| StoreError::NotFound(format!("accommodation type {}", id)))
    }
}

#[async_trait]
impl AccommodationRepository for StoreAccommodationRepository {
    async fn list_accommodations(&self) -> StoreResult<Vec<Accommodation>> {
        let rows: Vec<AccommodationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM accommodations ORDER BY number",
            ACCOMMODATION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(rows.into_iter().map(Accommodation::from).collect())
    }

    async fn get_accommodation(&self, id: Uuid) -> StoreResult<Option<Accommodation>> {
        let row: Option<AccommodationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM accommodations WHERE id = $1",
            ACCOMMODATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(row.map(Accommodation::from))
    }

    async fn find_accommodation_by_number(&self, number: &str) -> StoreResult<Option<Accommodation>> {
        let row: Option<AccommodationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM accommodations WHERE number = $1",
            ACCOMMODATION_COLUMNS
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(row.map(Accommodation::from))
    }

    async fn insert_accommodation(&self, accommodation: &Accommodation) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accommodations (id, name, number, nightly_rate_cents, max_occupancy, type_id,
                                        has_minibar, has_parking, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(accommodation.id)
        .bind(&accommodation.name)
        .bind(&accommodation.number)
        .bind(accommodation.nightly_rate_cents)
        .bind(accommodation.max_occupancy)
        .bind(accommodation.type_id)
        .bind(accommodation.has_minibar)
        .bind(accommodation.has_parking)
        .bind(accommodation.active)
        .bind(accommodation.created_at)
        .bind(accommodation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn update_accommodation(&self, accommodation: &Accommodation) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE accommodations
            SET name = $2, number = $3, nightly_rate_cents = $4, max_occupancy = $5, type_id = $6,
                has_minibar = $7, has_parking = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(accommodation.id)
        .bind(&accommodation.name)
        .bind(&accommodation.number)
        .bind(accommodation.nightly_rate_cents)
        .bind(accommodation.max_occupancy)
        .bind(accommodation.type_id)
        .bind(accommodation.has_minibar)
        .bind(accommodation.has_parking)
        .bind(accommodation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("accommodation {}", accommodation.id)));
        }
        Ok(())
    }

    async fn set_accommodation_active(&self, id: Uuid, active: bool) -> StoreResult<Accommodation> {
        let row: Option<AccommodationRow> = sqlx::query_as(&format!(
            "UPDATE accommodations SET active = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            ACCOMMODATION_COLUMNS
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Accommodation::from)
            .ok_or_else(|| StoreError::NotFound(format!("accommodation {}", id)))
    }
}
