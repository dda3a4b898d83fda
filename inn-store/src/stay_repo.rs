use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use inn_core::repository::StayRepository;
use inn_core::{StoreError, StoreResult};
use inn_shared::{NewStay, Stay, StayStatus};

use crate::database::{corrupt, store_error};

pub struct StoreStayRepository {
    pool: PgPool,
}

impl StoreStayRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StayRow {
    id: Uuid,
    customer_id: Uuid,
    accommodation_id: Uuid,
    check_in_at: DateTime<Utc>,
    check_out_at: Option<DateTime<Utc>>,
    nightly_rate_cents: i64,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StayRow> for Stay {
    type Error = StoreError;

    fn try_from(row: StayRow) -> Result<Self, Self::Error> {
        let status: StayStatus = row.status.parse().map_err(|_| corrupt("stays.status", &row.status))?;
        Ok(Stay {
            id: row.id,
            customer_id: row.customer_id,
            accommodation_id: row.accommodation_id,
            check_in_at: row.check_in_at,
            check_out_at: row.check_out_at,
            nightly_rate_cents: row.nightly_rate_cents,
            status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, customer_id, accommodation_id, check_in_at, check_out_at, nightly_rate_cents, \
     status, notes, created_at, updated_at";

#[async_trait]
impl StayRepository for StoreStayRepository {
    async fn list_stays(&self, status: Option<StayStatus>) -> StoreResult<Vec<Stay>> {
        let rows: Vec<StayRow> = sqlx::query_as(&format!(
            "SELECT {} FROM stays WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC",
            COLUMNS
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.into_iter().map(Stay::try_from).collect()
    }

    async fn get_stay(&self, id: Uuid) -> StoreResult<Option<Stay>> {
        let row: Option<StayRow> = sqlx::query_as(&format!("SELECT {} FROM stays WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.map(Stay::try_from).transpose()
    }

    async fn insert_checked_in(&self, stay: NewStay) -> StoreResult<Stay> {
        let stay = stay.into_stay();
        // stays_one_checked_in_per_accommodation rejects a second occupant
        let row: StayRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO stays (id, customer_id, accommodation_id, check_in_at, check_out_at,
                               nightly_rate_cents, status, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NULL, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(stay.id)
        .bind(stay.customer_id)
        .bind(stay.accommodation_id)
        .bind(stay.check_in_at)
        .bind(stay.nightly_rate_cents)
        .bind(StayStatus::CheckedIn.as_str())
        .bind(&stay.notes)
        .bind(stay.created_at)
        .bind(stay.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        Stay::try_from(row)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: StayStatus,
        to: StayStatus,
        check_out_at: Option<DateTime<Utc>>,
    ) -> StoreResult<Option<Stay>> {
        let row: Option<StayRow> = sqlx::query_as(&format!(
            r#"
            UPDATE stays
            SET status = $3, check_out_at = COALESCE($4, check_out_at), updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(check_out_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Stay::try_from).transpose()
    }
}
