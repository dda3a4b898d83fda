use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use inn_core::repository::MinibarRepository;
use inn_core::{StoreError, StoreResult};
use inn_shared::{MinibarConsumption, MinibarItem};

use crate::database::store_error;

pub struct StoreMinibarRepository {
    pool: PgPool,
}

impl StoreMinibarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    price_cents: i64,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<ItemRow> for MinibarItem {
    fn from(row: ItemRow) -> Self {
        MinibarItem {
            id: row.id,
            name: row.name,
            price_cents: row.price_cents,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ConsumptionRow {
    id: Uuid,
    stay_id: Uuid,
    item_id: Uuid,
    quantity: i32,
    unit_price_cents: i64,
    total_cents: i64,
    created_at: DateTime<Utc>,
}

impl From<ConsumptionRow> for MinibarConsumption {
    fn from(row: ConsumptionRow) -> Self {
        MinibarConsumption {
            id: row.id,
            stay_id: row.stay_id,
            item_id: row.item_id,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
            total_cents: row.total_cents,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl MinibarRepository for StoreMinibarRepository {
    async fn list_items(&self) -> StoreResult<Vec<MinibarItem>> {
        let rows: Vec<ItemRow> =
            sqlx::query_as("SELECT id, name, price_cents, active, created_at FROM minibar_items ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(store_error)?;
        Ok(rows.into_iter().map(MinibarItem::from).collect())
    }

    async fn get_item(&self, id: Uuid) -> StoreResult<Option<MinibarItem>> {
        let row: Option<ItemRow> =
            sqlx::query_as("SELECT id, name, price_cents, active, created_at FROM minibar_items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
        Ok(row.map(MinibarItem::from))
    }

    async fn insert_item(&self, item: &MinibarItem) -> StoreResult<()> {
        sqlx::query("INSERT INTO minibar_items (id, name, price_cents, active, created_at) VALUES ($1, $2, $3, $4, $5)")
            .bind(item.id)
            .bind(&item.name)
            .bind(item.price_cents)
            .bind(item.active)
            .bind(item.created_at)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn update_item(&self, item: &MinibarItem) -> StoreResult<()> {
        let result = sqlx::query("UPDATE minibar_items SET name = $2, price_cents = $3 WHERE id = $1")
            .bind(item.id)
            .bind(&item.name)
            .bind(item.price_cents)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("minibar item {}", item.id)));
        }
        Ok(())
    }

    async fn set_item_active(&self, id: Uuid, active: bool) -> StoreResult<MinibarItem> {
        let row: Option<ItemRow> = sqlx::query_as(
            "UPDATE minibar_items SET active = $2 WHERE id = $1 RETURNING id, name, price_cents, active, created_at",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(MinibarItem::from)
            .ok_or_else(|| StoreError::NotFound(format!("minibar item {}", id)))
    }

    async fn insert_consumption(&self, consumption: &MinibarConsumption) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO minibar_consumption (id, stay_id, item_id, quantity, unit_price_cents, total_cents, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(consumption.id)
        .bind(consumption.stay_id)
        .bind(consumption.item_id)
        .bind(consumption.quantity)
        .bind(consumption.unit_price_cents)
        .bind(consumption.total_cents)
        .bind(consumption.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn list_consumptions(&self, stay_id: Option<Uuid>) -> StoreResult<Vec<MinibarConsumption>> {
        let rows: Vec<ConsumptionRow> = sqlx::query_as(
            r#"
            SELECT id, stay_id, item_id, quantity, unit_price_cents, total_cents, created_at
            FROM minibar_consumption
            WHERE ($1::uuid IS NULL OR stay_id = $1)
            ORDER BY created_at
            "#,
        )
        .bind(stay_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(rows.into_iter().map(MinibarConsumption::from).collect())
    }
}
