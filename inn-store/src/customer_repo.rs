use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use inn_core::repository::CustomerRepository;
use inn_core::{StoreError, StoreResult};
use inn_shared::Customer;

use crate::database::store_error;

pub struct StoreCustomerRepository {
    pool: PgPool,
}

impl StoreCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    birth_date: NaiveDate,
    national_id: String,
    email: String,
    phone: String,
    state: String,
    city: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            birth_date: row.birth_date,
            national_id: row.national_id,
            email: row.email,
            phone: row.phone,
            state: row.state,
            city: row.city,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str =
    "id, name, birth_date, national_id, email, phone, state, city, active, created_at, updated_at";

#[async_trait]
impl CustomerRepository for StoreCustomerRepository {
    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let rows: Vec<CustomerRow> =
            sqlx::query_as(&format!("SELECT {} FROM customers ORDER BY name", COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(store_error)?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn get_customer(&self, id: Uuid) -> StoreResult<Option<Customer>> {
        let row: Option<CustomerRow> =
            sqlx::query_as(&format!("SELECT {} FROM customers WHERE id = $1", COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
        Ok(row.map(Customer::from))
    }

    async fn find_customer_by_national_id(&self, national_id: &str) -> StoreResult<Option<Customer>> {
        let row: Option<CustomerRow> =
            sqlx::query_as(&format!("SELECT {} FROM customers WHERE national_id = $1", COLUMNS))
                .bind(national_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
        Ok(row.map(Customer::from))
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, birth_date, national_id, email, phone, state, city, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(customer.birth_date)
        .bind(&customer.national_id)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.state)
        .bind(&customer.city)
        .bind(customer.active)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn update_customer(&self, customer: &Customer) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = $2, birth_date = $3, national_id = $4, email = $5, phone = $6,
                state = $7, city = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(customer.birth_date)
        .bind(&customer.national_id)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.state)
        .bind(&customer.city)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("customer {}", customer.id)));
        }
        Ok(())
    }

    async fn set_customer_active(&self, id: Uuid, active: bool) -> StoreResult<Customer> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "UPDATE customers SET active = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Customer::from)
            .ok_or_else(|| StoreError::NotFound(format!("customer {}", id)))
    }
}
