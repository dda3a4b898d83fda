use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use inn_core::identity::{StaffAccount, StaffDirectory};
use inn_core::{StoreError, StoreResult};

use crate::database::store_error;

/// Staff accounts table used by the directory identity provider.
pub struct StoreStaffDirectory {
    pool: PgPool,
}

impl StoreStaffDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates an account with an argon2 hash of `password`.
    pub async fn create_account(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> StoreResult<StaffAccount> {
        let password_hash = StaffAccount::hash_password(password)
            .map_err(|e| StoreError::Backend(format!("password hashing failed: {}", e)))?;
        let account = StaffAccount {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            display_name: display_name.to_string(),
            password_hash,
        };

        sqlx::query("INSERT INTO staff_accounts (id, email, display_name, password_hash) VALUES ($1, $2, $3, $4)")
            .bind(account.id)
            .bind(&account.email)
            .bind(&account.display_name)
            .bind(&account.password_hash)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(account)
    }
}

#[derive(sqlx::FromRow)]
struct StaffRow {
    id: Uuid,
    email: String,
    display_name: String,
    password_hash: String,
}

#[async_trait]
impl StaffDirectory for StoreStaffDirectory {
    async fn find_account(&self, email: &str) -> StoreResult<Option<StaffAccount>> {
        let row: Option<StaffRow> = sqlx::query_as(
            "SELECT id, email, display_name, password_hash FROM staff_accounts WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(|r| StaffAccount {
            id: r.id,
            email: r.email,
            display_name: r.display_name,
            password_hash: r.password_hash,
        }))
    }

    async fn count_accounts(&self) -> StoreResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff_accounts")
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(total.max(0) as u64)
    }
}
