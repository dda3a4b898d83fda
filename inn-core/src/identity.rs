use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use inn_shared::Masked;

use crate::{CoreError, CoreResult, StoreResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Administrator,
    Staff,
}

impl Role {
    /// The role is fixed here, once, when the session is established.
    pub fn resolve(email: &str, admin_email: &str) -> Self {
        if email.trim().eq_ignore_ascii_case(admin_email.trim()) {
            Role::Administrator
        } else {
            Role::Staff
        }
    }
}

/// A user the identity provider vouched for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

/// Immutable per-request view of who is acting and with which role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionContext {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl SessionContext {
    pub fn establish(user: AuthenticatedUser, admin_email: &str) -> Self {
        let role = Role::resolve(&user.email, admin_email);
        Self {
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }

    pub fn require_admin(&self, action: &str) -> CoreResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user = %self.user_id, action, "Non-administrator attempted admin-only action");
            Err(CoreError::Forbidden(format!("only administrators can {}", action)))
        }
    }

    /// Value written to the change log's actor column.
    pub fn actor(&self) -> String {
        self.email.clone()
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an email/password pair for a verified user.
    async fn sign_in(&self, email: &str, password: &str) -> CoreResult<AuthenticatedUser>;

    /// Number of accounts known to the provider.
    async fn account_count(&self) -> CoreResult<u64>;
}

// ============================================================================
// Local provider (fixture mode)
// ============================================================================

struct LocalAccount {
    id: &'static str,
    email: &'static str,
    password: &'static str,
    display_name: &'static str,
}

const LOCAL_ACCOUNTS: &[LocalAccount] = &[
    LocalAccount {
        id: "1",
        email: "admin@parnaioca.com",
        password: "admin123",
        display_name: "Administrador",
    },
    LocalAccount {
        id: "2",
        email: "funcionario@parnaioca.com",
        password: "func123",
        display_name: "Funcionário",
    },
];

/// Fixed email/password table used when no backend is configured.
pub struct LocalIdentityProvider;

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> CoreResult<AuthenticatedUser> {
        let account = LOCAL_ACCOUNTS
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email.trim()) && a.password == password)
            .ok_or_else(|| {
                tracing::info!(email = %Masked(email), "Local sign-in rejected");
                CoreError::InvalidCredentials
            })?;

        Ok(AuthenticatedUser {
            id: account.id.to_string(),
            email: account.email.to_string(),
            display_name: account.display_name.to_string(),
        })
    }

    async fn account_count(&self) -> CoreResult<u64> {
        Ok(LOCAL_ACCOUNTS.len() as u64)
    }
}

// ============================================================================
// Directory provider (store-backed staff accounts)
// ============================================================================

#[derive(Debug, Clone)]
pub struct StaffAccount {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

impl StaffAccount {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            password_hash::{PasswordHash, PasswordVerifier},
            Argon2,
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[async_trait]
pub trait StaffDirectory: Send + Sync {
    async fn find_account(&self, email: &str) -> StoreResult<Option<StaffAccount>>;

    async fn count_accounts(&self) -> StoreResult<u64>;
}

pub struct DirectoryIdentityProvider {
    directory: Arc<dyn StaffDirectory>,
}

impl DirectoryIdentityProvider {
    pub fn new(directory: Arc<dyn StaffDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl IdentityProvider for DirectoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> CoreResult<AuthenticatedUser> {
        let account = self
            .directory
            .find_account(email.trim())
            .await?
            .ok_or(CoreError::InvalidCredentials)?;

        let verified = account.verify_password(password).map_err(|e| {
            tracing::error!(account = %account.id, "Stored password hash is unreadable: {}", e);
            CoreError::InvalidCredentials
        })?;

        if !verified {
            tracing::info!(email = %Masked(email), "Directory sign-in rejected");
            return Err(CoreError::InvalidCredentials);
        }

        Ok(AuthenticatedUser {
            id: account.id.to_string(),
            email: account.email,
            display_name: account.display_name,
        })
    }

    async fn account_count(&self) -> CoreResult<u64> {
        Ok(self.directory.count_accounts().await?)
    }
}
