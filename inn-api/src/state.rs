use std::sync::Arc;

use inn_core::identity::IdentityProvider;
use inn_core::repository::DataSource;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
    pub admin_email: String,
}

#[derive(Clone)]
pub struct AppState {
    pub data: DataSource,
    pub identity: Arc<dyn IdentityProvider>,
    pub auth: AuthConfig,
    /// "postgres" or "fixture", shown on the admin screen.
    pub backend: &'static str,
}
