use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use inn_api::{app, AppState, AuthConfig};
use inn_core::identity::{DirectoryIdentityProvider, IdentityProvider, LocalIdentityProvider, StaffDirectory};
use inn_core::repository::DataSource;
use inn_store::{BackendMode, Config, DbClient, StoreStaffDirectory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inn_api=debug,inn_core=info,inn_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting inn API on port {}", config.server.port);

    let mode = config.backend_mode();
    let (data, identity): (DataSource, Arc<dyn IdentityProvider>) = match &mode {
        BackendMode::Remote { url } => {
            let db = DbClient::new(url).await.context("Failed to connect to PostgreSQL")?;
            db.migrate().await.context("Failed to run migrations")?;

            let directory = Arc::new(StoreStaffDirectory::new(db.pool.clone()));
            bootstrap_admin(&config, &directory).await?;

            let identity: Arc<dyn IdentityProvider> = Arc::new(DirectoryIdentityProvider::new(directory));
            (inn_store::postgres_data_source(&db), identity)
        }
        BackendMode::Fixture { reason } => {
            tracing::warn!("Using in-memory fixture data ({}); changes are lost on restart", reason);
            let identity: Arc<dyn IdentityProvider> = Arc::new(LocalIdentityProvider);
            (inn_store::fixture_data_source(), identity)
        }
    };

    let app_state = AppState {
        data,
        identity,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
            admin_email: config.auth.admin_email.clone(),
        },
        backend: mode.label(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Creates the administrator account on an empty staff directory when a
/// bootstrap password is configured.
async fn bootstrap_admin(config: &Config, directory: &StoreStaffDirectory) -> anyhow::Result<()> {
    let Some(password) = config.auth.bootstrap_password.as_deref() else {
        return Ok(());
    };
    if directory.count_accounts().await? > 0 {
        return Ok(());
    }

    directory
        .create_account(&config.auth.admin_email, "Administrador", password)
        .await?;
    tracing::info!("Bootstrapped administrator account");
    Ok(())
}
