use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use inn_shared::{ChangeLog, ChangeOperation, NewChangeLog};

use crate::identity::{IdentityProvider, SessionContext};
use crate::repository::DataSource;
use crate::CoreResult;

const RECENT_LOG_LIMIT: usize = 10;

/// Append a change-log row. A failed write is logged and swallowed: the
/// mutation it describes has already been committed.
pub async fn record<T: Serialize>(
    data: &DataSource,
    session: &SessionContext,
    table_name: &'static str,
    operation: ChangeOperation,
    record_id: Uuid,
    before: Option<&T>,
    after: Option<&T>,
) {
    let entry = NewChangeLog {
        actor: session.actor(),
        table_name,
        operation,
        record_id,
        before: before.and_then(|v| serde_json::to_value(v).ok()),
        after: after.and_then(|v| serde_json::to_value(v).ok()),
    };

    if let Err(e) = data.change_log.append(entry).await {
        tracing::error!(table = table_name, record = %record_id, "Failed to write change log: {}", e);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub total_users: u64,
    pub total_logs: u64,
    pub backend: String,
    pub server_time: DateTime<Utc>,
    pub recent_logs: Vec<ChangeLog>,
}

/// Administration screen: log totals plus the most recent rows.
pub async fn admin_overview(
    data: &DataSource,
    identity: &dyn IdentityProvider,
    session: &SessionContext,
    backend: &str,
) -> CoreResult<AdminOverview> {
    session.require_admin("view the administration panel")?;

    let total_logs = data.change_log.count().await?;
    let recent_logs = data.change_log.list_recent(RECENT_LOG_LIMIT).await?;
    let total_users = identity.account_count().await?;

    Ok(AdminOverview {
        total_users,
        total_logs,
        backend: backend.to_string(),
        server_time: Utc::now(),
        recent_logs,
    })
}

/// Delete every change-log row.
pub async fn purge_logs(data: &DataSource, session: &SessionContext) -> CoreResult<u64> {
    session.require_admin("purge the change log")?;
    let removed = data.change_log.purge().await?;
    tracing::info!(removed, actor = %session.user_id, "Change log purged");
    Ok(removed)
}
