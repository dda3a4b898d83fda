use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeOperation {
    Insert,
    Update,
    Delete,
}

impl ChangeOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeOperation::Insert => "INSERT",
            ChangeOperation::Update => "UPDATE",
            ChangeOperation::Delete => "DELETE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INSERT" => Some(ChangeOperation::Insert),
            "UPDATE" => Some(ChangeOperation::Update),
            "DELETE" => Some(ChangeOperation::Delete),
            _ => None,
        }
    }
}

/// Audit row written after every registry or front-desk mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeLog {
    pub id: Uuid,
    pub actor: String,
    pub table_name: String,
    pub operation: ChangeOperation,
    pub record_id: Uuid,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChangeLog {
    pub actor: String,
    pub table_name: &'static str,
    pub operation: ChangeOperation,
    pub record_id: Uuid,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
}

impl NewChangeLog {
    pub fn into_log(self) -> ChangeLog {
        ChangeLog {
            id: Uuid::new_v4(),
            actor: self.actor,
            table_name: self.table_name.to_string(),
            operation: self.operation,
            record_id: self.record_id,
            before: self.before,
            after: self.after,
            created_at: Utc::now(),
        }
    }
}
