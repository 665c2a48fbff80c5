//! Category entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ActorId, RecordKey};

/// Managed category tag. Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: RecordKey,
    pub name: String,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
    pub created_by: ActorId,
}

impl Category {
    /// Lowercase comparison key for the uniqueness check
    pub fn name_key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    pub fn matches(&self, name: &str) -> bool {
        Self::name_key(&self.name) == Self::name_key(name)
    }
}
