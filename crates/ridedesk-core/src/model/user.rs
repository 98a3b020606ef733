// ── Customer accounts ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::{EntityId, Keyed};

/// Customer account. `is_active == false` means suspended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// `"{first} {last}"`, the form searched by the user filter.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

impl Keyed for User {
    fn key(&self) -> &EntityId {
        &self.id
    }
}
