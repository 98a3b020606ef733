// Customer account endpoints

use serde_json::json;
use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{ListEnvelope, UserRecord};

impl AdminClient {
    /// List every customer account.
    ///
    /// `GET /auth/admin/users/all` → `{ data: User[] }`
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        let envelope: ListEnvelope<UserRecord> = self.get(&["auth", "admin", "users", "all"], &[]).await?;
        debug!(count = envelope.data.len(), "fetched users");
        Ok(envelope.data)
    }

    /// Toggle the account's active flag.
    ///
    /// `PATCH /auth/admin/{id}/suspend` with an empty object body.
    pub async fn suspend_user(&self, id: &str) -> Result<(), Error> {
        debug!(id, "suspending user");
        self.patch_no_response(&["auth", "admin", id, "suspend"], &json!({}))
            .await
    }

    /// `DELETE /auth/admin/{id}`
    pub async fn delete_user(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting user");
        self.delete(&["auth", "admin", id]).await
    }
}
