// Sync endpoints
//
// The client never mutates sync runs directly; it only triggers new runs
// and requests cancellation of running ones.

use serde_json::json;
use tracing::debug;

use crate::client::DnpClient;
use crate::error::Error;
use crate::models::{SyncRunItem, SyncStatusItem, TriggerSyncRequest};

impl DnpClient {
    /// `GET sync/status` -- one row per connected platform.
    pub async fn sync_status(&self) -> Result<Vec<SyncStatusItem>, Error> {
        self.get("sync/status").await
    }

    /// `GET sync/runs?limit={limit}`
    pub async fn list_sync_runs(&self, limit: u32) -> Result<Vec<SyncRunItem>, Error> {
        self.get_with_params("sync/runs", &[("limit", limit.to_string())])
            .await
    }

    /// `POST sync/trigger` -- returns the runs that were queued.
    pub async fn trigger_sync(&self, req: &TriggerSyncRequest) -> Result<Vec<SyncRunItem>, Error> {
        debug!(platforms = ?req.platforms, sync_type = %req.sync_type, "triggering sync");
        self.post("sync/trigger", req).await
    }

    /// `POST sync/runs/{id}/cancel`
    pub async fn cancel_sync(&self, run_id: &str) -> Result<(), Error> {
        debug!(run_id, "cancelling sync run");
        let _: Option<serde_json::Value> = self
            .post_optional(&format!("sync/runs/{run_id}/cancel"), &json!({}))
            .await?;
        Ok(())
    }
}
