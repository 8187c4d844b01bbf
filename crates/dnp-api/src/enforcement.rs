// Enforcement job endpoints
//
// Enforcement pushes a block/unblock out to the user's connected streaming
// accounts. The backend runs it as an asynchronous job; clients poll the job
// for per-platform progress.

use tracing::debug;

use crate::client::DnpClient;
use crate::error::Error;
use crate::models::{EnforcementJobItem, EnforcementRunRequest};

impl DnpClient {
    /// Start an enforcement job.
    ///
    /// `POST enforcement/run`
    pub async fn run_enforcement(
        &self,
        req: &EnforcementRunRequest,
    ) -> Result<EnforcementJobItem, Error> {
        debug!(
            artist_id = ?req.artist_id,
            category_id = ?req.category_id,
            action = %req.action,
            platforms = ?req.platforms,
            "starting enforcement"
        );
        self.post("enforcement/run", req).await
    }

    /// `GET enforcement/jobs/{id}`
    pub async fn get_enforcement_job(&self, job_id: &str) -> Result<EnforcementJobItem, Error> {
        self.get(&format!("enforcement/jobs/{job_id}")).await
    }
}
