// Offense and evidence endpoints

use tracing::debug;

use crate::client::DnpClient;
use crate::error::Error;
use crate::models::{CreateOffenseRequest, EvidenceItem, NewEvidence, OffenseItem, OffenseQuery};

impl DnpClient {
    /// List documented offenses, optionally filtered.
    ///
    /// `GET offenses?artist_id=&category=&severity=&limit=`
    pub async fn list_offenses(&self, query: &OffenseQuery) -> Result<Vec<OffenseItem>, Error> {
        let mut params = Vec::new();
        if let Some(ref artist_id) = query.artist_id {
            params.push(("artist_id", artist_id.clone()));
        }
        if let Some(ref category) = query.category {
            params.push(("category", category.clone()));
        }
        if let Some(ref severity) = query.severity {
            params.push(("severity", severity.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        self.get_with_params("offenses", &params).await
    }

    /// `GET offenses/{id}`
    pub async fn get_offense(&self, offense_id: &str) -> Result<OffenseItem, Error> {
        self.get(&format!("offenses/{offense_id}")).await
    }

    /// Submit a new offense report.
    ///
    /// `POST offenses`
    pub async fn create_offense(&self, req: &CreateOffenseRequest) -> Result<OffenseItem, Error> {
        debug!(artist_id = %req.artist_id, category = %req.category, "submitting offense report");
        self.post("offenses", req).await
    }

    /// Attach an additional evidence source to an offense.
    ///
    /// `POST offenses/{id}/evidence`
    pub async fn add_evidence(
        &self,
        offense_id: &str,
        evidence: &NewEvidence,
    ) -> Result<EvidenceItem, Error> {
        debug!(offense_id, url = %evidence.url, "adding evidence");
        self.post(&format!("offenses/{offense_id}/evidence"), evidence)
            .await
    }
}
