// DNP list endpoints
//
// CRUD over the user's personal blocklist. Mutations return the affected
// entry so callers can reconcile optimistic local state.

use tracing::debug;

use crate::client::DnpClient;
use crate::error::Error;
use crate::models::{AddDnpRequest, DnpListEntry, UpdateDnpRequest};

impl DnpClient {
    /// `GET dnp/list`
    pub async fn list_dnp(&self) -> Result<Vec<DnpListEntry>, Error> {
        self.get("dnp/list").await
    }

    /// Block an artist.
    ///
    /// `POST dnp/list` with `{"artist_id", "tags", "note"}`
    pub async fn add_dnp(&self, req: &AddDnpRequest) -> Result<DnpListEntry, Error> {
        debug!(artist_id = %req.artist_id, "adding artist to DNP list");
        self.post("dnp/list", req).await
    }

    /// Update tags and/or note of an existing entry.
    ///
    /// `PUT dnp/list/{artist_id}`
    pub async fn update_dnp(
        &self,
        artist_id: &str,
        req: &UpdateDnpRequest,
    ) -> Result<DnpListEntry, Error> {
        debug!(artist_id, "updating DNP entry");
        self.put(&format!("dnp/list/{artist_id}"), req).await
    }

    /// Unblock an artist.
    ///
    /// `DELETE dnp/list/{artist_id}`
    pub async fn remove_dnp(&self, artist_id: &str) -> Result<(), Error> {
        debug!(artist_id, "removing artist from DNP list");
        self.delete(&format!("dnp/list/{artist_id}")).await
    }
}
