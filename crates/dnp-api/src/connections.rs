// Streaming platform connection endpoints

use tracing::debug;

use crate::client::DnpClient;
use crate::error::Error;
use crate::models::ConnectionItem;

impl DnpClient {
    /// `GET connections`
    pub async fn list_connections(&self) -> Result<Vec<ConnectionItem>, Error> {
        self.get("connections").await
    }

    /// `DELETE connections/{platform}`
    pub async fn disconnect_platform(&self, platform: &str) -> Result<(), Error> {
        debug!(platform, "disconnecting platform");
        self.delete(&format!("connections/{platform}")).await
    }
}
