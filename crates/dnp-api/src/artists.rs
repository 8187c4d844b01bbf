// Artist endpoints

use tracing::debug;

use crate::client::DnpClient;
use crate::error::Error;
use crate::models::{ArtistDetail, ArtistSearchItem};

impl DnpClient {
    /// Search the artist catalog by name.
    ///
    /// `GET artists/search?q={query}&limit={limit}`
    pub async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ArtistSearchItem>, Error> {
        debug!(query, limit, "searching artists");
        self.get_with_params(
            "artists/search",
            &[("q", query.to_owned()), ("limit", limit.to_string())],
        )
        .await
    }

    /// `GET artists/{id}`
    pub async fn get_artist(&self, artist_id: &str) -> Result<ArtistDetail, Error> {
        self.get(&format!("artists/{artist_id}")).await
    }
}
