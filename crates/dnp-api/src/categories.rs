// Category endpoints
//
// Subscribing to a category bulk-blocks every member artist server-side;
// unsubscribing reverses it.

use serde_json::json;
use tracing::debug;

use crate::client::DnpClient;
use crate::error::Error;
use crate::models::{CategoryArtistItem, CategoryItem};

impl DnpClient {
    /// `GET categories` -- every category with the caller's subscription flag.
    pub async fn list_categories(&self) -> Result<Vec<CategoryItem>, Error> {
        self.get("categories").await
    }

    /// `GET categories/{id}/artists`
    pub async fn list_category_artists(
        &self,
        category_id: &str,
    ) -> Result<Vec<CategoryArtistItem>, Error> {
        self.get(&format!("categories/{category_id}/artists")).await
    }

    /// `POST categories/{id}/subscribe`
    pub async fn subscribe_category(&self, category_id: &str) -> Result<(), Error> {
        debug!(category_id, "subscribing to category");
        let _: Option<serde_json::Value> = self
            .post_optional(&format!("categories/{category_id}/subscribe"), &json!({}))
            .await?;
        Ok(())
    }

    /// `DELETE categories/{id}/subscribe`
    pub async fn unsubscribe_category(&self, category_id: &str) -> Result<(), Error> {
        debug!(category_id, "unsubscribing from category");
        self.delete(&format!("categories/{category_id}/subscribe"))
            .await
    }
}
