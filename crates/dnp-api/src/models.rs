// Backend API wire types
//
// Every response is wrapped in the `ApiResponse<T>` envelope. Enumerated
// values (severity, tiers, statuses, platforms) stay as strings here; the
// core crate parses them into typed enums. Fields use `#[serde(default)]`
// where the backend omits empty values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard backend response envelope.
///
/// ```json
/// { "success": true, "data": { ... }, "message": "optional" }
/// ```
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

// ── Artists ──────────────────────────────────────────────────────────

/// One hit from `GET artists/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistSearchItem {
    pub id: String,
    pub canonical_name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub has_offenses: bool,
    #[serde(default)]
    pub offense_count: u32,
    /// Highest severity among the artist's documented offenses.
    #[serde(default)]
    pub max_severity: Option<String>,
}

/// Artist profile from `GET artists/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistDetail {
    pub id: String,
    pub canonical_name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Platform name -> that platform's artist id.
    #[serde(default)]
    pub external_ids: HashMap<String, String>,
    #[serde(default)]
    pub offenses: Vec<OffenseSummaryItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffenseSummaryItem {
    pub id: String,
    pub category: String,
    pub severity: String,
    pub title: String,
    #[serde(default)]
    pub procedural_state: Option<String>,
    #[serde(default)]
    pub incident_date: Option<String>,
}

// ── DNP list ─────────────────────────────────────────────────────────

/// An entry of the user's do-not-play list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnpListEntry {
    pub artist_id: String,
    pub artist_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddDnpRequest {
    pub artist_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateDnpRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub artist_count: u32,
    #[serde(default)]
    pub subscribed: bool,
}

/// Member artist of a category, from `GET categories/{id}/artists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryArtistItem {
    pub id: String,
    pub canonical_name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

// ── Offenses ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffenseItem {
    pub id: String,
    pub artist_id: String,
    #[serde(default)]
    pub artist_name: Option<String>,
    pub category: String,
    pub severity: String,
    #[serde(default)]
    pub procedural_state: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub incident_date: Option<String>,
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    /// `"A"` (court record) through `"D"` (unverified claim).
    #[serde(default)]
    pub source_tier: Option<String>,
    #[serde(default)]
    pub credibility_score: Option<f64>,
    #[serde(default)]
    pub published_date: Option<String>,
}

/// Body of `POST offenses`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOffenseRequest {
    pub artist_id: String,
    pub category: String,
    pub severity: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<String>,
    pub evidence: Vec<NewEvidence>,
}

/// Body of `POST offenses/{id}/evidence`, and evidence items in reports.
#[derive(Debug, Clone, Serialize)]
pub struct NewEvidence {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_tier: Option<String>,
}

/// Query filters for `GET offenses`.
#[derive(Debug, Clone, Default)]
pub struct OffenseQuery {
    pub artist_id: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub limit: Option<u32>,
}

// ── Connections ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionItem {
    pub platform: String,
    pub status: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub connected_at: Option<String>,
    #[serde(default)]
    pub last_health_check: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

// ── Sync ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStatusItem {
    pub platform: String,
    pub status: String,
    #[serde(default)]
    pub last_sync_at: Option<String>,
    #[serde(default)]
    pub artists_blocked: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRunItem {
    pub id: String,
    pub platform: String,
    #[serde(default)]
    pub sync_type: Option<String>,
    pub status: String,
    #[serde(default)]
    pub artists_processed: u64,
    #[serde(default)]
    pub artists_blocked: u64,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerSyncRequest {
    pub platforms: Vec<String>,
    /// `"full"` or `"incremental"`.
    pub sync_type: String,
}

// ── Analytics ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardItem {
    #[serde(default)]
    pub total_blocked: u64,
    #[serde(default)]
    pub category_subscriptions: u64,
    #[serde(default)]
    pub platforms_connected: u64,
    #[serde(default)]
    pub offenses_tracked: u64,
    #[serde(default)]
    pub blocks_last_30_days: u64,
    #[serde(default)]
    pub top_categories: Vec<CategoryCountItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCountItem {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPointItem {
    pub date: String,
    #[serde(default)]
    pub blocked: u64,
    #[serde(default)]
    pub unblocked: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    pub report_type: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub id: String,
    pub report_type: String,
    pub status: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

// ── Enforcement ──────────────────────────────────────────────────────

/// Exactly one of `artist_id` / `category_id` is set: a category run
/// enforces every member of the category.
#[derive(Debug, Clone, Serialize)]
pub struct EnforcementRunRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// `"block"` or `"unblock"`.
    pub action: String,
    pub platforms: Vec<String>,
}

/// Backend enforcement job, polled from `GET enforcement/jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcementJobItem {
    pub id: String,
    #[serde(default)]
    pub artist_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    pub action: String,
    pub status: String,
    #[serde(default)]
    pub platforms: Vec<PlatformProgressItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformProgressItem {
    pub platform: String,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn envelope_without_data_decodes_for_any_payload() {
        // LoginResponse has no Default impl; the envelope must not need one.
        let env: ApiResponse<LoginResponse> =
            serde_json::from_str(r#"{"success": false, "message": "bad password"}"#).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.message.as_deref(), Some("bad password"));
    }

    #[test]
    fn envelope_with_data_decodes_payload() {
        let env: ApiResponse<LoginResponse> =
            serde_json::from_str(r#"{"success": true, "data": {"token": "t1"}}"#).unwrap();
        assert_eq!(env.data.unwrap().token, "t1");
        assert!(env.message.is_none());
    }
}
