// ── API-to-domain type conversions ──
//
// Bridges raw `dnp_api::models` response types into canonical
// `dnp_core::model` domain types. Each `From` impl parses strings into
// strong types and fills sensible defaults for missing optional data.

use chrono::{DateTime, NaiveDate, Utc};

use dnp_api::models::{
    ArtistDetail, ArtistSearchItem, CategoryArtistItem, CategoryItem, ConnectionItem,
    DashboardItem, DnpListEntry, EvidenceItem, OffenseItem, OffenseSummaryItem, ReportItem,
    SyncRunItem, SyncStatusItem, TrendPointItem, UserInfo,
};

use crate::model::{
    Artist, ArtistSearchResult, Category, CategoryMember, ConnectionStatus, DashboardStats,
    DnpEntry, EntityId, Evidence, Offense, OffenseSummary, Platform, PlatformConnection,
    PlatformSyncStatus, Report, SyncRun, TrendPoint, User,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an RFC 3339 timestamp, silently dropping unparseable values.
pub(crate) fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a calendar date. Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub(crate) fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(Some(raw)).map(|dt| dt.date_naive()))
}

fn parse_or_default<T: std::str::FromStr + Default>(raw: Option<&str>) -> T {
    raw.and_then(|s| s.parse().ok()).unwrap_or_default()
}

// ── Users ──────────────────────────────────────────────────────────

impl From<UserInfo> for User {
    fn from(u: UserInfo) -> Self {
        Self {
            id: EntityId::from(u.id),
            email: u.email,
            display_name: u.display_name.filter(|n| !n.is_empty()),
        }
    }
}

// ── Artists ────────────────────────────────────────────────────────

impl From<ArtistSearchItem> for ArtistSearchResult {
    fn from(a: ArtistSearchItem) -> Self {
        Self {
            id: EntityId::from(a.id),
            name: a.canonical_name,
            genres: a.genres,
            image_url: a.image_url,
            has_offenses: a.has_offenses || a.offense_count > 0,
            offense_count: a.offense_count,
            max_severity: a.max_severity.and_then(|s| s.parse().ok()),
        }
    }
}

impl From<OffenseSummaryItem> for OffenseSummary {
    fn from(o: OffenseSummaryItem) -> Self {
        Self {
            id: EntityId::from(o.id),
            category: o.category,
            severity: parse_or_default(Some(o.severity.as_str())),
            procedural_state: parse_or_default(o.procedural_state.as_deref()),
            title: o.title,
            incident_date: parse_date(o.incident_date.as_deref()),
        }
    }
}

impl From<ArtistDetail> for Artist {
    fn from(a: ArtistDetail) -> Self {
        Self {
            id: EntityId::from(a.id),
            name: a.canonical_name,
            genres: a.genres,
            image_url: a.image_url,
            external_ids: a
                .external_ids
                .into_iter()
                .map(|(platform, id)| (Platform::from(platform), id))
                .collect(),
            offenses: a.offenses.into_iter().map(OffenseSummary::from).collect(),
        }
    }
}

impl From<DnpListEntry> for DnpEntry {
    fn from(e: DnpListEntry) -> Self {
        Self {
            artist_id: EntityId::from(e.artist_id),
            created_at: parse_datetime(Some(e.created_at.as_str())).unwrap_or_else(Utc::now),
            artist_name: e.artist_name,
            tags: e.tags,
            note: e.note.filter(|n| !n.is_empty()),
            image_url: e.image_url,
            genres: e.genres,
        }
    }
}

// ── Categories ─────────────────────────────────────────────────────

impl From<CategoryItem> for Category {
    fn from(c: CategoryItem) -> Self {
        Self {
            id: EntityId::from(c.id),
            name: c.name,
            description: c.description,
            artist_count: c.artist_count,
            subscribed: c.subscribed,
        }
    }
}

impl From<CategoryArtistItem> for CategoryMember {
    fn from(a: CategoryArtistItem) -> Self {
        Self {
            artist_id: EntityId::from(a.id),
            name: a.canonical_name,
            genres: a.genres,
            image_url: a.image_url,
        }
    }
}

// ── Offenses ───────────────────────────────────────────────────────

impl From<EvidenceItem> for Evidence {
    fn from(e: EvidenceItem) -> Self {
        Self {
            id: e.id.map(EntityId::from),
            url: e.url,
            title: e.title,
            source_name: e.source_name,
            tier: e.source_tier.and_then(|t| t.parse().ok()),
            credibility: e.credibility_score.map(|c| c.clamp(0.0, 1.0)),
            published: parse_date(e.published_date.as_deref()),
        }
    }
}

impl From<OffenseItem> for Offense {
    fn from(o: OffenseItem) -> Self {
        Self {
            id: EntityId::from(o.id),
            artist_id: EntityId::from(o.artist_id),
            artist_name: o.artist_name,
            category: o.category,
            severity: parse_or_default(Some(o.severity.as_str())),
            procedural_state: parse_or_default(o.procedural_state.as_deref()),
            title: o.title,
            description: o.description,
            incident_date: parse_date(o.incident_date.as_deref()),
            evidence: o.evidence.into_iter().map(Evidence::from).collect(),
            created_at: parse_datetime(o.created_at.as_deref()),
        }
    }
}

// ── Connections ────────────────────────────────────────────────────

impl From<ConnectionItem> for PlatformConnection {
    fn from(c: ConnectionItem) -> Self {
        let status = c
            .status
            .parse()
            .unwrap_or_else(|_| ConnectionStatus::Unknown(c.status.clone()));
        Self {
            platform: Platform::from(c.platform),
            status,
            display_name: c.display_name,
            connected_at: parse_datetime(c.connected_at.as_deref()),
            last_health_check: parse_datetime(c.last_health_check.as_deref()),
            error_message: c.error_message,
        }
    }
}

// ── Sync ───────────────────────────────────────────────────────────

impl From<SyncRunItem> for SyncRun {
    fn from(r: SyncRunItem) -> Self {
        Self {
            id: EntityId::from(r.id),
            platform: Platform::from(r.platform),
            sync_type: parse_or_default(r.sync_type.as_deref()),
            status: parse_or_default(Some(r.status.as_str())),
            artists_processed: r.artists_processed,
            artists_blocked: r.artists_blocked,
            error_count: r.error_count,
            started_at: parse_datetime(r.started_at.as_deref()),
            completed_at: parse_datetime(r.completed_at.as_deref()),
            error_message: r.error_message,
        }
    }
}

impl From<SyncStatusItem> for PlatformSyncStatus {
    fn from(s: SyncStatusItem) -> Self {
        Self {
            platform: Platform::from(s.platform),
            status: parse_or_default(Some(s.status.as_str())),
            last_sync_at: parse_datetime(s.last_sync_at.as_deref()),
            artists_blocked: s.artists_blocked,
        }
    }
}

// ── Analytics ──────────────────────────────────────────────────────

impl From<DashboardItem> for DashboardStats {
    fn from(d: DashboardItem) -> Self {
        Self {
            total_blocked: d.total_blocked,
            category_subscriptions: d.category_subscriptions,
            platforms_connected: d.platforms_connected,
            offenses_tracked: d.offenses_tracked,
            blocks_last_30_days: d.blocks_last_30_days,
            top_categories: d
                .top_categories
                .into_iter()
                .map(|c| (c.name, c.count))
                .collect(),
        }
    }
}

/// Trend rows with an unparseable date are dropped.
pub(crate) fn trend_point(t: TrendPointItem) -> Option<TrendPoint> {
    Some(TrendPoint {
        date: parse_date(Some(t.date.as_str()))?,
        blocked: t.blocked,
        unblocked: t.unblocked,
    })
}

impl From<ReportItem> for Report {
    fn from(r: ReportItem) -> Self {
        Self {
            id: EntityId::from(r.id),
            report_type: r.report_type,
            status: parse_or_default(Some(r.status.as_str())),
            format: r.format,
            created_at: parse_datetime(r.created_at.as_deref()),
            download_url: r.download_url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{EvidenceTier, ProceduralState, Severity, SyncStatus};

    #[test]
    fn offense_conversion_parses_enums() {
        let item = OffenseItem {
            id: "o1".into(),
            artist_id: "a1".into(),
            artist_name: Some("Alpha".into()),
            category: "violence".into(),
            severity: "severe".into(),
            procedural_state: Some("convicted".into()),
            title: "Assault".into(),
            description: None,
            incident_date: Some("2019-03-04".into()),
            evidence: vec![EvidenceItem {
                id: None,
                url: "https://court.example.org".into(),
                title: None,
                source_name: None,
                source_tier: Some("a".into()),
                credibility_score: Some(1.7),
                published_date: Some("2019-04-01T12:00:00Z".into()),
            }],
            created_at: None,
        };

        let offense = Offense::from(item);
        assert_eq!(offense.severity, Severity::Severe);
        assert_eq!(offense.procedural_state, ProceduralState::Convicted);
        assert_eq!(
            offense.incident_date,
            NaiveDate::from_ymd_opt(2019, 3, 4)
        );
        assert_eq!(offense.evidence[0].tier, Some(EvidenceTier::A));
        assert_eq!(offense.evidence[0].credibility, Some(1.0));
        assert_eq!(
            offense.evidence[0].published,
            NaiveDate::from_ymd_opt(2019, 4, 1)
        );
    }

    #[test]
    fn unknown_values_fall_back() {
        let run = SyncRun::from(SyncRunItem {
            id: "r1".into(),
            platform: "napster".into(),
            sync_type: None,
            status: "exploded".into(),
            artists_processed: 0,
            artists_blocked: 0,
            error_count: 0,
            started_at: Some("not a date".into()),
            completed_at: None,
            error_message: None,
        });
        assert_eq!(run.status, SyncStatus::Unknown);
        assert_eq!(run.platform, Platform::Other("napster".into()));
        assert!(run.started_at.is_none());
    }

    #[test]
    fn trend_points_without_dates_are_dropped() {
        assert!(
            trend_point(TrendPointItem {
                date: "yesterday".into(),
                blocked: 1,
                unblocked: 0,
            })
            .is_none()
        );
    }
}
