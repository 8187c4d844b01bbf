// ── Typed request structs for Command payloads ──
//
// Offense reports are validated client-side before any network call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use dnp_api::models::{CreateOffenseRequest, NewEvidence, OffenseQuery};

use crate::error::CoreError;
use crate::model::{EntityId, EvidenceTier, ReportFormat, ReportType, Severity};

// ── Offense reports ────────────────────────────────────────────────

/// A cited source supplied with a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceInput {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<EvidenceTier>,
}

impl EvidenceInput {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            source_name: None,
            tier: None,
        }
    }

    /// The URL must parse and use http or https.
    pub fn validate(&self) -> Result<(), CoreError> {
        let parsed = Url::parse(self.url.trim())
            .map_err(|e| {
                CoreError::validation(format!("invalid evidence URL {:?}: {e}", self.url))
            })?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(CoreError::validation(format!(
                "evidence URL must use http or https, got {other}"
            ))),
        }
    }

    pub(crate) fn to_wire(&self) -> NewEvidence {
        NewEvidence {
            url: self.url.trim().to_owned(),
            title: self.title.clone(),
            source_name: self.source_name.clone(),
            source_tier: self.tier.map(|t| t.to_string()),
        }
    }
}

/// A user-submitted offense report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOffenseReportRequest {
    pub artist_id: EntityId,
    pub category: String,
    pub severity: Severity,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<NaiveDate>,
    pub evidence: Vec<EvidenceInput>,
}

impl CreateOffenseReportRequest {
    /// Check the required fields. Runs before anything is sent.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.artist_id.to_string().trim().is_empty() {
            return Err(CoreError::validation("an artist is required"));
        }
        if self.category.trim().is_empty() {
            return Err(CoreError::validation("a category is required"));
        }
        if self.severity == Severity::Unknown {
            return Err(CoreError::validation("a severity is required"));
        }
        if self.title.trim().is_empty() {
            return Err(CoreError::validation("a title is required"));
        }
        if self.evidence.is_empty() {
            return Err(CoreError::validation(
                "at least one evidence URL is required",
            ));
        }
        self.evidence.iter().try_for_each(EvidenceInput::validate)
    }

    pub(crate) fn to_wire(&self) -> CreateOffenseRequest {
        CreateOffenseRequest {
            artist_id: self.artist_id.to_string(),
            category: self.category.trim().to_owned(),
            severity: self.severity.to_string(),
            title: self.title.trim().to_owned(),
            description: self
                .description
                .as_ref()
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            incident_date: self.incident_date.map(|d| d.format("%Y-%m-%d").to_string()),
            evidence: self.evidence.iter().map(EvidenceInput::to_wire).collect(),
        }
    }
}

// ── Offense queries ────────────────────────────────────────────────

/// Filters for listing offenses. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffenseFilter {
    pub artist_id: Option<EntityId>,
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub limit: Option<u32>,
}

impl OffenseFilter {
    pub(crate) fn to_wire(&self) -> OffenseQuery {
        OffenseQuery {
            artist_id: self.artist_id.as_ref().map(ToString::to_string),
            category: self.category.clone(),
            severity: self.severity.map(|s| s.to_string()),
            limit: self.limit,
        }
    }
}

// ── Reports ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub format: ReportFormat,
    /// Look-back window in days; the backend default applies when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

impl ReportRequest {
    pub(crate) fn to_wire(&self) -> dnp_api::models::ReportRequest {
        dnp_api::models::ReportRequest {
            report_type: self.report_type.to_string(),
            format: self.format.to_string(),
            days: self.days,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn report() -> CreateOffenseReportRequest {
        CreateOffenseReportRequest {
            artist_id: EntityId::from("a1"),
            category: "violence".into(),
            severity: Severity::Severe,
            title: "Assault conviction".into(),
            description: Some("  ".into()),
            incident_date: NaiveDate::from_ymd_opt(2020, 5, 1),
            evidence: vec![EvidenceInput::new("https://court.example.org/case/1")],
        }
    }

    #[test]
    fn complete_report_is_valid() {
        report().validate().unwrap();
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut r = report();
        r.title = "   ".into();
        assert!(matches!(r.validate(), Err(CoreError::ValidationFailed { .. })));

        let mut r = report();
        r.severity = Severity::Unknown;
        assert!(r.validate().is_err());

        let mut r = report();
        r.category.clear();
        assert!(r.validate().is_err());

        let mut r = report();
        r.evidence.clear();
        assert!(r.validate().is_err());
    }

    #[test]
    fn evidence_must_be_http() {
        let mut r = report();
        r.evidence.push(EvidenceInput::new("ftp://files.example.org/doc"));
        assert!(r.validate().is_err());

        let mut r = report();
        r.evidence = vec![EvidenceInput::new("not a url")];
        assert!(r.validate().is_err());
    }

    #[test]
    fn wire_form_trims_and_formats() {
        let wire = report().to_wire();
        assert_eq!(wire.severity, "severe");
        assert_eq!(wire.description, None);
        assert_eq!(wire.incident_date.as_deref(), Some("2020-05-01"));
        assert_eq!(wire.evidence[0].url, "https://court.example.org/case/1");
    }
}
