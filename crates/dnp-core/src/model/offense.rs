// ── Offense and evidence domain types ──

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::entity_id::EntityId;

/// How serious a documented offense is. Ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Severity {
    #[default]
    Unknown,
    Minor,
    Moderate,
    Severe,
    Egregious,
}

/// Where an offense stands in the legal/disciplinary process.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ProceduralState {
    #[default]
    Unknown,
    Alleged,
    UnderInvestigation,
    Charged,
    Convicted,
    Settled,
    Acquitted,
    Dismissed,
    Admitted,
}

/// Credibility ranking of a cited source.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EvidenceTier {
    /// Court records, official filings.
    A,
    /// Major investigative journalism.
    B,
    /// Secondary reporting.
    C,
    /// Unverified claims.
    D,
}

impl EvidenceTier {
    pub fn description(self) -> &'static str {
        match self {
            Self::A => "court record / official filing",
            Self::B => "investigative journalism",
            Self::C => "secondary reporting",
            Self::D => "unverified claim",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: Option<EntityId>,
    pub url: String,
    pub title: Option<String>,
    pub source_name: Option<String>,
    pub tier: Option<EvidenceTier>,
    /// 0.0 ..= 1.0
    pub credibility: Option<f64>,
    pub published: Option<NaiveDate>,
}

/// A documented offense with its cited evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offense {
    pub id: EntityId,
    pub artist_id: EntityId,
    pub artist_name: Option<String>,
    pub category: String,
    pub severity: Severity,
    pub procedural_state: ProceduralState,
    pub title: String,
    pub description: Option<String>,
    pub incident_date: Option<NaiveDate>,
    pub evidence: Vec<Evidence>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Offense {
    /// Best (lowest-letter) tier among the cited sources.
    pub fn strongest_tier(&self) -> Option<EvidenceTier> {
        self.evidence.iter().filter_map(|e| e.tier).min()
    }
}

/// Offense row embedded in an artist profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenseSummary {
    pub id: EntityId,
    pub category: String,
    pub severity: Severity,
    pub procedural_state: ProceduralState,
    pub title: String,
    pub incident_date: Option<NaiveDate>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_by_seriousness() {
        assert!(Severity::Egregious > Severity::Severe);
        assert!(Severity::Minor > Severity::Unknown);
        assert_eq!("SEVERE".parse::<Severity>().unwrap(), Severity::Severe);
    }

    #[test]
    fn procedural_state_snake_case() {
        assert_eq!(
            "under_investigation".parse::<ProceduralState>().unwrap(),
            ProceduralState::UnderInvestigation
        );
        assert_eq!(ProceduralState::UnderInvestigation.to_string(), "under_investigation");
    }

    #[test]
    fn strongest_tier_picks_best_source() {
        let ev = |tier| Evidence {
            id: None,
            url: "https://example.org".into(),
            title: None,
            source_name: None,
            tier,
            credibility: None,
            published: None,
        };
        let offense = Offense {
            id: EntityId::from("o1"),
            artist_id: EntityId::from("a1"),
            artist_name: None,
            category: "violence".into(),
            severity: Severity::Severe,
            procedural_state: ProceduralState::Charged,
            title: "t".into(),
            description: None,
            incident_date: None,
            evidence: vec![ev(Some(EvidenceTier::C)), ev(None), ev(Some(EvidenceTier::A))],
            created_at: None,
        };
        assert_eq!(offense.strongest_tier(), Some(EvidenceTier::A));
    }
}
