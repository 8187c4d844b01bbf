// ── Streaming platforms and account connections ──

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumString;

/// A streaming service the backend can enforce blocks on.
///
/// Unknown platform names from the backend are preserved in `Other`
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Spotify,
    AppleMusic,
    YoutubeMusic,
    Tidal,
    Deezer,
    AmazonMusic,
    Other(String),
}

impl Platform {
    /// The platforms the backend ships connectors for.
    pub const KNOWN: [Platform; 6] = [
        Self::Spotify,
        Self::AppleMusic,
        Self::YoutubeMusic,
        Self::Tidal,
        Self::Deezer,
        Self::AmazonMusic,
    ];

    /// Wire identifier (`"apple_music"`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Spotify => "spotify",
            Self::AppleMusic => "apple_music",
            Self::YoutubeMusic => "youtube_music",
            Self::Tidal => "tidal",
            Self::Deezer => "deezer",
            Self::AmazonMusic => "amazon_music",
            Self::Other(name) => name,
        }
    }

    /// Human-readable name for tables and toasts.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Spotify => "Spotify",
            Self::AppleMusic => "Apple Music",
            Self::YoutubeMusic => "YouTube Music",
            Self::Tidal => "Tidal",
            Self::Deezer => "Deezer",
            Self::AmazonMusic => "Amazon Music",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<String> for Platform {
    fn from(raw: String) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "spotify" => Self::Spotify,
            "apple_music" | "apple" => Self::AppleMusic,
            "youtube_music" | "youtube" => Self::YoutubeMusic,
            "tidal" => Self::Tidal,
            "deezer" => Self::Deezer,
            "amazon_music" | "amazon" => Self::AmazonMusic,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for Platform {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        p.as_str().to_owned()
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Health of the OAuth connection to a platform account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConnectionStatus {
    Active,
    Expired,
    Error,
    Revoked,
    #[strum(default)]
    Unknown(String),
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Error => "error",
            Self::Revoked => "revoked",
            Self::Unknown(raw) => raw,
        })
    }
}

impl ConnectionStatus {
    /// Only active connections receive enforcement.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A linked streaming account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConnection {
    pub platform: Platform,
    pub status: ConnectionStatus,
    pub display_name: Option<String>,
    pub connected_at: Option<DateTime<Utc>>,
    pub last_health_check: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}
