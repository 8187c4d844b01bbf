//! Screen identifiers and tab order.

use std::fmt;

/// Each primary screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Blocklist,
    Search,
    Categories,
    Offenses,
    Platforms,
    Analytics,
}

impl ScreenId {
    /// Tab-bar order.
    pub const ALL: [ScreenId; 6] = [
        Self::Blocklist,
        Self::Search,
        Self::Categories,
        Self::Offenses,
        Self::Platforms,
        Self::Analytics,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    /// Number key (1-6).
    pub fn number(self) -> usize {
        self.index() + 1
    }

    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Next screen in tab order, wrapping.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Blocklist => "Blocklist",
            Self::Search => "Search",
            Self::Categories => "Categories",
            Self::Offenses => "Offenses",
            Self::Platforms => "Platforms",
            Self::Analytics => "Analytics",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
