//! Screen implementations. Each screen is a top-level Component.

pub mod analytics;
pub mod blocklist;
pub mod categories;
pub mod offenses;
pub mod platforms;
pub mod search;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create one component per tab.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Blocklist,
            Box::new(blocklist::BlocklistScreen::new()),
        ),
        (ScreenId::Search, Box::new(search::SearchScreen::new())),
        (
            ScreenId::Categories,
            Box::new(categories::CategoriesScreen::new()),
        ),
        (ScreenId::Offenses, Box::new(offenses::OffensesScreen::new())),
        (
            ScreenId::Platforms,
            Box::new(platforms::PlatformsScreen::new()),
        ),
        (
            ScreenId::Analytics,
            Box::new(analytics::AnalyticsScreen::new()),
        ),
    ]
}
