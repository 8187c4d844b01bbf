//! Reusable rendering helpers shared by screens and overlays.

pub mod enforcement;
pub mod nav;
pub mod sub_tabs;
pub mod time_fmt;
