//! Small reusable render helpers shared by screens.

pub mod status_indicator;
pub mod sub_tabs;
