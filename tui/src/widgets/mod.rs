//! Widgets
//!
//! Borderless building blocks for the editor screen.

pub mod chip_list;
pub mod status_bar;
pub mod summary;

pub use chip_list::{ChipList, ChipListState};
pub use status_bar::{ServiceHealth, StatusBar, StatusMessage};
pub use summary::SummaryPanel;
