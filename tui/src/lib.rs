//! Smart Editor TUI - Terminal billing counter
//!
//! Full-screen front end for the sale-line editor: the bill draft as a
//! column of colored chips, an inline editor for re-typing a line, a tail
//! input for new lines and a running total.
//!
//! # Architecture
//!
//! - **App**: Event loop, status messages, service probe
//! - **Input**: crossterm events to editor events and app commands
//! - **Widgets**: Chip list, summary panel, status bar
//! - **Theme**: Chip category colors

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
