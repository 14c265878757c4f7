//! Smart Editor Core - Headless Sale-Line Editing for Pharmacy Billing
//!
//! This crate holds everything behind the billing counter's free-text line
//! editor, independent of any UI framework. The operator types or scans
//! short text ("dolo 12"), an external recognizer turns it into priced sale
//! lines, and the lines show up as chips that can be re-opened, re-typed or
//! deleted from the keyboard.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        UI Surface                             │
//! │     (ratatui TUI, or anything that can map input events)      │
//! └───────────────┬───────────────────────────────▲───────────────┘
//!                 │ EditorEvent                   │ DisplayAttrs,
//!                 ▼                               │ FocusTarget
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  KeyboardDispatcher                           │
//! │  ┌──────────────┐  ┌──────────────┐  ┌─────────────────────┐ │
//! │  │ SmartEditor  │  │  LineStore   │  │  ChipRenderer       │ │
//! │  │ (state mach.)│──│ (bill draft) │  │  (pure projection)  │ │
//! │  └──────┬───────┘  └──────────────┘  └─────────────────────┘ │
//! │         │ RecognitionRequest ▲ RecognitionOutcome (mpsc)     │
//! │  ┌──────▼────────────────────┴──┐                            │
//! │  │  RecognitionClient (tokio)   │──── POST text ──▶ service  │
//! │  └──────────────────────────────┘                            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use smart_editor_core::{
//!     load_config, EditorEvent, HttpRecognitionClient, Key, KeyboardDispatcher,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let client = Arc::new(HttpRecognitionClient::from_config(&config.service)?);
//!     let mut dispatcher = KeyboardDispatcher::new(client);
//!
//!     for c in "dolo 12".chars() {
//!         dispatcher.handle(Key::Char(c).into());
//!     }
//!     dispatcher.handle(EditorEvent::from(Key::Enter));
//!     dispatcher.settle().await;
//!
//!     assert_eq!(dispatcher.editor().store().len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`model`]: Sale line and recognition status
//! - [`store`]: Ordered bill draft and totals
//! - [`buffer`]: Caret-aware text buffer for the two inputs
//! - [`recognition`]: Recognition client trait and HTTP implementation
//! - [`state`]: Editing state machine and result reconciliation
//! - [`dispatcher`]: Input mapping and the async driver
//! - [`render`]: Chip display attributes
//! - [`config`]: TOML/env configuration
//!
//! # No TUI Dependencies
//!
//! This crate does not depend on ratatui, crossterm, or any other UI
//! framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod config;
pub mod dispatcher;
pub mod model;
pub mod recognition;
pub mod render;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use buffer::TextBuffer;
pub use config::{
    default_config_path, default_log_path, load_config, load_config_from_path, ConfigError,
    ConfigOverrides, ConfigSource, DisplayConfig, EditorConfig, LoggingConfig, ServiceConfig,
};
pub use dispatcher::{EditorEvent, Key, KeyOutcome, KeyPress, KeyboardDispatcher};
pub use model::{LineStatus, MatchedItem, SaleLine};
pub use recognition::{
    HttpRecognitionClient, RecognitionClient, RecognitionError, RecognitionOutcome,
    RecognitionRequest, RecognitionTarget, RequestId,
};
pub use render::{ChipCategory, ChipRenderer, DisplayAttrs};
pub use state::{ApplyResult, EditingState, FocusTarget, SmartEditor};
pub use store::{BillTotals, LineStore, StoreError};
