//! Chip Renderer
//!
//! Pure projection from a [`SaleLine`] plus selection state to display
//! attributes. No store access, no network, no business decisions beyond
//! reading the recognizer's status.

use crate::config::DisplayConfig;
use crate::model::{LineStatus, SaleLine};

/// Visual category of a chip
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChipCategory {
    /// Resolved, confidence above the threshold
    HighConfidence,
    /// Resolved, confidence at or below the threshold
    MediumConfidence,
    /// Out of stock
    Danger,
    /// Unknown item, dimmed
    Neutral,
}

/// Everything a surface needs to draw one chip
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayAttrs {
    /// Item name
    pub name: String,
    /// Quantity text; `None` when suppressed
    pub quantity: Option<String>,
    /// Price text: currency amount, `"OOS"` or `"Unknown"`
    pub price_text: String,
    /// Status category
    pub category: ChipCategory,
    /// Background emphasis for the selected chip
    pub emphasized: bool,
    /// Tooltip-style confidence text, e.g. `"Confidence: 92%"`
    pub confidence_label: String,
}

/// Chip projection with configurable thresholds
#[derive(Clone, Debug, PartialEq)]
pub struct ChipRenderer {
    high_confidence_threshold: f64,
    currency_symbol: String,
}

impl Default for ChipRenderer {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}

impl ChipRenderer {
    /// Renderer with explicit settings
    #[must_use]
    pub fn new(high_confidence_threshold: f64, currency_symbol: impl Into<String>) -> Self {
        Self {
            high_confidence_threshold,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Renderer from the `[display]` configuration section
    #[must_use]
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.high_confidence_threshold, config.currency_symbol.clone())
    }

    /// Project one line
    #[must_use]
    pub fn render(&self, line: &SaleLine, is_selected: bool) -> DisplayAttrs {
        let (price_text, category, quantity) = match line.status() {
            LineStatus::OutOfStock => ("OOS".to_string(), ChipCategory::Danger, None),
            LineStatus::Unknown => ("Unknown".to_string(), ChipCategory::Neutral, None),
            LineStatus::Resolved => {
                let total = f64::from(line.quantity()) * line.matched_item().price;
                let category = if line.confidence() > self.high_confidence_threshold {
                    ChipCategory::HighConfidence
                } else {
                    ChipCategory::MediumConfidence
                };
                (
                    self.format_currency(total),
                    category,
                    Some(line.quantity().to_string()),
                )
            }
        };

        DisplayAttrs {
            name: line.display_name().to_string(),
            quantity,
            price_text,
            category,
            emphasized: is_selected,
            confidence_label: format!("Confidence: {:.0}%", line.confidence() * 100.0),
        }
    }

    /// Format an amount with the configured symbol and two decimals
    #[must_use]
    pub fn format_currency(&self, amount: f64) -> String {
        format!("{}{amount:.2}", self.currency_symbol)
    }
}
