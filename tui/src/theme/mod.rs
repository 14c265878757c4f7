//! Theme and Colors
//!
//! Counter-friendly palette: status must read at a glance from across the
//! desk, so each chip category gets one strong foreground color.

use ratatui::style::{Color, Modifier, Style};

use smart_editor_core::ChipCategory;

// ============================================================================
// Chip Categories
// ============================================================================

/// Resolved, high confidence
pub const HIGH_CONFIDENCE_GREEN: Color = Color::Rgb(120, 230, 120);

/// Resolved, worth a second look
pub const MEDIUM_CONFIDENCE_AMBER: Color = Color::Rgb(255, 200, 90);

/// Out of stock
pub const DANGER_RED: Color = Color::Rgb(255, 80, 80);

/// Unknown item
pub const NEUTRAL_GRAY: Color = Color::Rgb(140, 140, 140);

// ============================================================================
// UI Colors
// ============================================================================

/// Background of the chip being edited
pub const SELECTED_BG: Color = Color::Rgb(50, 60, 90);

/// Inline editor and tail input text
pub const INPUT_TEXT: Color = Color::Rgb(230, 230, 230);

/// Placeholders, hints, separators
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Headings and the grand total
pub const ACCENT_CYAN: Color = Color::Rgb(110, 200, 230);

/// Status bar error text
pub const ERROR_RED: Color = Color::Rgb(255, 110, 110);

/// Style for a chip of `category`
#[must_use]
pub fn chip_style(category: ChipCategory, emphasized: bool) -> Style {
    let fg = match category {
        ChipCategory::HighConfidence => HIGH_CONFIDENCE_GREEN,
        ChipCategory::MediumConfidence => MEDIUM_CONFIDENCE_AMBER,
        ChipCategory::Danger => DANGER_RED,
        ChipCategory::Neutral => NEUTRAL_GRAY,
    };

    let style = Style::default().fg(fg);
    let style = if category == ChipCategory::Neutral {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    };

    if emphasized {
        style.bg(SELECTED_BG).add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// Style for placeholder text
#[must_use]
pub fn placeholder_style() -> Style {
    Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC)
}

/// Style for text being typed
#[must_use]
pub fn input_style() -> Style {
    Style::default().fg(INPUT_TEXT)
}
