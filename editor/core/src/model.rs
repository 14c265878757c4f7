//! Sale Line Model
//!
//! The data entity for one resolved or unresolved line of the bill draft.
//!
//! A [`SaleLine`] only ever comes out of a recognition response: its fields
//! are private and the only way to build one is to deserialize the wire
//! format. The editor never patches a line in place; re-editing sends the
//! text back to the recognizer and splices in whatever comes back.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Recognition status assigned by the recognizer.
///
/// This is a tagged variant, not a flag derived from other fields. Renderer
/// and totals match on it exhaustively so a new status forces both sites to
/// be revisited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineStatus {
    /// Matched to an in-stock catalog item; billable
    #[default]
    Resolved,
    /// Matched, but the item has no stock; never billable
    OutOfStock,
    /// No catalog match; never billable
    Unknown,
}

impl LineStatus {
    /// Map a wire status string onto the enum.
    ///
    /// Absent, `"Available"` and `"Resolved"` all mean resolved. Strings the
    /// editor does not know are treated as [`LineStatus::Unknown`] so an
    /// unexpected status can never become billable.
    #[must_use]
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("" | "Available" | "Resolved") => Self::Resolved,
            Some("OutOfStock") => Self::OutOfStock,
            Some(_) => Self::Unknown,
        }
    }

    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolved => "Resolved",
            Self::OutOfStock => "OutOfStock",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether lines with this status contribute to monetary totals
    #[must_use]
    pub fn is_billable(&self) -> bool {
        match self {
            Self::Resolved => true,
            Self::OutOfStock | Self::Unknown => false,
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LineStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_wire(raw.as_deref()))
    }
}

/// Catalog entity the recognizer bound the text to.
///
/// When the text could not be resolved the recognizer sends a sentinel: the
/// name it guessed (possibly empty) and a zero price.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MatchedItem {
    /// Catalog item name
    #[serde(default)]
    pub name: String,
    /// Unit price
    #[serde(default)]
    pub price: f64,
}

/// Wire shape of one recognition result entry.
///
/// Unknown fields (catalog ids, batches, stock counts) are ignored.
#[derive(Debug, Deserialize)]
struct WireSaleLine {
    #[serde(default)]
    quantity: u32,
    #[serde(default)]
    matched_item: MatchedItem,
    #[serde(default)]
    captured_name: String,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    status: LineStatus,
}

impl TryFrom<WireSaleLine> for SaleLine {
    type Error = String;

    fn try_from(wire: WireSaleLine) -> Result<Self, Self::Error> {
        if !wire.confidence.is_finite() {
            return Err(format!("confidence is not a number: {}", wire.confidence));
        }
        if !wire.matched_item.price.is_finite() {
            return Err(format!(
                "price for '{}' is not a number",
                wire.matched_item.name
            ));
        }

        Ok(Self {
            quantity: wire.quantity,
            matched_item: wire.matched_item,
            captured_name: wire.captured_name,
            confidence: wire.confidence.clamp(0.0, 1.0),
            status: wire.status,
        })
    }
}

/// One entry in the bill draft.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "WireSaleLine")]
pub struct SaleLine {
    quantity: u32,
    matched_item: MatchedItem,
    captured_name: String,
    confidence: f64,
    status: LineStatus,
}

impl SaleLine {
    /// Units requested
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Catalog match (or the unresolved sentinel)
    #[must_use]
    pub fn matched_item(&self) -> &MatchedItem {
        &self.matched_item
    }

    /// Raw substring the recognizer read as the item name
    #[must_use]
    pub fn captured_name(&self) -> &str {
        &self.captured_name
    }

    /// Recognizer's self-reported certainty, in [0, 1]
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Recognition status
    #[must_use]
    pub fn status(&self) -> LineStatus {
        self.status
    }

    /// Whether this line may enter the store.
    ///
    /// A zero quantity means the recognizer wants the line dropped.
    #[must_use]
    pub fn is_committable(&self) -> bool {
        self.quantity > 0
    }

    /// Monetary contribution of this line.
    ///
    /// `None` for lines that are not billable, whatever their quantity and
    /// price fields say.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        match self.status {
            LineStatus::Resolved => Some(f64::from(self.quantity) * self.matched_item.price),
            LineStatus::OutOfStock | LineStatus::Unknown => None,
        }
    }

    /// Name shown on the chip
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.matched_item.name.is_empty() {
            &self.captured_name
        } else {
            &self.matched_item.name
        }
    }

    /// Reconstruct editable text: `"{captured_name} {quantity}"`.
    ///
    /// Falls back to the matched name when the recognizer captured nothing.
    #[must_use]
    pub fn edit_text(&self) -> String {
        let name = if self.captured_name.trim().is_empty() {
            self.matched_item.name.trim()
        } else {
            self.captured_name.trim()
        };
        format!("{name} {}", self.quantity)
    }
}
