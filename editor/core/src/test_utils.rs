//! Shared fixtures for unit tests.
//!
//! Lines are built the only way production code builds them: by
//! deserializing a recognition response entry.

use serde_json::json;

use crate::model::{LineStatus, SaleLine};

/// Resolved line with a catalog match
pub fn line(captured: &str, name: &str, price: f64, quantity: u32, confidence: f64) -> SaleLine {
    serde_json::from_value(json!({
        "captured_name": captured,
        "matched_item": { "name": name, "price": price },
        "quantity": quantity,
        "confidence": confidence,
    }))
    .expect("fixture line must deserialize")
}

/// Line with an explicit status, captured name equal to the item name
pub fn line_with_status(name: &str, price: f64, quantity: u32, status: LineStatus) -> SaleLine {
    serde_json::from_value(json!({
        "captured_name": name.to_lowercase(),
        "matched_item": { "name": name, "price": price },
        "quantity": quantity,
        "confidence": if status == LineStatus::Resolved { 0.9 } else { 0.0 },
        "status": status.as_str(),
    }))
    .expect("fixture line must deserialize")
}

/// Distinct resolved lines named `item-0`, `item-1`, ...
pub fn numbered_lines(count: usize) -> Vec<SaleLine> {
    (0..count)
        .map(|i| {
            let name = format!("item-{i}");
            let quantity = u32::try_from(i + 1).unwrap_or(u32::MAX);
            line(&name, &name, 1.0, quantity, 0.9)
        })
        .collect()
}
