//! Usage records and their one-line display form.
//!
//! The display line is also what older ledger files stored, so
//! [`parse_formatted`] must keep accepting whatever [`format_record`] emits.

use crate::units::{compute_consumption, MilliampHours};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used when the user leaves the device name blank
pub const DEFAULT_DEVICE_NAME: &str = "Unknown Device";

/// One logged device draw
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub name: String,
    pub current_microamps: f64,
    pub duration_seconds: f64,
    #[serde(rename = "consumption_mah")]
    pub consumption: MilliampHours,
}

impl UsageRecord {
    /// Build a record, computing its consumption from the measurements.
    pub fn new(name: &str, current_microamps: f64, duration_seconds: f64) -> Self {
        Self {
            name: normalize_name(name),
            current_microamps,
            duration_seconds,
            consumption: compute_consumption(current_microamps, duration_seconds),
        }
    }
}

impl fmt::Display for UsageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_record(self))
    }
}

fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_DEVICE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Render a record as `"{name} | Current: .. uA | Duration: .. s | Consumption: .. mAh"`.
pub fn format_record(record: &UsageRecord) -> String {
    format!(
        "{} | Current: {:.2} uA | Duration: {:.0} s | Consumption: {:.6} mAh",
        record.name, record.current_microamps, record.duration_seconds, record.consumption.0
    )
}

/// Recover a record from its display line.
///
/// Segments are split off the right so a name containing `|` survives.
/// Consumption is taken from the line as written, not recomputed.
pub fn parse_formatted(line: &str) -> Result<UsageRecord, String> {
    let mut segments = line.rsplitn(4, '|');
    let consumption = segments.next().ok_or("empty entry")?;
    let duration = segments.next().ok_or("missing duration segment")?;
    let current = segments.next().ok_or("missing current segment")?;
    let name = segments.next().ok_or("missing name segment")?;

    Ok(UsageRecord {
        name: normalize_name(name),
        current_microamps: field_value(current, "Current")?,
        duration_seconds: field_value(duration, "Duration")?,
        consumption: MilliampHours(field_value(consumption, "Consumption")?),
    })
}

/// `" Label: 12.5 unit"` -> 12.5
fn field_value(segment: &str, label: &str) -> Result<f64, String> {
    let (found, rest) = segment
        .trim()
        .split_once(": ")
        .ok_or_else(|| format!("segment {:?} has no ': ' separator", segment.trim()))?;

    if found != label {
        return Err(format!("expected {} field, found {:?}", label, found));
    }

    let number = rest.split_whitespace().next().unwrap_or("");
    number
        .parse()
        .map_err(|_| format!("{} value {:?} is not a number", label, number))
}
