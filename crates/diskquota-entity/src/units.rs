//! Megabyte/byte conversions.
//!
//! Operators always see whole megabytes; the engine computes in bytes.

/// Fixed conversion factor between the MB figures operators configure and bytes.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Convert whole megabytes to bytes, saturating on overflow.
pub fn mb_to_bytes(mb: u64) -> u64 {
    mb.saturating_mul(BYTES_PER_MB)
}

/// Convert bytes to megabytes rounded to two decimals for display.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / BYTES_PER_MB as f64;
    (mb * 100.0).round() / 100.0
}

/// Render bytes as a two-decimal megabyte figure, e.g. `"50.00"`.
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2}", bytes_to_mb(bytes))
}
