use crate::error::{ChunkError, Result};

use chrono::TimeZone;

/// Formats Unix timestamp into readable UTC string: `YYYY-MM-DD HH:MM:SS`.
///
/// # Arguments
/// * `ts` - Unix timestamp in seconds.
///
/// # Returns
/// * `Result<String>` - Formatted string (e.g., "2024-06-13 10:00:00") or error if out of range.
pub fn format_timestamp(ts: i64) -> Result<String> {
    let dt = chrono::Utc
        .timestamp_opt(ts, 0)
        .single()
        .ok_or_else(|| ChunkError::OutOfRange(format!("timestamp {} cannot be rendered as a date", ts)))?;
    Ok(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Builds the path of chunk `id`: `{base}_{id}.csv`.
///
/// `base` is used as a plain prefix, so `out/day` gives `out/day_0.csv`.
pub fn chunk_path<P: AsRef<std::path::Path>>(base: P, id: usize) -> std::path::PathBuf {
    let mut name = base.as_ref().as_os_str().to_os_string();
    name.push(format!("_{}.csv", id));
    std::path::PathBuf::from(name)
}
