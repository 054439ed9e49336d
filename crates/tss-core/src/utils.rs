use std::{fs, path::Path};

use chrono::Local;
use serde::Serialize;

use crate::Result;

// ============== Timestamp Helpers ==============

/// Local timestamp used in export/report file names (`20260101_120000`).
pub fn file_stamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Local ISO-8601 timestamp stored inside records and reports.
pub fn iso_timestamp_local() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

// ============== Text Helpers ==============

/// Keep at most `max_chars` characters (not bytes).
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ============== File Helpers ==============

/// Write `value` as 2-space indented JSON, UTF-8, non-ASCII kept as is.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');

    // Sibling temp file + rename: readers never see a partial export.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
