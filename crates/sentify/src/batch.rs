//! Row framing for batch submissions read from files or stdin.
//!
//! Two framings are accepted: a JSON array of `{serial_id, comment}` objects,
//! or one row per line with the serial id and comment separated by a tab.

use sentify_protocol::BatchRow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchParseError {
    #[error("invalid batch json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Split `input` into batch rows.
///
/// Input whose first non-blank character is `[` is read as JSON. Otherwise
/// each non-empty line is a row; a line without a tab has an empty serial id.
pub fn parse_batch_rows(input: &str) -> Result<Vec<BatchRow>, BatchParseError> {
    if input.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(input)?);
    }
    Ok(input
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once('\t') {
            Some((serial_id, comment)) => BatchRow::new(serial_id, comment),
            None => BatchRow::new("", line),
        })
        .collect())
}
