use chrono::{DateTime, Utc};
use sentify_protocol::{ConsultationRecord, RecordId, SentimentLabel};

/// Build a record with an RFC 3339 timestamp.
///
/// Panics on a malformed timestamp.
pub fn record_at(
    id: RecordId,
    serial_id: &str,
    label: SentimentLabel,
    confidence: f64,
    created_at: &str,
) -> ConsultationRecord {
    ConsultationRecord {
        id,
        serial_id: serial_id.to_string(),
        comment_text: String::new(),
        label,
        confidence,
        created_at: DateTime::parse_from_rfc3339(created_at)
            .expect("valid rfc3339 timestamp")
            .with_timezone(&Utc),
    }
}
