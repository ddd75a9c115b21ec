//! Summary statistics over classified records.
//!
//! Everything here is a pure function of the input slice: results do not
//! depend on record order and are recomputed in full on every call.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use sentify_config::AnalyticsConfig;
use sentify_protocol::{ConsultationRecord, RecordId, SentimentLabel};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Number of top terms kept when no option says otherwise.
pub const DEFAULT_TOP_TERMS: usize = 20;

/// Words too common to be useful in a term frequency listing.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has",
    "have", "he", "her", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "me", "my", "of", "on", "or", "our", "out", "over", "she", "so", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "those", "to", "too",
    "up", "us", "was", "we", "were", "what", "when", "which", "while", "who", "will", "with",
    "would", "you", "your",
];

/// Per-label record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl LabelCounts {
    /// Count records per label.
    pub fn from_records(records: &[ConsultationRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.total += 1;
            match record.label {
                SentimentLabel::Positive => counts.positive += 1,
                SentimentLabel::Neutral => counts.neutral += 1,
                SentimentLabel::Negative => counts.negative += 1,
            }
        }
        counts
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }
}

/// Records for one label on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    pub label: SentimentLabel,
    pub count: usize,
}

/// The most recent reading in a record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestReading {
    pub id: RecordId,
    pub label: SentimentLabel,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

/// Occurrences of a single term across comment texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Tuning for [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Offset whose calendar days define trend buckets.
    pub bucket_offset: FixedOffset,
    /// Maximum number of entries in [`Summary::top_terms`].
    pub top_terms: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            bucket_offset: utc_offset(),
            top_terms: DEFAULT_TOP_TERMS,
        }
    }
}

impl AggregateOptions {
    /// Options from analytics config; an unrepresentable offset falls back to UTC.
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        let bucket_offset = config
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(utc_offset);
        Self {
            bucket_offset,
            top_terms: config.top_terms,
        }
    }
}

/// Summary statistics for a record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub counts: LabelCounts,
    /// Mean confidence for each label present in the input.
    pub averages: BTreeMap<SentimentLabel, f64>,
    /// Percentage of records carrying each present label, 2 decimals.
    pub shares: BTreeMap<SentimentLabel, f64>,
    pub trend: Vec<TrendPoint>,
    pub latest: Option<LatestReading>,
    pub top_terms: Vec<TermCount>,
}

impl Summary {
    /// Average confidence for `label`, if any record carries it.
    pub fn average(&self, label: SentimentLabel) -> Option<f64> {
        self.averages.get(&label).copied()
    }
}

/// Mean confidence of records with `label`; `None` when there are none.
pub fn average_confidence(records: &[ConsultationRecord], label: SentimentLabel) -> Option<f64> {
    let (count, hundredths) = records
        .iter()
        .filter(|record| record.label == label)
        .fold((0_i64, 0_i64), |(count, sum), record| {
            (count + 1, sum + to_hundredths(record.confidence))
        });
    if count == 0 {
        return None;
    }
    Some(hundredths as f64 / (count * 100) as f64)
}

/// Per-day, per-label counts, sorted by day then label. Days without
/// records for a label produce no entry.
pub fn trend(records: &[ConsultationRecord], offset: FixedOffset) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<(NaiveDate, SentimentLabel), usize> = BTreeMap::new();
    for record in records {
        let day = record.created_at.with_timezone(&offset).date_naive();
        *buckets.entry((day, record.label)).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|((day, label), count)| TrendPoint { day, label, count })
        .collect()
}

/// Most frequent non-stop-word terms, ties broken alphabetically.
pub fn top_terms(records: &[ConsultationRecord], limit: usize) -> Vec<TermCount> {
    if limit == 0 {
        return Vec::new();
    }
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        for term in terms(&record.comment_text) {
            *counts.entry(term).or_default() += 1;
        }
    }
    let mut ranked: Vec<TermCount> = counts
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    ranked.truncate(limit);
    ranked
}

/// Compute every summary statistic for `records`.
pub fn aggregate(records: &[ConsultationRecord], options: &AggregateOptions) -> Summary {
    let counts = LabelCounts::from_records(records);
    let mut averages = BTreeMap::new();
    let mut shares = BTreeMap::new();
    for label in SentimentLabel::ALL {
        if let Some(average) = average_confidence(records, label) {
            averages.insert(label, average);
        }
        let count = counts.get(label);
        if count > 0 {
            let percent = count as f64 * 100.0 / counts.total as f64;
            shares.insert(label, (percent * 100.0).round() / 100.0);
        }
    }
    let latest = records
        .iter()
        .max_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|record| LatestReading {
            id: record.id,
            label: record.label,
            confidence: record.confidence,
            created_at: record.created_at,
        });

    Summary {
        counts,
        averages,
        shares,
        trend: trend(records, options.bucket_offset),
        latest,
        top_terms: top_terms(records, options.top_terms),
    }
}

fn to_hundredths(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Lowercased words of `text` with stop words, numbers, and single letters removed.
fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|word| word.trim_matches('\'').to_lowercase())
        .filter(|word| word.chars().count() > 1)
        .filter(|word| !word.chars().all(|c| c.is_numeric()))
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
}
