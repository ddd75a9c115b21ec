//! Classifier trait, lexicon scoring, and score-to-label mapping.

use crate::error::ClassificationError;
use crate::lexicon::Lexicon;
use log::trace;
use regex::Regex;
use sentify_protocol::SentimentLabel;
use std::fmt::Display;
use std::sync::LazyLock;

/// Scores strictly above this are labeled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Scores strictly below this are labeled negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Tokens a negator keeps affecting before it lapses.
const NEGATION_WINDOW: usize = 3;
/// Factor applied to a negated polarity.
const NEGATION_FACTOR: f64 = -0.5;

const WORD_PATTERN: &str = r"[a-z]+(?:'[a-z]+)?";

static WORD_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(WORD_PATTERN));

static DEFAULT_CLASSIFIER: LazyLock<LexiconClassifier> = LazyLock::new(LexiconClassifier::new);

/// Label and confidence derived from a polarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Thresholded label.
    pub label: SentimentLabel,
    /// `|score|` rounded to 2 decimals.
    pub confidence: f64,
    /// Underlying polarity score in `[-1.0, 1.0]`.
    pub score: f64,
}

impl Classification {
    /// Map a polarity score onto a label and confidence.
    ///
    /// Non-finite scores are treated as `0.0`; others are clamped to `[-1, 1]`.
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_finite() {
            score.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let label = if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Self {
            label,
            confidence: round_hundredths(score.abs()),
            score,
        }
    }

    /// Neutral result with zero confidence.
    pub fn neutral() -> Self {
        Self::from_score(0.0)
    }
}

/// Round a non-negative value to 2 decimal places.
///
/// Rounds the exact binary value, so `0.135` (stored slightly above) goes up
/// and a true tie such as `0.125` goes to the even hundredth.
fn round_hundredths(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.fract() != 0.5 {
        return scaled.round() / 100.0;
    }
    // The product landed on a half; the fused residual tells which side the exact value is on.
    let residual = value.mul_add(100.0, -scaled);
    let rounded = if residual > 0.0 {
        scaled.ceil()
    } else if residual < 0.0 {
        scaled.floor()
    } else {
        scaled.round_ties_even()
    };
    rounded / 100.0
}

/// Text classifier used by ingestion.
pub trait SentimentClassifier: Send + Sync {
    /// Classify a comment.
    fn classify(&self, text: &str) -> Result<Classification, ClassificationError>;

    /// Classify any displayable value by its textual representation.
    fn classify_display(&self, value: &dyn Display) -> Result<Classification, ClassificationError> {
        self.classify(&value.to_string())
    }
}

/// Deterministic lexicon-based classifier.
///
/// Each lexicon hit contributes its polarity, scaled by an immediately
/// preceding intensifier and flipped/dampened by a recent negator. The score
/// is the mean contribution, clamped to `[-1, 1]`.
#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier {
    lexicon: Lexicon,
}

impl LexiconClassifier {
    /// Classifier over the default lexicon.
    pub fn new() -> Self {
        Self::with_lexicon(Lexicon::new())
    }

    /// Classifier over a custom lexicon.
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Lexicon backing this classifier.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Compute the polarity score for a text.
    pub fn score(&self, text: &str) -> Result<f64, ClassificationError> {
        let pattern = word_regex()?;
        let lowered = text.to_lowercase();
        let mut contributions = Vec::new();
        let mut negation_left = 0usize;
        let mut intensity: Option<f64> = None;

        for token in pattern.find_iter(&lowered).map(|m| m.as_str()) {
            if self.lexicon.is_negator(token) {
                negation_left = NEGATION_WINDOW;
                intensity = None;
                continue;
            }
            if let Some(factor) = self.lexicon.intensifier(token) {
                intensity = Some(intensity.unwrap_or(1.0) * factor);
                continue;
            }
            if let Some(polarity) = self.lexicon.polarity(token) {
                let mut value = polarity * intensity.unwrap_or(1.0);
                if negation_left > 0 {
                    value *= NEGATION_FACTOR;
                }
                contributions.push(value.clamp(-1.0, 1.0));
                negation_left = 0;
                intensity = None;
                continue;
            }
            negation_left = negation_left.saturating_sub(1);
            intensity = None;
        }

        if contributions.is_empty() {
            return Ok(0.0);
        }
        let score = contributions.iter().sum::<f64>() / contributions.len() as f64;
        trace!(
            "lexicon score (hits={}, score={score:.4})",
            contributions.len()
        );
        Ok(score.clamp(-1.0, 1.0))
    }
}

fn word_regex() -> Result<&'static Regex, ClassificationError> {
    WORD_REGEX.as_ref().map_err(|err| err.clone().into())
}

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<Classification, ClassificationError> {
        if text.trim().is_empty() {
            return Ok(Classification::neutral());
        }
        Ok(Classification::from_score(self.score(text)?))
    }
}

/// Classify text with the default lexicon classifier.
pub fn classify(text: &str) -> Result<Classification, ClassificationError> {
    DEFAULT_CLASSIFIER.classify(text)
}

#[cfg(test)]
mod tests {
    use super::{
        Classification, LexiconClassifier, SentimentClassifier, WORD_PATTERN, classify, word_regex,
    };
    use crate::error::ClassificationError;
    use crate::lexicon::Lexicon;
    use pretty_assertions::assert_eq;
    use sentify_protocol::SentimentLabel;

    #[test]
    fn threshold_boundaries() {
        let at_positive = Classification::from_score(0.05);
        assert_eq!(at_positive.label, SentimentLabel::Neutral);
        assert_eq!(at_positive.confidence, 0.05);

        assert_eq!(
            Classification::from_score(0.0501).label,
            SentimentLabel::Positive
        );
        assert_eq!(
            Classification::from_score(-0.05).label,
            SentimentLabel::Neutral
        );
        assert_eq!(
            Classification::from_score(-0.0501).label,
            SentimentLabel::Negative
        );
    }

    #[test]
    fn confidence_is_rounded_magnitude() {
        let result = Classification::from_score(-0.456);
        assert_eq!(result.label, SentimentLabel::Negative);
        assert_eq!(result.confidence, 0.46);
    }

    #[test]
    fn confidence_ties_round_to_even() {
        assert_eq!(Classification::from_score(0.125).confidence, 0.12);
        assert_eq!(Classification::from_score(-0.375).confidence, 0.38);
        assert_eq!(Classification::from_score(0.625).confidence, 0.62);
        assert_eq!(Classification::from_score(0.875).confidence, 0.88);
    }

    #[test]
    fn confidence_follows_the_stored_value_near_ties() {
        // 0.135 is stored just above the half, 0.145 just below it.
        assert_eq!(Classification::from_score(0.135).confidence, 0.14);
        assert_eq!(Classification::from_score(0.145).confidence, 0.14);
        assert_eq!(Classification::from_score(0.355).confidence, 0.35);
    }

    #[test]
    fn non_finite_and_out_of_range_scores_are_normalized() {
        assert_eq!(Classification::from_score(f64::NAN), Classification::neutral());
        assert_eq!(Classification::from_score(4.0).confidence, 1.0);
        assert_eq!(Classification::from_score(f64::NEG_INFINITY).confidence, 0.0);
    }

    #[test]
    fn empty_text_is_neutral() {
        let classifier = LexiconClassifier::new();
        let result = classifier.classify("   ").expect("classify");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn scores_common_feedback() {
        let label = |text: &str| classify(text).expect("classify").label;
        assert_eq!(label("Excellent service"), SentimentLabel::Positive);
        assert_eq!(label("good"), SentimentLabel::Positive);
        assert_eq!(label("bad"), SentimentLabel::Negative);
        assert_eq!(label("The office opens at nine"), SentimentLabel::Neutral);
    }

    #[test]
    fn negation_flips_and_dampens() {
        let classifier = LexiconClassifier::new();
        assert_eq!(classifier.score("good").expect("score"), 0.7);
        assert_eq!(classifier.score("not good").expect("score"), -0.35);
        assert_eq!(classifier.score("not a good").expect("score"), -0.35);
        assert_eq!(
            classifier.score("not one bit of it was good").expect("score"),
            0.7
        );
    }

    #[test]
    fn intensifiers_scale_and_clamp() {
        let classifier = LexiconClassifier::new();
        let plain = classifier.score("good").expect("score");
        assert!(classifier.score("very good").expect("score") > plain);
        assert_eq!(classifier.score("absolutely excellent").expect("score"), 1.0);
    }

    #[test]
    fn averages_multiple_hits() {
        let classifier = LexiconClassifier::new();
        let score = classifier.score("good staff but terrible queue").expect("score");
        assert!((score - (-0.15)).abs() < 1e-9);
    }

    #[test]
    fn is_deterministic() {
        let text = "Friendly staff, slow queue, great outcome!";
        assert_eq!(classify(text).expect("classify"), classify(text).expect("classify"));
    }

    #[test]
    fn tokenizer_compiles_and_splits_words() {
        let regex = word_regex().expect("word regex");
        let words: Vec<_> = regex
            .find_iter("don't stop, 2 go")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(words, vec!["don't", "stop", "go"]);
        assert_eq!(regex.as_str(), WORD_PATTERN);
    }

    #[test]
    fn tokenizer_failure_is_a_classification_error() {
        let err: ClassificationError = regex::Regex::new("[a-").unwrap_err().into();
        assert!(matches!(err, ClassificationError::Tokenizer(_)));
        assert!(err.to_string().starts_with("tokenizer unavailable"));
    }

    #[test]
    fn classifies_displayable_values() {
        let classifier = LexiconClassifier::new();
        let result = classifier.classify_display(&42).expect("classify");
        assert_eq!(result, Classification::neutral());
    }

    #[test]
    fn custom_lexicon_is_used() {
        let classifier =
            LexiconClassifier::with_lexicon(Lexicon::new().with_words([("stellar", 0.9)]));
        let result = classifier.classify("stellar work").expect("classify");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn confidence_always_in_unit_range() {
        for text in ["", "!!!", "worst worst worst", "so so so very excellent", "ok"] {
            let result = classify(text).expect("classify");
            assert!((0.0..=1.0).contains(&result.confidence), "{text}");
        }
    }
}
