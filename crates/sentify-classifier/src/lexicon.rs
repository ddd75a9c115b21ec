//! Polarity lexicon for rule-based scoring.

use std::collections::HashMap;

/// Word polarities in `[-1.0, 1.0]`.
const POLARITY_WORDS: &[(&str, f64)] = &[
    // Positive
    ("excellent", 1.0),
    ("outstanding", 0.9),
    ("perfect", 1.0),
    ("wonderful", 1.0),
    ("awesome", 1.0),
    ("best", 1.0),
    ("superb", 1.0),
    ("fantastic", 0.9),
    ("brilliant", 0.9),
    ("great", 0.8),
    ("happy", 0.8),
    ("delighted", 0.8),
    ("impressive", 0.8),
    ("good", 0.7),
    ("fair", 0.7),
    ("pleasant", 0.7),
    ("beautiful", 0.85),
    ("love", 0.5),
    ("loved", 0.7),
    ("amazing", 0.6),
    ("nice", 0.6),
    ("glad", 0.5),
    ("satisfied", 0.5),
    ("satisfying", 0.5),
    ("better", 0.5),
    ("okay", 0.5),
    ("ok", 0.5),
    ("thankful", 0.5),
    ("grateful", 0.6),
    ("smooth", 0.4),
    ("easy", 0.43),
    ("fine", 0.42),
    ("comfortable", 0.4),
    ("friendly", 0.375),
    ("clean", 0.37),
    ("quick", 0.33),
    ("helpful", 0.5),
    ("useful", 0.3),
    ("efficient", 0.3),
    ("transparent", 0.3),
    ("responsive", 0.3),
    ("polite", 0.4),
    ("professional", 0.3),
    ("reliable", 0.4),
    ("improved", 0.4),
    ("recommend", 0.4),
    ("fast", 0.2),
    ("affordable", 0.3),
    ("positive", 0.23),
    // Negative
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("pathetic", -1.0),
    ("disgusting", -1.0),
    ("hate", -0.8),
    ("hated", -0.9),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("bad", -0.7),
    ("sad", -0.5),
    ("angry", -0.5),
    ("annoying", -0.8),
    ("frustrating", -0.6),
    ("frustrated", -0.6),
    ("dirty", -0.6),
    ("unfair", -0.5),
    ("useless", -0.5),
    ("unhelpful", -0.5),
    ("difficult", -0.5),
    ("wrong", -0.5),
    ("expensive", -0.5),
    ("corrupt", -0.5),
    ("poor", -0.4),
    ("worse", -0.4),
    ("broken", -0.4),
    ("confusing", -0.3),
    ("rude", -0.3),
    ("slow", -0.3),
    ("late", -0.3),
    ("delayed", -0.3),
    ("unclear", -0.2),
    ("negative", -0.3),
    ("average", -0.15),
    ("boring", -1.0),
    ("careless", -0.5),
    ("incompetent", -0.7),
    ("unacceptable", -0.8),
    ("unsafe", -0.5),
];

/// Multipliers applied to the next polarity word.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("really", 1.2),
    ("very", 1.3),
    ("highly", 1.3),
    ("so", 1.2),
    ("too", 1.2),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("fairly", 0.8),
    ("somewhat", 0.7),
    ("slightly", 0.6),
    ("barely", 0.5),
];

/// Words that flip and dampen the following polarity word.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "none", "nobody", "neither", "nor", "without", "cannot",
    "cant", "can't", "dont", "don't", "doesnt", "doesn't", "didnt", "didn't", "isnt", "isn't",
    "wasnt", "wasn't", "arent", "aren't", "werent", "weren't", "wont", "won't", "hardly",
];

/// Immutable word tables used by the lexicon classifier.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negators: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    /// Build the default lexicon.
    pub fn new() -> Self {
        let words = POLARITY_WORDS
            .iter()
            .map(|(word, polarity)| (word.to_string(), *polarity))
            .collect();
        let intensifiers = INTENSIFIERS
            .iter()
            .map(|(word, factor)| (word.to_string(), *factor))
            .collect();
        let negators = NEGATORS.iter().map(|word| word.to_string()).collect();
        Self {
            words,
            intensifiers,
            negators,
        }
    }

    /// Add or replace word polarities, clamping each to `[-1.0, 1.0]`.
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        for (word, polarity) in words {
            let polarity = if polarity.is_finite() {
                polarity.clamp(-1.0, 1.0)
            } else {
                0.0
            };
            self.words
                .insert(word.as_ref().trim().to_lowercase(), polarity);
        }
        self
    }

    /// Polarity for a lowercase word, if present.
    pub fn polarity(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    /// Intensity multiplier for a lowercase word, if present.
    pub fn intensifier(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    /// Whether a lowercase word negates the next polarity word.
    pub fn is_negator(&self, word: &str) -> bool {
        self.negators.iter().any(|negator| negator == word)
    }

    /// Number of polarity words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the lexicon has no polarity words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
