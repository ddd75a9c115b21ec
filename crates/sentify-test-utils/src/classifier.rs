use parking_lot::Mutex;
use sentify_classifier::{Classification, ClassificationError, SentimentClassifier};

/// Returns the same classification for every input and remembers what it saw.
#[derive(Debug)]
pub struct FixedClassifier {
    classification: Classification,
    seen: Mutex<Vec<String>>,
}

impl FixedClassifier {
    pub fn new(classification: Classification) -> Self {
        Self {
            classification,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn from_score(score: f64) -> Self {
        Self::new(Classification::from_score(score))
    }

    /// Texts passed to `classify`, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

impl SentimentClassifier for FixedClassifier {
    fn classify(&self, text: &str) -> Result<Classification, ClassificationError> {
        self.seen.lock().push(text.to_string());
        Ok(self.classification)
    }
}

/// Fails every call, or only calls whose text contains a trigger.
#[derive(Debug, Clone, Default)]
pub struct FailingClassifier {
    trigger: Option<String>,
}

impl FailingClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_text(trigger: impl Into<String>) -> Self {
        Self {
            trigger: Some(trigger.into()),
        }
    }
}

impl SentimentClassifier for FailingClassifier {
    fn classify(&self, text: &str) -> Result<Classification, ClassificationError> {
        match &self.trigger {
            Some(trigger) if !text.contains(trigger.as_str()) => Ok(Classification::neutral()),
            _ => Err(ClassificationError::Unavailable(
                "classifier offline".to_string(),
            )),
        }
    }
}
