//! Test helpers shared across Sentify crates.

pub mod classifier;
pub mod records;
pub mod store;

pub use classifier::{FailingClassifier, FixedClassifier};
pub use records::record_at;
pub use store::{FailingStore, FlakyStore};
