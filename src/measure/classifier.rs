//! Magnitude-based classification of loose numbers.

use serde::{Deserialize, Serialize};

/// Loose values strictly above this are taken to be millimetre readings.
///
/// Eleven-digit and longer integers are not plausible as any other unit on
/// a drawing; in practice they come from OCR or from dimension strings run
/// together, and those are millimetres.
pub const DEFAULT_ASSUMED_MM_THRESHOLD: f64 = 99_999_999_999.0;

/// Class assigned to a loose number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LooseClass {
    /// Unit assumed to be millimetres
    AssumedMm,
    /// Unit cannot be inferred; needs confirmation
    Unknown,
}

/// Classifies loose numbers by magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    threshold: f64,
}

impl Classifier {
    /// Create a classifier with a custom threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The threshold in use.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classify one value. The boundary itself is `Unknown`.
    pub fn classify(&self, value: f64) -> LooseClass {
        if value > self.threshold {
            LooseClass::AssumedMm
        } else {
            LooseClass::Unknown
        }
    }

    /// Split values into (assumed mm, unknown), each in input order.
    pub fn split(&self, values: &[f64]) -> (Vec<f64>, Vec<f64>) {
        values
            .iter()
            .partition(|&&v| self.classify(v) == LooseClass::AssumedMm)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_ASSUMED_MM_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(99_999_999_999.0), LooseClass::Unknown);
        assert_eq!(
            classifier.classify(100_000_000_000.0),
            LooseClass::AssumedMm
        );
    }

    #[test]
    fn test_small_values_are_unknown() {
        let classifier = Classifier::default();
        for v in [0.0, 1.5, 45.0, 2024.0, 12_345_678_901.0] {
            assert_eq!(classifier.classify(v), LooseClass::Unknown);
        }
    }

    #[test]
    fn test_split_preserves_order() {
        let classifier = Classifier::new(100.0);
        let (assumed, unknown) = classifier.split(&[500.0, 10.0, 101.0, 100.0, 3.0]);
        assert_eq!(assumed, vec![500.0, 101.0]);
        assert_eq!(unknown, vec![10.0, 100.0, 3.0]);
    }

    #[test]
    fn test_custom_threshold() {
        let classifier = Classifier::new(1000.0);
        assert_eq!(classifier.threshold(), 1000.0);
        assert_eq!(classifier.classify(1000.5), LooseClass::AssumedMm);
    }
}
