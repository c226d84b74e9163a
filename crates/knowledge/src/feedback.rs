//! Simulated user feedback.
//!
//! Feedback does not judge the response; it stands in for a user clicking
//! "good", "too vague" or "not helpful" so the refinement loop can be
//! exercised. Tests and scripted demos use [`ScriptedFeedback`].

use crate::types::FeedbackLabel;
use faqbot_core::config::FeedbackSettings;
use faqbot_core::logging::AUDIT_TARGET;
use faqbot_core::{AppError, AppResult};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Source of feedback labels for the refinement loop.
pub trait FeedbackSimulator: Send + Sync + std::fmt::Debug {
    /// Produce a label for `response`.
    fn sample(&self, response: &str) -> FeedbackLabel;
}

/// Relative weights of each label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackWeights {
    pub not_helpful: f64,
    pub too_vague: f64,
    pub good: f64,
}

impl Default for FeedbackWeights {
    fn default() -> Self {
        Self {
            not_helpful: 0.2,
            too_vague: 0.3,
            good: 0.5,
        }
    }
}

impl From<&FeedbackSettings> for FeedbackWeights {
    fn from(settings: &FeedbackSettings) -> Self {
        Self {
            not_helpful: settings.not_helpful_weight,
            too_vague: settings.too_vague_weight,
            good: settings.good_weight,
        }
    }
}

/// Label order matching the weight order in [`RandomFeedback`].
const LABELS: [FeedbackLabel; 3] = [
    FeedbackLabel::NotHelpful,
    FeedbackLabel::TooVague,
    FeedbackLabel::Good,
];

/// Draws labels from a fixed categorical distribution.
#[derive(Debug)]
pub struct RandomFeedback {
    distribution: WeightedIndex<f64>,
    rng: Mutex<StdRng>,
}

impl RandomFeedback {
    /// Entropy-seeded simulator.
    pub fn new(weights: FeedbackWeights) -> AppResult<Self> {
        Self::with_rng(weights, StdRng::from_entropy())
    }

    /// Reproducible simulator.
    pub fn seeded(weights: FeedbackWeights, seed: u64) -> AppResult<Self> {
        Self::with_rng(weights, StdRng::seed_from_u64(seed))
    }

    /// Build from the `feedback` config section, seeded when a seed is set.
    pub fn from_settings(settings: &FeedbackSettings) -> AppResult<Self> {
        let weights = FeedbackWeights::from(settings);
        match settings.seed {
            Some(seed) => Self::seeded(weights, seed),
            None => Self::new(weights),
        }
    }

    fn with_rng(weights: FeedbackWeights, rng: StdRng) -> AppResult<Self> {
        let distribution =
            WeightedIndex::new([weights.not_helpful, weights.too_vague, weights.good])
                .map_err(|e| AppError::Config(format!("Invalid feedback weights: {}", e)))?;

        Ok(Self {
            distribution,
            rng: Mutex::new(rng),
        })
    }
}

impl FeedbackSimulator for RandomFeedback {
    fn sample(&self, _response: &str) -> FeedbackLabel {
        let idx = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            self.distribution.sample(&mut *rng)
        };
        let label = LABELS[idx];
        tracing::info!(target: AUDIT_TARGET, feedback = label.as_str(), "Feedback: {}", label);
        label
    }
}

/// Replays a fixed sequence of labels.
///
/// After the script runs out the last label repeats; an empty script always
/// answers [`FeedbackLabel::Good`].
#[derive(Debug, Default)]
pub struct ScriptedFeedback {
    script: Vec<FeedbackLabel>,
    cursor: AtomicUsize,
}

impl ScriptedFeedback {
    pub fn new(script: impl Into<Vec<FeedbackLabel>>) -> Self {
        Self {
            script: script.into(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// A simulator that always answers `label`.
    pub fn always(label: FeedbackLabel) -> Self {
        Self::new(vec![label])
    }

    /// Parse a comma-separated script such as `too_vague,good`.
    pub fn parse(script: &str) -> AppResult<Self> {
        let labels = script
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<AppResult<Vec<FeedbackLabel>>>()?;
        Ok(Self::new(labels))
    }

    /// Number of labels handed out so far.
    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl FeedbackSimulator for ScriptedFeedback {
    fn sample(&self, _response: &str) -> FeedbackLabel {
        let n = self.cursor.fetch_add(1, Ordering::SeqCst);
        let label = self
            .script
            .get(n)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or(FeedbackLabel::Good);
        tracing::info!(target: AUDIT_TARGET, feedback = label.as_str(), "Feedback: {}", label);
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_seeded_feedback_is_reproducible() {
        let a = RandomFeedback::seeded(FeedbackWeights::default(), 42).unwrap();
        let b = RandomFeedback::seeded(FeedbackWeights::default(), 42).unwrap();

        let first: Vec<_> = (0..20).map(|_| a.sample("r")).collect();
        let second: Vec<_> = (0..20).map(|_| b.sample("r")).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distribution_roughly_matches_weights() {
        let feedback = RandomFeedback::seeded(FeedbackWeights::default(), 7).unwrap();
        let mut counts: HashMap<FeedbackLabel, usize> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(feedback.sample("r")).or_insert(0) += 1;
        }

        let share = |label| *counts.get(&label).unwrap_or(&0) as f64 / 10_000.0;
        assert!((share(FeedbackLabel::NotHelpful) - 0.2).abs() < 0.03);
        assert!((share(FeedbackLabel::TooVague) - 0.3).abs() < 0.03);
        assert!((share(FeedbackLabel::Good) - 0.5).abs() < 0.03);
    }

    #[test]
    fn test_zero_weight_label_never_drawn() {
        let weights = FeedbackWeights {
            not_helpful: 0.0,
            too_vague: 0.0,
            good: 1.0,
        };
        let feedback = RandomFeedback::seeded(weights, 1).unwrap();
        assert!((0..100).all(|_| feedback.sample("r") == FeedbackLabel::Good));
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = FeedbackWeights {
            not_helpful: 0.0,
            too_vague: 0.0,
            good: 0.0,
        };
        assert!(matches!(
            RandomFeedback::new(weights),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_scripted_feedback_repeats_last_label() {
        let feedback = ScriptedFeedback::new(vec![FeedbackLabel::TooVague, FeedbackLabel::NotHelpful]);

        assert_eq!(feedback.sample("r"), FeedbackLabel::TooVague);
        assert_eq!(feedback.sample("r"), FeedbackLabel::NotHelpful);
        assert_eq!(feedback.sample("r"), FeedbackLabel::NotHelpful);
        assert_eq!(feedback.calls(), 3);
    }

    #[test]
    fn test_empty_script_is_good() {
        assert_eq!(ScriptedFeedback::default().sample("r"), FeedbackLabel::Good);
    }

    #[test]
    fn test_parse_script() {
        let feedback = ScriptedFeedback::parse("too_vague, not-helpful,good").unwrap();
        assert_eq!(
            feedback.script,
            vec![
                FeedbackLabel::TooVague,
                FeedbackLabel::NotHelpful,
                FeedbackLabel::Good
            ]
        );
        assert!(ScriptedFeedback::parse("good,meh").is_err());
    }
}
