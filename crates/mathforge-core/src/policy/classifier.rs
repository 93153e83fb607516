//! Pretrained statistical adaptation policy.
//!
//! A multinomial (softmax) logistic regression over six window features,
//! trained once at construction on a seeded synthetic corpus of learner
//! archetypes. Feature standardization is fitted on the same corpus. With
//! too little history the policy falls back to a pure rule that is
//! independent of the fitted model.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::model::{Difficulty, WindowStats};
use crate::policy::{AdaptationPolicy, ModelInfo};

const FEATURES: usize = 6;
const CLASSES: usize = 3;

/// Fixed seed for synthetic pretraining so the fitted model is identical
/// across runs.
const PRETRAIN_SEED: u64 = 42;

const LEARNING_RATE: f64 = 0.1;
const EPOCHS: usize = 500;

/// Class indices for the three possible transitions.
const DECREASE: usize = 0;
const STAY: usize = 1;
const INCREASE: usize = 2;

/// Cold-start rule used when the window holds fewer than two attempts.
///
/// Pure function of the stats; deliberately independent of the fitted
/// classifier so early-session behavior is stable.
pub fn cold_start_fallback(stats: &WindowStats, current: Difficulty) -> Difficulty {
    let score = stats.accuracy * 0.7 + (30.0 - stats.avg_time).max(0.0) * 0.3;
    if score > 75.0 {
        current.step_up()
    } else if score < 40.0 {
        current.step_down()
    } else {
        current
    }
}

/// Per-feature zero-mean / unit-variance standardization, fitted once on
/// the pretraining corpus.
#[derive(Debug, Clone, PartialEq)]
struct StandardScaler {
    means: [f64; FEATURES],
    stds: [f64; FEATURES],
}

impl StandardScaler {
    fn fit(samples: &[[f64; FEATURES]]) -> Self {
        let n = samples.len().max(1) as f64;
        let mut means = [0.0; FEATURES];
        for s in samples {
            for (m, v) in means.iter_mut().zip(s) {
                *m += v / n;
            }
        }
        let mut stds = [0.0; FEATURES];
        for s in samples {
            for i in 0..FEATURES {
                stds[i] += (s[i] - means[i]).powi(2) / n;
            }
        }
        for std in &mut stds {
            *std = std.sqrt();
            // Guard constant features.
            if *std < 1e-9 {
                *std = 1.0;
            }
        }
        Self { means, stds }
    }

    fn transform(&self, sample: &[f64; FEATURES]) -> [f64; FEATURES] {
        let mut out = [0.0; FEATURES];
        for i in 0..FEATURES {
            out[i] = (sample[i] - self.means[i]) / self.stds[i];
        }
        out
    }
}

/// Softmax regression fitted by full-batch gradient descent.
#[derive(Debug, Clone, PartialEq)]
struct SoftmaxClassifier {
    weights: [[f64; FEATURES]; CLASSES],
    biases: [f64; CLASSES],
}

impl SoftmaxClassifier {
    fn fit(samples: &[[f64; FEATURES]], labels: &[usize]) -> Self {
        let mut model = Self {
            weights: [[0.0; FEATURES]; CLASSES],
            biases: [0.0; CLASSES],
        };
        let n = samples.len().max(1) as f64;

        for _ in 0..EPOCHS {
            let mut grad_w = [[0.0; FEATURES]; CLASSES];
            let mut grad_b = [0.0; CLASSES];

            for (sample, &label) in samples.iter().zip(labels) {
                let probs = model.probabilities(sample);
                for class in 0..CLASSES {
                    let err = probs[class] - if class == label { 1.0 } else { 0.0 };
                    grad_b[class] += err / n;
                    for i in 0..FEATURES {
                        grad_w[class][i] += err * sample[i] / n;
                    }
                }
            }

            for class in 0..CLASSES {
                model.biases[class] -= LEARNING_RATE * grad_b[class];
                for i in 0..FEATURES {
                    model.weights[class][i] -= LEARNING_RATE * grad_w[class][i];
                }
            }
        }

        model
    }

    /// Class probabilities via max-shifted softmax to avoid overflow.
    fn probabilities(&self, sample: &[f64; FEATURES]) -> [f64; CLASSES] {
        let mut logits = [0.0; CLASSES];
        for class in 0..CLASSES {
            logits[class] = self.biases[class]
                + self.weights[class]
                    .iter()
                    .zip(sample)
                    .map(|(w, x)| w * x)
                    .sum::<f64>();
        }
        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut probs = [0.0; CLASSES];
        let mut sum = 0.0;
        for class in 0..CLASSES {
            probs[class] = (logits[class] - max).exp();
            sum += probs[class];
        }
        for p in &mut probs {
            *p /= sum;
        }
        probs
    }
}

/// Statistical adaptation policy backed by the pretrained classifier.
#[derive(Debug, Clone)]
pub struct ModelPolicy {
    scaler: StandardScaler,
    classifier: SoftmaxClassifier,
    predictions_made: u64,
    last_confidence: Option<f64>,
}

impl ModelPolicy {
    /// Pretrain on the synthetic archetype corpus. Runs once per policy
    /// instance; a session reuses the fitted artifact for every decision.
    pub fn new() -> Self {
        let (samples, labels) = synthetic_corpus(PRETRAIN_SEED);
        let scaler = StandardScaler::fit(&samples);
        let standardized: Vec<[f64; FEATURES]> =
            samples.iter().map(|s| scaler.transform(s)).collect();
        let classifier = SoftmaxClassifier::fit(&standardized, &labels);
        tracing::debug!(samples = samples.len(), "pretrained adaptation classifier");
        Self {
            scaler,
            classifier,
            predictions_made: 0,
            last_confidence: None,
        }
    }

    fn features(stats: &WindowStats, current: Difficulty) -> [f64; FEATURES] {
        [
            stats.accuracy,
            stats.avg_time,
            stats.correct_streak as f64,
            stats.incorrect_streak as f64,
            stats.trend as f64,
            current.level() as f64,
        ]
    }
}

impl Default for ModelPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptationPolicy for ModelPolicy {
    fn next_difficulty(&mut self, stats: &WindowStats, current: Difficulty) -> Difficulty {
        if stats.recent_problems < 2 {
            return cold_start_fallback(stats, current);
        }

        let features = Self::features(stats, current);
        let standardized = self.scaler.transform(&features);
        let probs = self.classifier.probabilities(&standardized);

        let (winner, confidence) = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, &p)| (i, p))
            .unwrap_or((STAY, 0.0));

        self.predictions_made += 1;
        self.last_confidence = Some(confidence);

        let next = match winner {
            DECREASE => current.step_down(),
            INCREASE => current.step_up(),
            _ => current,
        };
        tracing::debug!(%current, %next, confidence, "classifier transition");
        next
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            kind: "logistic-regression".to_string(),
            predictions_made: self.predictions_made,
            last_confidence: self.last_confidence,
        }
    }
}

/// Build the labeled synthetic corpus of the four learner archetypes.
fn synthetic_corpus(seed: u64) -> (Vec<[f64; FEATURES]>, Vec<usize>) {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut samples = Vec::new();
    let mut labels = Vec::new();

    // Exactly one streak counter is non-zero in real windows; the corpus
    // mirrors that.
    let streaks = |rng: &mut ChaCha20Rng, lean_correct: bool| -> (f64, f64) {
        if lean_correct {
            (rng.gen_range(1..=4) as f64, 0.0)
        } else {
            (0.0, rng.gen_range(1..=4) as f64)
        }
    };

    // High performers: fast and accurate.
    for _ in 0..200 {
        let (cs, is) = streaks(&mut rng, true);
        samples.push([
            rng.gen_range(80.0..=100.0),
            rng.gen_range(2.0..=5.0),
            cs,
            is,
            rng.gen_range(0..=1) as f64,
            rng.gen_range(1..=3) as f64,
        ]);
        labels.push(INCREASE);
    }

    // Strugglers: slow and inaccurate.
    for _ in 0..200 {
        let (cs, is) = streaks(&mut rng, false);
        samples.push([
            rng.gen_range(0.0..=40.0),
            rng.gen_range(8.0..=15.0),
            cs,
            is,
            rng.gen_range(-1..=0) as f64,
            rng.gen_range(1..=3) as f64,
        ]);
        labels.push(DECREASE);
    }

    // Average performers.
    for _ in 0..200 {
        let lean_correct = rng.gen_bool(0.5);
        let (cs, is) = streaks(&mut rng, lean_correct);
        samples.push([
            rng.gen_range(50.0..=75.0),
            rng.gen_range(5.0..=8.0),
            cs,
            is,
            rng.gen_range(-1..=1) as f64,
            rng.gen_range(1..=3) as f64,
        ]);
        labels.push(STAY);
    }

    // Mixed cases labeled by a secondary rule.
    for _ in 0..150 {
        let accuracy = rng.gen_range(60.0..=85.0);
        let time = rng.gen_range(4.0..=7.0);
        let lean_correct = rng.gen_bool(0.5);
        let (cs, is) = streaks(&mut rng, lean_correct);
        samples.push([
            accuracy,
            time,
            cs,
            is,
            rng.gen_range(-1..=1) as f64,
            rng.gen_range(1..=3) as f64,
        ]);
        labels.push(if accuracy > 75.0 && time < 6.0 {
            INCREASE
        } else if accuracy < 55.0 {
            DECREASE
        } else {
            STAY
        });
    }

    let mut order: Vec<usize> = (0..samples.len()).collect();
    order.shuffle(&mut rng);
    let samples = order.iter().map(|&i| samples[i]).collect();
    let labels = order.iter().map(|&i| labels[i]).collect();
    (samples, labels)
}
