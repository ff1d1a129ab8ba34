use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::artifacts::{ArtifactPointer, InferenceError, ModelArtifactSet};
use crate::features::{FeatureEncoder, PlatformCode};
use crate::{Candidate, EngagementLevel};

/// Why a score came from the random fallback instead of the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    NoModel,
    InferenceFailed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Outcome {
    Model { platform: PlatformCode },
    Fallback(FallbackReason),
}

/// A trending score in `[0, 1]` together with how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub score: f64,
    pub outcome: Outcome,
}

impl Prediction {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, Outcome::Fallback(_))
    }
}

/// Anything that can assign a trending score to a candidate.
///
/// Implementations never fail: when no real score is available they degrade
/// to a fallback value and say so in the returned [`Outcome`].
pub trait Scorer: Send + Sync {
    fn predict(&self, candidate: &Candidate) -> Prediction;

    fn model_loaded(&self) -> bool {
        false
    }

    fn model_version(&self) -> Option<String> {
        None
    }
}

/// Scores candidates with a loaded artifact set.
#[derive(Debug, Clone)]
pub struct ModelPredictor {
    artifacts: ModelArtifactSet,
    version: String,
}

impl ModelPredictor {
    pub fn new(artifacts: ModelArtifactSet, version: impl Into<String>) -> Self {
        Self {
            artifacts,
            version: version.into(),
        }
    }

    pub fn from_pointer(artifacts: ModelArtifactSet, pointer: &ArtifactPointer) -> Self {
        Self::new(artifacts, pointer.fingerprint())
    }

    /// Probability mass the classifier assigns to high engagement.
    pub fn high_probability(&self, candidate: &Candidate) -> Result<(f64, PlatformCode), InferenceError> {
        let encoded = FeatureEncoder::new(&self.artifacts).encode(candidate)?;
        let proba = self.artifacts.classifier.predict_proba(&encoded.vector)?;
        let needed = EngagementLevel::High.class_index();
        let high = proba
            .get(needed)
            .copied()
            .ok_or(InferenceError::MissingClass {
                needed,
                found: proba.len(),
            })?;
        if !high.is_finite() {
            return Err(InferenceError::NonFinite);
        }
        Ok((high.clamp(0.0, 1.0), encoded.platform))
    }
}

/// Uniform random scores in `[0, 1)`.
#[derive(Debug, Clone, Default)]
pub struct FallbackPredictor;

impl FallbackPredictor {
    pub fn draw(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Score predictor selected once at startup.
#[derive(Debug, Clone)]
pub enum Predictor {
    Model(ModelPredictor),
    Fallback(FallbackPredictor),
}

impl Predictor {
    pub fn fallback() -> Self {
        Predictor::Fallback(FallbackPredictor)
    }
}

impl Scorer for Predictor {
    fn predict(&self, candidate: &Candidate) -> Prediction {
        match self {
            Predictor::Model(model) => match model.high_probability(candidate) {
                Ok((score, platform)) => Prediction {
                    score,
                    outcome: Outcome::Model { platform },
                },
                Err(err) => {
                    debug!(error = %err, hashtag = %candidate.hashtag, "model inference failed, using fallback score");
                    Prediction {
                        score: FallbackPredictor.draw(),
                        outcome: Outcome::Fallback(FallbackReason::InferenceFailed(err.to_string())),
                    }
                }
            },
            Predictor::Fallback(fallback) => Prediction {
                score: fallback.draw(),
                outcome: Outcome::Fallback(FallbackReason::NoModel),
            },
        }
    }

    fn model_loaded(&self) -> bool {
        matches!(self, Predictor::Model(_))
    }

    fn model_version(&self) -> Option<String> {
        match self {
            Predictor::Model(model) => Some(model.version.clone()),
            Predictor::Fallback(_) => None,
        }
    }
}
