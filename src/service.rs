use rand::Rng;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::artifacts::ModelArtifactSet;
use crate::config::ServiceConfig;
use crate::predictor::{ModelPredictor, Predictor, Prediction, Scorer};
use crate::ranking::{Suggestion, SuggestionRanker};
use crate::sampler::CandidateSampler;
use crate::{percent_score, Candidate, EngagementLevel, Recommendation};

/// Result of scoring one caller-supplied combination.
#[derive(Debug, Clone)]
pub struct ScoreReport {
    pub prediction: Prediction,
    pub trending_score: f64,
    pub engagement_level: EngagementLevel,
    pub recommendation: Recommendation,
}

impl ScoreReport {
    pub fn from_prediction(prediction: Prediction) -> Self {
        Self {
            trending_score: percent_score(prediction.score),
            engagement_level: EngagementLevel::from_score(prediction.score),
            recommendation: Recommendation::from_score(prediction.score),
            prediction,
        }
    }
}

/// Read-only serving state shared by every request handler.
#[derive(Clone)]
pub struct TrendService {
    scorer: Arc<dyn Scorer>,
    sampler: CandidateSampler,
}

impl TrendService {
    pub fn new(scorer: Arc<dyn Scorer>, sampler: CandidateSampler) -> Self {
        Self { scorer, sampler }
    }

    pub fn with_scorer<S: Scorer + 'static>(scorer: S) -> Self {
        Self::new(Arc::new(scorer), CandidateSampler::default())
    }

    /// Loads the latest artifact set from `model_dir`; any failure leaves the
    /// service in fallback mode for its whole lifetime.
    pub fn from_model_dir(model_dir: &Path) -> Self {
        Self::with_scorer(load_predictor(model_dir))
    }

    /// Builds the service from configuration: vocabularies from
    /// `[vocabulary]`, artifacts from `model.dir`.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, String> {
        let sampler = config.vocabulary.sampler()?;
        Ok(Self {
            sampler,
            ..Self::from_model_dir(&config.model.dir)
        })
    }

    pub fn generate(&self, count: usize) -> Vec<Suggestion> {
        self.generate_with_rng(&mut rand::thread_rng(), count)
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Suggestion> {
        SuggestionRanker::new(&self.sampler, self.scorer.as_ref()).rank(rng, count)
    }

    pub fn score(&self, candidate: &Candidate) -> ScoreReport {
        ScoreReport::from_prediction(self.scorer.predict(candidate))
    }

    pub fn model_loaded(&self) -> bool {
        self.scorer.model_loaded()
    }

    pub fn model_version(&self) -> Option<String> {
        self.scorer.model_version()
    }
}

pub fn load_predictor(model_dir: &Path) -> Predictor {
    match ModelArtifactSet::load(model_dir) {
        Ok((artifacts, pointer)) => {
            let predictor = ModelPredictor::from_pointer(artifacts, &pointer);
            info!(
                model_dir = %model_dir.display(),
                classifier = %pointer.classifier,
                version = %pointer.fingerprint(),
                "loaded model artifacts"
            );
            Predictor::Model(predictor)
        }
        Err(err) => {
            warn!(
                model_dir = %model_dir.display(),
                error = %err,
                "model artifacts unavailable, serving fallback scores"
            );
            Predictor::fallback()
        }
    }
}
