use ndarray::Array1;
use serde::Serialize;

use crate::artifacts::{InferenceError, ModelArtifactSet};
use crate::Candidate;

/// Number of numeric columns fed to the scaler.
pub const NUMERIC_WIDTH: usize = 7;

const LIKE_WEIGHT: f64 = 0.3;
const SHARE_WEIGHT: f64 = 0.4;
const COMMENT_WEIGHT: f64 = 0.3;

/// Raw engagement counts. Serving uses the fixed defaults for every
/// candidate; preprocessing fits use each dataset row's counts.
#[derive(Debug, Clone, Copy)]
pub struct EngagementCounters {
    pub views: f64,
    pub likes: f64,
    pub shares: f64,
    pub comments: f64,
}

impl Default for EngagementCounters {
    fn default() -> Self {
        Self {
            views: 1_000_000.0,
            likes: 50_000.0,
            shares: 10_000.0,
            comments: 5_000.0,
        }
    }
}

impl EngagementCounters {
    pub fn engagement_ratio(&self) -> f64 {
        if self.views <= 0.0 {
            return 0.0;
        }
        (self.likes + self.shares + self.comments) / self.views
    }

    pub fn engagement_score(&self) -> f64 {
        LIKE_WEIGHT * self.likes + SHARE_WEIGHT * self.shares + COMMENT_WEIGHT * self.comments
    }

    /// `[views, likes, shares, comments, ratio, score, platform_code]`.
    pub fn numeric_columns(&self, platform_code: f64) -> [f64; NUMERIC_WIDTH] {
        [
            self.views,
            self.likes,
            self.shares,
            self.comments,
            self.engagement_ratio(),
            self.engagement_score(),
            platform_code,
        ]
    }
}

/// How the platform column was filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum PlatformCode {
    Known(usize),
    /// Platform outside the encoder's classes; the default code 0 was used.
    Unseen,
}

impl PlatformCode {
    pub const DEFAULT: usize = 0;

    pub fn value(self) -> usize {
        match self {
            PlatformCode::Known(code) => code,
            PlatformCode::Unseen => Self::DEFAULT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EncodedFeatures {
    pub vector: Array1<f64>,
    pub platform: PlatformCode,
}

pub fn content_text(candidate: &Candidate) -> String {
    format!(
        "{} {} {}",
        candidate.hashtag.replace('#', ""),
        candidate.content_type,
        candidate.platform
    )
}

/// Builds classifier input rows from candidates using a fitted artifact set.
pub struct FeatureEncoder<'a> {
    artifacts: &'a ModelArtifactSet,
    engagement: EngagementCounters,
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(artifacts: &'a ModelArtifactSet) -> Self {
        Self {
            artifacts,
            engagement: EngagementCounters::default(),
        }
    }

    pub fn encode(&self, candidate: &Candidate) -> Result<EncodedFeatures, InferenceError> {
        let text = self.artifacts.vectorizer.transform(&content_text(candidate));

        let platform = match self.artifacts.label_encoder.code(&candidate.platform) {
            Some(code) => PlatformCode::Known(code),
            None => PlatformCode::Unseen,
        };
        let numeric = Array1::from(
            self.engagement
                .numeric_columns(platform.value() as f64)
                .to_vec(),
        );
        let scaled = self.artifacts.scaler.transform(&numeric)?;

        let vector = Array1::from_iter(text.iter().chain(scaled.iter()).copied());

        Ok(EncodedFeatures { vector, platform })
    }
}
