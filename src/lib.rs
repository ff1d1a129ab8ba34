pub mod api;
pub mod artifacts;
pub mod bootstrap;
pub mod config;
pub mod describe;
pub mod features;
pub mod predictor;
pub mod preprocessing;
pub mod ranking;
pub mod sampler;
pub mod server;
pub mod service;

use serde::{Deserialize, Serialize};

/// One hashtag / content type / platform / region combination awaiting a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub hashtag: String,
    pub content_type: String,
    pub platform: String,
    pub region: String,
}

impl Candidate {
    pub fn new(
        hashtag: impl Into<String>,
        content_type: impl Into<String>,
        platform: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            hashtag: hashtag.into(),
            content_type: content_type.into(),
            platform: platform.into(),
            region: region.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementLevel {
    Low,
    Medium,
    High,
}

impl EngagementLevel {
    pub const HIGH_THRESHOLD: f64 = 0.7;
    pub const MEDIUM_THRESHOLD: f64 = 0.4;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            EngagementLevel::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            EngagementLevel::Medium
        } else {
            EngagementLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EngagementLevel::Low => "Low",
            EngagementLevel::Medium => "Medium",
            EngagementLevel::High => "High",
        }
    }

    /// Position of the level in the classifier's `{Low, Medium, High}` output.
    pub fn class_index(self) -> usize {
        match self {
            EngagementLevel::Low => 0,
            EngagementLevel::Medium => 1,
            EngagementLevel::High => 2,
        }
    }
}

/// Coarse verdict returned by the single-score endpoint.
///
/// Uses its own cut points (0.6 / 0.3), which intentionally differ from
/// [`EngagementLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Low,
    Moderate,
    High,
}

impl Recommendation {
    pub const HIGH_THRESHOLD: f64 = 0.6;
    pub const MODERATE_THRESHOLD: f64 = 0.3;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Recommendation::High
        } else if score >= Self::MODERATE_THRESHOLD {
            Recommendation::Moderate
        } else {
            Recommendation::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Recommendation::Low => "Low potential",
            Recommendation::Moderate => "Moderate potential",
            Recommendation::High => "High potential",
        }
    }
}

/// Converts a `[0, 1]` score to a percentage rounded to one decimal.
pub fn percent_score(score: f64) -> f64 {
    (score * 1000.0).round() / 10.0
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
