use serde::Serialize;

use crate::describe::{description, title};
use crate::ranking::ScoredCandidate;
use crate::{percent_score, EngagementLevel};

/// A ranked, display-ready suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub id: usize,
    pub title: String,
    pub hashtag: String,
    pub content_type: String,
    pub platform: String,
    pub region: String,
    /// Percentage in `[0, 100]`, one decimal.
    pub trending_score: f64,
    pub description: String,
    pub engagement_level: EngagementLevel,
}

impl Suggestion {
    pub fn from_scored(id: usize, scored: ScoredCandidate) -> Self {
        let title = title(&scored.candidate);
        let description = description(&scored.candidate);
        let engagement_level = EngagementLevel::from_score(scored.score);
        let candidate = scored.candidate;
        Self {
            id,
            title,
            hashtag: candidate.hashtag,
            content_type: candidate.content_type,
            platform: candidate.platform,
            region: candidate.region,
            trending_score: percent_score(scored.score),
            description,
            engagement_level,
        }
    }
}
