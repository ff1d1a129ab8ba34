use rand::Rng;
use tracing::debug;

use crate::predictor::{Outcome, Scorer};
use crate::ranking::Suggestion;
use crate::sampler::CandidateSampler;
use crate::Candidate;

/// Candidates sampled per requested suggestion.
pub const OVERSAMPLING_FACTOR: usize = 3;

#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
    pub outcome: Outcome,
}

/// Samples an oversized candidate pool, scores it and keeps the best entries.
pub struct SuggestionRanker<'a, S: Scorer + ?Sized> {
    sampler: &'a CandidateSampler,
    scorer: &'a S,
}

impl<'a, S: Scorer + ?Sized> SuggestionRanker<'a, S> {
    pub fn new(sampler: &'a CandidateSampler, scorer: &'a S) -> Self {
        Self { sampler, scorer }
    }

    pub fn rank<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Suggestion> {
        let pool = self
            .sampler
            .sample(rng, count.saturating_mul(OVERSAMPLING_FACTOR));
        let mut scored = self.score_all(pool);
        sort_by_score(&mut scored);
        scored.truncate(count);

        scored
            .into_iter()
            .enumerate()
            .map(|(idx, candidate)| Suggestion::from_scored(idx + 1, candidate))
            .collect()
    }

    pub fn score_all(&self, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        let mut fallbacks = 0usize;
        let scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| {
                let prediction = self.scorer.predict(&candidate);
                if prediction.is_fallback() {
                    fallbacks += 1;
                }
                ScoredCandidate {
                    candidate,
                    score: prediction.score,
                    outcome: prediction.outcome,
                }
            })
            .collect();
        debug!(pool = scored.len(), fallbacks, "scored candidate pool");
        scored
    }
}

/// Descending by score; equal scores keep their sampling order. Uses the
/// IEEE total order, so a NaN from a custom scorer sorts ahead of +inf.
pub fn sort_by_score(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
}
