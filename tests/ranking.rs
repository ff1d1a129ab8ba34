use rand::{rngs::StdRng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use trend_suggest::features::PlatformCode;
use trend_suggest::predictor::{Outcome, Prediction, Scorer};
use trend_suggest::ranking::{SuggestionRanker, OVERSAMPLING_FACTOR};
use trend_suggest::sampler::CandidateSampler;
use trend_suggest::service::TrendService;
use trend_suggest::{Candidate, EngagementLevel};

struct ConstantScorer(f64);

impl Scorer for ConstantScorer {
    fn predict(&self, _candidate: &Candidate) -> Prediction {
        Prediction {
            score: self.0,
            outcome: Outcome::Model {
                platform: PlatformCode::Known(0),
            },
        }
    }

    fn model_loaded(&self) -> bool {
        true
    }
}

/// Hands out a fixed sequence of scores and counts calls.
struct SequenceScorer {
    scores: Vec<f64>,
    calls: AtomicUsize,
}

impl SequenceScorer {
    fn new(scores: Vec<f64>) -> Self {
        Self {
            scores,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Scorer for SequenceScorer {
    fn predict(&self, _candidate: &Candidate) -> Prediction {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        Prediction {
            score: self.scores[idx % self.scores.len()],
            outcome: Outcome::Model {
                platform: PlatformCode::Known(0),
            },
        }
    }
}

#[test]
fn single_suggestion_with_high_constant_score() {
    let service = TrendService::with_scorer(ConstantScorer(0.9));
    let suggestions = service.generate(1);

    assert_eq!(suggestions.len(), 1);
    let suggestion = &suggestions[0];
    assert_eq!(suggestion.id, 1);
    assert_eq!(suggestion.trending_score, 90.0);
    assert_eq!(suggestion.engagement_level, EngagementLevel::High);
    assert_eq!(
        suggestion.title,
        format!("{} {} Content", suggestion.hashtag, suggestion.content_type)
    );
}

#[test]
fn ranker_scores_oversampled_pool() {
    let sampler = CandidateSampler::default();
    let scorer = SequenceScorer::new(vec![0.1, 0.5, 0.9]);
    let ranker = SuggestionRanker::new(&sampler, &scorer);

    let suggestions = ranker.rank(&mut StdRng::seed_from_u64(5), 4);

    assert_eq!(suggestions.len(), 4);
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 4 * OVERSAMPLING_FACTOR);
}

#[test]
fn suggestions_are_sorted_with_sequential_ids() {
    let scorer = SequenceScorer::new(vec![0.12, 0.95, 0.33, 0.71, 0.4, 0.05, 0.88]);
    let service = TrendService::with_scorer(scorer);

    for count in [1usize, 3, 7, 20] {
        let suggestions = service.generate_with_rng(&mut StdRng::seed_from_u64(count as u64), count);
        assert_eq!(suggestions.len(), count);
        for (idx, suggestion) in suggestions.iter().enumerate() {
            assert_eq!(suggestion.id, idx + 1);
        }
        for pair in suggestions.windows(2) {
            assert!(pair[0].trending_score >= pair[1].trending_score);
        }
    }
}

#[test]
fn top_k_keeps_the_best_scores() {
    let sampler = CandidateSampler::default();
    let scorer = SequenceScorer::new(vec![0.2, 0.8, 0.5, 0.75, 0.1, 0.3]);
    let ranker = SuggestionRanker::new(&sampler, &scorer);

    let suggestions = ranker.rank(&mut StdRng::seed_from_u64(9), 2);
    let scores: Vec<f64> = suggestions.iter().map(|s| s.trending_score).collect();
    assert_eq!(scores, vec![80.0, 75.0]);
    assert_eq!(suggestions[0].engagement_level, EngagementLevel::High);
    assert_eq!(suggestions[1].engagement_level, EngagementLevel::High);
}

#[test]
fn equal_scores_keep_sampling_order() {
    let sampler = CandidateSampler::default();
    let scorer = ConstantScorer(0.5);
    let ranker = SuggestionRanker::new(&sampler, &scorer);

    let suggestions = ranker.rank(&mut StdRng::seed_from_u64(11), 5);
    let expected = sampler.sample(&mut StdRng::seed_from_u64(11), 5 * OVERSAMPLING_FACTOR);

    for (suggestion, candidate) in suggestions.iter().zip(expected.iter()) {
        assert_eq!(suggestion.hashtag, candidate.hashtag);
        assert_eq!(suggestion.content_type, candidate.content_type);
        assert_eq!(suggestion.platform, candidate.platform);
        assert_eq!(suggestion.region, candidate.region);
        assert_eq!(suggestion.engagement_level, EngagementLevel::Medium);
    }
}

#[test]
fn low_scores_map_to_low_engagement() {
    let service = TrendService::with_scorer(ConstantScorer(0.1));
    let suggestions = service.generate(3);
    assert!(suggestions
        .iter()
        .all(|s| s.engagement_level == EngagementLevel::Low && s.trending_score == 10.0));
}
