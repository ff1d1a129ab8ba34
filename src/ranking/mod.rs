pub mod ranker;
pub mod suggestion;

pub use ranker::{ScoredCandidate, SuggestionRanker, OVERSAMPLING_FACTOR};
pub use suggestion::Suggestion;
