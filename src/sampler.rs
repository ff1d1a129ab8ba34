use rand::seq::SliceRandom;
use rand::Rng;

use crate::Candidate;

pub const HASHTAGS: &[&str] = &[
    "#Challenge",
    "#Dance",
    "#Education",
    "#Gaming",
    "#Comedy",
    "#Music",
    "#Tech",
    "#Fashion",
    "#Fitness",
    "#Viral",
    "#Travel",
    "#Food",
    "#Lifestyle",
    "#Art",
    "#Beauty",
    "#Sports",
    "#DIY",
    "#Motivation",
    "#Entertainment",
    "#Health",
    "#Science",
    "#Nature",
    "#Photography",
];

pub const CONTENT_TYPES: &[&str] = &["Video", "Shorts", "Post", "Reel", "Live Stream", "Tweet"];

pub const PLATFORMS: &[&str] = &["TikTok", "Instagram", "YouTube", "Twitter"];

pub const REGIONS: &[&str] = &[
    "USA",
    "UK",
    "Canada",
    "Australia",
    "Germany",
    "Brazil",
    "India",
    "Japan",
];

/// Draws candidates uniformly from closed vocabularies, with replacement.
#[derive(Debug, Clone)]
pub struct CandidateSampler {
    hashtags: Vec<String>,
    content_types: Vec<String>,
    platforms: Vec<String>,
    regions: Vec<String>,
}

impl Default for CandidateSampler {
    fn default() -> Self {
        Self {
            hashtags: owned(HASHTAGS),
            content_types: owned(CONTENT_TYPES),
            platforms: owned(PLATFORMS),
            regions: owned(REGIONS),
        }
    }
}

impl CandidateSampler {
    /// Returns `None` if any vocabulary is empty.
    pub fn new(
        hashtags: Vec<String>,
        content_types: Vec<String>,
        platforms: Vec<String>,
        regions: Vec<String>,
    ) -> Option<Self> {
        if hashtags.is_empty() || content_types.is_empty() || platforms.is_empty() || regions.is_empty() {
            return None;
        }
        Some(Self {
            hashtags,
            content_types,
            platforms,
            regions,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<Candidate> {
        (0..n).filter_map(|_| self.draw(rng)).collect()
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Candidate> {
        Some(Candidate {
            hashtag: self.hashtags.choose(rng)?.clone(),
            content_type: self.content_types.choose(rng)?.clone(),
            platform: self.platforms.choose(rng)?.clone(),
            region: self.regions.choose(rng)?.clone(),
        })
    }
}

pub(crate) fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn sample_returns_requested_count_from_vocabularies() {
        let sampler = CandidateSampler::default();
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = sampler.sample(&mut rng, 60);

        assert_eq!(candidates.len(), 60);
        for candidate in &candidates {
            assert!(HASHTAGS.contains(&candidate.hashtag.as_str()));
            assert!(CONTENT_TYPES.contains(&candidate.content_type.as_str()));
            assert!(PLATFORMS.contains(&candidate.platform.as_str()));
            assert!(REGIONS.contains(&candidate.region.as_str()));
        }
    }

    #[test]
    fn sample_allows_duplicates() {
        let sampler = CandidateSampler::new(
            vec!["#Only".to_string()],
            vec!["Video".to_string()],
            vec!["TikTok".to_string()],
            vec!["USA".to_string()],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let candidates = sampler.sample(&mut rng, 3);
        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|c| *c == candidates[0]));
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let sampler = CandidateSampler::default();
        let first = sampler.sample(&mut StdRng::seed_from_u64(42), 10);
        let second = sampler.sample(&mut StdRng::seed_from_u64(42), 10);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_vocabulary_is_rejected() {
        assert!(CandidateSampler::new(Vec::new(), owned(CONTENT_TYPES), owned(PLATFORMS), owned(REGIONS)).is_none());
    }

    #[test]
    fn zero_samples() {
        let sampler = CandidateSampler::default();
        assert!(sampler.sample(&mut StdRng::seed_from_u64(3), 0).is_empty());
    }
}
