use ndarray::{Array1, Array2};
use std::fs;
use std::path::Path;
use trend_suggest::artifacts::{
    ArtifactError, ArtifactPointer, Classifier, ModelArtifactSet, POINTER_FILE,
};
use trend_suggest::features::{PlatformCode, NUMERIC_WIDTH};
use trend_suggest::predictor::{FallbackReason, Outcome, Scorer};
use trend_suggest::service::{load_predictor, TrendService};
use trend_suggest::Candidate;

fn logistic_set() -> ModelArtifactSet {
    let mut set = ModelArtifactSet::basic();
    let width = set.vectorizer.width() + NUMERIC_WIDTH;
    let coef = Array2::from_shape_fn((3, width), |(class, column)| {
        (class as f64 - 1.0) * 0.3 + (column % 4) as f64 * 0.05 * class as f64
    });
    set.classifier = Classifier::Logistic {
        coef,
        intercept: Array1::from(vec![0.2, 0.0, -0.1]),
    };
    set
}

fn save(set: &ModelArtifactSet, dir: &Path) -> ArtifactPointer {
    let pointer = ArtifactPointer::timestamped("20250101_000000");
    set.save(dir, &pointer).unwrap();
    pointer
}

#[test]
fn saved_artifacts_load_back() {
    let dir = tempfile::tempdir().unwrap();
    let pointer = save(&logistic_set(), dir.path());

    let contents = fs::read_to_string(dir.path().join(POINTER_FILE)).unwrap();
    assert_eq!(contents.lines().count(), 4);
    assert!(dir.path().join(&pointer.scaler).exists());

    let (loaded, loaded_pointer) = ModelArtifactSet::load(dir.path()).unwrap();
    assert_eq!(loaded_pointer, pointer);
    assert_eq!(loaded.classifier.n_features(), Some(loaded.vectorizer.width() + NUMERIC_WIDTH));
    assert_eq!(loaded.label_encoder.classes, vec!["Instagram", "TikTok", "YouTube"]);
}

#[test]
fn loaded_model_is_deterministic_and_bounded() {
    let dir = tempfile::tempdir().unwrap();
    save(&logistic_set(), dir.path());
    let service = TrendService::from_model_dir(dir.path());
    assert!(service.model_loaded());
    assert!(service.model_version().is_some());

    let candidate = Candidate::new("#Challenge", "Video", "TikTok", "USA");
    let first = service.score(&candidate);
    let second = service.score(&candidate);

    assert_eq!(first.prediction.score, second.prediction.score);
    assert!((0.0..=1.0).contains(&first.prediction.score));
    assert_eq!(
        first.prediction.outcome,
        Outcome::Model {
            platform: PlatformCode::Known(1)
        }
    );
}

#[test]
fn unseen_platform_still_scores_with_the_model() {
    let dir = tempfile::tempdir().unwrap();
    save(&logistic_set(), dir.path());
    let predictor = load_predictor(dir.path());

    let prediction = predictor.predict(&Candidate::new("#Unknown99", "Video", "UnknownPlatform", "USA"));
    assert!((0.0..=1.0).contains(&prediction.score));
    assert_eq!(
        prediction.outcome,
        Outcome::Model {
            platform: PlatformCode::Unseen
        }
    );
}

#[test]
fn unseen_tokens_do_not_break_encoding() {
    let dir = tempfile::tempdir().unwrap();
    save(&logistic_set(), dir.path());
    let predictor = load_predictor(dir.path());

    let prediction = predictor.predict(&Candidate::new("#Unknown99", "Hologram", "TikTok", "Mars"));
    assert!(!prediction.is_fallback());
}

#[test]
fn missing_pointer_means_fallback_mode() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ModelArtifactSet::load(dir.path()),
        Err(ArtifactError::MissingPointer(_))
    ));

    let service = TrendService::from_model_dir(dir.path());
    assert!(!service.model_loaded());

    let candidate = Candidate::new("#Viral", "Video", "TikTok", "USA");
    let scores: Vec<f64> = (0..50)
        .map(|_| service.score(&candidate).prediction.score)
        .collect();
    assert!(scores.iter().all(|score| (0.0..1.0).contains(score)));
    assert!(scores.iter().any(|score| *score != scores[0]));
}

#[test]
fn corrupt_artifact_means_fallback_mode() {
    let dir = tempfile::tempdir().unwrap();
    let pointer = save(&logistic_set(), dir.path());
    fs::write(dir.path().join(&pointer.scaler), "not json").unwrap();

    assert!(matches!(
        ModelArtifactSet::load(dir.path()),
        Err(ArtifactError::Decode { .. })
    ));
    let predictor = load_predictor(dir.path());
    assert!(!predictor.model_loaded());
    assert_eq!(
        predictor.predict(&Candidate::new("#Tech", "Post", "Twitter", "UK")).outcome,
        Outcome::Fallback(FallbackReason::NoModel)
    );
}

#[test]
fn missing_artifact_file_means_fallback_mode() {
    let dir = tempfile::tempdir().unwrap();
    let pointer = save(&logistic_set(), dir.path());
    fs::remove_file(dir.path().join(&pointer.vectorizer)).unwrap();

    assert!(matches!(
        ModelArtifactSet::load(dir.path()),
        Err(ArtifactError::Read { .. })
    ));
    assert!(!load_predictor(dir.path()).model_loaded());
}

#[test]
fn mismatched_classifier_falls_back_per_call() {
    let dir = tempfile::tempdir().unwrap();
    let mut set = logistic_set();
    set.classifier = Classifier::Logistic {
        coef: Array2::zeros((3, 3)),
        intercept: Array1::zeros(3),
    };
    save(&set, dir.path());

    let predictor = load_predictor(dir.path());
    assert!(predictor.model_loaded());
    let prediction = predictor.predict(&Candidate::new("#Tech", "Post", "Twitter", "UK"));
    assert!(matches!(
        prediction.outcome,
        Outcome::Fallback(FallbackReason::InferenceFailed(_))
    ));
    assert!((0.0..1.0).contains(&prediction.score));
}

#[test]
fn basic_model_scores_every_candidate_low() {
    let dir = tempfile::tempdir().unwrap();
    save(&ModelArtifactSet::basic(), dir.path());
    let service = TrendService::from_model_dir(dir.path());

    let report = service.score(&Candidate::new("#Dance", "Shorts", "YouTube", "UK"));
    assert!((report.prediction.score - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(report.trending_score, 33.3);
    assert_eq!(report.recommendation.label(), "Moderate potential");
    assert_eq!(report.engagement_level.label(), "Low");
}
