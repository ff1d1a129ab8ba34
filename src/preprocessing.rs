use csv::ReaderBuilder;
use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::artifacts::{Classifier, LabelEncoder, ModelArtifactSet, StandardScaler, TfidfVectorizer};
use crate::features::{content_text, EngagementCounters, PlatformCode, NUMERIC_WIDTH};
use crate::{Candidate, EngagementLevel};

/// Vocabulary cap used when fitting the text vectorizer on a dataset.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

const CLASS_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("invalid row in {path}: {source}")]
    Row {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("dataset {0} has no rows")]
    Empty(PathBuf),
}

/// One row of the viral social media trends dataset. Columns not named here
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TrendRecord {
    #[serde(rename = "Hashtag")]
    pub hashtag: String,
    #[serde(rename = "Content_Type")]
    pub content_type: String,
    #[serde(rename = "Platform")]
    pub platform: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Views")]
    pub views: f64,
    #[serde(rename = "Likes")]
    pub likes: f64,
    #[serde(rename = "Shares")]
    pub shares: f64,
    #[serde(rename = "Comments")]
    pub comments: f64,
    #[serde(rename = "Engagement_Level")]
    pub engagement_level: EngagementLevel,
}

impl TrendRecord {
    pub fn candidate(&self) -> Candidate {
        Candidate::new(
            self.hashtag.as_str(),
            self.content_type.as_str(),
            self.platform.as_str(),
            self.region.as_str(),
        )
    }

    pub fn counters(&self) -> EngagementCounters {
        EngagementCounters {
            views: self.views,
            likes: self.likes,
            shares: self.shares,
            comments: self.comments,
        }
    }
}

pub fn read_records(path: &Path) -> Result<Vec<TrendRecord>, DatasetError> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let records = reader
        .into_deserialize::<TrendRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| DatasetError::Row {
            path: path.to_path_buf(),
            source,
        })?;
    if records.is_empty() {
        return Err(DatasetError::Empty(path.to_path_buf()));
    }
    Ok(records)
}

/// Fits the preprocessing artifacts on `records` and pairs them with a
/// `prior` classifier holding the label frequencies in `{Low, Medium, High}`
/// order. `records` must not be empty.
pub fn fit_artifacts(records: &[TrendRecord], max_features: usize) -> ModelArtifactSet {
    let documents: Vec<String> = records
        .iter()
        .map(|record| content_text(&record.candidate()))
        .collect();
    let vectorizer = TfidfVectorizer::fit(&documents, max_features);
    let label_encoder = LabelEncoder::fit(records.iter().map(|record| record.platform.as_str()));

    let columns: Vec<[f64; NUMERIC_WIDTH]> = records
        .iter()
        .map(|record| {
            let code = label_encoder
                .code(&record.platform)
                .unwrap_or(PlatformCode::DEFAULT);
            record.counters().numeric_columns(code as f64)
        })
        .collect();
    let rows = Array2::from_shape_fn((columns.len(), NUMERIC_WIDTH), |(row, column)| {
        columns[row][column]
    });
    let scaler = StandardScaler::fit(&rows);

    ModelArtifactSet {
        classifier: Classifier::Prior {
            class_prior: class_prior(records),
        },
        vectorizer,
        label_encoder,
        scaler,
    }
}

pub fn class_prior(records: &[TrendRecord]) -> Array1<f64> {
    let mut counts = [0usize; CLASS_COUNT];
    for record in records {
        counts[record.engagement_level.class_index()] += 1;
    }
    let total = records.len().max(1) as f64;
    Array1::from_iter(counts.iter().map(|count| *count as f64 / total))
}

/// Reads the dataset at `path` and fits an artifact set on it.
pub fn fit_from_csv(path: &Path, max_features: usize) -> Result<ModelArtifactSet, DatasetError> {
    let records = read_records(path)?;
    let set = fit_artifacts(&records, max_features);
    info!(
        dataset = %path.display(),
        rows = records.len(),
        vocabulary = set.vectorizer.width(),
        platforms = set.label_encoder.classes.len(),
        "fitted preprocessing artifacts"
    );
    Ok(set)
}
