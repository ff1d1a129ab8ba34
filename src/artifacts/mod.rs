pub mod classifier;
pub mod encoder;
pub mod scaler;
pub mod vectorizer;

pub use classifier::Classifier;
pub use encoder::LabelEncoder;
pub use scaler::StandardScaler;
pub use vectorizer::TfidfVectorizer;

use ndarray::{Array1, Array2};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::features::{EngagementCounters, NUMERIC_WIDTH};

pub const POINTER_FILE: &str = "latest_model.txt";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model pointer not found at {0}")]
    MissingPointer(PathBuf),
    #[error("model pointer {path} names {found} artifacts, expected 4")]
    MalformedPointer { path: PathBuf, found: usize },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode artifact {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while turning one candidate into a probability.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("scaler expects {expected} columns, got {found}")]
    ScalerWidth { expected: usize, found: usize },
    #[error("classifier expects {expected} features, got {found}")]
    ClassifierWidth { expected: usize, found: usize },
    #[error("classifier intercept has {found} entries for {expected} classes")]
    InterceptWidth { expected: usize, found: usize },
    #[error("classifier returned {found} classes, high engagement is class {needed}")]
    MissingClass { needed: usize, found: usize },
    #[error("classifier returned a non-finite probability")]
    NonFinite,
}

/// The four file names recorded in the pointer record, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPointer {
    pub classifier: String,
    pub vectorizer: String,
    pub label_encoder: String,
    pub scaler: String,
}

impl ArtifactPointer {
    pub fn timestamped(stamp: &str) -> Self {
        Self {
            classifier: format!("trending_model_{}.json", stamp),
            vectorizer: format!("vectorizer_{}.json", stamp),
            label_encoder: format!("label_encoder_{}.json", stamp),
            scaler: format!("scaler_{}.json", stamp),
        }
    }

    pub fn parse(path: &Path, contents: &str) -> Result<Self, ArtifactError> {
        let lines: Vec<&str> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        match lines.as_slice() {
            [classifier, vectorizer, label_encoder, scaler] => Ok(Self {
                classifier: classifier.to_string(),
                vectorizer: vectorizer.to_string(),
                label_encoder: label_encoder.to_string(),
                scaler: scaler.to_string(),
            }),
            _ => Err(ArtifactError::MalformedPointer {
                path: path.to_path_buf(),
                found: lines.len(),
            }),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n",
            self.classifier, self.vectorizer, self.label_encoder, self.scaler
        )
    }

    /// Short, stable identifier for the artifact set this pointer names.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.render().as_bytes());
        let digest = hasher.finalize();
        digest[..6].iter().map(|byte| format!("{:02x}", byte)).collect()
    }
}

/// Everything needed to go from raw candidate fields to class probabilities.
#[derive(Debug, Clone)]
pub struct ModelArtifactSet {
    pub classifier: Classifier,
    pub vectorizer: TfidfVectorizer,
    pub label_encoder: LabelEncoder,
    pub scaler: StandardScaler,
}

impl ModelArtifactSet {
    /// Loads the set named by the pointer record in `model_dir`.
    pub fn load(model_dir: &Path) -> Result<(Self, ArtifactPointer), ArtifactError> {
        let pointer_path = model_dir.join(POINTER_FILE);
        if !pointer_path.exists() {
            return Err(ArtifactError::MissingPointer(pointer_path));
        }
        let contents = fs::read_to_string(&pointer_path).map_err(|source| ArtifactError::Read {
            path: pointer_path.clone(),
            source,
        })?;
        let pointer = ArtifactPointer::parse(&pointer_path, &contents)?;

        let set = Self {
            classifier: read_json(&model_dir.join(&pointer.classifier))?,
            vectorizer: read_json(&model_dir.join(&pointer.vectorizer))?,
            label_encoder: read_json(&model_dir.join(&pointer.label_encoder))?,
            scaler: read_json(&model_dir.join(&pointer.scaler))?,
        };
        Ok((set, pointer))
    }

    /// Writes the four artifacts under `pointer`'s names, then replaces the
    /// pointer record. Every file goes through a temporary sibling and a
    /// rename, and the pointer is written last.
    pub fn save(&self, model_dir: &Path, pointer: &ArtifactPointer) -> Result<(), ArtifactError> {
        fs::create_dir_all(model_dir).map_err(|source| ArtifactError::Write {
            path: model_dir.to_path_buf(),
            source,
        })?;

        write_json(&model_dir.join(&pointer.classifier), "classifier", &self.classifier)?;
        write_json(&model_dir.join(&pointer.vectorizer), "vectorizer", &self.vectorizer)?;
        write_json(
            &model_dir.join(&pointer.label_encoder),
            "label_encoder",
            &self.label_encoder,
        )?;
        write_json(&model_dir.join(&pointer.scaler), "scaler", &self.scaler)?;
        write_atomic(&model_dir.join(POINTER_FILE), pointer.render().as_bytes())
    }

    /// Minimal set used to bootstrap a fresh deployment: preprocessing fitted
    /// on seed data and a uniform prior classifier.
    pub fn basic() -> Self {
        let seed_docs = [
            "challenge video tiktok",
            "dance shorts youtube",
            "education post instagram",
        ]
        .iter()
        .map(|doc| doc.to_string())
        .collect::<Vec<_>>();
        let vectorizer = TfidfVectorizer::fit(&seed_docs, 100);
        let label_encoder = LabelEncoder::fit(["TikTok", "YouTube", "Instagram"]);

        let engagement = EngagementCounters::default();
        let rows = Array2::from_shape_fn((1, NUMERIC_WIDTH), |(_, column)| {
            engagement.numeric_columns(0.0)[column]
        });
        let scaler = StandardScaler::fit(&rows);

        let classifier = Classifier::Prior {
            class_prior: Array1::from_elem(3, 1.0 / 3.0),
        };

        Self {
            classifier,
            vectorizer,
            label_encoder,
            scaler,
        }
    }
}

pub fn pointer_exists(model_dir: &Path) -> bool {
    model_dir.join(POINTER_FILE).exists()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let data = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, name: &str, value: &T) -> Result<(), ArtifactError> {
    let payload = serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Encode {
        name: name.to_string(),
        source,
    })?;
    write_atomic(path, &payload)
}

fn write_atomic(path: &Path, payload: &[u8]) -> Result<(), ArtifactError> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    fs::write(&tmp_path, payload).map_err(|source| ArtifactError::Write {
        path: tmp_path.clone(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    })
}
