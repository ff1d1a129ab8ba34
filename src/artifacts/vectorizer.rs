use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// TF-IDF vectorizer with a vocabulary frozen at fit time.
///
/// Tokens are lower-cased runs of two or more word characters. Rows are
/// l2-normalised. Tokens missing from the vocabulary are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Builds the vocabulary from `documents`, keeping the `max_features`
    /// most frequent terms (ties broken alphabetically). Columns are assigned
    /// in alphabetical order of the kept terms.
    pub fn fit(documents: &[String], max_features: usize) -> Self {
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_counts: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = tokenize(doc);
            let unique: HashSet<&String> = tokens.iter().collect();
            for token in unique {
                *doc_counts.entry(token.clone()).or_insert(0) += 1;
            }
            for token in tokens {
                *term_counts.entry(token).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);

        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let n_docs = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (column, term) in kept.into_iter().enumerate() {
            let df = doc_counts.get(&term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        Self { vocabulary, idf }
    }

    pub fn width(&self) -> usize {
        self.idf.len()
    }

    pub fn transform(&self, document: &str) -> Array1<f64> {
        let mut row = Array1::<f64>::zeros(self.width());
        for token in tokenize(document) {
            if let Some(&column) = self.vocabulary.get(&token) {
                if column < row.len() {
                    row[column] += 1.0;
                }
            }
        }

        for (value, idf) in row.iter_mut().zip(self.idf.iter()) {
            *value *= idf;
        }

        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|value| value / norm);
        }
        row
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(|token| token.to_string())
        .collect()
}
