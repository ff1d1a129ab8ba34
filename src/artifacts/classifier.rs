use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::artifacts::InferenceError;

/// A fitted classifier exposing class probabilities over `{Low, Medium, High}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Multinomial linear model: `softmax(coef · x + intercept)`.
    Logistic {
        coef: Array2<f64>,
        intercept: Array1<f64>,
    },
    /// Fixed class distribution regardless of input.
    Prior { class_prior: Array1<f64> },
}

impl Classifier {
    pub fn n_classes(&self) -> usize {
        match self {
            Classifier::Logistic { coef, .. } => coef.nrows(),
            Classifier::Prior { class_prior } => class_prior.len(),
        }
    }

    /// Number of input columns the classifier expects, if it checks at all.
    pub fn n_features(&self) -> Option<usize> {
        match self {
            Classifier::Logistic { coef, .. } => Some(coef.ncols()),
            Classifier::Prior { .. } => None,
        }
    }

    pub fn predict_proba(&self, features: &Array1<f64>) -> Result<Array1<f64>, InferenceError> {
        match self {
            Classifier::Logistic { coef, intercept } => {
                if coef.ncols() != features.len() {
                    return Err(InferenceError::ClassifierWidth {
                        expected: coef.ncols(),
                        found: features.len(),
                    });
                }
                if intercept.len() != coef.nrows() {
                    return Err(InferenceError::InterceptWidth {
                        expected: coef.nrows(),
                        found: intercept.len(),
                    });
                }
                Ok(softmax(&(coef.dot(features) + intercept)))
            }
            Classifier::Prior { class_prior } => Ok(class_prior.clone()),
        }
    }
}

fn softmax(logits: &Array1<f64>) -> Array1<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp = logits.mapv(|value| (value - max).exp());
    let total = exp.sum();
    exp / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn logistic_probabilities_sum_to_one() {
        let classifier = Classifier::Logistic {
            coef: array![[0.5, -1.0], [0.0, 0.0], [-0.5, 1.0]],
            intercept: array![0.0, 0.1, 0.2],
        };
        let proba = classifier.predict_proba(&array![1.0, 2.0]).unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.sum() - 1.0).abs() < 1e-12);
        assert!(proba[2] > proba[0]);
    }

    #[test]
    fn logistic_rejects_wrong_width() {
        let classifier = Classifier::Logistic {
            coef: Array2::zeros((3, 4)),
            intercept: Array1::zeros(3),
        };
        let err = classifier.predict_proba(&Array1::zeros(2)).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::ClassifierWidth { expected: 4, found: 2 }
        ));
    }

    #[test]
    fn prior_ignores_input() {
        let classifier = Classifier::Prior {
            class_prior: array![0.2, 0.3, 0.5],
        };
        let proba = classifier.predict_proba(&Array1::zeros(7)).unwrap();
        assert_eq!(proba, array![0.2, 0.3, 0.5]);
        assert_eq!(classifier.n_features(), None);
    }

    #[test]
    fn serialises_with_kind_tag() {
        let classifier = Classifier::Prior {
            class_prior: array![0.2, 0.3, 0.5],
        };
        let json = serde_json::to_value(&classifier).unwrap();
        assert_eq!(json["kind"], "prior");
        let back: Classifier = serde_json::from_value(json).unwrap();
        assert_eq!(back.n_classes(), 3);
    }
}
