use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::artifacts::InferenceError;

/// Per-column standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fits on a `rows × columns` matrix. Zero-variance columns keep scale 1.
    pub fn fit(rows: &Array2<f64>) -> Self {
        let mean = rows
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(rows.ncols()));
        let scale = rows
            .std_axis(Axis(0), 0.0)
            .mapv(|std| if std > 0.0 && std.is_finite() { std } else { 1.0 });
        Self {
            mean: mean.to_vec(),
            scale: scale.to_vec(),
        }
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, row: &Array1<f64>) -> Result<Array1<f64>, InferenceError> {
        if row.len() != self.width() || self.scale.len() != self.width() {
            return Err(InferenceError::ScalerWidth {
                expected: self.width(),
                found: row.len(),
            });
        }
        Ok(Array1::from_iter(
            row.iter()
                .zip(self.mean.iter().zip(self.scale.iter()))
                .map(|(value, (mean, scale))| (value - mean) / scale),
        ))
    }
}
