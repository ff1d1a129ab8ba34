use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{PredictConfig, SuggestionConfig};
use crate::ranking::Suggestion;
use crate::service::ScoreReport;
use crate::{Candidate, EngagementLevel};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionsQuery {
    pub count: Option<String>,
}

impl SuggestionsQuery {
    pub fn resolve_count(&self, limits: &SuggestionConfig) -> Result<usize, ApiError> {
        let raw = match self.count.as_deref().map(str::trim) {
            None | Some("") => return Ok(limits.default_count),
            Some(raw) => raw,
        };
        let count = raw
            .parse::<i64>()
            .map_err(|_| ApiError::BadRequest(format!("count must be an integer, got {:?}", raw)))?;
        limits.check_count(count).map_err(ApiError::BadRequest)
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub success: bool,
    pub suggestions: Vec<Suggestion>,
    pub timestamp: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    pub hashtag: Option<String>,
    pub content_type: Option<String>,
    pub platform: Option<String>,
    pub region: Option<String>,
}

impl PredictRequest {
    /// Missing or blank fields are rejected unless the config asks for
    /// defaults to be filled in.
    pub fn into_candidate(self, config: &PredictConfig) -> Result<Candidate, ApiError> {
        let mut missing = Vec::new();
        let mut field = |value: Option<String>, name: &'static str, default: &str| {
            match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                Some(value) => value,
                None => {
                    if !config.fill_missing_fields {
                        missing.push(name);
                    }
                    default.to_string()
                }
            }
        };

        let hashtag = field(self.hashtag, "hashtag", &config.default_hashtag);
        let content_type = field(self.content_type, "content_type", &config.default_content_type);
        let platform = field(self.platform, "platform", &config.default_platform);
        let region = field(self.region, "region", &config.default_region);

        if !missing.is_empty() {
            return Err(ApiError::BadRequest(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        Ok(Candidate::new(hashtag, content_type, platform, region))
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub trending_score: f64,
    pub engagement_level: EngagementLevel,
    pub recommendation: String,
}

impl PredictResponse {
    pub fn from_report(report: &ScoreReport) -> Self {
        Self {
            success: true,
            trending_score: report.trending_score,
            engagement_level: report.engagement_level,
            recommendation: report.recommendation.label().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_version: Option<String>,
    pub timestamp: String,
}

pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(count: Option<&str>) -> SuggestionsQuery {
        SuggestionsQuery {
            count: count.map(str::to_string),
        }
    }

    #[test]
    fn count_defaults_when_absent() {
        let limits = SuggestionConfig::default();
        assert_eq!(query(None).resolve_count(&limits).unwrap(), 10);
        assert_eq!(query(Some("")).resolve_count(&limits).unwrap(), 10);
    }

    #[test]
    fn count_is_validated() {
        let limits = SuggestionConfig::default();
        assert_eq!(query(Some("3")).resolve_count(&limits).unwrap(), 3);
        assert!(query(Some("0")).resolve_count(&limits).is_err());
        assert!(query(Some("-2")).resolve_count(&limits).is_err());
        assert!(query(Some("abc")).resolve_count(&limits).is_err());
        assert!(query(Some("101")).resolve_count(&limits).is_err());
        assert_eq!(query(Some("100")).resolve_count(&limits).unwrap(), 100);
    }

    #[test]
    fn missing_fields_are_rejected_by_default() {
        let request = PredictRequest {
            hashtag: Some("#Tech".to_string()),
            content_type: None,
            platform: Some("  ".to_string()),
            region: Some("USA".to_string()),
        };
        let err = request.into_candidate(&PredictConfig::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required fields: content_type, platform"
        );
    }

    #[test]
    fn missing_fields_can_be_defaulted() {
        let config = PredictConfig {
            fill_missing_fields: true,
            ..PredictConfig::default()
        };
        let candidate = PredictRequest::default().into_candidate(&config).unwrap();
        assert_eq!(candidate, Candidate::new("#Viral", "Video", "TikTok", "USA"));
    }
}
