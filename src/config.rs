use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::sampler::{owned, CandidateSampler, CONTENT_TYPES, HASHTAGS, PLATFORMS, REGIONS};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub dir: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub default_count: usize,
    pub max_count: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            default_count: 10,
            max_count: 100,
        }
    }
}

impl SuggestionConfig {
    /// Accepts counts in `1..=max_count`.
    pub fn check_count(&self, count: i64) -> Result<usize, String> {
        match usize::try_from(count) {
            Ok(value) if (1..=self.max_count).contains(&value) => Ok(value),
            _ => Err(format!(
                "count must be between 1 and {}, got {}",
                self.max_count, count
            )),
        }
    }
}

/// Values the candidate sampler draws from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub hashtags: Vec<String>,
    pub content_types: Vec<String>,
    pub platforms: Vec<String>,
    pub regions: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            hashtags: owned(HASHTAGS),
            content_types: owned(CONTENT_TYPES),
            platforms: owned(PLATFORMS),
            regions: owned(REGIONS),
        }
    }
}

impl VocabularyConfig {
    pub fn sampler(&self) -> Result<CandidateSampler, String> {
        CandidateSampler::new(
            self.hashtags.clone(),
            self.content_types.clone(),
            self.platforms.clone(),
            self.regions.clone(),
        )
        .ok_or_else(|| "vocabulary lists must not be empty".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    /// Substitute defaults for missing request fields instead of rejecting.
    pub fill_missing_fields: bool,
    pub default_hashtag: String,
    pub default_content_type: String,
    pub default_platform: String,
    pub default_region: String,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            fill_missing_fields: false,
            default_hashtag: "#Viral".to_string(),
            default_content_type: "Video".to_string(),
            default_platform: "TikTok".to_string(),
            default_region: "USA".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub health_url: String,
    pub attempts: u32,
    pub interval_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            health_url: "http://localhost:5001/api/health".to_string(),
            attempts: 30,
            interval_ms: 1000,
            request_timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub suggestions: SuggestionConfig,
    pub vocabulary: VocabularyConfig,
    pub predict: PredictConfig,
    pub bootstrap: BootstrapConfig,
}

impl ServiceConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                Self::parse(&contents)?
            }
            _ => ServiceConfig::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok((config, config_path))
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.suggestions.max_count == 0 {
            return Err("suggestions.max_count must be at least 1".to_string());
        }
        if self.suggestions.default_count == 0
            || self.suggestions.default_count > self.suggestions.max_count
        {
            return Err(format!(
                "suggestions.default_count must be between 1 and {}",
                self.suggestions.max_count
            ));
        }
        self.vocabulary.sampler()?;
        if self.bootstrap.attempts == 0 {
            return Err("bootstrap.attempts must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = env::var("TREND_HOST") {
            if !host.trim().is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(port) = env::var("TREND_PORT") {
            if let Ok(value) = port.parse::<u16>() {
                self.server.port = value;
            }
        }
        if let Ok(dir) = env::var("TREND_MODEL_DIR") {
            if !dir.trim().is_empty() {
                self.model.dir = PathBuf::from(dir);
            }
        }
        if let Ok(max_count) = env::var("TREND_MAX_COUNT") {
            if let Ok(value) = max_count.parse::<usize>() {
                self.suggestions.max_count = value;
            }
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    env::var("TREND_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/service.toml")))
}
