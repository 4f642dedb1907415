//! Configuration management for the resume scanner

use crate::error::{Result, ResumeScannerError};
use crate::processing::composer::{SuggestionRules, DEFAULT_DISPLAYED_KEYWORDS, DEFAULT_PREVIEW_CHARS};
use crate::processing::skill_matcher::DEFAULT_KEYWORD_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Profile catalog to use instead of the built-in one.
    pub catalog_path: Option<PathBuf>,
    pub keyword_limit: usize,
    pub displayed_keywords: usize,
    pub preview_chars: usize,
    pub min_best_score: u8,
    pub max_avg_sentence_words: f64,
    pub min_token_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub uploads_dir: PathBuf,
    pub stage_uploads: bool,
    pub max_file_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Console => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let rules = SuggestionRules::default();
        Self {
            catalog_path: None,
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            displayed_keywords: DEFAULT_DISPLAYED_KEYWORDS,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            min_best_score: rules.min_best_score,
            max_avg_sentence_words: rules.max_avg_sentence_words,
            min_token_count: rules.min_token_count,
        }
    }
}

impl AnalysisConfig {
    pub fn suggestion_rules(&self) -> SuggestionRules {
        SuggestionRules {
            min_best_score: self.min_best_score,
            max_avg_sentence_words: self.max_avg_sentence_words,
            min_token_count: self.min_token_count,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        let uploads_dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("resume-scanner")
            .join("uploads");

        Self {
            uploads_dir,
            stage_uploads: true,
            max_file_bytes: Some(20 * 1024 * 1024),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path`, creating it with defaults when it does not exist.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeScannerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeScannerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-scanner")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis.min_best_score > 100 {
            return Err(ResumeScannerError::Configuration(
                "analysis.min_best_score must be between 0 and 100".to_string(),
            ));
        }
        if self.analysis.max_avg_sentence_words < 0.0 {
            return Err(ResumeScannerError::Configuration(
                "analysis.max_avg_sentence_words must not be negative".to_string(),
            ));
        }
        if self.analysis.keyword_limit == 0 {
            return Err(ResumeScannerError::Configuration(
                "analysis.keyword_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
