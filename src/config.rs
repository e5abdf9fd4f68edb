//! Configuration management for the ATS analyzer

use crate::error::{AtsError, Result};
use crate::processing::ats_matcher::DEFAULT_MIN_ROOT_LEN;
use crate::processing::dictionary::{Keyword, KeywordCategory};
use crate::processing::jd_parser::{DEFAULT_PREFERRED_WEIGHT, DEFAULT_REQUIRED_WEIGHT};
use crate::processing::recommendations::DEFAULT_RECOMMENDATIONS_PER_LOCATION;
use crate::processing::session::AnalysisOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub required_weight: f32,
    pub preferred_weight: f32,
    pub recommendations_per_location: usize,
    pub min_root_len: usize,
    pub custom_keywords: Vec<CustomKeywordConfig>,
}

/// Extra dictionary term, e.g. an in-house framework name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomKeywordConfig {
    pub text: String,
    #[serde(default = "default_custom_category")]
    pub category: KeywordCategory,
}

fn default_custom_category() -> KeywordCategory {
    KeywordCategory::Technology
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
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
}

impl OutputFormat {
    /// File extension for saved reports.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Console => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Console => write!(f, "console"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "console" | "terminal" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(AtsError::InvalidInput(format!(
                "Invalid output format: {}. Valid options: console, json, markdown",
                other
            ))),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            required_weight: DEFAULT_REQUIRED_WEIGHT,
            preferred_weight: DEFAULT_PREFERRED_WEIGHT,
            recommendations_per_location: DEFAULT_RECOMMENDATIONS_PER_LOCATION,
            min_root_len: DEFAULT_MIN_ROOT_LEN,
            custom_keywords: Vec::new(),
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

impl AnalysisConfig {
    pub fn to_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            required_weight: self.required_weight,
            preferred_weight: self.preferred_weight,
            recommendations_per_location: self.recommendations_per_location,
            min_root_len: self.min_root_len,
            custom_keywords: self
                .custom_keywords
                .iter()
                .map(|k| Keyword::new(&k.text, k.category, None))
                .collect(),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        AtsError::Configuration(format!("Invalid value for {}: {}", key, value))
    })
}

impl Config {
    /// Load from the default location, creating it with defaults if missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| AtsError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ats")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let a = &self.analysis;
        if a.required_weight.is_nan()
            || a.preferred_weight.is_nan()
            || a.required_weight < 0.0
            || a.preferred_weight < 0.0
        {
            return Err(AtsError::Configuration(
                "Keyword weights must be non-negative".to_string(),
            ));
        }
        if a.custom_keywords.iter().any(|k| k.text.trim().is_empty()) {
            return Err(AtsError::Configuration(
                "Custom keywords must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Set a single value by dotted key, e.g. `analysis.preferred_weight`.
    /// Nothing changes unless the result is valid.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        updated.apply(key, value)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "analysis.required_weight" => self.analysis.required_weight = parse_value(key, value)?,
            "analysis.preferred_weight" => self.analysis.preferred_weight = parse_value(key, value)?,
            "analysis.recommendations_per_location" => {
                self.analysis.recommendations_per_location = parse_value(key, value)?
            }
            "analysis.min_root_len" => self.analysis.min_root_len = parse_value(key, value)?,
            "output.format" => self.output.format = value.parse()?,
            "output.detailed" => self.output.detailed = parse_value(key, value)?,
            "output.color_output" => self.output.color_output = parse_value(key, value)?,
            _ => {
                return Err(AtsError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        self.analysis.to_options()
    }
}
