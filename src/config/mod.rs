//! Extraction Configuration
//!
//! Tunable thresholds and limits for the pipeline, stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Recognition request settings
    pub recognition: RecognitionSettings,
    /// Highlight classifier thresholds
    pub classifier: HighlightThresholds,
    /// Context synthesis settings
    pub context: ContextSettings,
    /// Pattern fallback settings
    pub patterns: PatternSettings,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            recognition: RecognitionSettings::default(),
            classifier: HighlightThresholds::default(),
            context: ContextSettings::default(),
            patterns: PatternSettings::default(),
        }
    }
}

/// Recognition request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionSettings {
    /// Language hints passed to the recognizer, in preference order
    pub languages: Vec<String>,
    /// Favor accuracy over speed
    pub accurate: bool,
    /// Let the engine apply language-model correction
    pub language_correction: bool,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            languages: vec!["ja".to_string(), "en".to_string()],
            accurate: true,
            language_correction: true,
        }
    }
}

/// Highlight classifier thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightThresholds {
    /// Pixels at or above this brightness are not glyph candidates
    pub max_brightness: f64,
    /// More than this many dark samples are required for a verdict
    pub min_dark_samples: usize,
    /// Colored/dark ratio must strictly exceed this to classify highlighted
    pub min_colored_ratio: f64,
    /// Approximate number of pixels visited per region
    pub sample_budget: usize,
}

impl Default for HighlightThresholds {
    fn default() -> Self {
        Self {
            max_brightness: 0.65,
            min_dark_samples: 5,
            min_colored_ratio: 0.30,
            sample_budget: 2000,
        }
    }
}

/// Context synthesis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSettings {
    /// Number of neighboring lines scanned in each direction
    pub window: usize,
    /// Maximum keyword length in characters
    pub max_keyword_len: usize,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            window: 3,
            max_keyword_len: 50,
        }
    }
}

/// Pattern fallback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSettings {
    /// Maximum front length in characters for the per-line delimiter split
    pub max_front_len: usize,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self { max_front_len: 100 }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<ExtractionConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ExtractionConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &ExtractionConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ExtractionConfig::default();

        assert_eq!(config.recognition.languages, ["ja", "en"]);
        assert!(config.recognition.accurate);
        assert!(config.recognition.language_correction);

        assert!((config.classifier.max_brightness - 0.65).abs() < f64::EPSILON);
        assert_eq!(config.classifier.min_dark_samples, 5);
        assert!((config.classifier.min_colored_ratio - 0.30).abs() < f64::EPSILON);
        assert_eq!(config.classifier.sample_budget, 2000);

        assert_eq!(config.context.window, 3);
        assert_eq!(config.context.max_keyword_len, 50);
        assert_eq!(config.patterns.max_front_len, 100);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = ExtractionConfig::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ExtractionConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.recognition.languages, parsed.recognition.languages);
        assert_eq!(
            config.classifier.min_dark_samples,
            parsed.classifier.min_dark_samples
        );
        assert_eq!(config.context.window, parsed.context.window);
        assert_eq!(config.patterns.max_front_len, parsed.patterns.max_front_len);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = ExtractionConfig::default();
        config.context.window = 5;
        config.classifier.sample_budget = 500;

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(loaded.context.window, 5);
        assert_eq!(loaded.classifier.sample_budget, 500);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
