//! Optional `wordscope.ron` next to the working directory.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! A file that fails to parse is an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use wordscope_core::{
    AnalysisSettings, ChartKind, ParseChartKindError, DEFAULT_MIN_TOKEN_LENGTH, DEFAULT_TOP_N,
};
use wordscope_engine::{
    FetchSettings, HanSegmentingTokenizer, Tokenizer, UnicodeWordTokenizer, DEFAULT_CACHE_CAPACITY,
};
use wordscope_logging::LogDestination;

pub const CONFIG_FILENAME: &str = "wordscope.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid default_chart: {0}")]
    Chart(#[from] ParseChartKindError),
    #[error("invalid log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
    Off,
}

/// How page text is split into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TokenizerChoice {
    /// Word boundaries, with Han text segmented by dictionary.
    #[default]
    Segmenting,
    /// Word boundaries only; Han text falls apart into single ideographs.
    UnicodeWords,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub min_token_length: usize,
    pub top_n: usize,
    pub lowercase: bool,
    pub tokenizer: TokenizerChoice,
    pub cache_capacity: usize,
    pub default_chart: String,
    pub log_target: LogTarget,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            redirect_limit: fetch.redirect_limit,
            max_bytes: fetch.max_bytes,
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            top_n: DEFAULT_TOP_N,
            lowercase: true,
            tokenizer: TokenizerChoice::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            default_chart: ChartKind::default().label().to_string(),
            log_target: LogTarget::default(),
            log_level: "info".to_string(),
            log_file: PathBuf::from("./wordscope.log"),
        }
    }
}

impl AppConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            min_token_length: self.min_token_length,
            top_n: self.top_n,
        }
    }

    pub fn tokenizer(&self) -> Arc<dyn Tokenizer> {
        match self.tokenizer {
            TokenizerChoice::Segmenting => Arc::new(HanSegmentingTokenizer::new(self.lowercase)),
            TokenizerChoice::UnicodeWords => Arc::new(UnicodeWordTokenizer::new(self.lowercase)),
        }
    }

    pub fn default_chart(&self) -> Result<ChartKind, ConfigError> {
        Ok(ChartKind::from_str(&self.default_chart)?)
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log_target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
            LogTarget::Off => LogDestination::Off,
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    /// Checks the fields that only fail when used, so a bad file is reported up front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_chart()?;
        self.log_level()?;
        Ok(())
    }
}

pub fn load(dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    let config: AppConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.clone(),
        message: err.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = load(temp.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.analysis_settings(), AnalysisSettings::default());
        assert_eq!(config.default_chart().unwrap(), ChartKind::WordCloud);
        assert_eq!(config.tokenizer, TokenizerChoice::Segmenting);
    }

    #[test]
    fn partial_file_overrides_named_fields_only() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            "(top_n: 5, default_chart: \"pie\", log_target: Off, request_timeout_secs: 3, tokenizer: UnicodeWords, cache_capacity: 2)",
        )
        .unwrap();

        let config = load(temp.path()).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.min_token_length, DEFAULT_MIN_TOKEN_LENGTH);
        assert_eq!(config.default_chart().unwrap(), ChartKind::Pie);
        assert_eq!(config.log_destination(), LogDestination::Off);
        assert_eq!(config.tokenizer, TokenizerChoice::UnicodeWords);
        assert_eq!(config.cache_capacity, 2);
        assert_eq!(config.tokenizer().tokenize("文本"), vec!["文", "本"]);
        assert_eq!(
            config.fetch_settings().request_timeout,
            Duration::from_secs(3)
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), "(top_n: \"many\")").unwrap();
        assert!(matches!(
            load(temp.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn unknown_chart_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            "(default_chart: \"histogram\")",
        )
        .unwrap();
        assert!(matches!(load(temp.path()), Err(ConfigError::Chart(_))));
    }

    #[test]
    fn bad_log_level_is_reported() {
        let config = AppConfig {
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::LogLevel(_))));
    }
}
