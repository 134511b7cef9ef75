use std::fs;
use std::path::Path;

use serde::{ Deserialize, Serialize };
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Settings for a property tester and its default value factory
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TesterConfig {
    /// Seed for reproducible value generation; entropy is used when absent
    pub seed: Option<u64>,

    /// Upper bound on generated collection and map sizes
    pub max_collection_len: usize,

    /// Upper bound on generated string lengths
    pub max_string_len: usize,

    /// How often the default factory redraws to avoid repeating its previous value for a type
    pub max_distinct_attempts: usize,

    /// Property names excluded from every run
    pub ignored_properties: Vec<String>,
}

impl TesterConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: TesterConfig = serde_yaml::from_str(contents)?;
        Ok(config.normalized())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Clamps sizes so every generated string and collection has at least one element
    pub fn normalized(mut self) -> Self {
        self.max_collection_len = self.max_collection_len.max(1);
        self.max_string_len = self.max_string_len.max(1);
        self.max_distinct_attempts = self.max_distinct_attempts.max(1);
        self
    }
}

/// Default configuration
impl Default for TesterConfig {
    fn default() -> Self {
        TesterConfig {
            seed: None,
            max_collection_len: 4,
            max_string_len: 16,
            max_distinct_attempts: 32,
            ignored_properties: Vec::new(),
        }
    }
}
