use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Default project file when neither `--data` nor `DATA_FILE` is set.
pub const DEFAULT_DATA_FILE: &str = "projects.json";

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Path of the JSON file holding the project list
    pub data_file: Option<String>,
    /// Log destination; logging stays disabled when unset
    pub log_file: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Configured data file, falling back to the default path
    pub fn data_file(&self) -> &str {
        self.data_file.as_deref().unwrap_or(DEFAULT_DATA_FILE)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Ensure .env file is loaded
    dotenv().ok();

    // Load the configuration
    let config = Config::load()?;

    Ok(config)
}
