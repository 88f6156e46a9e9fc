use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch of {url} failed with status {status}")]
    Fetch { url: String, status: u16 },

    #[error("Invalid header {name}: {message}")]
    Header { name: String, message: String },
}

pub type Result<T> = std::result::Result<T, ScraperError>;
