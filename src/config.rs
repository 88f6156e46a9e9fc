use crate::app::ports::FetchRequest;
use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_LOG_DIR, DEFAULT_OUTPUT_FILE, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, PASHA_BANK_PARTNERS_URL,
};
use crate::error::{Result, ScraperError};
use crate::types::Source;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub output_file: String,
    pub log_dir: PathBuf,
    pub http: HttpConfig,
    pub sources: Vec<SourceConfig>,
}

/// Transport settings shared by every source
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub id: Source,
    /// Page to scrape. Sources without a url have their table supplied externally.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let pasha_headers = BTreeMap::from([
            (
                "accept".to_string(),
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            ),
            (
                "accept-language".to_string(),
                "en-GB,en-US;q=0.9,en;q=0.8,ru;q=0.7,az;q=0.6".to_string(),
            ),
        ]);

        let sources = Source::ALL
            .into_iter()
            .map(|id| match id {
                Source::PashaBank => SourceConfig {
                    id,
                    url: Some(PASHA_BANK_PARTNERS_URL.to_string()),
                    headers: pasha_headers.clone(),
                    cookies: BTreeMap::new(),
                },
                _ => SourceConfig::external(id),
            })
            .collect();

        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            http: HttpConfig::default(),
            sources,
        }
    }
}

impl SourceConfig {
    /// A source whose intermediate table is produced outside this tool
    pub fn external(id: Source) -> Self {
        Self {
            id,
            url: None,
            headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id) {
                return Err(ScraperError::Config(format!(
                    "source '{}' is configured more than once",
                    source.id
                )));
            }
        }
        if self.http.timeout_secs == 0 {
            return Err(ScraperError::Config("http.timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn source(&self, id: Source) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn output_path(&self) -> PathBuf {
        self.data_dir.join(&self.output_file)
    }

    /// Builds the fetch request for a source, layering its headers and
    /// cookies over the shared `[http]` ones. Returns None when the source has no url.
    pub fn fetch_request(&self, source: &SourceConfig) -> Option<FetchRequest> {
        let url = source.url.clone()?;

        let mut headers = self.http.headers.clone();
        headers.extend(source.headers.clone());
        let mut cookies = self.http.cookies.clone();
        cookies.extend(source.cookies.clone());

        Some(FetchRequest {
            url,
            user_agent: self.http.user_agent.clone(),
            headers,
            cookies,
            timeout: Duration::from_secs(self.http.timeout_secs),
        })
    }
}
