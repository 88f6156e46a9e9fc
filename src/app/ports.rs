use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

/// Everything the transport needs to fetch one page
#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub url: String,
    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    pub timeout: Duration,
}

/// Fetch-side port. Implementations return the page body or an error; callers
/// treat any error as "this source contributes zero records".
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<String>;
}
