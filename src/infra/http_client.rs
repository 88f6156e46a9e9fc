use crate::app::ports::{FetchRequest, PageFetcher};
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, USER_AGENT};
use tracing::debug;

/// reqwest-backed fetcher. A client is built per request so that each source
/// gets its own timeout and default headers.
pub struct ReqwestFetcher;

impl ReqwestFetcher {
    fn header_map(request: &FetchRequest) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, Self::header_value("user-agent", &request.user_agent)?);

        for (name, value) in &request.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ScraperError::Header {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            headers.insert(header_name, Self::header_value(name, value)?);
        }

        if let Some(cookie) = cookie_header(request) {
            headers.insert(COOKIE, Self::header_value("cookie", &cookie)?);
        }
        Ok(headers)
    }

    fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
        HeaderValue::from_str(value).map_err(|e| ScraperError::Header {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}

/// `name=value; name2=value2`, or None when there are no cookies
pub fn cookie_header(request: &FetchRequest) -> Option<String> {
    if request.cookies.is_empty() {
        return None;
    }
    Some(
        request
            .cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String> {
        let client = reqwest::Client::builder()
            .timeout(request.timeout)
            .default_headers(Self::header_map(request)?)
            .build()?;

        debug!("GET {}", request.url);
        let response = client.get(&request.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Fetch {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
