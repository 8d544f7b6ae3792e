use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::config::Settings;

/// Source of raw show pages. `None` means the page is unavailable.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Option<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    /// GET `url`; only a successful HTML response counts as a document.
    fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send() {
            Ok(r) => r,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_lowercase().contains("html"));

        if !status.is_success() || !is_html {
            warn!("Unusable response from {}: status {}, html={}", url, status, is_html);
            return None;
        }

        match response.text() {
            Ok(body) => {
                debug!("Fetched {} ({} bytes)", url, body.len());
                Some(body)
            }
            Err(e) => {
                warn!("Failed to read body of {}: {}", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;

    use super::Fetcher;

    /// Serves fixture pages by URL.
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
    }

    impl StaticFetcher {
        pub fn with_fixture(mut self, url: &str, fixture: &str) -> Self {
            let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", fixture)).unwrap();
            self.pages.insert(url.to_string(), html);
            self
        }
    }

    impl Fetcher for StaticFetcher {
        fn fetch(&self, url: &str) -> Option<String> {
            self.pages.get(url).cloned()
        }
    }
}
