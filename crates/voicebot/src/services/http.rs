use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// Fetches a JSON document over HTTP GET.
pub trait JsonFetch: Send + Sync {
    fn get_json(&self, url: &str) -> CoreResult<Value>;
}

/// Blocking reqwest client, built on first use from the blocking pool.
#[derive(Debug)]
pub struct ReqwestFetch {
    timeout: Duration,
    client: OnceCell<Client>,
}

impl ReqwestFetch {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceCell::new(),
        }
    }

    fn client(&self) -> CoreResult<&Client> {
        self.client.get_or_try_init(|| {
            Client::builder()
                .timeout(self.timeout)
                .user_agent(concat!("voicebot/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| CoreError::Internal(format!("failed to build http client: {e}")))
        })
    }
}

impl Default for ReqwestFetch {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

impl JsonFetch for ReqwestFetch {
    fn get_json(&self, url: &str) -> CoreResult<Value> {
        let response = self
            .client()?
            .get(url)
            .send()
            .map_err(|e| CoreError::Action(format!("request to {url} failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Action(format!(
                "request to {url} failed with status {}",
                status.as_u16()
            )));
        }
        response
            .json::<Value>()
            .map_err(|e| CoreError::Action(format!("invalid response from {url}: {e}")))
    }
}
