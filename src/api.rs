use std::time::Duration;

use log::debug;
use reqwest::header;
use reqwest::StatusCode;
use url::Url;

use crate::config::Config;
use crate::player::PlayerIdentity;

/// Where player profile pages come from.
#[allow(async_fn_in_trait)]
pub trait ProfileSource {
    fn profile_url(&self, player: &PlayerIdentity) -> String;

    async fn fetch_profile(&self, player: &PlayerIdentity) -> Result<String, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
}

/// Builds `{base}/player/{region}/{name}/{tag}` with the name percent-encoded.
pub fn profile_url(base_url: &Url, player: &PlayerIdentity) -> String {
    format!(
        "{}/player/{}/{}/{}",
        base_url.as_str().trim_end_matches('/'),
        player.region,
        urlencoding::encode(player.name.as_ref()),
        player.tag,
    )
}

fn client_builder(config: &Config) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout)
        .connection_verbose(true)
}

pub struct TacticsClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl TacticsClient {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        Ok(Self::with_client(client_builder(config).build()?, config))
    }

    fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.request_timeout,
        }
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(e)
        }
    }
}

impl ProfileSource for TacticsClient {
    fn profile_url(&self, player: &PlayerIdentity) -> String {
        profile_url(&self.base_url, player)
    }

    async fn fetch_profile(&self, player: &PlayerIdentity) -> Result<String, FetchError> {
        let url = self.profile_url(player);
        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        debug!("GET {url} -> {status}");
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        response.text().await.map_err(|e| self.classify(e))
    }
}
