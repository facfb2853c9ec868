use log::debug;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::FetchError;
use crate::models::{Channel, NodeInfo};

/// The remote explorer API the pipeline reads nodes and channels from.
#[allow(async_fn_in_trait)]
pub trait NodeSource {
    /// `GET /search?alias=<term>`
    async fn search(&self, term: &str) -> Result<Vec<NodeInfo>, FetchError>;

    /// `GET /node/<pubkey>`
    async fn node(&self, pubkey: &str) -> Result<NodeInfo, FetchError>;

    /// `GET /channels/<node_id>`
    async fn channels(&self, node_id: &str) -> Result<Vec<Channel>, FetchError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `NodeSource` backed by the explorer's HTTP API.
#[derive(Clone)]
pub struct HttpExplorer {
    client: Client,
    /// `{API_URL}/v2/lightning/{CURRENCY}`
    base_url: Url,
}

impl HttpExplorer {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let base_url = format!(
            "{}/v2/lightning/{}",
            config.api_url.trim_end_matches('/'),
            config.currency
        );
        let base_url = Url::parse(&base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(config.fetch_timeout).build()?;
        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("[Client] GET {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    fn url(&self, path: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .extend(path);
        Ok(url)
    }
}

/// Prefer the API's own `error` message; fall back to the status reason.
async fn status_error(response: Response) -> FetchError {
    let status = response.status();
    let body_error = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error);
    let message = body_error.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string())
    });
    FetchError::Status {
        status: status.as_u16(),
        message,
    }
}

impl NodeSource for HttpExplorer {
    async fn search(&self, term: &str) -> Result<Vec<NodeInfo>, FetchError> {
        let mut url = self.url(&["search"])?;
        url.query_pairs_mut().append_pair("alias", term);
        self.get_json(url).await
    }

    async fn node(&self, pubkey: &str) -> Result<NodeInfo, FetchError> {
        self.get_json(self.url(&["node", pubkey])?).await
    }

    async fn channels(&self, node_id: &str) -> Result<Vec<Channel>, FetchError> {
        self.get_json(self.url(&["channels", node_id])?).await
    }
}
