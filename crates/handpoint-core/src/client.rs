use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

use crate::config::ClientConfig;
use crate::consts::{PROCESS_PATH, STATS_MAX_DAYS, STATS_PATH};
use crate::error::{HandpointError, Result};
use crate::io::data_url;
use crate::protocol::{ProcessRequest, ProcessResponse, UsageStats};

/// The remote side of the controller: compositing plus result download.
///
/// Implemented over HTTP by [`HttpClient`]; tests substitute their own.
pub trait CompositingService: Send + Sync {
    /// Send one compositing request. Server-reported failures come back as
    /// `Ok(ProcessResponse::Failure)`, transport failures as `Err`.
    fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse>;

    /// Download the bytes behind a result reference returned by `process`.
    fn fetch_result(&self, url: &str) -> Result<Vec<u8>>;
}

/// Resolve `path` (absolute URL or server-relative path) against `base`.
pub fn resolve_url(base: &Url, path: &str) -> Result<Url> {
    base.join(path)
        .map_err(|e| HandpointError::InvalidUrl(format!("{path}: {e}")))
}

pub fn parse_base_url(server_url: &str) -> Result<Url> {
    Url::parse(server_url).map_err(|e| HandpointError::InvalidUrl(format!("{server_url}: {e}")))
}

pub struct HttpClient {
    client: Client,
    base: Url,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.network.timeout())
            .user_agent(concat!("handpoint/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base: parse_base_url(&config.server_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Fetch usage statistics for the last `days` days (HTTP Basic auth).
    pub fn fetch_stats(&self, days: u32, username: &str, password: &str) -> Result<UsageStats> {
        if days == 0 || days > STATS_MAX_DAYS {
            return Err(HandpointError::InvalidStatsPeriod(days));
        }
        let url = resolve_url(&self.base, STATS_PATH)?;
        debug!(%url, days, "Fetching usage stats");

        let stats = self
            .client
            .get(url)
            .query(&[("days", days)])
            .basic_auth(username, Some(password))
            .send()?
            .error_for_status()?
            .json::<UsageStats>()?;
        Ok(stats)
    }
}

impl CompositingService for HttpClient {
    fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse> {
        let url = resolve_url(&self.base, PROCESS_PATH)?;
        debug!(
            %url,
            x = request.x,
            y = request.y,
            overlay_index = request.overlay_index,
            "Sending process request"
        );

        let resp = self.client.post(url).json(request).send()?;
        let status = resp.status();
        let body = resp.bytes()?;

        // The server answers failures with `{error}` and a 4xx/5xx status,
        // so the body is read before the status is judged.
        match serde_json::from_slice::<ProcessResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(HandpointError::UnexpectedStatus {
                status: status.as_u16(),
            }),
        }
    }

    fn fetch_result(&self, url: &str) -> Result<Vec<u8>> {
        if url.starts_with("data:") {
            return data_url::decode(url).map(|(_, bytes)| bytes);
        }
        let url = resolve_url(&self.base, url)?;
        debug!(%url, "Downloading result");

        let bytes = self.client.get(url).send()?.error_for_status()?.bytes()?;
        Ok(bytes.to_vec())
    }
}
