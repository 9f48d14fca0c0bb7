// Backend command client
//
// Wraps `reqwest::Client` with command URL construction and envelope
// unwrapping. Each backend operation is a POST of a JSON argument object
// to `{base}/api/{command}`; the reply's `data` is returned only when the
// envelope `code` signals success.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::BaseResponse;
use crate::transport::TransportConfig;

/// Raw HTTP client for the backend process.
///
/// All methods return the unwrapped `data` payload -- the envelope is
/// stripped before the caller sees it.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl BackendClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://127.0.0.1:7890`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build the URL for a named command: `{base}/api/{command}`.
    pub(crate) fn command_url(&self, command: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/api/{}",
            self.base_url.as_str().trim_end_matches('/'),
            command
        );
        Ok(Url::parse(&full)?)
    }

    /// Build the URL for a one-way event: `{base}/api/events/{event}`.
    pub(crate) fn event_url(&self, event: &str) -> Result<Url, Error> {
        self.command_url(&format!("events/{event}"))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Invoke a command that returns a payload.
    ///
    /// A successful envelope without `data` is a deserialization error:
    /// the caller asked for a value and the backend sent none.
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        command: &str,
        args: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.command_url(command)?;
        let envelope: BaseResponse<T> = self.post(url, args).await?;
        envelope.data.ok_or_else(|| Error::Deserialization {
            message: format!("command '{command}' returned no data"),
            body: String::new(),
        })
    }

    /// Invoke a command whose reply payload is ignored.
    pub async fn invoke_unit(&self, command: &str, args: &impl Serialize) -> Result<(), Error> {
        let url = self.command_url(command)?;
        let _: BaseResponse<serde_json::Value> = self.post(url, args).await?;
        Ok(())
    }

    /// Emit a payload-less event to the backend.
    pub async fn emit(&self, event: &str) -> Result<(), Error> {
        let url = self.event_url(event)?;
        let _: BaseResponse<serde_json::Value> =
            self.post(url, &serde_json::json!({})).await?;
        Ok(())
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a POST request with JSON body and check the envelope.
    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<BaseResponse<T>, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        self.parse_envelope(resp).await
    }

    /// Parse the `{ code, message, data }` envelope, returning it on
    /// success or an `Error::Backend` if `code` is not the success code.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<BaseResponse<T>, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "backend rejected the access token".into(),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;

        let envelope: BaseResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if envelope.is_success() {
            Ok(envelope)
        } else {
            Err(Error::Backend {
                code: envelope.code,
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("HTTP {status}")),
            })
        }
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn command_url_appends_api_prefix() {
        let c = client("http://127.0.0.1:7890");
        assert_eq!(
            c.command_url("get_rua_config").unwrap().as_str(),
            "http://127.0.0.1:7890/api/get_rua_config"
        );
    }

    #[test]
    fn command_url_keeps_base_path() {
        let c = client("http://localhost:7890/rua/");
        assert_eq!(
            c.command_url("select_node").unwrap().as_str(),
            "http://localhost:7890/rua/api/select_node"
        );
    }

    #[test]
    fn event_url_is_namespaced() {
        let c = client("http://localhost:7890");
        assert_eq!(
            c.event_url("ready").unwrap().as_str(),
            "http://localhost:7890/api/events/ready"
        );
    }
}
