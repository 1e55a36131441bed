//! HTTP client for the Folio API.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use folio_core::document::PortfolioDocument;

use crate::error::ClientError;
use crate::types::{ApiErrorBody, DataResponse, LoginResponse, ProbeReport, UpdateResponse};
use crate::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Typed access to the four Folio routes. Never retries: a failed call is
/// returned to the caller, who decides whether to try again.
#[derive(Debug, Clone)]
pub struct PortfolioClient {
    base_url: String,
    client: reqwest::Client,
}

impl PortfolioClient {
    /// Create a client from the environment (`FOLIO_URL`) and defaults.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the base URL is not http(s), or
    /// `ClientError::Network` if the HTTP client cannot be built.
    pub fn with_config(cfg: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = first_non_empty(&[
            &cfg.base_url,
            &std::env::var("FOLIO_URL").unwrap_or_default(),
            DEFAULT_BASE_URL,
        ])
        .trim_end_matches('/')
        .to_owned();

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        let timeout = if cfg.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            cfg.timeout
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("folio-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self { base_url, client })
    }

    /// The server base URL in use.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the stored body exactly as the server holds it; `None` if
    /// nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on a server error or a non-object payload,
    /// or a transport error.
    pub async fn fetch_raw(&self) -> Result<Option<Map<String, Value>>, ClientError> {
        let resp: DataResponse = self.send(self.client.get(self.url("/api/data"))).await?;
        match resp.data {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(body)) => Ok(Some(body)),
            Some(_) => Err(ClientError::Api {
                status_code: 200,
                message: "server returned a non-object document".to_owned(),
            }),
        }
    }

    /// Fetch the stored document as the typed editing view; `None` if
    /// nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// As [`fetch_raw`](Self::fetch_raw), plus `ClientError::Document` if the
    /// body does not fit the portfolio document schema.
    pub async fn fetch(&self) -> Result<Option<PortfolioDocument>, ClientError> {
        self.fetch_raw()
            .await?
            .map(PortfolioDocument::from_object)
            .transpose()
            .map_err(ClientError::from)
    }

    /// Exchange the admin credential for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Auth` if the credential is wrong,
    /// `ClientError::Api` if it is missing, or a transport error.
    pub async fn login(&self, password: &str) -> Result<String, ClientError> {
        let req = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "password": password }));
        let resp: LoginResponse = self.send(req).await?;
        Ok(resp.token)
    }

    /// Replace the stored document with `document`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Auth` if the token is missing or stale,
    /// `ClientError::Api` on a validation or store error, or a transport error.
    pub async fn update(&self, token: &str, document: &PortfolioDocument) -> Result<(), ClientError> {
        let req = self
            .client
            .post(self.url("/api/update"))
            .bearer_auth(token)
            .json(&json!({ "data": document }));
        let resp: UpdateResponse = self.send(req).await?;
        if resp.success {
            Ok(())
        } else {
            Err(ClientError::Api {
                status_code: 200,
                message: "server did not confirm the update".to_owned(),
            })
        }
    }

    /// Run the server's store diagnostics.
    ///
    /// # Errors
    ///
    /// Returns a transport or decoding error.
    pub async fn probe(&self) -> Result<ProbeReport, ClientError> {
        self.send(self.client.get(self.url("/api/test-db"))).await
    }

    // --- Private ---

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Network(e)
            }
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(ClientError::Network)?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(ClientError::Json);
        }

        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Auth {
                status_code: status.as_u16(),
                message,
            });
        }

        Err(ClientError::Api {
            status_code: status.as_u16(),
            message,
        })
    }
}

fn first_non_empty(vals: &[&str]) -> String {
    vals.iter()
        .find(|v| !v.is_empty())
        .map(|v| (*v).to_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_base_url_is_trimmed() {
        let client = PortfolioClient::with_config(&ClientConfig {
            base_url: "http://localhost:4000/".to_owned(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert_eq!(client.url("/api/data"), "http://localhost:4000/api/data");
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = PortfolioClient::with_config(&ClientConfig {
            base_url: "localhost:4000".to_owned(),
            ..ClientConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn first_non_empty_skips_empty_values() {
        assert_eq!(first_non_empty(&["", "b", "c"]), "b");
        assert_eq!(first_non_empty(&["", ""]), "");
    }
}
