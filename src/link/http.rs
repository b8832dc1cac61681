// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP device link for smart plugs exposing the `/cm?cmnd=` web API.

use std::time::Duration;

use reqwest::Client;

use crate::config::MonitorConfig;
use crate::error::LinkError;

use super::response::DeviceStatus;
use super::{DeviceLink, PlugStatus};

/// HTTP authentication credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
}

/// Device link speaking the plug's HTTP command API.
///
/// Commands are sent as GET requests against `/cm?cmnd=<command>`. HTTP is
/// stateless - each operation is an independent request with a bounded
/// timeout, so a stalled device cannot wedge the monitor loop.
///
/// # Examples
///
/// ```no_run
/// use plugwatch::{DeviceLink, HttpLink};
///
/// # async fn example() -> plugwatch::Result<()> {
/// let link = HttpLink::new("192.168.1.58")?;
/// let status = link.fetch_status().await?;
/// println!("{} mA", status.current_ma);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpLink {
    base_url: String,
    client: Client,
    credentials: Option<Credentials>,
    timeout_ms: u64,
}

impl HttpLink {
    /// Creates a link to the plug at the given host with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, LinkError> {
        Self::with_options(host, None, MonitorConfig::DEFAULT_TIMEOUT)
    }

    /// Creates a link from a monitor configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, LinkError> {
        let credentials = config.credentials().map(|(u, p)| Credentials {
            username: u.to_string(),
            password: p.to_string(),
        });
        Self::with_options(config.host(), credentials, config.timeout())
    }

    fn with_options(
        host: impl Into<String>,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Result<Self, LinkError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(LinkError::InvalidAddress("host is required".to_string()));
        }
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else {
            format!("http://{host}")
        };

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LinkError::Http)?;

        // u64 millis cover any practical timeout
        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = timeout.as_millis() as u64;

        Ok(Self {
            base_url,
            client,
            credentials,
            timeout_ms,
        })
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for a command.
    fn build_url(&self, command: &str) -> String {
        let encoded_command = urlencoding::encode(command);

        match &self.credentials {
            Some(creds) => {
                format!(
                    "{}/cm?user={}&password={}&cmnd={}",
                    self.base_url,
                    urlencoding::encode(&creds.username),
                    urlencoding::encode(&creds.password),
                    encoded_command
                )
            }
            None => {
                format!("{}/cm?cmnd={}", self.base_url, encoded_command)
            }
        }
    }

    /// Sends a raw command and returns the response body.
    async fn send(&self, command: &str) -> Result<String, LinkError> {
        let url = self.build_url(command);

        tracing::debug!(url = %url, "sending device command");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LinkError::Timeout(self.timeout_ms)
            } else {
                LinkError::Http(e)
            }
        })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LinkError::AuthenticationFailed);
        }

        if !response.status().is_success() {
            return Err(LinkError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(LinkError::Http)?;

        tracing::debug!(body = %body, "received device response");

        Ok(body)
    }
}

impl DeviceLink for HttpLink {
    async fn fetch_status(&self) -> Result<PlugStatus, LinkError> {
        let body = self.send("Status 0").await?;
        let status: DeviceStatus = serde_json::from_str(&body)?;
        Ok(status.to_plug_status())
    }

    async fn set_power(&self, on: bool) -> Result<(), LinkError> {
        let command = if on { "Power ON" } else { "Power OFF" };
        self.send(command).await?;
        Ok(())
    }
}
