// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monitor configuration.
//!
//! [`MonitorConfig`] collects everything needed to wire a monitor to a plug:
//! the device address and credentials for the link, the idle threshold for
//! the decision engine, and the polling cadence for callers that drive the
//! loop periodically. Values can be set through the builder methods or read
//! from `PLUGWATCH_*` environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value for {var}: {value}")]
    InvalidVar {
        /// The variable that failed to parse.
        var: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Configuration for a plug monitor.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use plugwatch::MonitorConfig;
///
/// let config = MonitorConfig::new("192.168.1.58")
///     .with_device_name("washing-machine")
///     .with_credentials("admin", "secret")
///     .with_low_threshold_ma(30)
///     .with_check_interval(Duration::from_secs(30));
///
/// assert_eq!(config.host(), "192.168.1.58");
/// assert_eq!(config.low_threshold_ma(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    host: String,
    device_name: String,
    credentials: Option<(String, String)>,
    protocol_version: Option<String>,
    low_threshold_ma: u32,
    check_interval: Duration,
    timeout: Duration,
}

impl MonitorConfig {
    /// Default idle threshold in milliamps.
    pub const DEFAULT_LOW_THRESHOLD_MA: u32 = 30;
    /// Default polling interval for periodic operation.
    pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30);
    /// Default device request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the plug at the given host.
    ///
    /// The device name defaults to the host until set explicitly.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            device_name: host.clone(),
            host,
            credentials: None,
            protocol_version: None,
            low_threshold_ma: Self::DEFAULT_LOW_THRESHOLD_MA,
            check_interval: Self::DEFAULT_CHECK_INTERVAL,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Loads the configuration from `PLUGWATCH_*` environment variables.
    ///
    /// `PLUGWATCH_HOST` is required. Recognized optional variables:
    /// `PLUGWATCH_DEVICE`, `PLUGWATCH_USERNAME`, `PLUGWATCH_PASSWORD`,
    /// `PLUGWATCH_PROTOCOL_VERSION`, `PLUGWATCH_LOW_THRESHOLD_MA`,
    /// `PLUGWATCH_CHECK_INTERVAL_SECS`.
    ///
    /// # Errors
    ///
    /// Returns error if the host is missing or a numeric variable fails to
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host =
            env::var("PLUGWATCH_HOST").map_err(|_| ConfigError::MissingVar("PLUGWATCH_HOST"))?;
        let mut config = Self::new(host);

        if let Ok(name) = env::var("PLUGWATCH_DEVICE") {
            config = config.with_device_name(name);
        }
        if let (Ok(user), Ok(pass)) = (env::var("PLUGWATCH_USERNAME"), env::var("PLUGWATCH_PASSWORD"))
        {
            config = config.with_credentials(user, pass);
        }
        if let Ok(version) = env::var("PLUGWATCH_PROTOCOL_VERSION") {
            config = config.with_protocol_version(version);
        }
        if let Ok(value) = env::var("PLUGWATCH_LOW_THRESHOLD_MA") {
            let threshold = value.parse().map_err(|_| ConfigError::InvalidVar {
                var: "PLUGWATCH_LOW_THRESHOLD_MA",
                value: value.clone(),
            })?;
            config = config.with_low_threshold_ma(threshold);
        }
        if let Ok(value) = env::var("PLUGWATCH_CHECK_INTERVAL_SECS") {
            let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidVar {
                var: "PLUGWATCH_CHECK_INTERVAL_SECS",
                value: value.clone(),
            })?;
            config = config.with_check_interval(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Sets a human-readable device identifier, used in log output.
    #[must_use]
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    /// Sets device authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Pins the device protocol version.
    ///
    /// Links that speak a versioned protocol use this to select the wire
    /// format; the HTTP link ignores it.
    #[must_use]
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = Some(version.into());
        self
    }

    /// Sets the idle threshold in milliamps.
    ///
    /// Readings at or below this value count as low current.
    #[must_use]
    pub fn with_low_threshold_ma(mut self, threshold: u32) -> Self {
        self.low_threshold_ma = threshold;
        self
    }

    /// Sets the polling interval for periodic operation.
    #[must_use]
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Sets the device request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the device host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Returns the credentials if set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Returns the pinned protocol version if set.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Returns the idle threshold in milliamps.
    #[must_use]
    pub fn low_threshold_ma(&self) -> u32 {
        self.low_threshold_ma
    }

    /// Returns the polling interval.
    #[must_use]
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Returns the device request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
