// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `plugwatch` library.
//!
//! The device link is the only fallible collaborator in the core: every
//! failure talking to the plug over the local network surfaces as a
//! [`LinkError`]. The monitor loop itself never fails - link errors from a
//! status refresh are absorbed into the activity log.

use thiserror::Error;

/// Errors raised by a device link (network/protocol failure talking to the plug).
#[derive(Debug, Error)]
pub enum LinkError {
    /// HTTP request failed at the transport level.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid host or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Device rejected the configured credentials.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Device returned a payload that could not be decoded.
    #[error("unreadable device payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, LinkError>;
