// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary adapter: action selectors and JSON rendering.
//!
//! This is the thin glue between an external surface (an HTTP handler, a
//! CLI, a chat bot) and the monitor. The caller extracts the `action`
//! selector from its request however it likes, parses it into an [`Action`],
//! and gets back a `serde_json::Value` ready to serialize into the response
//! body. No transport is imposed here.

use serde_json::{Value, json};

use crate::link::DeviceLink;
use crate::monitor::PlugMonitor;

/// The external actions the monitor responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run one refresh cycle and report the resulting state.
    Status,
    /// Manually turn the plug on.
    TurnOn,
    /// Manually turn the plug off.
    TurnOff,
    /// Return the activity log.
    Log,
    /// List the available actions.
    Help,
}

impl Action {
    /// Parses an `action` query selector.
    ///
    /// A missing or unrecognized selector maps to [`Action::Help`].
    ///
    /// # Examples
    ///
    /// ```
    /// use plugwatch::Action;
    ///
    /// assert_eq!(Action::parse(Some("status")), Action::Status);
    /// assert_eq!(Action::parse(Some("turn_on")), Action::TurnOn);
    /// assert_eq!(Action::parse(Some("reboot")), Action::Help);
    /// assert_eq!(Action::parse(None), Action::Help);
    /// ```
    #[must_use]
    pub fn parse(selector: Option<&str>) -> Self {
        match selector {
            Some("status") => Self::Status,
            Some("turn_on") => Self::TurnOn,
            Some("turn_off") => Self::TurnOff,
            Some("log") => Self::Log,
            _ => Self::Help,
        }
    }
}

/// Executes an action against the monitor and renders the JSON response.
pub async fn dispatch<L: DeviceLink>(monitor: &PlugMonitor<L>, action: Action) -> Value {
    match action {
        Action::Status => {
            let snapshot = monitor.refresh_status().await;
            json!({
                "current": snapshot.current,
                "power": snapshot.power,
                "status": snapshot.status,
                "last_updated": snapshot.last_updated,
            })
        }
        Action::TurnOn => match monitor.turn_on().await {
            Ok(()) => json!({ "result": "on" }),
            Err(e) => json!({ "error": e.to_string() }),
        },
        Action::TurnOff => match monitor.turn_off().await {
            Ok(()) => json!({ "result": "off" }),
            Err(e) => json!({ "error": e.to_string() }),
        },
        Action::Log => json!({ "log": monitor.log_snapshot().await }),
        Action::Help => json!({
            "message": "Smart plug monitor is running",
            "endpoints": [
                "?action=status",
                "?action=turn_on",
                "?action=turn_off",
                "?action=log",
            ],
        }),
    }
}
