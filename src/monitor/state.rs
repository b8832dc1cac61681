// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monitor state tracking.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::decision::Decision;

/// Maximum number of retained activity log entries.
pub const LOG_CAPACITY: usize = 100;

/// One entry in the activity log.
///
/// Entries are immutable once created and render as `[HH:MM:SS] message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Time of day the entry was recorded, formatted `HH:MM:SS`.
    pub time: String,
    /// The logged message.
    pub message: String,
}

impl LogEntry {
    fn now(message: impl Into<String>) -> Self {
        Self {
            time: Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
        }
    }

    /// Renders the entry as a single log line.
    #[must_use]
    pub fn render(&self) -> String {
        format!("[{}] {}", self.time, self.message)
    }
}

/// Serializable view of the monitor state after a refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// Last observed current draw in milliamps.
    pub current: u32,
    /// Last observed relay state.
    pub power: bool,
    /// Outcome message of the most recent decision cycle.
    pub status: String,
    /// Unix timestamp of the last successful status fetch.
    pub last_updated: i64,
}

/// The mutable record backing one monitored plug.
///
/// Created once with defaults, mutated exclusively by the poll/control loop,
/// alive for the process lifetime. The activity log is bounded at
/// [`LOG_CAPACITY`] entries with FIFO eviction.
#[derive(Debug, Clone)]
pub struct MonitorState {
    current_ma: u32,
    power_on: bool,
    status_message: String,
    low_flag: bool,
    last_update: DateTime<Local>,
    log: VecDeque<LogEntry>,
}

impl MonitorState {
    /// Creates the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_ma: 0,
            power_on: false,
            status_message: "Initializing...".to_string(),
            low_flag: false,
            last_update: Local::now(),
            log: VecDeque::new(),
        }
    }

    /// Returns the last observed current draw in milliamps.
    #[must_use]
    pub fn current_ma(&self) -> u32 {
        self.current_ma
    }

    /// Returns the last observed relay state.
    #[must_use]
    pub fn power_on(&self) -> bool {
        self.power_on
    }

    /// Returns the outcome message of the most recent decision cycle.
    #[must_use]
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Returns the debounce flag: `true` means one low-current cycle has
    /// already been observed.
    #[must_use]
    pub fn low_flag(&self) -> bool {
        self.low_flag
    }

    /// Returns the wall-clock time of the last successful status fetch.
    #[must_use]
    pub fn last_update(&self) -> DateTime<Local> {
        self.last_update
    }

    /// Records a successful telemetry reading.
    pub(crate) fn record_reading(&mut self, current_ma: u32, power_on: bool) {
        self.current_ma = current_ma;
        self.power_on = power_on;
        self.last_update = Local::now();
    }

    /// Applies the outcome of a decision cycle.
    pub(crate) fn apply_decision(&mut self, decision: &Decision) {
        self.status_message = decision.verdict.as_str().to_string();
        self.low_flag = decision.low_flag;
    }

    /// Appends a log entry, evicting the oldest when at capacity.
    pub(crate) fn push_log(&mut self, message: impl Into<String>) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry::now(message));
    }

    /// Returns a copy of the rendered log lines, oldest first.
    #[must_use]
    pub fn rendered_log(&self) -> Vec<String> {
        self.log.iter().map(LogEntry::render).collect()
    }

    /// Returns a copy of the raw log entries, oldest first.
    #[must_use]
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log.iter().cloned().collect()
    }

    /// Returns a serializable snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            current: self.current_ma,
            power: self.power_on,
            status: self.status_message.clone(),
            last_updated: self.last_update.timestamp(),
        }
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}
