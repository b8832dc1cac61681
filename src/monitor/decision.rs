// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The idle-shutoff decision engine.
//!
//! [`evaluate`] is a pure function from one telemetry reading (plus the
//! debounce flag carried over from the previous cycle) to the new monitor
//! verdict. Shutoff requires two consecutive low-current cycles: a single
//! low reading only arms the flag, so a transient dip - a washing machine
//! pausing between cycles, say - never cuts power on its own.

use std::fmt;

/// Human-readable outcome of one decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The relay reports itself as off.
    PoweredOff,
    /// Current draw is above the idle threshold.
    InUse,
    /// First low-current cycle observed; watching the next one.
    LowObserved,
    /// Second consecutive low-current cycle; the plug is being shut off.
    IdleShutoff,
}

impl Verdict {
    /// Returns the status message for this verdict.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PoweredOff => "Device is OFF",
            Self::InUse => "Machine is in use",
            Self::LowObserved => "Low current detected. Monitoring next cycle...",
            Self::IdleShutoff => "Machine not in use, turned OFF",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// The outcome of this cycle.
    pub verdict: Verdict,
    /// Debounce flag to carry into the next cycle.
    pub low_flag: bool,
    /// Whether a shutoff command must be issued.
    pub shutoff: bool,
}

/// Maps one reading to the next monitor verdict.
///
/// `low_flag` is the debounce flag from the previous cycle: `true` means one
/// low-current cycle has already been observed. A reading exactly at the
/// threshold counts as low - only strictly greater current means in use.
///
/// # Examples
///
/// ```
/// use plugwatch::monitor::{evaluate, Verdict};
///
/// let first = evaluate(false, 10, true, 30);
/// assert_eq!(first.verdict, Verdict::LowObserved);
/// assert!(first.low_flag);
/// assert!(!first.shutoff);
///
/// let second = evaluate(first.low_flag, 10, true, 30);
/// assert_eq!(second.verdict, Verdict::IdleShutoff);
/// assert!(second.shutoff);
/// ```
#[must_use]
pub fn evaluate(low_flag: bool, current_ma: u32, power_on: bool, threshold_ma: u32) -> Decision {
    if !power_on {
        Decision {
            verdict: Verdict::PoweredOff,
            low_flag: false,
            shutoff: false,
        }
    } else if current_ma > threshold_ma {
        Decision {
            verdict: Verdict::InUse,
            low_flag: false,
            shutoff: false,
        }
    } else if low_flag {
        Decision {
            verdict: Verdict::IdleShutoff,
            low_flag: false,
            shutoff: true,
        }
    } else {
        Decision {
            verdict: Verdict::LowObserved,
            low_flag: true,
            shutoff: false,
        }
    }
}
