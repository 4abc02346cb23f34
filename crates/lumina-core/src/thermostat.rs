//! Thermostat Controls
//!
//! Temperature and mode state wrapped around a [`SessionClock`]. Every
//! change that needs an open access window goes through
//! [`SessionClock::guard_action`] first.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AccessDenied;
use crate::session::{SessionClock, SessionPolicy, TickOutcome};

pub const MIN_TEMPERATURE: i32 = 16;
pub const MAX_TEMPERATURE: i32 = 30;
pub const DEFAULT_TEMPERATURE: i32 = 22;

/// Countdown below this is shown as a warning
pub const LOW_TIME_THRESHOLD_SECS: i64 = 60;

/// Operating mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Hot,
    Cool,
    #[default]
    Off,
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Hot => "hot",
            Mode::Cool => "cool",
            Mode::Off => "off",
        }
    }
}

/// User actions that may need an open access window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ChangeTemperature { delta: i32 },
    SetMode(Mode),
}

impl Action {
    /// Switching off is always allowed
    pub fn is_gated(&self) -> bool {
        !matches!(self, Action::SetMode(Mode::Off))
    }
}

/// Thermostat state
#[derive(Clone, Debug)]
pub struct Thermostat {
    clock: SessionClock,
    temperature: i32,
    mode: Mode,
}

impl Thermostat {
    /// Fresh thermostat with a trial starting at `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_policy(SessionPolicy::default(), now)
    }

    pub fn with_policy(policy: SessionPolicy, now: DateTime<Utc>) -> Self {
        Self {
            clock: SessionClock::start(policy, now),
            temperature: DEFAULT_TEMPERATURE,
            mode: Mode::Off,
        }
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Advance the clock; an expiry forces the thermostat off
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let outcome = self.clock.tick(now);
        if outcome == TickOutcome::Expired {
            self.mode = Mode::Off;
        }
        outcome
    }

    /// Nudge the target temperature, clamped to the supported range
    pub fn change_temperature(&mut self, delta: i32, now: DateTime<Utc>) -> Result<i32, AccessDenied> {
        self.clock
            .guard_action(&Action::ChangeTemperature { delta }, now)?;

        self.temperature = self
            .temperature
            .saturating_add(delta)
            .clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
        Ok(self.temperature)
    }

    pub fn set_mode(&mut self, mode: Mode, now: DateTime<Utc>) -> Result<Mode, AccessDenied> {
        self.clock.guard_action(&Action::SetMode(mode), now)?;
        self.mode = mode;
        Ok(mode)
    }

    pub fn grant_premium(&mut self, now: DateTime<Utc>) {
        self.clock.on_premium_granted(now);
    }

    pub fn rearm(&mut self, now: DateTime<Utc>) {
        self.clock.rearm(now);
    }

    pub fn dismiss_prompt(&mut self) {
        self.clock.dismiss_prompt();
    }

    /// Countdown text for the header badge
    pub fn countdown(&self) -> String {
        format_countdown(self.clock.displayed_remaining())
    }

    pub fn running_low(&self) -> bool {
        self.clock.displayed_remaining() < Duration::seconds(LOW_TIME_THRESHOLD_SECS)
    }
}

/// `m:ss`, truncating sub-second remainders
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{}:{:02}", total / 60, total % 60)
}
