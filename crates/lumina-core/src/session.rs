//! Session Clock
//!
//! Tracks the current access window (trial or premium) and decides whether
//! capability-gated actions may run.
//!
//! The [`UserSession`] is never edited field by field: every transition
//! builds a new value and swaps it in through one of the named operations
//! on [`SessionClock`].
//!
//! ```text
//!            tick / guard after expiry
//!   trial ───────────────────────────▶ trial (re-armed, prompt raised)
//!     │                                  │
//!     │ on_premium_granted               │ on_premium_granted
//!     ▼                                  ▼
//!   premium ──── window lapses ───────▶ trial (re-armed, prompt raised)
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AccessDenied;
use crate::pricing;
use crate::thermostat::Action;

/// Window lengths
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionPolicy {
    pub trial_window: Duration,
    pub premium_window: Duration,
    pub rearm_window: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            trial_window: Duration::minutes(pricing::TRIAL_WINDOW_MINUTES),
            premium_window: Duration::minutes(pricing::PREMIUM_WINDOW_MINUTES),
            rearm_window: Duration::minutes(pricing::REARM_WINDOW_MINUTES),
        }
    }
}

/// One access window
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub is_active: bool,
    pub is_trial: bool,
    pub start_time: DateTime<Utc>,
    pub expiry_time: DateTime<Utc>,
    pub balance_paid: bool,
}

impl UserSession {
    /// Free window starting at `now`
    pub fn trial(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            is_active: true,
            is_trial: true,
            start_time: now,
            expiry_time: now + window,
            balance_paid: false,
        }
    }

    /// Paid window starting at `now`
    pub fn premium(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            is_active: true,
            is_trial: false,
            start_time: now,
            expiry_time: now + window,
            balance_paid: true,
        }
    }

    /// Time left, never negative
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expiry_time - now).max(Duration::zero())
    }

    /// Access is permitted iff `now < expiry_time`
    pub fn permits(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry_time
    }

    /// A purchase only counts while its own window is open
    pub fn balance_current(&self, now: DateTime<Utc>) -> bool {
        self.balance_paid && self.permits(now)
    }
}

/// Result of a clock tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Window still open; countdown refreshed
    Counting { remaining: Duration },

    /// Window closed on this tick; a fresh trial is armed and the prompt raised
    Expired,
}

/// Process-wide owner of the current [`UserSession`]
#[derive(Clone, Debug)]
pub struct SessionClock {
    session: UserSession,
    policy: SessionPolicy,
    displayed: Duration,
    upgrade_prompt: bool,
}

impl SessionClock {
    /// Start a trial at `now`
    pub fn start(policy: SessionPolicy, now: DateTime<Utc>) -> Self {
        Self {
            session: UserSession::trial(now, policy.trial_window),
            policy,
            displayed: policy.trial_window,
            upgrade_prompt: false,
        }
    }

    pub fn session(&self) -> &UserSession {
        &self.session
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Countdown as of the last tick
    pub fn displayed_remaining(&self) -> Duration {
        self.displayed
    }

    /// Whether the upgrade prompt should be shown
    pub fn upgrade_prompt(&self) -> bool {
        self.upgrade_prompt
    }

    /// Advance the clock to `now`.
    ///
    /// A premium window that has run out no longer counts as paid, so it
    /// expires exactly like a trial.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.session.permits(now) {
            self.displayed = self.session.remaining(now);
            return TickOutcome::Counting {
                remaining: self.displayed,
            };
        }

        self.displayed = Duration::zero();
        tracing::info!(
            expired_at = %self.session.expiry_time,
            trial = self.session.is_trial,
            "Access window expired"
        );
        self.rearm(now);
        TickOutcome::Expired
    }

    /// Synchronous check before a gated action.
    ///
    /// Duplicates the expiry test in [`tick`](Self::tick) because a user
    /// event can be handled before the timer fires.
    pub fn guard_action(&mut self, action: &Action, now: DateTime<Utc>) -> Result<(), AccessDenied> {
        if !action.is_gated() || self.session.permits(now) {
            return Ok(());
        }

        let denied = AccessDenied {
            expired_at: self.session.expiry_time,
        };
        tracing::debug!(?action, expired_at = %denied.expired_at, "Gated action refused");
        self.displayed = Duration::zero();
        self.rearm(now);

        Err(denied)
    }

    /// Replace the session with a premium window starting at `now`
    pub fn on_premium_granted(&mut self, now: DateTime<Utc>) {
        self.session = UserSession::premium(now, self.policy.premium_window);
        self.displayed = self.policy.premium_window;
        self.upgrade_prompt = false;
        tracing::info!(expires_at = %self.session.expiry_time, "Premium window granted");
    }

    /// Arm a fresh trial-shaped window and raise the upgrade prompt
    pub fn rearm(&mut self, now: DateTime<Utc>) {
        self.session = UserSession::trial(now, self.policy.rearm_window);
        self.upgrade_prompt = true;
    }

    /// User closed the prompt without paying
    pub fn dismiss_prompt(&mut self) {
        self.upgrade_prompt = false;
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start(SessionPolicy::default(), Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermostat::Mode;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn heat() -> Action {
        Action::SetMode(Mode::Hot)
    }

    #[test]
    fn test_starts_in_trial() {
        let clock = SessionClock::start(SessionPolicy::default(), t0());
        let session = clock.session();

        assert!(session.is_active);
        assert!(session.is_trial);
        assert!(!session.balance_paid);
        assert_eq!(session.expiry_time, t0() + Duration::minutes(10));
        assert!(!clock.upgrade_prompt());
    }

    #[test]
    fn test_tick_counts_down() {
        let mut clock = SessionClock::start(SessionPolicy::default(), t0());

        let outcome = clock.tick(t0() + Duration::minutes(4));

        assert_eq!(
            outcome,
            TickOutcome::Counting {
                remaining: Duration::minutes(6)
            }
        );
        assert_eq!(clock.displayed_remaining(), Duration::minutes(6));
        assert!(clock.session().is_trial);
    }

    #[test]
    fn test_tick_after_trial_rearms() {
        let mut clock = SessionClock::start(SessionPolicy::default(), t0());
        let now = t0() + Duration::minutes(10) + Duration::seconds(1);

        assert_eq!(clock.tick(now), TickOutcome::Expired);

        let session = clock.session();
        assert!(clock.upgrade_prompt());
        assert!(session.is_trial);
        assert!(!session.balance_paid);
        assert_eq!(session.start_time, now);
        assert!(session.permits(now));
        assert_eq!(clock.displayed_remaining(), Duration::zero());
    }

    #[test]
    fn test_tick_at_exact_expiry_expires() {
        let mut clock = SessionClock::start(SessionPolicy::default(), t0());
        assert_eq!(clock.tick(t0() + Duration::minutes(10)), TickOutcome::Expired);
    }

    #[test]
    fn test_rearmed_window_is_one_hour() {
        let mut clock = SessionClock::start(SessionPolicy::default(), t0());
        let now = t0() + Duration::minutes(10) + Duration::seconds(1);

        assert_eq!(clock.tick(now), TickOutcome::Expired);

        let session = clock.session();
        assert_eq!(session.expiry_time - session.start_time, Duration::minutes(60));
        assert!(session.is_active);
        assert!(session.is_trial);
    }

    #[test]
    fn test_ticks_keep_counting_after_rearm() {
        let mut clock = SessionClock::start(SessionPolicy::default(), t0());
        let expired = t0() + Duration::minutes(10);
        clock.tick(expired);

        assert_eq!(
            clock.tick(expired + Duration::minutes(1)),
            TickOutcome::Counting {
                remaining: Duration::minutes(59)
            }
        );
        assert!(clock.upgrade_prompt());
    }

    #[test]
    fn test_guard_boundaries() {
        let window = Duration::minutes(10);
        for offset in [0, 1, 599] {
            let mut clock = SessionClock::start(SessionPolicy::default(), t0());
            let now = t0() + Duration::seconds(offset);
            assert!(clock.guard_action(&heat(), now).is_ok(), "offset {offset}s");
            assert!(!clock.upgrade_prompt());
        }

        for offset in [600, 601, 3600] {
            let mut clock = SessionClock::start(SessionPolicy::default(), t0());
            let now = t0() + Duration::seconds(offset);
            let err = clock.guard_action(&heat(), now).unwrap_err();
            assert_eq!(err.expired_at, t0() + window);
            assert!(clock.upgrade_prompt());
            assert_eq!(clock.session().start_time, now);
            assert!(!clock.session().balance_paid);
        }
    }

    #[test]
    fn test_turning_off_is_never_gated() {
        let mut clock = SessionClock::start(SessionPolicy::default(), t0());
        let late = t0() + Duration::hours(2);

        assert!(clock.guard_action(&Action::SetMode(Mode::Off), late).is_ok());
        assert!(!clock.upgrade_prompt());
    }

    #[test]
    fn test_premium_window_guard() {
        let mut clock = SessionClock::start(SessionPolicy::default(), t0());
        let t1 = t0() + Duration::minutes(3);
        clock.on_premium_granted(t1);

        assert!(clock.session().balance_paid);
        assert!(!clock.session().is_trial);
        assert!(clock.guard_action(&heat(), t1 + Duration::minutes(59)).is_ok());
        assert!(clock.guard_action(&heat(), t1 + Duration::minutes(61)).is_err());
        assert!(!clock.session().balance_paid);
    }

    #[test]
    fn test_premium_replaces_trial_wholesale() {
        let mut clock = SessionClock::start(SessionPolicy::default(), t0());
        let t1 = t0() + Duration::minutes(9);
        clock.on_premium_granted(t1);

        // Not additive: the unused trial minute is gone
        assert_eq!(clock.session().expiry_time, t1 + Duration::minutes(60));
        assert_eq!(clock.session().start_time, t1);
    }

    #[test]
    fn test_premium_lapse_expires_on_tick() {
        let mut clock = SessionClock::start(SessionPolicy::default(), t0());
        clock.on_premium_granted(t0());

        assert_eq!(clock.tick(t0() + Duration::minutes(61)), TickOutcome::Expired);
        assert!(clock.session().is_trial);
        assert!(clock.upgrade_prompt());
    }

    #[test]
    fn test_premium_clears_prompt_and_dismiss() {
        let mut clock = SessionClock::start(SessionPolicy::default(), t0());
        clock.rearm(t0());
        assert!(clock.upgrade_prompt());

        clock.dismiss_prompt();
        assert!(!clock.upgrade_prompt());

        clock.rearm(t0());
        clock.on_premium_granted(t0());
        assert!(!clock.upgrade_prompt());
    }
}
