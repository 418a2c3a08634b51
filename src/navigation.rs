use crate::stats::Period;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const DEFAULT_COOLDOWN_MS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn from_step(step: i32) -> Option<Self> {
        match step {
            -1 => Some(Direction::Previous),
            1 => Some(Direction::Next),
            _ => None,
        }
    }

    fn step(self) -> i32 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    Idle,
    /// Input is dropped until `until`, then the phase reads as `Idle` again.
    Navigating { until: DateTime<Utc> },
}

/// Period and offset currently on screen. `offset` is never positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub period: Period,
    pub offset: i32,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            period: Period::Week,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavButtons {
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Moved { offset: i32 },
    /// Accepted but the offset was already at the present.
    Clamped,
    /// Dropped by the cooldown.
    Ignored,
}

pub struct NavigationController {
    state: NavigationState,
    phase: NavPhase,
    cooldown: Duration,
}

impl NavigationController {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: NavigationState::default(),
            phase: NavPhase::Idle,
            cooldown,
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    /// Current phase, expiring an elapsed cooldown on read.
    pub fn phase(&mut self, now: DateTime<Utc>) -> NavPhase {
        if let NavPhase::Navigating { until } = self.phase {
            if now >= until {
                self.phase = NavPhase::Idle;
            }
        }
        self.phase
    }

    pub fn switch_period(&mut self, period: Period) {
        self.state = NavigationState { period, offset: 0 };
    }

    pub fn navigate(&mut self, direction: Direction, now: DateTime<Utc>) -> NavOutcome {
        if self.phase(now) != NavPhase::Idle {
            return NavOutcome::Ignored;
        }

        let target = (self.state.offset + direction.step()).min(0);
        let moved = target != self.state.offset;
        self.state.offset = target;
        self.phase = NavPhase::Navigating {
            until: now + self.cooldown,
        };

        if moved {
            NavOutcome::Moved { offset: target }
        } else {
            NavOutcome::Clamped
        }
    }

    pub fn buttons(&self) -> NavButtons {
        NavButtons {
            previous_enabled: true,
            next_enabled: self.state.offset < 0,
        }
    }

    /// Back to the current week, used after bulk data replacement.
    pub fn reset(&mut self) {
        self.state = NavigationState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn next_at_present_is_clamped() {
        let mut nav = NavigationController::new(Duration::milliseconds(300));
        assert_eq!(nav.navigate(Direction::Next, start()), NavOutcome::Clamped);
        assert_eq!(nav.state().offset, 0);
        assert!(!nav.buttons().next_enabled);
    }

    #[test]
    fn cooldown_drops_rapid_input_then_expires() {
        let mut nav = NavigationController::new(Duration::milliseconds(300));
        let now = start();

        assert_eq!(nav.navigate(Direction::Previous, now), NavOutcome::Moved { offset: -1 });
        assert_eq!(
            nav.navigate(Direction::Previous, now + Duration::milliseconds(100)),
            NavOutcome::Ignored
        );
        assert_eq!(nav.state().offset, -1);

        let later = now + Duration::milliseconds(300);
        assert_eq!(nav.phase(later), NavPhase::Idle);
        assert_eq!(nav.navigate(Direction::Previous, later), NavOutcome::Moved { offset: -2 });
        assert!(nav.buttons().next_enabled);
    }

    #[test]
    fn switching_period_resets_offset() {
        let mut nav = NavigationController::new(Duration::zero());
        let now = start();
        for _ in 0..3 {
            nav.navigate(Direction::Previous, now);
        }
        assert_eq!(nav.state().offset, -3);

        nav.switch_period(Period::Month);
        assert_eq!(nav.state(), NavigationState { period: Period::Month, offset: 0 });
    }

    #[test]
    fn direction_parses_unit_steps_only() {
        assert_eq!(Direction::from_step(-1), Some(Direction::Previous));
        assert_eq!(Direction::from_step(1), Some(Direction::Next));
        assert_eq!(Direction::from_step(2), None);
    }
}
