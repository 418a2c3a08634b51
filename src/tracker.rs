use crate::clock::Clock;
use crate::errors::{InitError, StorageError, ValidationError};
use crate::models::{APP_VERSION, ExportDocument, History, MAX_GOAL, MIN_GOAL, Settings, TodayResponse};
use crate::navigation::{Direction, NavOutcome, NavigationController, NavigationState};
use crate::records::{RecordStore, date_key};
use crate::render::{ChangeDetectingRenderer, RenderSurface, ViewInput};
use crate::stats::{Period, build_aggregate};
use crate::storage::StorageAdapter;
use crate::transfer::{build_export, parse_import};
use chrono::{Duration, SecondsFormat};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    Added { glasses: u32 },
    /// Today's total crossed the daily goal with this log.
    GoalReached { glasses: u32 },
    /// Today's total reached the cap with this log.
    Perfect { glasses: u32 },
    AlreadyAtMax,
    Unchanged,
}

impl LogOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogOutcome::Added { .. } => "added",
            LogOutcome::GoalReached { .. } => "goal_reached",
            LogOutcome::Perfect { .. } => "perfect",
            LogOutcome::AlreadyAtMax => "already_at_max",
            LogOutcome::Unchanged => "unchanged",
        }
    }

    pub fn message(&self) -> String {
        match self {
            LogOutcome::Added { glasses } => format!("Logged. {glasses} cups today."),
            LogOutcome::GoalReached { glasses } => format!("Daily goal reached with {glasses} cups!"),
            LogOutcome::Perfect { glasses } => format!("Perfect day: {glasses} cups, the maximum."),
            LogOutcome::AlreadyAtMax => "Already at the daily maximum.".to_string(),
            LogOutcome::Unchanged => "Nothing to log.".to_string(),
        }
    }
}

/// Application state: records, settings and navigation, plus the injected
/// store, clock and render surface. Every mutation persists the whole blob
/// it touched and then re-renders through the change detector.
pub struct Tracker<R: RenderSurface> {
    records: RecordStore,
    settings: Settings,
    navigation: NavigationController,
    renderer: ChangeDetectingRenderer<R>,
    storage: StorageAdapter,
    clock: Arc<dyn Clock>,
    notices: Vec<String>,
}

impl<R: RenderSurface> Tracker<R> {
    pub fn new(storage: StorageAdapter, clock: Arc<dyn Clock>, surface: R, cooldown: Duration) -> Self {
        Self {
            records: RecordStore::new(),
            settings: Settings::default(),
            navigation: NavigationController::new(cooldown),
            renderer: ChangeDetectingRenderer::new(surface),
            storage,
            clock,
            notices: Vec::new(),
        }
    }

    /// Loads saved data and paints the first view. If that fails, setup runs
    /// once more without loading, discarding the unreadable blobs, before
    /// giving up.
    pub fn bootstrap(
        storage: StorageAdapter,
        clock: Arc<dyn Clock>,
        surface: R,
        cooldown: Duration,
    ) -> Result<Self, InitError> {
        let mut tracker = Self::new(storage, clock, surface, cooldown);
        if let Err(err) = tracker.setup(true) {
            warn!("setup failed: {err}; retrying without saved data");
            tracker.notice(format!("Saved data could not be loaded ({err}). Starting fresh."));
            tracker
                .setup(false)
                .map_err(|err| InitError::Exhausted(err.to_string()))?;
        }
        info!(
            days = tracker.records.len(),
            daily_goal = tracker.settings.daily_goal,
            "tracker ready"
        );
        Ok(tracker)
    }

    fn setup(&mut self, load_data: bool) -> Result<(), StorageError> {
        self.records = RecordStore::new();
        self.settings = Settings::default();
        self.navigation.reset();
        self.renderer.invalidate();

        if load_data {
            let history = self.storage.load_history()?;
            let stored = self.storage.load_settings()?;
            self.records = RecordStore::from_history(history);
            self.settings = stored.unwrap_or_default();
        } else {
            // The next write would replace them anyway.
            self.storage.clear()?;
        }
        self.derive_today_state();
        self.refresh_view();
        Ok(())
    }

    /// Forces every cap to `MAX_GOAL` and lets today's record decide the goal.
    fn derive_today_state(&mut self) {
        self.records.normalize();
        if let Some(record) = self.records.get_date(self.clock.today()) {
            self.settings.daily_goal = record.goal;
        }
        self.settings = self.settings.clamped();
    }

    pub fn log_intake(&mut self, amount: u32) -> LogOutcome {
        if amount == 0 {
            return LogOutcome::Unchanged;
        }

        let current = self.today_glasses();
        let goal = self.settings.daily_goal;
        let max = self.settings.max_goal;
        let total = current.saturating_add(amount).min(max);
        if total == current {
            debug!(current, "log ignored at maximum");
            return LogOutcome::AlreadyAtMax;
        }

        self.write_today(total);
        self.persist_history();
        self.refresh_view();

        if total == max {
            LogOutcome::Perfect { glasses: total }
        } else if current < goal && total >= goal {
            LogOutcome::GoalReached { glasses: total }
        } else {
            LogOutcome::Added { glasses: total }
        }
    }

    pub fn reset_day(&mut self) {
        self.write_today(0);
        self.persist_history();
        self.refresh_view();
    }

    /// Changes the daily goal, clamped to the legal range. Today's record
    /// carries the new goal so a reload derives the same value.
    pub fn set_daily_goal(&mut self, goal: u32) -> u32 {
        self.settings.daily_goal = goal.clamp(MIN_GOAL, MAX_GOAL);
        let glasses = self.today_glasses();
        self.write_today(glasses);
        self.persist_history();
        self.persist_settings();
        self.renderer.invalidate();
        self.refresh_view();
        self.settings.daily_goal
    }

    pub fn switch_period(&mut self, period: Period) {
        self.navigation.switch_period(period);
        self.refresh_view();
    }

    pub fn navigate(&mut self, direction: Direction) -> NavOutcome {
        let outcome = self.navigation.navigate(direction, self.clock.now());
        match outcome {
            NavOutcome::Ignored => debug!("navigation dropped during cooldown"),
            _ => {
                self.refresh_view();
            }
        }
        outcome
    }

    /// Recomputes the current aggregate and renders it if it changed.
    pub fn refresh_view(&mut self) -> bool {
        let today = self.clock.today();
        let state = self.navigation.state();
        let aggregate = build_aggregate(&self.records, &self.settings, state.period, state.offset, today);
        self.renderer.render(ViewInput {
            aggregate: &aggregate,
            settings: &self.settings,
            navigation: state,
            buttons: self.navigation.buttons(),
            today,
        })
    }

    pub fn export(&self) -> ExportDocument {
        build_export(
            self.records.history(),
            self.settings,
            self.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
            APP_VERSION,
        )
    }

    /// Replaces all records from an exported document. A document that fails
    /// validation leaves every piece of state untouched.
    pub fn import_json(&mut self, raw: &str) -> Result<usize, ValidationError> {
        let payload = parse_import(raw)?;
        info!(
            days = payload.history.len(),
            app_version = %payload.app_version,
            "importing history"
        );

        self.records.replace_all(payload.history);
        if let Some(settings) = payload.settings {
            self.settings = settings;
        }
        self.derive_today_state();
        self.persist_history();
        self.persist_settings();
        self.renderer.invalidate();
        self.refresh_view();
        Ok(self.records.len())
    }

    /// Drops every record and restores default settings.
    pub fn clear_all(&mut self) {
        self.records.replace_all(History::new());
        self.settings = Settings::default();
        self.navigation.reset();
        if let Err(err) = self.storage.clear() {
            self.storage_failed("clear saved data", err);
        }
        self.refresh_view();
    }

    pub fn today(&self) -> TodayResponse {
        let date = self.clock.today();
        let glasses = self.today_glasses();
        let goal = self.settings.daily_goal;
        TodayResponse {
            date: date_key(date),
            glasses,
            goal,
            max_goal: self.settings.max_goal,
            progress_percent: (glasses * 100 / goal.max(1)).min(100),
            remaining: goal.saturating_sub(glasses),
            goal_met: glasses >= goal,
        }
    }

    pub fn today_glasses(&self) -> u32 {
        self.records
            .get_date(self.clock.today())
            .map_or(0, |record| record.glasses)
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn navigation(&self) -> NavigationState {
        self.navigation.state()
    }

    pub fn surface(&self) -> &R {
        self.renderer.surface()
    }

    /// Drains user-facing messages queued by recovered failures.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn write_today(&mut self, glasses: u32) {
        let today = self.clock.today();
        let timestamp = self.clock.now().timestamp_millis();
        self.records.upsert_today(
            today,
            glasses,
            self.settings.daily_goal,
            self.settings.max_goal,
            timestamp,
        );
    }

    fn persist_history(&mut self) {
        if let Err(err) = self.storage.save_history(self.records.history()) {
            self.storage_failed("save history", err);
        }
    }

    fn persist_settings(&mut self) {
        let saved_at = self.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true);
        if let Err(err) = self.storage.save_settings(&self.settings, saved_at) {
            self.storage_failed("save settings", err);
        }
    }

    // In-memory state is kept; the user is told the write did not land.
    fn storage_failed(&mut self, action: &str, err: StorageError) {
        warn!("failed to {action}: {err}");
        self.notice(format!("Could not {action}: {err}. Changes are kept until the app closes."));
    }

    fn notice(&mut self, message: String) {
        self.notices.push(message);
    }
}
