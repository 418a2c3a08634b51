use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_GOAL: u32 = 1;
pub const MAX_GOAL: u32 = 10;
pub const DEFAULT_GOAL: u32 = 8;

/// Upper bound accepted for a day's `glasses` in an imported document.
pub const IMPORT_MAX_GLASSES: f64 = 20.0;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One calendar day of logged intake, keyed by its ISO date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub glasses: u32,
    #[serde(default = "default_goal")]
    pub goal: u32,
    #[serde(default = "max_goal")]
    pub goal_max: u32,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl DayRecord {
    /// Zero-intake record for a day that was never logged.
    pub fn empty(date: impl Into<String>, settings: &Settings) -> Self {
        Self {
            glasses: 0,
            goal: settings.daily_goal,
            goal_max: settings.max_goal,
            date: date.into(),
            timestamp: 0,
        }
    }

    pub fn goal_met(&self) -> bool {
        self.glasses >= self.goal
    }
}

fn default_goal() -> u32 {
    DEFAULT_GOAL
}

fn max_goal() -> u32 {
    MAX_GOAL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub daily_goal: u32,
    pub max_goal: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal: DEFAULT_GOAL,
            max_goal: MAX_GOAL,
        }
    }
}

impl Settings {
    /// Forces the cap to `MAX_GOAL` and pulls the goal into `[MIN_GOAL, MAX_GOAL]`.
    pub fn clamped(self) -> Self {
        Self {
            daily_goal: self.daily_goal.clamp(MIN_GOAL, MAX_GOAL),
            max_goal: MAX_GOAL,
        }
    }
}

/// Settings blob as persisted under the `settings` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    #[serde(default = "default_goal")]
    pub daily_goal: u32,
    #[serde(default = "max_goal")]
    pub max_goal: u32,
    #[serde(default)]
    pub last_saved: Option<String>,
}

pub type History = BTreeMap<String, DayRecord>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub historical_data: History,
    pub settings: Settings,
    pub export_date: String,
    pub app_version: String,
}

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub amount: u32,
}

#[derive(Debug, Deserialize)]
pub struct QuickAddQuery {
    pub amount: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodRequest {
    pub period: String,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub direction: i32,
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub daily_goal: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub glasses: u32,
    pub goal: u32,
    pub max_goal: u32,
    pub progress_percent: u32,
    pub remaining: u32,
    pub goal_met: bool,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub outcome: String,
    pub message: String,
    pub today: TodayResponse,
    pub notices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub period: String,
    pub offset: i32,
    pub frame: crate::render::Frame,
    pub notices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub days: usize,
    pub today: TodayResponse,
    pub notices: Vec<String>,
}
