//! Export document construction and import validation.
//!
//! Imports are all-or-nothing: `parse_import` either yields a complete set
//! of records or a `ValidationError` naming the first offending date key.

use crate::errors::ValidationError;
use crate::models::{
    DEFAULT_GOAL, DayRecord, ExportDocument, History, IMPORT_MAX_GLASSES, MAX_GOAL, Settings,
};
use serde_json::Value;

/// Validated import content, not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPayload {
    pub history: History,
    pub settings: Option<Settings>,
    pub app_version: String,
}

pub fn build_export(history: &History, settings: Settings, export_date: String, app_version: &str) -> ExportDocument {
    ExportDocument {
        historical_data: history.clone(),
        settings,
        export_date,
        app_version: app_version.to_string(),
    }
}

/// Checks the overall shape and every entry's `glasses` before anything is built.
pub fn validate(document: &Value) -> Result<(), ValidationError> {
    let object = document.as_object().ok_or(ValidationError::NotAnObject)?;

    let history = object
        .get("historicalData")
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingHistoricalData)?;

    if !object.get("appVersion").is_some_and(Value::is_string) {
        return Err(ValidationError::MissingAppVersion);
    }

    for (key, entry) in history {
        let glasses = entry
            .get("glasses")
            .and_then(Value::as_f64)
            .ok_or_else(|| invalid(key, "glasses must be a number"))?;
        if !(0.0..=IMPORT_MAX_GLASSES).contains(&glasses) {
            return Err(invalid(key, format!("glasses {glasses} outside 0..={IMPORT_MAX_GLASSES}")));
        }
    }

    Ok(())
}

/// Parses raw import text into a payload, rejecting the whole document on any error.
pub fn parse_import(raw: &str) -> Result<ImportPayload, ValidationError> {
    let document: Value =
        serde_json::from_str(raw).map_err(|err| ValidationError::InvalidJson(err.to_string()))?;
    validate(&document)?;

    let mut history = History::new();
    if let Some(entries) = document.get("historicalData").and_then(Value::as_object) {
        for (key, entry) in entries {
            history.insert(key.clone(), record_from(key, entry));
        }
    }

    let settings = document.get("settings").and_then(|settings| {
        let daily_goal = settings.get("dailyGoal").and_then(Value::as_u64)?;
        Some(Settings {
            daily_goal: u32::try_from(daily_goal).unwrap_or(MAX_GOAL),
            max_goal: MAX_GOAL,
        })
    });

    Ok(ImportPayload {
        history,
        settings,
        app_version: document
            .get("appVersion")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

// Fractional glasses are truncated; range was checked by `validate`.
fn record_from(key: &str, entry: &Value) -> DayRecord {
    let number = |field: &str| entry.get(field).and_then(Value::as_f64);
    DayRecord {
        glasses: number("glasses").unwrap_or_default() as u32,
        goal: number("goal").map_or(DEFAULT_GOAL, |goal| goal as u32),
        goal_max: MAX_GOAL,
        date: entry
            .get("date")
            .and_then(Value::as_str)
            .unwrap_or(key)
            .to_string(),
        timestamp: entry.get("timestamp").and_then(Value::as_i64).unwrap_or_default(),
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidEntry {
        key: key.to_string(),
        reason: reason.into(),
    }
}
