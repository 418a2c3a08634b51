use crate::models::{DayRecord, History, MAX_GOAL, MIN_GOAL};
use chrono::NaiveDate;

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Date key to day record. Records are never removed one at a time;
/// only `replace_all` drops data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    days: History,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_history(days: History) -> Self {
        Self { days }
    }

    pub fn get(&self, key: &str) -> Option<&DayRecord> {
        self.days.get(key)
    }

    pub fn get_date(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date_key(date))
    }

    /// Overwrites the record for `today` with a fresh timestamp.
    pub fn upsert_today(&mut self, today: NaiveDate, glasses: u32, goal: u32, goal_max: u32, timestamp: i64) {
        let key = date_key(today);
        self.days.insert(
            key.clone(),
            DayRecord {
                glasses,
                goal,
                goal_max,
                date: key,
                timestamp,
            },
        );
    }

    /// Swaps in a whole new set of records. Callers validate beforehand.
    pub fn replace_all(&mut self, days: History) {
        self.days = days;
    }

    /// Applies load-time invariants: every cap becomes `MAX_GOAL`, goals are
    /// pulled into range and glasses never exceed the cap.
    pub fn normalize(&mut self) {
        for (key, record) in self.days.iter_mut() {
            record.goal_max = MAX_GOAL;
            record.goal = record.goal.clamp(MIN_GOAL, MAX_GOAL);
            record.glasses = record.glasses.min(MAX_GOAL);
            if record.date.is_empty() {
                record.date = key.clone();
            }
        }
    }

    pub fn history(&self) -> &History {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
