use crate::models::{DayRecord, Settings};
use crate::records::{RecordStore, date_key};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

const MONTH_VIEW_WEEKS: usize = 4;
const YEAR_VIEW_MONTHS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Year,
}

impl Period {
    /// Rolling window length in days. Not aligned to calendar boundaries.
    pub fn window_days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Year => 365,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            "year" => Some(Period::Year),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

/// A day inside a window, either stored or synthesized.
#[derive(Debug, Clone)]
pub struct WindowDay {
    pub date: NaiveDate,
    pub record: DayRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub weekday: String,
    pub label: String,
    pub glasses: u32,
    pub goal: u32,
    pub goal_max: u32,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    pub week_number: u32,
    pub range_label: String,
    pub total_glasses: u32,
    /// Days with intake, floored to 1.
    pub days_with_data: u32,
    pub goal_met_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub total_glasses: u32,
    pub days_with_data: u32,
    pub goal_met_days: u32,
}

/// Read-only result of aggregating one `(period, offset)` window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "period", content = "items", rename_all = "lowercase")]
pub enum Aggregate {
    Week(Vec<DaySummary>),
    Month(Vec<WeekSummary>),
    Year(Vec<MonthSummary>),
}

impl Aggregate {
    pub fn len(&self) -> usize {
        match self {
            Aggregate::Week(days) => days.len(),
            Aggregate::Month(weeks) => weeks.len(),
            Aggregate::Year(months) => months.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Average cups over days with intake, one decimal.
    pub average: String,
    pub days_with_data: u32,
    pub goal_met_days: u32,
    /// Share of tracked days that met the goal, one decimal.
    pub goal_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRow {
    pub label: String,
    pub sub_label: String,
    pub value: String,
    pub goal_met: bool,
}

fn window_end(today: NaiveDate, period: Period, offset: i32) -> NaiveDate {
    today - Duration::days(i64::from(offset).abs() * period.window_days())
}

/// Days of the window, most recent first. Missing days use the current
/// settings, never a historical goal.
pub fn window_days(
    records: &RecordStore,
    settings: &Settings,
    period: Period,
    offset: i32,
    today: NaiveDate,
) -> Vec<WindowDay> {
    let end = window_end(today, period, offset);
    (0..period.window_days())
        .map(|back| {
            let date = end - Duration::days(back);
            let record = records
                .get_date(date)
                .cloned()
                .unwrap_or_else(|| DayRecord::empty(date_key(date), settings));
            WindowDay { date, record }
        })
        .collect()
}

pub fn build_aggregate(
    records: &RecordStore,
    settings: &Settings,
    period: Period,
    offset: i32,
    today: NaiveDate,
) -> Aggregate {
    let days = window_days(records, settings, period, offset, today);
    match period {
        Period::Week => Aggregate::Week(week_view(&days, today, offset)),
        Period::Month => Aggregate::Month(month_view(&days)),
        Period::Year => Aggregate::Year(year_view(&days)),
    }
}

fn week_view(days: &[WindowDay], today: NaiveDate, offset: i32) -> Vec<DaySummary> {
    days.iter()
        .take(7)
        .map(|day| DaySummary {
            date: date_key(day.date),
            weekday: day.date.format("%a").to_string(),
            label: short_label(day.date),
            glasses: day.record.glasses,
            goal: day.record.goal,
            goal_max: day.record.goal_max,
            is_today: offset == 0 && day.date == today,
        })
        .collect()
}

fn month_view(days: &[WindowDay]) -> Vec<WeekSummary> {
    days.chunks(7)
        .take(MONTH_VIEW_WEEKS)
        .enumerate()
        .map(|(index, chunk)| {
            let newest = chunk[0].date;
            let oldest = chunk[chunk.len() - 1].date;
            let tracked = chunk.iter().filter(|day| day.record.glasses > 0).count() as u32;
            WeekSummary {
                week_number: index as u32 + 1,
                range_label: format!("{} - {}", short_label(oldest), short_label(newest)),
                total_glasses: chunk.iter().map(|day| day.record.glasses).sum(),
                days_with_data: tracked.max(1),
                goal_met_days: chunk.iter().filter(|day| day.record.goal_met()).count() as u32,
            }
        })
        .collect()
}

fn year_view(days: &[WindowDay]) -> Vec<MonthSummary> {
    let mut months: Vec<MonthSummary> = Vec::new();
    for day in days.iter().filter(|day| day.record.glasses > 0) {
        let (year, month) = (day.date.year(), day.date.month());
        let position = match months
            .iter()
            .position(|summary| summary.year == year && summary.month == month)
        {
            Some(position) => position,
            None => {
                months.push(MonthSummary {
                    year,
                    month,
                    label: day.date.format("%b %Y").to_string(),
                    total_glasses: 0,
                    days_with_data: 0,
                    goal_met_days: 0,
                });
                months.len() - 1
            }
        };

        let summary = &mut months[position];
        summary.total_glasses += day.record.glasses;
        summary.days_with_data += 1;
        if day.record.goal_met() {
            summary.goal_met_days += 1;
        }
    }
    months.truncate(YEAR_VIEW_MONTHS);
    months
}

/// `numerator / denominator` with one decimal, "0.0" for an empty denominator.
pub fn format_ratio(numerator: f64, denominator: f64) -> String {
    if denominator <= 0.0 {
        return "0.0".to_string();
    }
    format!("{:.1}", numerator / denominator)
}

pub fn summarize(aggregate: &Aggregate) -> SummaryStats {
    // Month weeks without intake carry a floored day count; leave them out.
    let (total, tracked, met) = match aggregate {
        Aggregate::Week(days) => days
            .iter()
            .filter(|day| day.glasses > 0)
            .fold((0, 0, 0), |(total, tracked, met), day| {
                (total + day.glasses, tracked + 1, met + u32::from(day.glasses >= day.goal))
            }),
        Aggregate::Month(weeks) => weeks
            .iter()
            .filter(|week| week.total_glasses > 0)
            .fold((0, 0, 0), |(total, tracked, met), week| {
                (total + week.total_glasses, tracked + week.days_with_data, met + week.goal_met_days)
            }),
        Aggregate::Year(months) => months.iter().fold((0, 0, 0), |(total, tracked, met), month| {
            (total + month.total_glasses, tracked + month.days_with_data, met + month.goal_met_days)
        }),
    };

    SummaryStats {
        average: format_ratio(f64::from(total), f64::from(tracked)),
        days_with_data: tracked,
        goal_met_days: met,
        goal_rate: format_ratio(f64::from(met) * 100.0, f64::from(tracked)),
    }
}

/// Label for the whole window, oldest day first.
pub fn range_label(period: Period, offset: i32, today: NaiveDate) -> String {
    let newest = window_end(today, period, offset);
    let oldest = newest - Duration::days(period.window_days() - 1);
    format!(
        "{} - {}",
        oldest.format("%b %-d, %Y"),
        newest.format("%b %-d, %Y")
    )
}

pub fn render_rows(aggregate: &Aggregate, settings: &Settings) -> Vec<RenderRow> {
    let average_row = |label: String, sub_label: String, total: u32, days: u32| {
        let average = if days == 0 { 0.0 } else { f64::from(total) / f64::from(days) };
        RenderRow {
            label,
            sub_label,
            value: format!("{} avg", format_ratio(f64::from(total), f64::from(days))),
            goal_met: total > 0 && average >= f64::from(settings.daily_goal),
        }
    };

    match aggregate {
        Aggregate::Week(days) => days
            .iter()
            .map(|day| RenderRow {
                label: if day.is_today { "Today".to_string() } else { day.weekday.clone() },
                sub_label: day.label.clone(),
                value: format!("{}/{}", day.glasses, day.goal),
                goal_met: day.glasses >= day.goal,
            })
            .collect(),
        Aggregate::Month(weeks) => weeks
            .iter()
            .map(|week| {
                average_row(
                    format!("Week {}", week.week_number),
                    week.range_label.clone(),
                    week.total_glasses,
                    week.days_with_data,
                )
            })
            .collect(),
        Aggregate::Year(months) => months
            .iter()
            .map(|month| {
                average_row(
                    month.label.clone(),
                    format!("{} days tracked", month.days_with_data),
                    month.total_glasses,
                    month.days_with_data,
                )
            })
            .collect(),
    }
}

fn short_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
