use crate::errors::ConfigurationError;
use crate::models::Settings;
use crate::navigation::{NavButtons, NavigationState};
use crate::stats::{self, Aggregate, RenderRow, SummaryStats};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Serialize)]
struct ViewKey<'a> {
    navigation: NavigationState,
    buttons: NavButtons,
    aggregate: &'a Aggregate,
}

/// Canonical, order-sensitive serialization of a view. Covers the window
/// position and button state as well as the aggregate, since two windows
/// can aggregate to the same (empty) list.
pub fn fingerprint(aggregate: &Aggregate, navigation: NavigationState, buttons: NavButtons) -> String {
    let key = ViewKey {
        navigation,
        buttons,
        aggregate,
    };
    // Views hold only strings, integers and bools, so this cannot fail.
    serde_json::to_string(&key).unwrap_or_default()
}

/// Presentation collaborator. Each piece can report its target missing,
/// in which case only that piece is skipped.
pub trait RenderSurface: Send {
    fn paint_rows(&mut self, rows: &[RenderRow]) -> Result<(), ConfigurationError>;
    fn paint_summary(&mut self, summary: &SummaryStats) -> Result<(), ConfigurationError>;
    fn paint_range(&mut self, label: &str) -> Result<(), ConfigurationError>;
    fn paint_navigation(&mut self, buttons: NavButtons) -> Result<(), ConfigurationError>;
}

/// Everything the page needs for the current view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    pub rows: Vec<RenderRow>,
    pub summary: Option<SummaryStats>,
    pub range_label: String,
    pub buttons: Option<NavButtons>,
    pub version: u64,
}

/// Surface that keeps the last painted frame for the HTTP layer to serve.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    frame: Frame,
    paints: u64,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Number of list repaints so far.
    pub fn paints(&self) -> u64 {
        self.paints
    }
}

impl RenderSurface for FrameBuffer {
    fn paint_rows(&mut self, rows: &[RenderRow]) -> Result<(), ConfigurationError> {
        self.paints += 1;
        self.frame.version = self.paints;
        self.frame.rows = rows.to_vec();
        Ok(())
    }

    fn paint_summary(&mut self, summary: &SummaryStats) -> Result<(), ConfigurationError> {
        self.frame.summary = Some(summary.clone());
        Ok(())
    }

    fn paint_range(&mut self, label: &str) -> Result<(), ConfigurationError> {
        self.frame.range_label = label.to_string();
        Ok(())
    }

    fn paint_navigation(&mut self, buttons: NavButtons) -> Result<(), ConfigurationError> {
        self.frame.buttons = Some(buttons);
        Ok(())
    }
}

/// Input for one render pass.
pub struct ViewInput<'a> {
    pub aggregate: &'a Aggregate,
    pub settings: &'a Settings,
    pub navigation: NavigationState,
    pub buttons: NavButtons,
    pub today: NaiveDate,
}

pub struct ChangeDetectingRenderer<R: RenderSurface> {
    surface: R,
    last_fingerprint: Option<String>,
}

impl<R: RenderSurface> ChangeDetectingRenderer<R> {
    pub fn new(surface: R) -> Self {
        Self {
            surface,
            last_fingerprint: None,
        }
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Paints the view unless its fingerprint matches the last painted one.
    /// Returns whether a paint happened.
    pub fn render(&mut self, input: ViewInput<'_>) -> bool {
        let print = fingerprint(input.aggregate, input.navigation, input.buttons);
        if self.last_fingerprint.as_deref() == Some(print.as_str()) {
            debug!(period = input.navigation.period.as_str(), "view unchanged, skipping render");
            return false;
        }

        let rows = stats::render_rows(input.aggregate, input.settings);
        let summary = stats::summarize(input.aggregate);
        let range = stats::range_label(input.navigation.period, input.navigation.offset, input.today);

        report(self.surface.paint_rows(&rows));
        report(self.surface.paint_summary(&summary));
        report(self.surface.paint_range(&range));
        report(self.surface.paint_navigation(input.buttons));

        self.last_fingerprint = Some(print);
        true
    }

    /// Forces the next `render` to paint.
    pub fn invalidate(&mut self) {
        self.last_fingerprint = None;
    }
}

fn report(result: Result<(), ConfigurationError>) {
    if let Err(err) = result {
        warn!("skipping render piece: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordStore;
    use crate::stats::{Period, build_aggregate};

    #[derive(Default)]
    struct NoSummary {
        rows: usize,
        ranges: Vec<String>,
    }

    impl RenderSurface for NoSummary {
        fn paint_rows(&mut self, rows: &[RenderRow]) -> Result<(), ConfigurationError> {
            self.rows = rows.len();
            Ok(())
        }

        fn paint_summary(&mut self, _summary: &SummaryStats) -> Result<(), ConfigurationError> {
            Err(ConfigurationError::MissingTarget("summary"))
        }

        fn paint_range(&mut self, label: &str) -> Result<(), ConfigurationError> {
            self.ranges.push(label.to_string());
            Ok(())
        }

        fn paint_navigation(&mut self, _buttons: NavButtons) -> Result<(), ConfigurationError> {
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 4).unwrap()
    }

    fn input<'a>(aggregate: &'a Aggregate, settings: &'a Settings) -> ViewInput<'a> {
        ViewInput {
            aggregate,
            settings,
            navigation: NavigationState::default(),
            buttons: NavButtons {
                previous_enabled: true,
                next_enabled: false,
            },
            today: today(),
        }
    }

    #[test]
    fn identical_aggregate_is_not_repainted() {
        let settings = Settings::default();
        let mut store = RecordStore::new();
        let mut renderer = ChangeDetectingRenderer::new(FrameBuffer::new());

        let first = build_aggregate(&store, &settings, Period::Week, 0, today());
        assert!(renderer.render(input(&first, &settings)));
        let again = build_aggregate(&store, &settings, Period::Week, 0, today());
        assert!(!renderer.render(input(&again, &settings)));
        assert_eq!(renderer.surface().paints(), 1);

        store.upsert_today(today(), 1, 8, 10, 0);
        let changed = build_aggregate(&store, &settings, Period::Week, 0, today());
        assert!(renderer.render(input(&changed, &settings)));
        assert_eq!(renderer.surface().paints(), 2);
        assert_eq!(renderer.surface().frame().rows[0].value, "1/8");
    }

    #[test]
    fn missing_target_skips_only_that_piece() {
        let settings = Settings::default();
        let aggregate = build_aggregate(&RecordStore::new(), &settings, Period::Week, 0, today());
        let mut renderer = ChangeDetectingRenderer::new(NoSummary::default());

        assert!(renderer.render(input(&aggregate, &settings)));
        assert_eq!(renderer.surface().rows, 7);
        assert_eq!(renderer.surface().ranges, vec!["Jun 28, 2026 - Jul 4, 2026".to_string()]);
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let settings = Settings::default();
        let mut store = RecordStore::new();
        store.upsert_today(today(), 2, 8, 10, 0);
        let week = build_aggregate(&store, &settings, Period::Week, 0, today());
        let Aggregate::Week(mut days) = week.clone() else {
            panic!("expected week view");
        };
        days.reverse();
        let navigation = NavigationState::default();
        let buttons = NavButtons {
            previous_enabled: true,
            next_enabled: false,
        };
        assert_ne!(
            fingerprint(&week, navigation, buttons),
            fingerprint(&Aggregate::Week(days), navigation, buttons)
        );
    }

    #[test]
    fn equal_aggregates_at_different_offsets_repaint_range_and_buttons() {
        let settings = Settings::default();
        let store = RecordStore::new();
        let mut renderer = ChangeDetectingRenderer::new(FrameBuffer::new());

        let current = build_aggregate(&store, &settings, Period::Year, 0, today());
        let older = build_aggregate(&store, &settings, Period::Year, -1, today());
        assert_eq!(current, older);

        assert!(renderer.render(ViewInput {
            navigation: NavigationState { period: Period::Year, offset: 0 },
            ..input(&current, &settings)
        }));
        assert!(renderer.render(ViewInput {
            navigation: NavigationState { period: Period::Year, offset: -1 },
            buttons: NavButtons {
                previous_enabled: true,
                next_enabled: true,
            },
            ..input(&older, &settings)
        }));

        let frame = renderer.surface().frame();
        assert_eq!(frame.range_label, "Jul 5, 2024 - Jul 4, 2025");
        assert_eq!(frame.buttons.map(|b| b.next_enabled), Some(true));
    }
}
