use crate::color::ColorMap;
use crate::data::model::ListingDataset;
use crate::data::prepare::{self, ChartKind, RenderDecision};

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A user-facing message attached to a UI section.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.  Each widget event maps to
/// exactly one preparer call; drawing only reads the stored decisions.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<ListingDataset>,

    /// Designated colour/group column (the `type` column, when present).
    pub color_column: Option<String>,

    /// Outcome of the colour-grouping designation, shown in the side panel.
    pub grouping_notice: Option<Notice>,

    /// Colour per group label, shared by all charts.
    pub color_map: Option<ColorMap>,

    /// Latest decision per chart request.
    pub histogram: Option<RenderDecision>,
    pub scatter: Option<RenderDecision>,
    pub bar_count: Option<RenderDecision>,

    /// Persistent bar-chart toggle.
    pub bar_count_enabled: bool,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            color_column: None,
            grouping_notice: None,
            color_map: None,
            histogram: None,
            scatter: None,
            bar_count: None,
            bar_count_enabled: false,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: designate colour grouping, rebuild the
    /// colour map, clear stale decisions, re-evaluate the bar toggle.
    pub fn set_dataset(&mut self, dataset: ListingDataset) {
        self.color_column = prepare::designate_color_grouping(&dataset);
        self.grouping_notice = Some(match &self.color_column {
            Some(_) => Notice::info("Charts will be colored by vehicle type."),
            None => Notice::warning("Column 'type' not found. Charts will not be colored."),
        });

        self.color_map = self.color_column.as_deref().map(|col| {
            ColorMap::from_labels(
                col,
                dataset
                    .records
                    .iter()
                    .map(|rec| prepare::group_label(rec.get(col))),
            )
        });
        if let Some(cm) = &self.color_map {
            log::info!(
                "Color grouping by '{}' ({} labels)",
                cm.column,
                cm.legend_entries().len()
            );
        }

        self.histogram = None;
        self.scatter = None;
        self.dataset = Some(dataset);
        self.refresh_bar_count();
        self.status_message = None;
        self.loading = false;
    }

    /// "Build histogram" button.
    pub fn build_histogram(&mut self) {
        self.histogram = self.request(ChartKind::Histogram);
    }

    /// "Build scatter plot" button.
    pub fn build_scatter(&mut self) {
        self.scatter = self.request(ChartKind::Scatter);
    }

    /// Bar-chart checkbox.  The dataset is immutable after ingest, so
    /// re-preparing on flip (and on load) covers every page-state change.
    pub fn set_bar_count_enabled(&mut self, enabled: bool) {
        self.bar_count_enabled = enabled;
        self.refresh_bar_count();
    }

    fn refresh_bar_count(&mut self) {
        self.bar_count = if self.bar_count_enabled {
            self.request(ChartKind::BarCount)
        } else {
            None
        };
    }

    fn request(&self, kind: ChartKind) -> Option<RenderDecision> {
        let dataset = self.dataset.as_ref()?;
        let decision = prepare::prepare(kind, dataset, self.color_column.as_deref());
        match &decision {
            RenderDecision::Ready(p) => {
                log::info!("{kind:?}: prepared {} records", p.records.len());
            }
            RenderDecision::Skipped(reason) => {
                log::warn!("{kind:?}: skipped ({reason})");
            }
        }
        Some(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Record};

    fn tiny_dataset(with_type: bool) -> ListingDataset {
        let mut columns = vec!["odometer".to_string()];
        if with_type {
            columns.push("type".to_string());
        }
        let mut rec = Record::new();
        rec.insert("odometer".into(), CellValue::Integer(50000));
        if with_type {
            rec.insert("type".into(), CellValue::String("suv".into()));
        }
        ListingDataset::new(columns, vec![rec])
    }

    #[test]
    fn ingest_designates_grouping_and_notice() {
        let mut state = AppState::default();
        state.set_dataset(tiny_dataset(true));

        assert_eq!(state.color_column.as_deref(), Some("type"));
        let notice = state.grouping_notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert!(state.color_map.is_some());
    }

    #[test]
    fn ingest_without_type_column_warns() {
        let mut state = AppState::default();
        state.set_dataset(tiny_dataset(false));

        assert_eq!(state.color_column, None);
        let notice = state.grouping_notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(state.color_map.is_none());
    }

    #[test]
    fn bar_toggle_drives_the_decision() {
        let mut state = AppState::default();
        state.set_dataset(tiny_dataset(true));
        assert!(state.bar_count.is_none());

        state.set_bar_count_enabled(true);
        assert!(matches!(state.bar_count, Some(RenderDecision::Ready(_))));

        state.set_bar_count_enabled(false);
        assert!(state.bar_count.is_none());
    }

    #[test]
    fn new_dataset_clears_stale_decisions() {
        let mut state = AppState::default();
        state.set_dataset(tiny_dataset(true));
        state.build_histogram();
        assert!(state.histogram.is_some());

        state.set_dataset(tiny_dataset(false));
        assert!(state.histogram.is_none());
        assert!(state.scatter.is_none());
    }
}
