use std::collections::HashMap;

use thiserror::Error;

use super::model::{CellValue, ListingDataset, Record};

// ---------------------------------------------------------------------------
// Chart requests and render decisions
// ---------------------------------------------------------------------------

/// Column used for grouping and colouring when present in the dataset.
pub const GROUP_COLUMN: &str = "type";

/// Label substituted for missing values in the group column.
pub const UNKNOWN_LABEL: &str = "Unknown";

const HISTOGRAM_COLUMN: &str = "odometer";
const SCATTER_X_COLUMN: &str = "odometer";
const SCATTER_Y_COLUMN: &str = "price";

/// Hover-only columns attached to the scatter plot, in display order.
const HOVER_COLUMNS: [&str; 3] = ["model_year", "model", "make"];

/// The three chart requests the UI can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Histogram,
    Scatter,
    BarCount,
}

/// Why a chart could not be prepared. The `Display` strings are shown to the
/// user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// A required axis column is absent from the dataset.
    #[error("missing column: {0}")]
    MissingColumn(&'static str),
    /// One or both of a pair of required axis columns is absent.
    #[error("missing column(s): {0} and/or {1}")]
    MissingColumnPair(&'static str, &'static str),
    /// The column exists but no cell survives numeric coercion.
    #[error("no valid numeric {0} values")]
    NoValidValues(&'static str),
    /// No record has valid numbers in both axis columns.
    #[error("no valid numeric {0}/{1} pairs")]
    NoValidPairs(&'static str, &'static str),
    /// No group column was designated, so counts cannot be formed.
    #[error("no grouping column available")]
    NoGroupingColumn,
}

/// Outcome of a chart preparation: plot this, or explain why not.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderDecision {
    Ready(Prepared),
    Skipped(SkipReason),
}

/// A cleaned dataset ready for the renderer. Every cell of a plotted axis
/// column is guaranteed to be `CellValue::Float`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub records: Vec<Record>,
    pub color_column: Option<String>,
    /// Extra columns surfaced on hover (scatter only; empty otherwise).
    pub hover_columns: Vec<String>,
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Lenient numeric coercion: values that fail to parse become missing, never
/// an error. NaN counts as missing so it can never reach an axis.
pub fn coerce_numeric(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Integer(i) => Some(*i as f64),
        CellValue::Float(v) if !v.is_nan() => Some(*v),
        CellValue::Float(_) => None,
        CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
        CellValue::Bool(_) | CellValue::Null => None,
    }
}

/// The label a cell contributes to the group column: missing cells become
/// [`UNKNOWN_LABEL`], everything else its string representation.
pub fn group_label(cell: Option<&CellValue>) -> String {
    match cell {
        Some(v) if !v.is_null() => v.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    }
}

/// Keep only records where every listed column coerces, rewriting those
/// cells to `Float`. The input is never mutated.
fn coerce_and_drop(records: &[Record], columns: &[&'static str]) -> Vec<Record> {
    records
        .iter()
        .filter_map(|rec| {
            let mut coerced = Vec::with_capacity(columns.len());
            for col in columns {
                let value = rec.get(*col).and_then(coerce_numeric)?;
                coerced.push((*col, value));
            }
            let mut out = rec.clone();
            for (col, value) in coerced {
                out.insert(col.to_string(), CellValue::Float(value));
            }
            Some(out)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Preparer operations
// ---------------------------------------------------------------------------

/// Designate the colour/group column for all charts: the `type` column when
/// it exists, otherwise none. The caller owns the user-facing notice.
pub fn designate_color_grouping(dataset: &ListingDataset) -> Option<String> {
    dataset
        .has_column(GROUP_COLUMN)
        .then(|| GROUP_COLUMN.to_string())
}

/// Dispatch a chart request to its preparer.
pub fn prepare(
    kind: ChartKind,
    dataset: &ListingDataset,
    color_column: Option<&str>,
) -> RenderDecision {
    match kind {
        ChartKind::Histogram => prepare_histogram(dataset, color_column),
        ChartKind::Scatter => prepare_scatter(dataset, color_column),
        ChartKind::BarCount => prepare_bar_count(dataset, color_column),
    }
}

/// Histogram of `odometer`: coerce, drop records without a value, refuse to
/// plot an empty column.
pub fn prepare_histogram(dataset: &ListingDataset, color_column: Option<&str>) -> RenderDecision {
    if !dataset.has_column(HISTOGRAM_COLUMN) {
        return RenderDecision::Skipped(SkipReason::MissingColumn(HISTOGRAM_COLUMN));
    }

    let records = coerce_and_drop(&dataset.records, &[HISTOGRAM_COLUMN]);
    if records.is_empty() {
        return RenderDecision::Skipped(SkipReason::NoValidValues(HISTOGRAM_COLUMN));
    }

    RenderDecision::Ready(Prepared {
        records,
        color_column: color_column.map(str::to_string),
        hover_columns: Vec::new(),
    })
}

/// Scatter of `odometer` vs `price`: a record is retained only when both
/// cells coerce.
pub fn prepare_scatter(dataset: &ListingDataset, color_column: Option<&str>) -> RenderDecision {
    if !dataset.has_column(SCATTER_X_COLUMN) || !dataset.has_column(SCATTER_Y_COLUMN) {
        return RenderDecision::Skipped(SkipReason::MissingColumnPair(
            SCATTER_X_COLUMN,
            SCATTER_Y_COLUMN,
        ));
    }

    let records = coerce_and_drop(&dataset.records, &[SCATTER_X_COLUMN, SCATTER_Y_COLUMN]);
    if records.is_empty() {
        return RenderDecision::Skipped(SkipReason::NoValidPairs(
            SCATTER_X_COLUMN,
            SCATTER_Y_COLUMN,
        ));
    }

    let hover_columns = HOVER_COLUMNS
        .iter()
        .filter(|c| dataset.has_column(c))
        .map(|c| c.to_string())
        .collect();

    RenderDecision::Ready(Prepared {
        records,
        color_column: color_column.map(str::to_string),
        hover_columns,
    })
}

/// Counts per group label. Output is a fresh two-column dataset
/// `<group>_name` / `count`, descending by count; equal counts keep
/// first-encountered label order.
pub fn prepare_bar_count(dataset: &ListingDataset, color_column: Option<&str>) -> RenderDecision {
    let Some(group) = color_column else {
        return RenderDecision::Skipped(SkipReason::NoGroupingColumn);
    };

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for rec in &dataset.records {
        let label = group_label(rec.get(group));
        if !counts.contains_key(&label) {
            order.push(label.clone());
        }
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut rows: Vec<(String, usize)> = order
        .into_iter()
        .map(|label| {
            let n = counts[&label];
            (label, n)
        })
        .collect();
    // Stable sort: ties stay in first-seen order.
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    let name_column = format!("{group}_name");
    let records: Vec<Record> = rows
        .into_iter()
        .map(|(label, n)| {
            Record::from([
                (name_column.clone(), CellValue::String(label)),
                ("count".to_string(), CellValue::Integer(n as i64)),
            ])
        })
        .collect();

    RenderDecision::Ready(Prepared {
        records,
        color_column: Some(name_column),
        hover_columns: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    /// Column-oriented fixture builder: each column is (name, cells).
    fn dataset(columns: &[(&str, Vec<CellValue>)]) -> ListingDataset {
        let n = columns.iter().map(|(_, c)| c.len()).max().unwrap_or(0);
        let mut records = vec![Record::new(); n];
        for (name, cells) in columns {
            for (i, cell) in cells.iter().enumerate() {
                records[i].insert(name.to_string(), cell.clone());
            }
        }
        ListingDataset::new(
            columns.iter().map(|(name, _)| name.to_string()).collect(),
            records,
        )
    }

    fn ready(decision: RenderDecision) -> Prepared {
        match decision {
            RenderDecision::Ready(p) => p,
            RenderDecision::Skipped(r) => panic!("expected Ready, got Skipped({r})"),
        }
    }

    fn skip_reason(decision: RenderDecision) -> SkipReason {
        match decision {
            RenderDecision::Skipped(r) => r,
            RenderDecision::Ready(_) => panic!("expected Skipped, got Ready"),
        }
    }

    // -- coercion --

    #[test]
    fn coercion_is_lenient() {
        assert_eq!(coerce_numeric(&CellValue::Integer(50000)), Some(50000.0));
        assert_eq!(coerce_numeric(&CellValue::Float(1.5)), Some(1.5));
        assert_eq!(coerce_numeric(&CellValue::Float(f64::NAN)), None);
        assert_eq!(coerce_numeric(&s("12000")), Some(12000.0));
        assert_eq!(coerce_numeric(&s(" 42 ")), Some(42.0));
        assert_eq!(coerce_numeric(&s("")), None);
        assert_eq!(coerce_numeric(&s("abc")), None);
        assert_eq!(coerce_numeric(&CellValue::Bool(true)), None);
        assert_eq!(coerce_numeric(&CellValue::Null), None);
    }

    // -- colour grouping --

    #[test]
    fn grouping_designated_only_when_type_exists() {
        let with = dataset(&[("type", vec![s("suv")])]);
        assert_eq!(designate_color_grouping(&with), Some("type".to_string()));

        let without = dataset(&[("price", vec![s("100")])]);
        assert_eq!(designate_color_grouping(&without), None);
    }

    // -- histogram --

    #[test]
    fn histogram_skips_when_column_missing() {
        let ds = dataset(&[("price", vec![s("100"), s("200")])]);
        let reason = skip_reason(prepare_histogram(&ds, None));
        assert_eq!(reason, SkipReason::MissingColumn("odometer"));
        assert_eq!(reason.to_string(), "missing column: odometer");
    }

    #[test]
    fn histogram_skips_when_nothing_parses() {
        let ds = dataset(&[("odometer", vec![s("abc"), s(""), CellValue::Null])]);
        let reason = skip_reason(prepare_histogram(&ds, None));
        assert_eq!(reason.to_string(), "no valid numeric odometer values");
    }

    #[test]
    fn histogram_keeps_exactly_the_parseable_records() {
        let ds = dataset(&[
            ("odometer", vec![s("50000"), s("abc"), s(""), s("12000")]),
            ("type", vec![s("suv"), s("sedan"), s("suv"), CellValue::Null]),
        ]);
        let prepared = ready(prepare_histogram(&ds, Some("type")));

        assert_eq!(prepared.records.len(), 2);
        assert_eq!(
            prepared.records[0].get("odometer"),
            Some(&CellValue::Float(50000.0))
        );
        assert_eq!(
            prepared.records[1].get("odometer"),
            Some(&CellValue::Float(12000.0))
        );
        // Non-axis columns ride along unfiltered.
        assert_eq!(prepared.records[0].get("type"), Some(&s("suv")));
        assert_eq!(prepared.color_column.as_deref(), Some("type"));

        // The source dataset is untouched.
        assert_eq!(ds.records[0].get("odometer"), Some(&s("50000")));

        // Idempotent: preparing the cleaned output again changes nothing.
        let again = ListingDataset::new(ds.column_names.clone(), prepared.records.clone());
        let twice = ready(prepare_histogram(&again, Some("type")));
        assert_eq!(twice.records, prepared.records);
    }

    // -- scatter --

    #[test]
    fn scatter_skips_when_either_column_missing() {
        let ds = dataset(&[("odometer", vec![s("10")])]);
        let reason = skip_reason(prepare_scatter(&ds, None));
        assert_eq!(
            reason.to_string(),
            "missing column(s): odometer and/or price"
        );
    }

    #[test]
    fn scatter_retains_only_full_pairs() {
        let ds = dataset(&[
            ("odometer", vec![s("10"), s("20")]),
            ("price", vec![s("100"), s("abc")]),
        ]);
        let prepared = ready(prepare_scatter(&ds, None));

        assert_eq!(prepared.records.len(), 1);
        assert_eq!(
            prepared.records[0].get("odometer"),
            Some(&CellValue::Float(10.0))
        );
        assert_eq!(
            prepared.records[0].get("price"),
            Some(&CellValue::Float(100.0))
        );
    }

    #[test]
    fn scatter_retention_bounded_by_each_column() {
        // 3 parseable odometers, 2 parseable prices, 1 overlapping record.
        let ds = dataset(&[
            ("odometer", vec![s("1"), s("2"), s("3"), s("x")]),
            ("price", vec![s("9"), s("y"), s("z"), s("8")]),
        ]);
        let prepared = ready(prepare_scatter(&ds, None));
        assert_eq!(prepared.records.len(), 1);
    }

    #[test]
    fn scatter_skips_when_no_pair_survives() {
        let ds = dataset(&[
            ("odometer", vec![s("10"), s("x")]),
            ("price", vec![s("y"), s("100")]),
        ]);
        let reason = skip_reason(prepare_scatter(&ds, None));
        assert_eq!(reason.to_string(), "no valid numeric odometer/price pairs");
    }

    #[test]
    fn scatter_hover_columns_follow_fixed_order() {
        let ds = dataset(&[
            ("make", vec![s("ford")]),
            ("model", vec![s("f-150")]),
            ("odometer", vec![s("10")]),
            ("price", vec![s("100")]),
        ]);
        let prepared = ready(prepare_scatter(&ds, None));
        // model_year absent; the rest in the fixed order, not dataset order.
        assert_eq!(prepared.hover_columns, vec!["model", "make"]);
    }

    // -- bar count --

    #[test]
    fn bar_count_counts_labels_and_relabels_missing() {
        let ds = dataset(&[(
            "type",
            vec![s("suv"), CellValue::Null, s("suv")],
        )]);
        let prepared = ready(prepare_bar_count(&ds, Some("type")));

        assert_eq!(prepared.color_column.as_deref(), Some("type_name"));
        assert_eq!(prepared.records.len(), 2);
        assert_eq!(prepared.records[0].get("type_name"), Some(&s("suv")));
        assert_eq!(
            prepared.records[0].get("count"),
            Some(&CellValue::Integer(2))
        );
        assert_eq!(prepared.records[1].get("type_name"), Some(&s("Unknown")));
        assert_eq!(
            prepared.records[1].get("count"),
            Some(&CellValue::Integer(1))
        );

        // Counts sum back to the input record count.
        let total: i64 = prepared
            .records
            .iter()
            .filter_map(|r| r.get("count").and_then(CellValue::as_f64))
            .map(|v| v as i64)
            .sum();
        assert_eq!(total, ds.len() as i64);
    }

    #[test]
    fn bar_count_ties_keep_first_seen_order() {
        let ds = dataset(&[(
            "type",
            vec![s("coupe"), s("sedan"), s("sedan"), s("coupe"), s("van")],
        )]);
        let prepared = ready(prepare_bar_count(&ds, Some("type")));

        let labels: Vec<String> = prepared
            .records
            .iter()
            .map(|r| r.get("type_name").unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["coupe", "sedan", "van"]);
    }

    #[test]
    fn bar_count_skips_without_designation() {
        let ds = dataset(&[("price", vec![s("100")])]);
        let reason = skip_reason(prepare_bar_count(&ds, None));
        assert_eq!(reason, SkipReason::NoGroupingColumn);
        assert_eq!(reason.to_string(), "no grouping column available");
    }

    // -- dispatch --

    #[test]
    fn dispatch_routes_to_the_matching_preparer() {
        let ds = dataset(&[("odometer", vec![s("10")])]);
        assert!(matches!(
            prepare(ChartKind::Histogram, &ds, None),
            RenderDecision::Ready(_)
        ));
        assert!(matches!(
            prepare(ChartKind::Scatter, &ds, None),
            RenderDecision::Skipped(SkipReason::MissingColumnPair(_, _))
        ));
        assert!(matches!(
            prepare(ChartKind::BarCount, &ds, None),
            RenderDecision::Skipped(SkipReason::NoGroupingColumn)
        ));
    }
}
