/// Data layer: core types, loading, and chart preparation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ListingDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ ListingDataset │  Vec<Record>, ordered columns
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ prepare   │  chart request → RenderDecision
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod prepare;

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::model::CellValue;
    use super::prepare::{self, RenderDecision};
    use super::loader;

    /// End-to-end: a raw CSV with missing and malformed cells flows through
    /// the loader and every preparer.
    #[test]
    fn csv_to_charts_end_to_end() {
        let csv = "price,model_year,make,model,type,odometer\n\
                   9400,2011,bmw,x5,suv,145000\n\
                   25500,2018,ford,f-150,pickup,\n\
                   5500,2013,hyundai,sonata,sedan,110000\n\
                   1500,2003,ford,f-150,,abc\n";
        let path = std::env::temp_dir().join(format!(
            "carscope-pipeline-{}.csv",
            std::process::id()
        ));
        std::fs::File::create(&path)
            .unwrap()
            .write_all(csv.as_bytes())
            .unwrap();

        let dataset = loader::load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(dataset.len(), 4);
        let color = prepare::designate_color_grouping(&dataset);
        assert_eq!(color.as_deref(), Some("type"));

        // Histogram: the empty and the "abc" odometer rows are dropped.
        let RenderDecision::Ready(hist) = prepare::prepare_histogram(&dataset, color.as_deref())
        else {
            panic!("histogram should be ready");
        };
        assert_eq!(hist.records.len(), 2);
        assert_eq!(
            hist.records[0].get("odometer"),
            Some(&CellValue::Float(145000.0))
        );

        // Scatter: same two rows survive (every price parses), and all three
        // hover columns are present in the file.
        let RenderDecision::Ready(scatter) = prepare::prepare_scatter(&dataset, color.as_deref())
        else {
            panic!("scatter should be ready");
        };
        assert_eq!(scatter.records.len(), 2);
        assert_eq!(scatter.hover_columns, vec!["model_year", "model", "make"]);

        // Bar count: every label counted once, missing type → "Unknown",
        // equal counts keep first-seen order.
        let RenderDecision::Ready(bar) = prepare::prepare_bar_count(&dataset, color.as_deref())
        else {
            panic!("bar count should be ready");
        };
        let labels: Vec<String> = bar
            .records
            .iter()
            .map(|r| r.get("type_name").unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["suv", "pickup", "sedan", "Unknown"]);
        let total: f64 = bar
            .records
            .iter()
            .filter_map(|r| r.get("count").and_then(CellValue::as_f64))
            .sum();
        assert_eq!(total as usize, dataset.len());
        assert_eq!(bar.color_column.as_deref(), Some("type_name"));
    }
}
