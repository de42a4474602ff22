use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::model::CellValue;
use crate::data::prepare::{group_label, Prepared, RenderDecision};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;
const HISTOGRAM_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Chart sections (central panel)
// ---------------------------------------------------------------------------

/// Render one section per stored chart decision.
pub fn chart_sections(ui: &mut Ui, state: &AppState) {
    let color_map = state.color_map.as_ref();

    if let Some(decision) = &state.histogram {
        section(ui, "Odometer distribution", decision, |ui, prepared| {
            histogram_chart(ui, prepared, color_map)
        });
    }
    if let Some(decision) = &state.scatter {
        section(ui, "Price vs odometer", decision, |ui, prepared| {
            scatter_chart(ui, prepared, color_map)
        });
    }
    if let Some(decision) = &state.bar_count {
        section(ui, "Vehicle count by type", decision, |ui, prepared| {
            bar_count_chart(ui, prepared, color_map)
        });
    }
}

/// Renderer boundary: a `Skipped` decision shows its reason as a warning; a
/// failed chart construction is downgraded to an error label, and the rest
/// of the page keeps working.
fn section<F>(ui: &mut Ui, title: &str, decision: &RenderDecision, draw: F)
where
    F: FnOnce(&mut Ui, &Prepared) -> Result<()>,
{
    ui.heading(title);
    match decision {
        RenderDecision::Skipped(reason) => {
            ui.label(RichText::new(format!("⚠ {reason}")).color(Color32::YELLOW));
        }
        RenderDecision::Ready(prepared) => {
            if let Err(e) = draw(ui, prepared) {
                log::error!("{title}: {e:#}");
                ui.label(
                    RichText::new(format!("Could not draw chart: {e:#}")).color(Color32::RED),
                );
            }
        }
    }
    ui.separator();
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Stacked per-group histogram of `odometer` over shared bins.
fn histogram_chart(ui: &mut Ui, prepared: &Prepared, color_map: Option<&ColorMap>) -> Result<()> {
    let mut values: Vec<(f64, String)> = Vec::with_capacity(prepared.records.len());
    for rec in &prepared.records {
        let v = rec
            .get("odometer")
            .and_then(CellValue::as_f64)
            .context("odometer cell is not numeric")?;
        let label = match &prepared.color_column {
            Some(col) => group_label(rec.get(col)),
            None => String::new(),
        };
        values.push((v, label));
    }

    let min = values.iter().map(|(v, _)| *v).fold(f64::INFINITY, f64::min);
    let max = values
        .iter()
        .map(|(v, _)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        bail!("odometer range is not finite");
    }
    let range = max - min;
    let width = if range == 0.0 {
        1.0
    } else {
        range / HISTOGRAM_BINS as f64
    };

    // Per-group bin counts, groups in first-seen order.
    let mut group_order: Vec<String> = Vec::new();
    let mut bins_by_group: HashMap<String, Vec<f64>> = HashMap::new();
    for (v, label) in &values {
        let idx = (((v - min) / width).floor() as usize).min(HISTOGRAM_BINS - 1);
        let counts = bins_by_group.entry(label.clone()).or_insert_with(|| {
            group_order.push(label.clone());
            vec![0.0; HISTOGRAM_BINS]
        });
        counts[idx] += 1.0;
    }

    let mut charts: Vec<BarChart> = Vec::new();
    for label in &group_order {
        let counts = &bins_by_group[label];
        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0.0)
            .map(|(i, c)| Bar::new(min + (i as f64 + 0.5) * width, *c).width(width))
            .collect();

        let mut chart = BarChart::new(bars).name(if label.is_empty() {
            "odometer"
        } else {
            label.as_str()
        });
        if let Some(cm) = color_map {
            if !label.is_empty() {
                chart = chart.color(cm.color_for(label));
            }
        }
        // Stack each group on top of the ones already placed.
        let below: Vec<&BarChart> = charts.iter().collect();
        chart = chart.stack_on(&below);
        charts.push(chart);
    }

    Plot::new("histogram_plot")
        .legend(Legend::default())
        .x_axis_label("odometer")
        .y_axis_label("count")
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });

    Ok(())
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

struct ScatterPoint {
    x: f64,
    y: f64,
    hover: Vec<(String, String)>,
}

/// Per-group point clouds of `price` over `odometer`, with a nearest-point
/// tooltip carrying the auxiliary hover columns.
fn scatter_chart(ui: &mut Ui, prepared: &Prepared, color_map: Option<&ColorMap>) -> Result<()> {
    let mut group_order: Vec<String> = Vec::new();
    let mut points_by_group: HashMap<String, Vec<[f64; 2]>> = HashMap::new();
    let mut all_points: Vec<ScatterPoint> = Vec::with_capacity(prepared.records.len());

    for rec in &prepared.records {
        let x = rec
            .get("odometer")
            .and_then(CellValue::as_f64)
            .context("odometer cell is not numeric")?;
        let y = rec
            .get("price")
            .and_then(CellValue::as_f64)
            .context("price cell is not numeric")?;

        let label = match &prepared.color_column {
            Some(col) => group_label(rec.get(col)),
            None => String::new(),
        };
        let group = points_by_group.entry(label.clone()).or_insert_with(|| {
            group_order.push(label);
            Vec::new()
        });
        group.push([x, y]);

        let hover = prepared
            .hover_columns
            .iter()
            .filter_map(|col| rec.get(col).map(|v| (col.clone(), v.to_string())))
            .collect();
        all_points.push(ScatterPoint { x, y, hover });
    }

    let response = Plot::new("scatter_plot")
        .legend(Legend::default())
        .x_axis_label("odometer")
        .y_axis_label("price")
        .height(CHART_HEIGHT)
        .show(ui, |plot_ui| {
            for label in &group_order {
                let pts: PlotPoints = points_by_group[label].clone().into();
                let mut points = Points::new(pts).radius(2.0).name(if label.is_empty() {
                    "listings"
                } else {
                    label.as_str()
                });
                if let Some(cm) = color_map {
                    if !label.is_empty() {
                        points = points.color(cm.color_for(label));
                    }
                }
                plot_ui.points(points);
            }
            hover_text(plot_ui, &all_points)
        });

    if let Some(text) = response.inner {
        response.response.on_hover_text(text);
    }

    Ok(())
}

/// Tooltip text for the point nearest the pointer, if one is close enough
/// (distance measured relative to the visible plot bounds).
fn hover_text(plot_ui: &egui_plot::PlotUi, points: &[ScatterPoint]) -> Option<String> {
    const MAX_RELATIVE_DIST_SQ: f64 = 4e-4;

    let pointer = plot_ui.pointer_coordinate()?;
    let bounds = plot_ui.plot_bounds();
    let (w, h) = (bounds.width(), bounds.height());
    if w <= 0.0 || h <= 0.0 {
        return None;
    }

    let mut best: Option<(f64, &ScatterPoint)> = None;
    for p in points {
        let dx = (p.x - pointer.x) / w;
        let dy = (p.y - pointer.y) / h;
        let d = dx * dx + dy * dy;
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, p));
        }
    }

    let (d, p) = best?;
    if d > MAX_RELATIVE_DIST_SQ {
        return None;
    }

    let mut text = format!("odometer: {}\nprice: {}", p.x, p.y);
    for (col, val) in &p.hover {
        text.push_str(&format!("\n{col}: {val}"));
    }
    Some(text)
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// One bar per group label from the prepared counts dataset; the x axis is
/// labeled with the categories.
fn bar_count_chart(ui: &mut Ui, prepared: &Prepared, color_map: Option<&ColorMap>) -> Result<()> {
    let name_col = prepared
        .color_column
        .as_deref()
        .context("counts dataset has no label column")?;

    let mut rows: Vec<(String, f64)> = Vec::with_capacity(prepared.records.len());
    for rec in &prepared.records {
        let label = rec
            .get(name_col)
            .with_context(|| format!("counts record missing '{name_col}'"))?
            .to_string();
        let count = rec
            .get("count")
            .and_then(CellValue::as_f64)
            .context("count cell is not numeric")?;
        rows.push((label, count));
    }

    let labels: Vec<String> = rows.iter().map(|(l, _)| l.clone()).collect();
    let charts: Vec<BarChart> = rows
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            let bar = Bar::new(i as f64, *count).width(0.7);
            let mut chart = BarChart::new(vec![bar]).name(label);
            if let Some(cm) = color_map {
                chart = chart.color(cm.color_for(label));
            }
            chart
        })
        .collect();

    Plot::new("bar_count_plot")
        .legend(Legend::default())
        .y_axis_label("count")
        .height(CHART_HEIGHT)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < labels.len() {
                labels[i as usize].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });

    Ok(())
}
