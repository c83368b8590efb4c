//! Treemap chart specification.
//!
//! Charts are rendered client-side; we emit a Vega-Lite v5 document with the
//! laid-out tiles inlined as data. Each tile is a `rect` mark spanning
//! `x..x2`, `y..y2` on a fixed `[0, CANVAS]` domain, coloured by value.

use serde::Serialize;
use serde_json::{json, Value};

use crate::interpreter::dates::format_display_date;
use crate::interpreter::{HierarchyLevel, MetricKind};
use crate::storage::DailyTotal;
use crate::treemap::{TreemapTile, CANVAS};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const WIDTH: u32 = 600;
const HEIGHT: u32 = 500;

/// A named, renderable chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub name: String,
    pub title: String,
    pub spec: Value,
}

pub fn chart_name(level: HierarchyLevel, metric: MetricKind) -> String {
    format!("hierarchy{}_{}_treemap", level, metric)
}

pub fn chart_title(level: HierarchyLevel, metric: MetricKind) -> String {
    format!("Relative Total {} by Hierarchy {}", metric.label(), level)
}

/// Build the chart for a laid-out treemap. Callers must not pass an empty tile list.
pub fn build(tiles: &[TreemapTile], level: HierarchyLevel, metric: MetricKind) -> ChartSpec {
    let title = chart_title(level, metric);
    let level_title = format!("Hierarchy {}", level);
    let values: Vec<Value> = tiles
        .iter()
        .map(|t| {
            json!({
                "label": t.label,
                "value": t.value,
                "share": format!("{:.0}%", t.share * 100.0),
                "x": t.x, "y": t.y, "x2": t.x2, "y2": t.y2
            })
        })
        .collect();
    let spec = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": { "text": title, "fontSize": 24, "anchor": "start", "fontWeight": "bold" },
        "width": WIDTH,
        "height": HEIGHT,
        "data": { "values": values },
        "mark": "rect",
        "encoding": {
            "x": { "field": "x", "type": "quantitative", "scale": { "domain": [0.0, CANVAS] }, "axis": null },
            "y": { "field": "y", "type": "quantitative", "scale": { "domain": [0.0, CANVAS] }, "axis": null },
            "x2": { "field": "x2" },
            "y2": { "field": "y2" },
            "color": { "field": "value", "type": "quantitative", "title": metric.label() },
            "tooltip": [
                { "field": "label", "type": "nominal", "title": level_title },
                { "field": "value", "type": "quantitative", "title": metric.label(), "format": ",.0f" },
                { "field": "share", "type": "nominal", "title": "Share" }
            ]
        }
    });
    ChartSpec { name: chart_name(level, metric), title, spec }
}

/// Line chart of a metric's daily totals, one point per day.
pub fn build_daily_line(points: &[DailyTotal], metric: MetricKind) -> ChartSpec {
    let title = format!("Total {} per Day", metric.label());
    let values: Vec<Value> = points
        .iter()
        .map(|p| json!({ "day": p.day.format("%Y-%m-%d").to_string(), "date": format_display_date(p.day), "value": p.value }))
        .collect();
    let spec = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": title,
        "width": 700,
        "height": 400,
        "data": { "values": values },
        "mark": { "type": "line", "point": true },
        "encoding": {
            "x": { "field": "day", "type": "temporal", "title": "Date" },
            "y": { "field": "value", "type": "quantitative", "title": format!("Total {}", metric.label()) },
            "tooltip": [
                { "field": "date", "type": "nominal", "title": "Date" },
                { "field": "value", "type": "quantitative", "title": metric.label(), "format": ",.0f" }
            ]
        }
    });
    ChartSpec { name: format!("daily_{}_line", metric), title, spec }
}
