//! Terminal rendering of chat messages for the REPL binary.

pub mod outputformatter;

use serde_json::Value;

use crate::chart::build_daily_line;
use crate::chat::ChatMessage;
use crate::error::{AppError, AppResult};
use crate::interpreter::MetricKind;
use crate::storage::{ColumnInfo, HierarchyStore};

use self::outputformatter::render_table;

/// Render one chat message as terminal lines: the text, then the chart data
/// as a table, then any shortcut actions as a numbered list.
pub fn render_message(msg: &ChatMessage) -> Vec<String> {
    let mut out: Vec<String> = msg.content.lines().map(strip_markdown).collect();
    if let Some(chart) = &msg.chart {
        out.push(format!("[{}] {}", chart.name, chart.title));
        match chart_rows(&chart.spec) {
            Some((cols, rows)) if !rows.is_empty() => out.extend(render_table(&cols, &rows)),
            _ => out.push("(chart has no data)".to_string()),
        }
    }
    for (i, a) in msg.actions.iter().enumerate() {
        out.push(format!("  {}. {}", i + 1, a.label));
    }
    out
}

pub fn print_messages(msgs: &[ChatMessage]) {
    for m in msgs {
        for line in render_message(m) {
            println!("{}", line);
        }
    }
}

/// Render the data source columns as a table.
pub fn render_schema(cols: &[ColumnInfo]) -> Vec<String> {
    let header = vec!["column".to_string(), "dtype".to_string()];
    let rows: Vec<Vec<String>> = cols.iter().map(|c| vec![c.name.clone(), c.dtype.clone()]).collect();
    render_table(&header, &rows)
}

/// Daily totals of a metric (revenue when `metric_arg` is blank) as a line chart message.
pub fn daily_message(store: &HierarchyStore, metric_arg: &str) -> AppResult<ChatMessage> {
    let metric = if metric_arg.is_empty() {
        MetricKind::Revenue
    } else {
        metric_arg.parse::<MetricKind>().map_err(|_| {
            AppError::user("unknown_metric", format!("unknown metric '{}', expected revenue, sales or stock", metric_arg))
        })?
    };
    let points = store.daily_totals(metric)?;
    if points.is_empty() {
        return Ok(ChatMessage::text(format!("No {} data available.", metric)));
    }
    let chart = build_daily_line(&points, metric);
    Ok(ChatMessage::text(format!("Daily total {} over {} days:", metric.label(), points.len())).with_chart(chart))
}

// Fields of the inlined chart data shown in the table, in column order.
const TABLE_FIELDS: [&str; 4] = ["label", "date", "value", "share"];

// Chart data is inlined in the document under data.values.
fn chart_rows(spec: &Value) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let values = spec.get("data")?.get("values")?.as_array()?;
    let first = values.first()?;
    let cols: Vec<String> = TABLE_FIELDS.iter().filter(|f| first.get(**f).is_some()).map(|f| f.to_string()).collect();
    let rows = values
        .iter()
        .map(|v| {
            cols.iter()
                .map(|c| match v.get(c.as_str()) {
                    Some(Value::Number(n)) => n.as_f64().map(format_value).unwrap_or_default(),
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                })
                .collect()
        })
        .collect();
    Some((cols, rows))
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 { format!("{}", v as i64) } else { format!("{:.2}", v) }
}

fn strip_markdown(line: &str) -> String {
    line.replace("**", "")
}
