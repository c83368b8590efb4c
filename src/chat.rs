//!
//! hierchat conversation flow
//! --------------------------
//! Transport-independent handling of one chat turn. A transport (HTTP, REPL)
//! hands over the raw text and renders the returned messages in order.
//!
//! Flow for a supported question:
//! 1. interpret the question (unsupported questions get a single fixed reply),
//! 2. load per-member totals for the requested level, metric and period,
//! 3. lay the totals out as a treemap and build the chart,
//! 4. offer the same question for a neighbouring metric.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::chart::{self, ChartSpec};
use crate::error::AppResult;
use crate::interpreter::{dates::format_display_date, interpret, suggest_alternative, Interpretation, ParsedQuery};
use crate::storage::HierarchySource;
use crate::treemap::layout_totals;

pub const UNSUPPORTED_REPLY: &str = "This is not yet supported";

pub const WELCOME_TEXT: &str = "Welcome! Here are some example questions you can ask:";

/// Action name attached to the example-question shortcuts.
pub const SUGGESTED_QUESTION_ACTION: &str = "suggested_question";

pub const EXAMPLE_QUESTIONS: [&str; 3] = [
    "Show the relative total revenue of hierarchy 1 in 2019",
    "Which product had the highest sales in 2019?",
    "Compare stock levels between stores A and B",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatAction {
    pub name: String,
    pub label: String,
    pub query: String,
}

/// One outgoing chat message, optionally carrying a chart and shortcut actions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ChatAction>,
}

impl ChatMessage {
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self { content: content.into(), chart: None, actions: Vec::new() }
    }

    pub fn with_chart(mut self, chart: ChartSpec) -> Self {
        self.chart = Some(chart);
        self
    }

    pub fn with_actions(mut self, actions: Vec<ChatAction>) -> Self {
        self.actions = actions;
        self
    }
}

/// Answers chat questions against a hierarchy data source.
#[derive(Clone)]
pub struct ChatService {
    source: Arc<dyn HierarchySource>,
}

impl ChatService {
    pub fn new(source: Arc<dyn HierarchySource>) -> Self { Self { source } }

    /// Greeting with one shortcut per example question.
    pub fn welcome(&self) -> ChatMessage {
        let actions = EXAMPLE_QUESTIONS
            .iter()
            .map(|q| ChatAction { name: SUGGESTED_QUESTION_ACTION.to_string(), label: q.to_string(), query: q.to_string() })
            .collect();
        ChatMessage::text(WELCOME_TEXT).with_actions(actions)
    }

    /// A shortcut was clicked: echo the selection, then treat it like typed text.
    pub fn select_action(&self, query: &str) -> AppResult<Vec<ChatMessage>> {
        let mut out = vec![ChatMessage::text(format!("✅ You selected: **{}**", query))];
        out.extend(self.handle_message(query)?);
        Ok(out)
    }

    /// Handle one typed question.
    pub fn handle_message(&self, text: &str) -> AppResult<Vec<ChatMessage>> {
        match interpret(text) {
            Interpretation::Matched(parsed) => self.answer(&parsed),
            Interpretation::Unmatched => Ok(vec![ChatMessage::text(UNSUPPORTED_REPLY)]),
        }
    }

    fn answer(&self, q: &ParsedQuery) -> AppResult<Vec<ChatMessage>> {
        info!(target: "hierchat::chat", metric = %q.metric, level = %q.level, start = %q.start, end = %q.end, "answering treemap question");
        let mut out = vec![ChatMessage::text("**Step 1/3:** Obtaining the data from the hierarchy store.")];
        let totals = self.source.load(q.level, q.metric, q.start, q.end)?;
        if totals.is_empty() {
            out.push(ChatMessage::text(format!(
                "No data between {} and {}",
                format_display_date(q.start),
                format_display_date(q.end)
            )));
            return Ok(out);
        }

        out.push(ChatMessage::text("**Step 2/3:** Processing the data for the treemap layout."));
        let tiles = match layout_totals(&totals) {
            Ok(t) => t,
            Err(e) => {
                warn!(target: "hierchat::chat", error = %e, "treemap layout failed");
                out.push(ChatMessage::text(format!("Unable to build the treemap: {}", e.message())));
                return Ok(out);
            }
        };

        out.push(ChatMessage::text("**Step 3/3:** Creating the interactive treemap visualization."));
        let chart = chart::build(&tiles, q.level, q.metric);
        let range_suffix = if q.phrase.trim().is_empty() { String::new() } else { format!(" {}", q.phrase.trim()) };
        out.push(
            ChatMessage::text(format!(
                "Here is the treemap showing the relative total {} for hierarchy {}{}:",
                q.metric.label(),
                q.level,
                range_suffix
            ))
            .with_chart(chart),
        );
        out.push(ChatMessage::text(suggest_alternative(q).message));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::interpreter::{HierarchyLevel, MetricKind};
    use crate::storage::HierarchyTotal;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    type Call = (HierarchyLevel, MetricKind, NaiveDate, NaiveDate);

    struct FakeSource {
        totals: Vec<HierarchyTotal>,
        calls: Mutex<Vec<Call>>,
    }

    impl HierarchySource for FakeSource {
        fn load(&self, level: HierarchyLevel, metric: MetricKind, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<HierarchyTotal>> {
            self.calls.lock().unwrap().push((level, metric, start, end));
            Ok(self.totals.clone())
        }
    }

    struct FailingSource;

    impl HierarchySource for FailingSource {
        fn load(&self, _: HierarchyLevel, _: MetricKind, _: NaiveDate, _: NaiveDate) -> AppResult<Vec<HierarchyTotal>> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk unavailable").into())
        }
    }

    fn service(totals: Vec<HierarchyTotal>) -> (ChatService, Arc<FakeSource>) {
        let src = Arc::new(FakeSource { totals, calls: Mutex::new(Vec::new()) });
        (ChatService::new(src.clone()), src)
    }

    fn t(label: &str, value: f64) -> HierarchyTotal { HierarchyTotal { label: label.into(), value } }

    #[test]
    fn welcome_offers_examples() {
        let (svc, _) = service(vec![]);
        let w = svc.welcome();
        assert_eq!(w.content, WELCOME_TEXT);
        assert_eq!(w.actions.len(), 3);
        assert!(w.actions.iter().all(|a| a.name == SUGGESTED_QUESTION_ACTION && a.label == a.query));
    }

    #[test]
    fn unsupported_question_never_touches_the_source() {
        let (svc, src) = service(vec![t("a", 1.0)]);
        let out = svc.handle_message("What is the weather today?").unwrap();
        assert_eq!(out, vec![ChatMessage::text(UNSUPPORTED_REPLY)]);
        let out = svc.handle_message("Show the relative total revenue of hierarchy 1").unwrap();
        assert_eq!(out, vec![ChatMessage::text(UNSUPPORTED_REPLY)]);
        assert!(src.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn answered_question_walks_all_steps() {
        let (svc, src) = service(vec![t("H00", 30.0), t("H01", 10.0)]);
        let out = svc.handle_message("Show the relative total stock of hierarchy 3 in Q2 2021").unwrap();
        assert_eq!(out.len(), 5);
        assert!(out[0].content.starts_with("**Step 1/3:**"));
        assert!(out[1].content.starts_with("**Step 2/3:**"));
        assert!(out[2].content.starts_with("**Step 3/3:**"));
        assert_eq!(out[3].content, "Here is the treemap showing the relative total Stock for hierarchy 3 in Q2 2021:");
        assert_eq!(out[3].chart.as_ref().unwrap().name, "hierarchy3_stock_treemap");
        assert!(out[4].content.contains("'Show the relative total sales of hierarchy 3 in Q2 2021'"));

        let calls = src.calls.lock().unwrap();
        let (level, metric, start, end) = calls[0];
        assert_eq!(level.get(), 3);
        assert_eq!(metric, MetricKind::Stock);
        assert_eq!(start, NaiveDate::from_ymd_opt(2021, 4, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2021, 6, 30).unwrap());
    }

    #[test]
    fn empty_dataset_reports_window() {
        let (svc, _) = service(vec![]);
        let out = svc.handle_message("Show the relative total sales of hierarchy 2 between 05/03/2020 and 01-01-2020").unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].content, "No data between 01-01-2020 and 05-03-2020");
    }

    #[test]
    fn all_zero_totals_are_reported_not_raised() {
        let (svc, _) = service(vec![t("a", 0.0)]);
        let out = svc.handle_message("Show the relative total sales of hierarchy 2 in 2020").unwrap();
        assert!(out.last().unwrap().content.starts_with("Unable to build the treemap:"));
        assert!(out.iter().all(|m| m.chart.is_none()));
    }

    #[test]
    fn loader_errors_propagate() {
        let svc = ChatService::new(Arc::new(FailingSource));
        let err = svc.handle_message("Show the relative total sales of hierarchy 2 in 2020").unwrap_err();
        assert_eq!(err.http_status(), 503);
    }

    #[test]
    fn selecting_an_action_echoes_then_answers() {
        let (svc, _) = service(vec![]);
        let out = svc.select_action(EXAMPLE_QUESTIONS[1]).unwrap();
        assert_eq!(out[0].content, format!("✅ You selected: **{}**", EXAMPLE_QUESTIONS[1]));
        assert_eq!(out[1].content, UNSUPPORTED_REPLY);
    }
}
