use serde::Serialize;

use super::time_range::between_phrase;
use super::types::{MetricKind, ParsedQuery};

/// A neighbouring question using a different metric over the same level and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub metric: MetricKind,
    pub query: String,
    pub message: String,
}

pub fn suggest_alternative(parsed: &ParsedQuery) -> Suggestion {
    let alt = parsed.metric.alternative();
    let phrase = if parsed.phrase.trim().is_empty() {
        between_phrase(parsed.start, parsed.end)
    } else {
        parsed.phrase.clone()
    };
    let query = format!("Show the relative total {} of hierarchy {} {}", alt, parsed.level, phrase);
    let message = format!(
        "Instead of {}, I can also generate a treemap for {}. For example, asking '{}' also works.",
        parsed.metric, alt, query
    );
    Suggestion { metric: alt, query, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{try_interpret, HierarchyLevel};
    use chrono::NaiveDate;

    #[test]
    fn reuses_canonical_phrase() {
        let parsed = try_interpret("show the relative total revenue of hierarchy 2 in sep 2022").unwrap();
        let s = suggest_alternative(&parsed);
        assert_eq!(s.metric, MetricKind::Sales);
        assert_eq!(s.query, "Show the relative total sales of hierarchy 2 in September 2022");
        assert!(s.message.starts_with("Instead of revenue, I can also generate a treemap for sales."));
    }

    #[test]
    fn synthesizes_between_phrase_when_missing() {
        let parsed = ParsedQuery {
            metric: MetricKind::Sales,
            level: HierarchyLevel::new(4).unwrap(),
            start: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 3, 4).unwrap(),
            phrase: String::new(),
        };
        let s = suggest_alternative(&parsed);
        assert_eq!(s.metric, MetricKind::Stock);
        assert_eq!(s.query, "Show the relative total stock of hierarchy 4 between 02-01-2020 and 04-03-2020");
    }

    #[test]
    fn suggestion_is_itself_interpretable() {
        let parsed = try_interpret("Show the relative total stock of hierarchy 3 between 2021/06/30 and 2021/04/01").unwrap();
        let s = suggest_alternative(&parsed);
        let again = try_interpret(&s.query).unwrap();
        assert_eq!(again.metric, MetricKind::Sales);
        assert_eq!((again.start, again.end), (parsed.start, parsed.end));
    }
}
