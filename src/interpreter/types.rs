use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The quantity being aggregated and charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind { Revenue, Sales, Stock }

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Revenue, MetricKind::Sales, MetricKind::Stock];

    /// Canonical lowercase name, also the metric column in the source data.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Revenue => "revenue",
            MetricKind::Sales => "sales",
            MetricKind::Stock => "stock",
        }
    }

    /// Capitalized form used in titles and reply text.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Revenue => "Revenue",
            MetricKind::Sales => "Sales",
            MetricKind::Stock => "Stock",
        }
    }

    /// Neighbouring metric offered after an answer: anything but sales suggests sales,
    /// sales suggests stock.
    pub fn alternative(&self) -> MetricKind {
        match self {
            MetricKind::Sales => MetricKind::Stock,
            _ => MetricKind::Sales,
        }
    }
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for MetricKind {
    type Err = InterpretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        MetricKind::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or(InterpretError::UnrecognizedTemplate)
    }
}

/// One of the five nested hierarchy groupings, 1 being the coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HierarchyLevel(u8);

impl HierarchyLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn get(&self) -> u8 { self.0 }

    /// Column in the source data holding this level's identifiers.
    pub fn column_name(&self) -> String { format!("hierarchy{}_id", self.0) }
}

impl TryFrom<u8> for HierarchyLevel {
    type Error = InterpretError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HierarchyLevel::new(value).ok_or(InterpretError::UnrecognizedTemplate)
    }
}

impl From<HierarchyLevel> for u8 {
    fn from(level: HierarchyLevel) -> u8 { level.0 }
}

impl Display for HierarchyLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// A resolved calendar period. `start <= end` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Canonical rendering, never an echo of the user's spelling.
    pub phrase: String,
}

/// Successful interpretation of a chat question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub metric: MetricKind,
    pub level: HierarchyLevel,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub phrase: String,
}

impl ParsedQuery {
    pub fn new(metric: MetricKind, level: HierarchyLevel, range: TimeRange) -> Self {
        Self { metric, level, start: range.start, end: range.end, phrase: range.phrase }
    }
}

/// Result handed to callers. Both failure causes collapse into `Unmatched`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Matched(ParsedQuery),
    Unmatched,
}

/// Internal failure taxonomy; only surfaced through debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InterpretError {
    #[error("input does not follow 'show the relative total <metric> of hierarchy <1-5> <time phrase>'")]
    UnrecognizedTemplate,
    #[error("metric and level recognized but no time range could be resolved")]
    UnrecognizedTimeRange,
}
