//!
//! hierchat query interpreter
//! --------------------------
//! Turns a free-text chat question into a structured `(metric, level, start, end,
//! phrase)` tuple. The interpreter is a pure function of its input and a few
//! immutable lookup tables; it never performs I/O.
//!
//! Two stages:
//! - `template`: recognizes "show the relative total {metric} of hierarchy {level} ..."
//! - `time_range`: resolves the trailing time phrase through an ordered parser cascade.
//!
//! A time phrase is mandatory. Both failure causes are reported to callers as the
//! same `Interpretation::Unmatched`; the reason only appears in debug logs.

pub mod dates;
pub mod suggest;
pub mod template;
pub mod time_range;
pub mod types;

pub use suggest::{suggest_alternative, Suggestion};
pub use template::{match_template, TemplateMatch};
pub use time_range::{resolve, resolve_tagged, RangeKind};
pub use types::*;

use tracing::debug;

/// Interpret a chat question.
pub fn interpret(query: &str) -> Interpretation {
    match try_interpret(query) {
        Ok(parsed) => Interpretation::Matched(parsed),
        Err(e) => {
            debug!(target: "hierchat::interpreter", reason = %e, "question not supported");
            Interpretation::Unmatched
        }
    }
}

/// Staged interpretation that keeps the failure cause.
pub fn try_interpret(query: &str) -> Result<ParsedQuery, InterpretError> {
    let m = match_template(query).ok_or(InterpretError::UnrecognizedTemplate)?;
    let metric: MetricKind = m.metric_raw.parse()?;
    let level_num: u8 = m.level_raw.parse().map_err(|_| InterpretError::UnrecognizedTemplate)?;
    let level = HierarchyLevel::try_from(level_num)?;
    let range = resolve(m.remainder_raw).ok_or(InterpretError::UnrecognizedTimeRange)?;
    Ok(ParsedQuery::new(metric, level, range))
}
