use once_cell::sync::Lazy;
use regex::Regex;

static RELATIVE_TOTAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^show the relative total\s+(revenue|sales|stock)\s+of hierarchy\s*([1-5])(?:\s+(.*))?$")
        .expect("valid regex")
});

/// Raw pieces of a question that follows the supported sentence shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch<'a> {
    pub metric_raw: &'a str,
    pub level_raw: &'a str,
    /// Trimmed text after the level number; empty when nothing follows.
    pub remainder_raw: &'a str,
}

/// Match the whole trimmed question against
/// "show the relative total {metric} of hierarchy {1-5} [time phrase]".
pub fn match_template(query: &str) -> Option<TemplateMatch<'_>> {
    let caps = RELATIVE_TOTAL_PATTERN.captures(query.trim())?;
    Some(TemplateMatch {
        metric_raw: caps.get(1)?.as_str(),
        level_raw: caps.get(2)?.as_str(),
        remainder_raw: caps.get(3).map(|m| m.as_str().trim()).unwrap_or(""),
    })
}
