use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static LD_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("ld+json regex")
});

/// Find the first `application/ld+json` script block in raw markup and
/// parse its content as JSON. Missing block or unparseable content both
/// mean "no structured data available" — a valid outcome, not an
/// error. Only the first block is considered; later ones are ignored
/// even when the first fails to parse.
pub fn locate_structured_data(html: &str) -> Option<Value> {
    let raw = LD_JSON_RE.captures(html)?.get(1)?.as_str();
    serde_json::from_str(raw).ok()
}
