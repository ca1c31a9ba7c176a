//! Next-page extraction from `Link` header values.
//!
//! A header value is a comma-separated list of `<uri>; rel="..."` entries and
//! a response may carry several such values.

use url::{Origin, Url};

const NEXT_RELATION: &str = "next";

/// Finds the `rel="next"` target across all link values.
///
/// Absolute targets are reduced to path and query unless `source_origin`
/// names a different origin, in which case the full URI is kept.
pub fn next_page_uri<S: AsRef<str>>(link_values: &[S], source_origin: Option<&Origin>) -> Option<String> {
    link_values
        .iter()
        .flat_map(|value| split_entries(value.as_ref()))
        .find_map(next_target)
        .map(|target| relativize(target, source_origin))
}

/// Splits on commas that are not inside `<...>`.
fn split_entries(value: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut in_target = false;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match c {
            '<' => in_target = true,
            '>' => in_target = false,
            ',' if !in_target => {
                entries.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&value[start..]);
    entries
}

fn next_target(entry: &str) -> Option<&str> {
    let (target, params) = entry.trim().split_once(';')?;
    let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;

    let is_next = params.split(';').any(|param| {
        let Some((name, value)) = param.split_once('=') else {
            return false;
        };
        name.trim().eq_ignore_ascii_case("rel")
            && value
                .trim()
                .trim_matches('"')
                .split_whitespace()
                .any(|rel| rel.eq_ignore_ascii_case(NEXT_RELATION))
    });

    is_next.then_some(target)
}

fn relativize(target: &str, source_origin: Option<&Origin>) -> String {
    let Ok(url) = Url::parse(target) else {
        // Already relative
        return target.to_string();
    };

    if let Some(origin) = source_origin {
        if *origin != url.origin() {
            return url.to_string();
        }
    }

    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
