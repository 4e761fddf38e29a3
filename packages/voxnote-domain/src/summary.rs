//! Segmentation of free-text model output into discrete summary points, and cleanup of the
//! category tag the model proposes for them.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a list-marker prefix at the start of a line: `-`, `*`, a bullet glyph, or a
/// numbered item such as `1.` or `3)`.
static LIST_MARKER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+").expect("List marker regex is valid."));

/// Splits a raw model response into summary points.
///
/// Layered heuristic: lines carrying a list marker win; if that yields one segment or fewer,
/// blank-line-delimited paragraphs are used instead; a non-empty text that still produced
/// nothing becomes a single segment. An empty vec means the response was unusable — callers
/// decide whether that is fatal.
pub fn split_points(raw: &str) -> Vec<String> {
	let cleaned = raw.trim();

	if cleaned.is_empty() {
		return Vec::new();
	}

	let marked = cleaned
		.lines()
		.filter_map(|line| {
			let found = LIST_MARKER.find(line)?;

			Some(line[found.end()..].trim().to_string())
		})
		.filter(|segment| !segment.is_empty())
		.collect::<Vec<_>>();

	if marked.len() > 1 {
		return marked;
	}

	let paragraphs = cleaned
		.split("\n\n")
		.map(str::trim)
		.filter(|paragraph| !paragraph.is_empty())
		.map(ToString::to_string)
		.collect::<Vec<_>>();

	if !paragraphs.is_empty() {
		return paragraphs;
	}

	vec![cleaned.to_string()]
}

/// Strips the decoration models tend to wrap a short answer in: surrounding whitespace,
/// quotes, and trailing periods.
pub fn clean_tag(raw: &str) -> String {
	raw.trim().trim_matches(|c: char| matches!(c, '"' | '\'' | '.') || c.is_whitespace()).to_string()
}
