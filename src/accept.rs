//! Lenient `Accept` header parsing and ranking
//!
//! Parsing is total: malformed ranges never fail, they degrade into
//! best-effort fields. A range with no `/` keeps its whole text as the
//! subtype, a range with a bad quality parameter keeps the default quality
//! of `1.0`, and an empty range produces an entry that simply matches
//! nothing. Callers relying on this behavior feed real-world headers through
//! unchanged, so the leniency is part of the contract rather than something
//! to tighten.

use crate::catalog::MediaPair;
use std::cmp::Ordering;

/// One parsed media range from an `Accept` header.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptEntry {
    /// The raw content type text, preserved exactly as sent (before any `+`)
    pub content_type: String,
    /// Text before the first `/`, empty when the range has no slash
    pub type_: String,
    /// Text after the first `/`, or the whole range when no slash is present
    pub subtype: String,
    /// Format suffix after the first `+`, when present
    pub format: Option<String>,
    /// Quality factor in `[0, 1]`, `1.0` unless a well-formed `q=` says otherwise
    pub quality: f32,
    /// Trailing parameter after the quality slot, parsed but unused
    pub extension: Option<String>,
}

impl AcceptEntry {
    /// The `(content type, format)` pair this entry offers for matching.
    pub fn to_media_pair(&self) -> MediaPair {
        MediaPair::new(self.content_type.clone(), self.format.clone())
    }
}

/// Parse a full `Accept` header value into entries, in input order.
///
/// All whitespace is stripped from the value first, so `"a, b"` and `"a,b"`
/// parse identically.
pub fn parse(header: &str) -> Vec<AcceptEntry> {
    let stripped: String = header.chars().filter(|c| !c.is_whitespace()).collect();
    stripped.split(',').map(parse_range).collect()
}

/// Sort entries by quality, highest first.
///
/// The sort is stable, so entries with equal quality keep their input order.
/// Ranking is advisory: the final selection still follows catalog
/// declaration order among all pairs the client accepts.
pub fn rank(mut entries: Vec<AcceptEntry>) -> Vec<AcceptEntry> {
    entries.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));
    entries
}

/// Parse one comma-separated media range.
fn parse_range(range: &str) -> AcceptEntry {
    let mut parts = range.splitn(3, ';');
    let full_type = parts.next().unwrap_or("");
    let second = parts.next();
    let third = parts.next();

    let (content_type, format) = match full_type.split_once('+') {
        Some((content_type, format)) => (content_type, Some(format.to_string())),
        None => (full_type, None),
    };

    let (type_, subtype) = match content_type.split_once('/') {
        Some((type_, subtype)) => (type_.to_string(), subtype.to_string()),
        None => (String::new(), content_type.to_string()),
    };

    // The second `;` slot is the quality candidate. When it does not have
    // the required shape it is carried as the extension instead, mirroring
    // positional slicing rather than semantic validation.
    let (quality, extension) = match second {
        Some(candidate) => match parse_quality(candidate) {
            Some(quality) => (quality, third),
            None => (1.0, Some(candidate)),
        },
        None => (1.0, None),
    };

    AcceptEntry {
        content_type: content_type.to_string(),
        type_,
        subtype,
        format,
        quality,
        extension: extension.map(str::to_string),
    }
}

/// Parse a `q=` parameter.
///
/// Accepts exactly `q=0.<digits>` or `q=1.<digits>` with a value no greater
/// than one. A bare `q=0` or `q=1` has no fractional part and does not
/// count, nor does anything out of range. Invalid values are ignored by the
/// caller and the quality stays at its default.
fn parse_quality(part: &str) -> Option<f32> {
    let value = part.strip_prefix("q=")?;
    let (integral, fraction) = value.split_once('.')?;
    if !matches!(integral, "0" | "1")
        || fraction.is_empty()
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let quality: f32 = value.parse().ok()?;
    (quality <= 1.0).then_some(quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_range() {
        let entries = parse("application/json");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content_type, "application/json");
        assert_eq!(entries[0].type_, "application");
        assert_eq!(entries[0].subtype, "json");
        assert_eq!(entries[0].format, None);
        assert_eq!(entries[0].quality, 1.0);
        assert_eq!(entries[0].extension, None);
    }

    #[test]
    fn test_parse_format_suffix() {
        let entries = parse("application/vnd.shop.Order+json");
        assert_eq!(entries[0].content_type, "application/vnd.shop.Order");
        assert_eq!(entries[0].subtype, "vnd.shop.Order");
        assert_eq!(entries[0].format.as_deref(), Some("json"));
    }

    #[test]
    fn test_parse_multiple_ranges_keep_input_order() {
        let entries = parse("vnd.shop.Order+json, vnd.shop.Order+xml, text/xml");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].format.as_deref(), Some("json"));
        assert_eq!(entries[1].format.as_deref(), Some("xml"));
        assert_eq!(entries[2].content_type, "text/xml");
    }

    #[test]
    fn test_parse_strips_all_whitespace() {
        let spaced = parse("text/xml, text/plain");
        let tight = parse("text/xml,text/plain");
        assert_eq!(spaced, tight);
    }

    #[test]
    fn test_parse_quality_requires_fraction() {
        let entries = parse("text/html;q=0.8");
        assert_eq!(entries[0].quality, 0.8);

        // No fractional part, quality stays at the default.
        let entries = parse("text/html;q=1");
        assert_eq!(entries[0].quality, 1.0);
        assert_eq!(entries[0].extension.as_deref(), Some("q=1"));

        let entries = parse("text/html;q=0");
        assert_eq!(entries[0].quality, 1.0);
    }

    #[test]
    fn test_parse_quality_rejects_out_of_range_and_garbage() {
        let entries = parse("text/html;q=1.5");
        assert_eq!(entries[0].quality, 1.0);

        let entries = parse("text/html;q=abc");
        assert_eq!(entries[0].quality, 1.0);

        let entries = parse("text/html;q=.5");
        assert_eq!(entries[0].quality, 1.0);

        let entries = parse("text/html;q=0.5x");
        assert_eq!(entries[0].quality, 1.0);

        let entries = parse("text/html;q=1.0");
        assert_eq!(entries[0].quality, 1.0);

        let entries = parse("text/html;q=1.000");
        assert_eq!(entries[0].quality, 1.0);
    }

    #[test]
    fn test_parse_extension_slot() {
        // Quality present, third slot is the extension.
        let entries = parse("text/html;q=0.8;level=1");
        assert_eq!(entries[0].quality, 0.8);
        assert_eq!(entries[0].extension.as_deref(), Some("level=1"));

        // No quality, the second slot is carried as the extension.
        let entries = parse("text/html;level=1");
        assert_eq!(entries[0].quality, 1.0);
        assert_eq!(entries[0].extension.as_deref(), Some("level=1"));
    }

    #[test]
    fn test_parse_malformed_ranges_degrade() {
        // No slash: the whole text lands in the subtype and the raw content
        // type is preserved for matching.
        let entries = parse("vnd.shop.Order");
        assert_eq!(entries[0].content_type, "vnd.shop.Order");
        assert_eq!(entries[0].type_, "");
        assert_eq!(entries[0].subtype, "vnd.shop.Order");

        // Leading slash: empty type.
        let entries = parse("/json");
        assert_eq!(entries[0].type_, "");
        assert_eq!(entries[0].subtype, "json");
        assert_eq!(entries[0].content_type, "/json");

        // Empty range still parses.
        let entries = parse("");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content_type, "");
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let ranked = rank(parse("text/html;q=0.5, text/xml, text/plain;q=0.5, text/csv"));

        assert_eq!(ranked[0].content_type, "text/xml");
        assert_eq!(ranked[1].content_type, "text/csv");
        assert_eq!(ranked[2].content_type, "text/html");
        assert_eq!(ranked[3].content_type, "text/plain");
    }

    #[test]
    fn test_to_media_pair_uses_raw_content_type() {
        let entries = parse("vnd.shop.Order+xml");
        let pair = entries[0].to_media_pair();
        assert_eq!(pair.content_type, "vnd.shop.Order");
        assert_eq!(pair.format.as_deref(), Some("xml"));
    }
}
