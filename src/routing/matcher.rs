//! Segment matching logic.
//!
//! # Responsibilities
//! - Split a navigable path into segments
//! - Match one segment against a literal or a named capture
//! - Combine segment matchers with AND semantics (all positions must match)
//!
//! # Design Decisions
//! - Literal matching is case-insensitive unless `sensitive` is set
//! - A single trailing slash is ignored unless `strict` is set
//! - A capture matches exactly one non-empty segment
//! - No regex to guarantee O(n) matching

use crate::config::schema::MatchingConfig;
use crate::routing::params::Params;

/// Options controlling how literals and trailing slashes are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare literal segments case-sensitively.
    pub sensitive: bool,
    /// Treat `/a/` and `/a` as different paths.
    pub strict: bool,
}

impl From<&MatchingConfig> for MatchOptions {
    fn from(config: &MatchingConfig) -> Self {
        Self {
            sensitive: config.sensitive,
            strict: config.strict,
        }
    }
}

/// Trait for matching a split path against a condition.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns the captured parameters if every segment matches.
    fn match_segments(&self, segments: &[&str], options: MatchOptions) -> Option<Params>;
}

/// One position of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentMatcher {
    /// Matches a segment equal to the text.
    Literal(String),
    /// Matches any non-empty segment and binds it to the name.
    Capture(String),
}

impl SegmentMatcher {
    /// Match a raw (still percent-encoded) path segment.
    ///
    /// Returns `None` on mismatch, `Some(None)` for a literal hit and
    /// `Some(Some(value))` for a capture with its decoded value.
    pub fn match_segment(&self, raw: &str, options: MatchOptions) -> Option<Option<String>> {
        let decoded = urlencoding::decode(raw).ok()?;
        match self {
            SegmentMatcher::Literal(text) => {
                let equal = if options.sensitive {
                    *text == decoded
                } else {
                    text.to_lowercase() == decoded.to_lowercase()
                };
                equal.then_some(None)
            }
            SegmentMatcher::Capture(_) => {
                if decoded.is_empty() {
                    None
                } else {
                    Some(Some(decoded.into_owned()))
                }
            }
        }
    }

    pub fn is_capture(&self) -> bool {
        matches!(self, SegmentMatcher::Capture(_))
    }

    /// True when every segment this matcher accepts is also accepted by `other`.
    pub(crate) fn covered_by(&self, other: &SegmentMatcher, options: MatchOptions) -> bool {
        match (other, self) {
            (SegmentMatcher::Capture(_), _) => true,
            (SegmentMatcher::Literal(a), SegmentMatcher::Literal(b)) => {
                if options.sensitive {
                    a == b
                } else {
                    a.to_lowercase() == b.to_lowercase()
                }
            }
            (SegmentMatcher::Literal(_), SegmentMatcher::Capture(_)) => false,
        }
    }
}

/// Split a path into its segments. The root path has no segments.
///
/// Only one trailing slash is dropped, so `//` keeps an empty segment.
pub fn split_path(path: &str, strict: bool) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = match trimmed.strip_suffix('/') {
        Some(rest) if !strict && !rest.is_empty() => rest,
        _ => trimmed,
    };

    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// Combines segment matchers with AND semantics, one per position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSequence {
    matchers: Vec<SegmentMatcher>,
}

impl SegmentSequence {
    pub fn new(matchers: Vec<SegmentMatcher>) -> Self {
        Self { matchers }
    }

    pub fn matchers(&self) -> &[SegmentMatcher] {
        &self.matchers
    }
}

impl Matcher for SegmentSequence {
    fn match_segments(&self, segments: &[&str], options: MatchOptions) -> Option<Params> {
        if segments.len() != self.matchers.len() {
            return None;
        }

        let mut params = Params::new();
        for (matcher, segment) in self.matchers.iter().zip(segments) {
            if let Some(value) = matcher.match_segment(segment, options)? {
                if let SegmentMatcher::Capture(name) = matcher {
                    params.insert(name.as_str(), value);
                }
            }
        }
        Some(params)
    }
}
