//! Route path patterns.
//!
//! A pattern such as `/bevy/:experiment` is compiled once into a sequence of
//! segment matchers. Segments starting with `:` are named captures, all other
//! segments are literals.

use thiserror::Error;

use crate::routing::matcher::{split_path, MatchOptions, Matcher, SegmentMatcher, SegmentSequence};
use crate::routing::params::Params;

/// Errors raised while compiling or filling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern `{0}` must start with `/`")]
    MissingLeadingSlash(String),

    #[error("pattern `{0}` contains an empty segment")]
    EmptySegment(String),

    #[error("pattern `{pattern}` has an invalid capture name `{name}`")]
    InvalidCaptureName { pattern: String, name: String },

    #[error("pattern `{pattern}` captures `{name}` more than once")]
    DuplicateCapture { pattern: String, name: String },

    #[error("missing value for parameter `{name}` of pattern `{pattern}`")]
    MissingParam { pattern: String, name: String },
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    sequence: SegmentSequence,
}

impl PathPattern {
    /// Compile a pattern string.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if !source.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(source.to_string()));
        }

        let mut matchers = Vec::new();
        for segment in split_path(source, false) {
            if segment.is_empty() {
                return Err(PatternError::EmptySegment(source.to_string()));
            }

            match segment.strip_prefix(':') {
                Some(name) => {
                    if name.is_empty()
                        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        return Err(PatternError::InvalidCaptureName {
                            pattern: source.to_string(),
                            name: name.to_string(),
                        });
                    }
                    let duplicate = matchers
                        .iter()
                        .any(|m| matches!(m, SegmentMatcher::Capture(n) if n == name));
                    if duplicate {
                        return Err(PatternError::DuplicateCapture {
                            pattern: source.to_string(),
                            name: name.to_string(),
                        });
                    }
                    matchers.push(SegmentMatcher::Capture(name.to_string()));
                }
                None => matchers.push(SegmentMatcher::Literal(segment.to_string())),
            }
        }

        Ok(Self {
            source: source.to_string(),
            sequence: SegmentSequence::new(matchers),
        })
    }

    /// The pattern as written in the route definition.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[SegmentMatcher] {
        self.sequence.matchers()
    }

    /// Names of the captures, in order.
    pub fn captures(&self) -> impl Iterator<Item = &str> {
        self.segments().iter().filter_map(|m| match m {
            SegmentMatcher::Capture(name) => Some(name.as_str()),
            SegmentMatcher::Literal(_) => None,
        })
    }

    /// Match a path (without query or fragment).
    pub fn match_path(&self, path: &str, options: MatchOptions) -> Option<Params> {
        let segments = split_path(path, options.strict);
        self.sequence.match_segments(&segments, options)
    }

    /// True when every path this pattern accepts is accepted by `earlier`,
    /// which makes `self` unreachable if `earlier` is declared first.
    pub fn is_shadowed_by(&self, earlier: &PathPattern, options: MatchOptions) -> bool {
        self.segments().len() == earlier.segments().len()
            && self
                .segments()
                .iter()
                .zip(earlier.segments())
                .all(|(mine, theirs)| mine.covered_by(theirs, options))
    }

    /// Build a concrete path by substituting every capture.
    pub fn fill(&self, params: &Params) -> Result<String, PatternError> {
        let mut path = String::new();
        for matcher in self.segments() {
            path.push('/');
            match matcher {
                SegmentMatcher::Literal(text) => path.push_str(text),
                SegmentMatcher::Capture(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| PatternError::MissingParam {
                            pattern: self.source.clone(),
                            name: name.clone(),
                        })?;
                    path.push_str(&urlencoding::encode(value));
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declared_patterns() {
        let root = PathPattern::parse("/").unwrap();
        assert!(root.segments().is_empty());

        let bevy = PathPattern::parse("/bevy/:experiment").unwrap();
        assert_eq!(
            bevy.segments(),
            &[
                SegmentMatcher::Literal("bevy".into()),
                SegmentMatcher::Capture("experiment".into())
            ]
        );
        assert_eq!(bevy.captures().collect::<Vec<_>>(), vec!["experiment"]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            PathPattern::parse("bevy"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            PathPattern::parse("/bevy//x"),
            Err(PatternError::EmptySegment(_))
        ));
        assert!(matches!(
            PathPattern::parse("/bevy/:"),
            Err(PatternError::InvalidCaptureName { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/:a/:a"),
            Err(PatternError::DuplicateCapture { .. })
        ));
    }

    #[test]
    fn test_match_path() {
        let pattern = PathPattern::parse("/experiment/:experiment").unwrap();
        let options = MatchOptions::default();

        let params = pattern.match_path("/experiment/foo", options).unwrap();
        assert_eq!(params.get("experiment"), Some("foo"));

        assert!(pattern.match_path("/experiment/", options).is_none());
        assert!(pattern.match_path("/experiment/foo/bar", options).is_none());
        assert!(pattern.match_path("/", options).is_none());

        let strict = MatchOptions { sensitive: false, strict: true };
        assert!(pattern.match_path("/experiment/foo/", strict).is_none());
        assert!(pattern.match_path("/experiment/foo/", options).is_some());
    }

    #[test]
    fn test_shadowing() {
        let options = MatchOptions::default();
        let capture = PathPattern::parse("/bevy/:experiment").unwrap();
        let renamed = PathPattern::parse("/bevy/:name").unwrap();
        let literal = PathPattern::parse("/bevy/latest").unwrap();
        let game = PathPattern::parse("/experiment/:experiment").unwrap();

        assert!(renamed.is_shadowed_by(&capture, options));
        assert!(literal.is_shadowed_by(&capture, options));
        assert!(!capture.is_shadowed_by(&literal, options));
        assert!(!game.is_shadowed_by(&capture, options));
    }

    #[test]
    fn test_fill() {
        let pattern = PathPattern::parse("/bevy/:experiment").unwrap();
        let params = Params::new().with("experiment", "elastic box");
        assert_eq!(pattern.fill(&params).unwrap(), "/bevy/elastic%20box");

        assert!(matches!(
            pattern.fill(&Params::new()),
            Err(PatternError::MissingParam { .. })
        ));
        assert_eq!(PathPattern::parse("/").unwrap().fill(&Params::new()).unwrap(), "/");
    }
}
