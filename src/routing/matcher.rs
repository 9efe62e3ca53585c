//! Path pattern parsing and matching.
//!
//! # Responsibilities
//! - Parse route paths into static, parameter and catch-all segments
//! - Match a decoded request path against a pattern, extracting params
//! - Build a concrete path from a pattern and parameter values
//!
//! # Design Decisions
//! - Static segments match case-insensitively
//! - A trailing slash is not significant
//! - `:name` matches exactly one non-empty segment
//! - `:name(.*)*` matches zero or more trailing segments and must come last
//! - No regex: patterns are compared segment by segment

use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use thiserror::Error;

/// Characters escaped when writing a parameter value into a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const CATCH_ALL_SUFFIX: &str = "(.*)*";

/// A value extracted for a named parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A single path segment (`:id`).
    Single(String),
    /// The remaining segments captured by a catch-all.
    Repeated(Vec<String>),
}

impl ParamValue {
    /// The single-segment value, if this is not a catch-all capture.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ParamValue::Single(v) => Some(v),
            ParamValue::Repeated(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Single(v) => f.write_str(v),
            ParamValue::Repeated(vs) => f.write_str(&vs.join("/")),
        }
    }
}

/// Parameters extracted from a matched path, keyed by name.
pub type Params = BTreeMap<String, ParamValue>;

/// Errors raised while parsing a route path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("empty parameter name in segment '{0}'")]
    EmptyParamName(String),

    #[error("unsupported pattern syntax in segment '{0}'")]
    UnsupportedSyntax(String),

    #[error("catch-all segment '{0}' must be the last segment")]
    CatchAllNotLast(String),

    #[error("parameter '{0}' appears more than once")]
    DuplicateParam(String),
}

/// Errors raised while building a path from a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("missing parameter '{0}'")]
    MissingParam(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Literal text, stored lowercased.
    Static(String),
    Param(String),
    CatchAll(String),
}

/// A parsed route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a full (absolute) route path.
    pub fn parse(path: &str) -> Result<Self, PatternError> {
        let raw: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw.len());
        let mut seen = Vec::new();

        for (i, seg) in raw.iter().enumerate() {
            let parsed = parse_segment(seg)?;
            match &parsed {
                Segment::CatchAll(_) if i + 1 != raw.len() => {
                    return Err(PatternError::CatchAllNotLast(seg.to_string()));
                }
                Segment::Param(name) | Segment::CatchAll(name) => {
                    if seen.contains(name) {
                        return Err(PatternError::DuplicateParam(name.clone()));
                    }
                    seen.push(name.clone());
                }
                Segment::Static(_) => {}
            }
            segments.push(parsed);
        }

        Ok(Self {
            source: path.to_string(),
            segments,
        })
    }

    /// The path as written in the route table.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if the pattern ends in a catch-all segment.
    pub fn is_catch_all(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::CatchAll(_)))
    }

    /// Names of all parameters, in path order.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(n) | Segment::CatchAll(n) => Some(n.as_str()),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// Match already-decoded path segments. Returns the extracted params.
    pub fn matches(&self, path: &[String]) -> Option<Params> {
        let mut params = Params::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static(expected) => {
                    let actual = path.get(i)?;
                    if actual.to_lowercase() != *expected {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let actual = path.get(i)?;
                    params.insert(name.clone(), ParamValue::Single(actual.clone()));
                }
                Segment::CatchAll(name) => {
                    let rest = path.get(i..).unwrap_or_default().to_vec();
                    params.insert(name.clone(), ParamValue::Repeated(rest));
                    return Some(params);
                }
            }
        }

        (path.len() == self.segments.len()).then_some(params)
    }

    /// Build a concrete path, percent-encoding parameter values.
    ///
    /// A catch-all value may contain `/`; each part is encoded separately.
    /// It must name at least one segment.
    pub fn build(&self, params: &BTreeMap<String, String>) -> Result<String, BuildError> {
        let mut parts: Vec<String> = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Static(text) => parts.push(text.clone()),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| BuildError::MissingParam(name.clone()))?;
                    parts.push(encode_segment(value));
                }
                Segment::CatchAll(name) => {
                    let rest: Vec<String> = params
                        .get(name)
                        .map(|value| {
                            value
                                .split('/')
                                .filter(|s| !s.is_empty())
                                .map(encode_segment)
                                .collect()
                        })
                        .unwrap_or_default();
                    // An empty capture would build a path owned by another route.
                    if rest.is_empty() {
                        return Err(BuildError::MissingParam(name.clone()));
                    }
                    parts.extend(rest);
                }
            }
        }

        Ok(format!("/{}", parts.join("/")))
    }
}

/// Split a request path into percent-decoded, non-empty segments.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect()
}

/// Join a child route path onto its parent's full path.
pub fn join_paths(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('/');
    if child.is_empty() {
        if parent.is_empty() {
            "/".to_string()
        } else {
            parent.to_string()
        }
    } else {
        format!("{}/{}", parent, child)
    }
}

fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

fn parse_segment(seg: &str) -> Result<Segment, PatternError> {
    let Some(param) = seg.strip_prefix(':') else {
        if seg.contains(['(', ')', '*', ':']) {
            return Err(PatternError::UnsupportedSyntax(seg.to_string()));
        }
        return Ok(Segment::Static(seg.to_lowercase()));
    };

    let (name, catch_all) = match param.strip_suffix(CATCH_ALL_SUFFIX) {
        Some(name) => (name, true),
        None => (param, false),
    };

    if name.is_empty() {
        return Err(PatternError::EmptyParamName(seg.to_string()));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PatternError::UnsupportedSyntax(seg.to_string()));
    }

    Ok(if catch_all {
        Segment::CatchAll(name.to_string())
    } else {
        Segment::Param(name.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(path: &str) -> Vec<String> {
        split_path(path)
    }

    #[test]
    fn test_static_match_is_case_insensitive() {
        let pattern = PathPattern::parse("/spend-analysis").unwrap();
        assert!(pattern.matches(&segs("/spend-analysis")).is_some());
        assert!(pattern.matches(&segs("/Spend-Analysis/")).is_some());
        assert!(pattern.matches(&segs("/spend-analysis/extra")).is_none());
        assert!(pattern.matches(&segs("/spend")).is_none());
    }

    #[test]
    fn test_root_matches_only_empty_path() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.matches(&segs("/")).is_some());
        assert!(pattern.matches(&segs("")).is_some());
        assert!(pattern.matches(&segs("/login")).is_none());
    }

    #[test]
    fn test_param_extraction_decodes_value() {
        let pattern = PathPattern::parse("/spend/:id").unwrap();
        let params = pattern.matches(&segs("/spend/42")).unwrap();
        assert_eq!(params.get("id"), Some(&ParamValue::Single("42".into())));

        let params = pattern.matches(&segs("/spend/a%20b")).unwrap();
        assert_eq!(params.get("id"), Some(&ParamValue::Single("a b".into())));

        assert!(pattern.matches(&segs("/spend")).is_none());
        assert!(pattern.matches(&segs("/spend/1/2")).is_none());
    }

    #[test]
    fn test_catch_all_captures_rest() {
        let pattern = PathPattern::parse("/:pathMatch(.*)*").unwrap();
        assert!(pattern.is_catch_all());

        let params = pattern.matches(&segs("/zzz/yyy")).unwrap();
        assert_eq!(
            params.get("pathMatch"),
            Some(&ParamValue::Repeated(vec!["zzz".into(), "yyy".into()]))
        );

        let params = pattern.matches(&segs("/")).unwrap();
        assert_eq!(params.get("pathMatch"), Some(&ParamValue::Repeated(vec![])));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            PathPattern::parse("/:rest(.*)*/tail"),
            Err(PatternError::CatchAllNotLast(":rest(.*)*".into()))
        );
        assert_eq!(
            PathPattern::parse("/a/:id/b/:id"),
            Err(PatternError::DuplicateParam("id".into()))
        );
        assert_eq!(
            PathPattern::parse("/:"),
            Err(PatternError::EmptyParamName(":".into()))
        );
        assert!(matches!(
            PathPattern::parse("/:id(\\d+)"),
            Err(PatternError::UnsupportedSyntax(_))
        ));
    }

    #[test]
    fn test_build() {
        let pattern = PathPattern::parse("/spend/:id").unwrap();
        let mut params = BTreeMap::new();
        assert_eq!(
            pattern.build(&params),
            Err(BuildError::MissingParam("id".into()))
        );

        params.insert("id".to_string(), "a b/c".to_string());
        assert_eq!(pattern.build(&params).unwrap(), "/spend/a%20b%2Fc");

        let root = PathPattern::parse("/").unwrap();
        assert_eq!(root.build(&BTreeMap::new()).unwrap(), "/");

        let catch_all = PathPattern::parse("/:pathMatch(.*)*").unwrap();
        let mut params = BTreeMap::new();
        params.insert("pathMatch".to_string(), "x/y z".to_string());
        assert_eq!(catch_all.build(&params).unwrap(), "/x/y%20z");
    }

    #[test]
    fn test_build_catch_all_requires_a_segment() {
        let catch_all = PathPattern::parse("/:pathMatch(.*)*").unwrap();
        let missing = Err(BuildError::MissingParam("pathMatch".into()));
        assert_eq!(catch_all.build(&BTreeMap::new()), missing);

        let mut params = BTreeMap::new();
        params.insert("pathMatch".to_string(), "//".to_string());
        assert_eq!(catch_all.build(&params), missing);
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("/", "spend/:id"), "/spend/:id");
        assert_eq!(join_paths("/settings", "profile"), "/settings/profile");
        assert_eq!(join_paths("/", ""), "/");
    }
}
