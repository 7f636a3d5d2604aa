use std::{cmp::Ordering, collections::BTreeMap, fmt};

use thiserror::Error;

/// PatternError
///
/// Raised while parsing a route pattern literal such as `/leads/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern `{0}` must start with '/'")]
    MissingLeadingSlash(String),
    #[error("pattern `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("pattern `{0}` has a parameter without a name")]
    UnnamedParam(String),
    #[error("pattern `{pattern}` declares parameter `{name}` twice")]
    DuplicateParam { pattern: String, name: String },
}

/// Segment
///
/// One `/`-delimited piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches exactly this text.
    Static(String),
    /// Positional parameter (`:name`), matches any non-empty segment.
    Param(String),
}

impl Segment {
    fn is_static(&self) -> bool {
        matches!(self, Segment::Static(_))
    }
}

/// PathPattern
///
/// Parsed form of a route pattern. The root pattern `/` has no segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// parse
    ///
    /// Parses a literal like `/buyers/:id`. A single trailing slash is tolerated.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let body = raw
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(raw.to_string()))?;
        if body.starts_with('/') {
            return Err(PatternError::EmptySegment(raw.to_string()));
        }

        let body = body.strip_suffix('/').unwrap_or(body);
        let mut segments = Vec::new();

        if !body.is_empty() {
            for part in body.split('/') {
                if part.is_empty() {
                    return Err(PatternError::EmptySegment(raw.to_string()));
                }
                match part.strip_prefix(':') {
                    Some("") => return Err(PatternError::UnnamedParam(raw.to_string())),
                    Some(name) => {
                        let duplicate = segments
                            .iter()
                            .any(|s| matches!(s, Segment::Param(existing) if existing == name));
                        if duplicate {
                            return Err(PatternError::DuplicateParam {
                                pattern: raw.to_string(),
                                name: name.to_string(),
                            });
                        }
                        segments.push(Segment::Param(name.to_string()));
                    }
                    None => segments.push(Segment::Static(part.to_string())),
                }
            }
        }

        Ok(Self {
            raw: format!("/{}", body),
            segments,
        })
    }

    /// The normalized pattern text, e.g. `/leads/:id`.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// to_axum_path
    ///
    /// Renders the pattern in axum 0.8 syntax (`/leads/{id}`).
    pub fn to_axum_path(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Static(text) => format!("/{}", text),
                Segment::Param(name) => format!("/{{{}}}", name),
            })
            .collect()
    }

    /// match_segments
    ///
    /// Attempts to bind a concrete, already-split path. Returns the captured
    /// parameters on success.
    pub fn match_segments(&self, parts: &[&str]) -> Option<BTreeMap<String, String>> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(text) if text == part => {}
                Segment::Static(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }

    /// overlaps
    ///
    /// Two patterns overlap when some concrete path matches both with equal
    /// specificity, meaning precedence cannot pick a winner.
    pub fn overlaps(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Static(a), Segment::Static(b)) => a == b,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }

    /// compare_specificity
    ///
    /// Left-to-right, a static segment outranks a parameter. `Greater` means
    /// `self` is more specific.
    pub fn compare_specificity(&self, other: &PathPattern) -> Ordering {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            match (a.is_static(), b.is_static()) {
                (true, false) => return Ordering::Greater,
                (false, true) => return Ordering::Less,
                _ => {}
            }
        }
        self.segments.len().cmp(&other.segments.len())
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// split_path
///
/// Normalizes a concrete request path into segments: strips the query and
/// fragment and ignores one trailing slash. Returns `None` if the path is
/// not absolute.
pub fn split_path(path: &str) -> Option<Vec<&str>> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let body = path.strip_prefix('/')?;
    let body = body.strip_suffix('/').unwrap_or(body);

    if body.is_empty() {
        return Some(Vec::new());
    }
    Some(body.split('/').collect())
}
