//! Location paths and path queries over a parsed document.
//!
//! A [`LocationPath`] addresses exactly one node. Path expressions come in
//! two forms: JSON pointers (`/paths/~1pets/get`, optionally prefixed with
//! `#`) and JSONPath queries (`$..schema`), the latter evaluated with
//! [`serde_json_path`].

use serde_json::Value;
use serde_json_path::{JsonPath, PathElement};
use std::fmt;

use crate::error::ApplicationError;

// ─── Location paths ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Name(String),
    Index(usize),
}

impl PathSegment {
    pub fn is_name(&self, name: &str) -> bool {
        matches!(self, PathSegment::Name(n) if n == name)
    }
}

/// Ordered segments from the document root to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocationPath {
    segments: Vec<PathSegment>,
}

impl LocationPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        LocationPath { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Parses a JSON pointer. A leading `#` is accepted and the empty string
    /// is the root. Every segment becomes a [`PathSegment::Name`] since a
    /// pointer cannot distinguish object keys from array indexes; [`get`]
    /// treats numeric names as indexes on arrays.
    pub fn parse_pointer(pointer: &str) -> Option<Self> {
        let pointer = pointer.strip_prefix('#').unwrap_or(pointer);
        if pointer.is_empty() {
            return Some(Self::root());
        }
        let rest = pointer.strip_prefix('/')?;
        let segments = rest
            .split('/')
            .map(|s| PathSegment::Name(s.replace("~1", "/").replace("~0", "~")))
            .collect();
        Some(LocationPath { segments })
    }

    /// RFC 6901 pointer form, e.g. `/paths/~1pets/get`.
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            out.push('/');
            match seg {
                PathSegment::Name(n) => out.push_str(&n.replace('~', "~0").replace('/', "~1")),
                PathSegment::Index(i) => out.push_str(&i.to_string()),
            }
        }
        out
    }

    /// RFC 9535 normalized path form, e.g. `$['paths']['/pets']['get']`.
    pub fn to_path_expression(&self) -> String {
        let mut out = String::from("$");
        for seg in &self.segments {
            match seg {
                PathSegment::Name(n) => {
                    out.push_str("['");
                    for c in n.chars() {
                        match c {
                            '\'' => out.push_str("\\'"),
                            '\\' => out.push_str("\\\\"),
                            c => out.push(c),
                        }
                    }
                    out.push_str("']");
                }
                PathSegment::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    /// Position of the last segment equal to `name`.
    pub fn rposition(&self, name: &str) -> Option<usize> {
        self.segments.iter().rposition(|s| s.is_name(name))
    }

    /// The first `len` segments followed by `segment`.
    pub fn truncate_and_push(&self, len: usize, segment: PathSegment) -> Self {
        let mut segments = self.segments[..len].to_vec();
        segments.push(segment);
        LocationPath { segments }
    }
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

// ─── Pointer get ────────────────────────────────────────────────────────────

/// Value at `path`, or `None` if any segment fails to resolve.
pub fn get<'a>(document: &'a Value, path: &LocationPath) -> Option<&'a Value> {
    let mut current = document;
    for seg in path.segments() {
        current = match (seg, current) {
            (PathSegment::Name(n), Value::Object(map)) => map.get(n)?,
            (PathSegment::Name(n), Value::Array(arr)) => arr.get(n.parse::<usize>().ok()?)?,
            (PathSegment::Index(i), Value::Array(arr)) => arr.get(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Value at a JSON pointer string (`#` prefix allowed).
pub fn get_pointer<'a>(document: &'a Value, pointer: &str) -> Option<&'a Value> {
    let pointer = pointer.strip_prefix('#').unwrap_or(pointer);
    document.pointer(pointer)
}

// ─── Queries ────────────────────────────────────────────────────────────────

/// Every node matched by `expression`, with its location, in traversal order.
///
/// Pointer expressions match at most one node. JSONPath expressions that are
/// not valid RFC 9535 syntax fall back to the plain dotted form
/// (`$.paths./pets.get.responses.200.schema`), where each `.`-separated part
/// names one member.
pub fn query_located<'a>(
    document: &'a Value,
    expression: &str,
) -> Result<Vec<(LocationPath, &'a Value)>, ApplicationError> {
    if !expression.starts_with('$') {
        let path = LocationPath::parse_pointer(expression)
            .ok_or_else(|| ApplicationError::path_not_found(expression))?;
        return Ok(get(document, &path).map(|v| (path, v)).into_iter().collect());
    }

    match JsonPath::parse(expression) {
        Ok(json_path) => Ok(json_path
            .query_located(document)
            .into_iter()
            .map(|node| {
                let location = node
                    .location()
                    .iter()
                    .map(|el| match el {
                        PathElement::Name(n) => PathSegment::Name(n.to_string()),
                        PathElement::Index(i) => PathSegment::Index(*i),
                    })
                    .collect();
                (LocationPath::new(location), node.node())
            })
            .collect()),
        Err(parse_err) => {
            let path = parse_dotted(expression).ok_or_else(|| {
                ApplicationError::path_not_found(format!("{} ({})", expression, parse_err))
            })?;
            Ok(get(document, &path).map(|v| (path, v)).into_iter().collect())
        }
    }
}

/// Locations of every node matched by `expression`, first occurrence kept
/// when a descendant query reaches the same node twice.
pub fn query_locations(
    document: &Value,
    expression: &str,
) -> Result<Vec<LocationPath>, ApplicationError> {
    let mut out: Vec<LocationPath> = Vec::new();
    for (location, _) in query_located(document, expression)? {
        if !out.contains(&location) {
            out.push(location);
        }
    }
    Ok(out)
}

/// Values of every node matched by `expression`.
pub fn query_values<'a>(
    document: &'a Value,
    expression: &str,
) -> Result<Vec<&'a Value>, ApplicationError> {
    Ok(query_located(document, expression)?
        .into_iter()
        .map(|(_, v)| v)
        .collect())
}

/// Collapses a match list: nothing, the single value, or all values as one
/// array.
pub fn flatten(mut values: Vec<Value>) -> Option<Value> {
    match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(Value::Array(values)),
    }
}

fn parse_dotted(expression: &str) -> Option<LocationPath> {
    let rest = expression.strip_prefix("$.")?;
    if rest.is_empty() || rest.contains(['[', ']', '*']) {
        return None;
    }
    Some(LocationPath::new(
        rest.split('.')
            .map(|s| PathSegment::Name(s.to_string()))
            .collect(),
    ))
}
