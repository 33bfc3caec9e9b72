//! Glob expansion for mapping-file patterns.
//!
//! Supports `*`, `?`, `**`, `[...]` classes and `{a,b}` alternatives. The
//! literal directory prefix of the pattern is walked with [`walkdir`] and
//! the remainder is matched with a regex built from the pattern.
//!
//! Hidden entries (names starting with `.`) are only matched when a segment
//! of the pattern after the prefix starts with `.` itself.

use regex::Regex;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ApplicationError;

/// Paths matching `pattern`, sorted.
///
/// With `nonull`, a pattern matching nothing yields the pattern itself so
/// that reading it reports the missing file.
pub fn expand(pattern: &str, nonull: bool) -> Result<Vec<PathBuf>, ApplicationError> {
    let components: Vec<&str> = pattern.split('/').collect();
    let Some(first_magic) = components.iter().position(|c| has_magic(c)) else {
        let path = PathBuf::from(pattern);
        return Ok(if nonull || path.exists() { vec![path] } else { vec![] });
    };

    let prefix = components[..first_magic].join("/");
    let (base, out_prefix) = match (first_magic, prefix.is_empty()) {
        (0, _) => (PathBuf::from("."), String::new()),
        (_, true) => (PathBuf::from("/"), "/".to_string()),
        (_, false) => (PathBuf::from(&prefix), format!("{prefix}/")),
    };
    let rest = components[first_magic..].join("/");
    let matcher = translate(&rest)
        .map_err(|e| ApplicationError::other(format!("Invalid glob pattern '{pattern}': {e}")))?;
    let max_depth = if rest.contains("**") {
        usize::MAX
    } else {
        components.len() - first_magic
    };

    let dot_segments = rest.split('/').any(|c| c.starts_with('.'));

    let mut matches: Vec<PathBuf> = WalkDir::new(&base)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| {
            dot_segments || entry.depth() == 0 || !is_hidden(entry.file_name())
        })
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let relative = relative_slash_path(entry.path(), &base)?;
            matcher
                .is_match(&relative)
                .then(|| PathBuf::from(format!("{out_prefix}{relative}")))
        })
        .collect();
    matches.sort();
    matches.dedup();

    if matches.is_empty() && nonull {
        matches.push(PathBuf::from(pattern));
    }
    Ok(matches)
}

fn has_magic(component: &str) -> bool {
    component.contains(['*', '?', '[', '{'])
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

fn relative_slash_path(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

fn translate(glob: &str) -> Result<Regex, String> {
    let chars: Vec<char> = glob.chars().collect();
    let mut re = String::from("^");
    let mut braces = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let segment_start = i == 0 || chars[i - 1] == '/';
                if segment_start && chars.get(i + 2) == Some(&'/') {
                    re.push_str("(?:[^/]*/)*");
                    i += 3;
                } else if segment_start && i + 2 == chars.len() {
                    re.push_str(".*");
                    i += 2;
                } else {
                    re.push_str("[^/]*");
                    i += 2;
                }
                continue;
            }
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            '[' => {
                // a `]` right after the opening bracket is literal
                let start = i + 1;
                let search_from = if chars.get(start) == Some(&']') { start + 1 } else { start };
                match chars[search_from.min(chars.len())..].iter().position(|&c| c == ']') {
                    Some(offset) => {
                        let end = search_from + offset;
                        re.push('[');
                        let mut class = &chars[start..end];
                        if let Some((&first, tail)) = class.split_first()
                            && (first == '!' || first == '^')
                        {
                            re.push('^');
                            class = tail;
                        }
                        for &c in class {
                            if matches!(c, '\\' | '[' | ']' | '&' | '~') {
                                re.push('\\');
                            }
                            re.push(c);
                        }
                        re.push(']');
                        i = end + 1;
                        continue;
                    }
                    None => re.push_str(r"\["),
                }
            }
            '{' => {
                braces += 1;
                re.push_str("(?:");
            }
            ',' if braces > 0 => re.push('|'),
            '}' if braces > 0 => {
                braces -= 1;
                re.push(')');
            }
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    if braces > 0 {
        return Err("unbalanced '{'".to_string());
    }
    re.push('$');
    Regex::new(&re).map_err(|e| e.to_string())
}
