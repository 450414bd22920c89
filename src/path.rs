//! Path helpers used while flattening a router.

/// Normalizes a `/`-separated path.
///
/// Collapses repeated separators, resolves `.` and `..` (an absolute path
/// never climbs above `/`), and keeps a trailing separator. An empty path
/// normalizes to `"."`.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }

    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if !absolute => segments.push(".."),
                _ => {}
            },
            _ => segments.push(segment),
        }
    }

    let mut out = segments.join("/");
    if out.is_empty() && !absolute {
        out.push('.');
    }
    if !out.is_empty() && trailing {
        out.push('/');
    }
    if absolute {
        out.insert(0, '/');
    }
    out
}

/// Recovers the literal mount path from a prefix [`Matcher`](crate::Matcher)
/// source.
///
/// Drops every `\`, then every `?(?=/|$)` segment delimiter, then every `^`
/// anchor. For plain mount paths this gives back the path with a trailing
/// slash (`^\/api\/?(?=\/|$)` → `/api/`), which [`normalize`] absorbs when
/// the next suffix is joined on.
///
/// Mount paths with parameters or wildcards do not survive the round trip:
/// the capture groups stay in the result as regex text, and the `^` inside
/// `[^\/]` is stripped along with the anchors. The result is always a
/// string; it is just not a usable path in those cases.
pub fn literal_prefix_from(pattern: &str) -> String {
    pattern
        .replace('\\', "")
        .replace("?(?=/|$)", "")
        .replace('^', "")
}

/// Route id: `method` followed by `path`, with everything except ASCII
/// letters, digits and `_` removed, lowercased.
///
/// Distinct routes can share an id (`/a-b` and `/ab`).
pub fn route_id(method: &str, path: &str) -> String {
    method.chars()
        .chain(path.chars())
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
