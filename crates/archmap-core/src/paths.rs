//! Path-segment helpers shared by the builder and the resolver
//!
//! All comparisons work on `/`-separated segments, so `src/api` is a prefix
//! of `src/api/handler.ts` but not of `src/apis`.

use std::sync::LazyLock;

use regex::Regex;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\\/]+").expect("separator pattern is valid"));

/// Extensions stripped when deciding whether two paths name the same file.
/// Longest first so `.d.ts` wins over `.ts`.
const SOURCE_EXTENSIONS: &[&str] = &[
    ".d.ts", ".tsx", ".ts", ".mts", ".cts", ".jsx", ".js", ".mjs", ".cjs", ".vue", ".svelte",
    ".rs", ".py", ".go", ".java", ".kt", ".rb", ".cpp", ".hpp", ".cc", ".c", ".h", ".cs",
    ".swift",
];

/// Canonical form: `/` separators, no repeats, no leading `./`, no trailing
/// separator. An empty path becomes `.`.
pub fn normalize(path: &str) -> String {
    let unified = SEPARATORS.replace_all(path.trim(), "/");
    let mut rest: &str = &unified;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    if rest.len() > 1 {
        rest = rest.trim_end_matches('/');
    }
    match rest {
        "" => ".".to_string(),
        other => other.to_string(),
    }
}

/// Normalize user input for path lookups: like [`normalize`], minus a
/// single leading separator.
pub fn normalize_identifier(input: &str) -> String {
    let normalized = normalize(input);
    match normalized.strip_prefix('/') {
        Some("") => ".".to_string(),
        Some(rest) => rest.to_string(),
        None => normalized,
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// Meaningful segments: empty and `.` segments dropped.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// Segments of `child` below `parent`, or `None` when `parent` is not a
/// segment prefix of `child`.
pub fn relative_to<'a>(parent: &str, child: &'a str) -> Option<Vec<&'a str>> {
    if is_absolute(parent) != is_absolute(child) {
        return None;
    }
    let parent_segs = segments(parent);
    let child_segs = segments(child);
    if parent_segs.len() > child_segs.len() {
        return None;
    }
    if parent_segs.iter().zip(&child_segs).any(|(p, c)| p != c) {
        return None;
    }
    Some(child_segs[parent_segs.len()..].to_vec())
}

/// `parent` strictly contains `child`: the relative path is non-empty and
/// does not climb out with `..`.
pub fn is_strict_ancestor(parent: &str, child: &str) -> bool {
    match relative_to(parent, child) {
        Some(rest) => rest.first().is_some_and(|first| *first != ".."),
        None => false,
    }
}

/// `path` equals `folder` or lies somewhere below it.
pub fn is_within(folder: &str, path: &str) -> bool {
    match relative_to(folder, path) {
        Some(rest) => rest.first().is_none_or(|first| *first != ".."),
        None => false,
    }
}

/// Drop a known source extension from the last segment.
pub fn strip_source_extension(path: &str) -> &str {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    let file = &path[file_start..];
    for ext in SOURCE_EXTENSIONS {
        if file.len() > ext.len() && file.ends_with(ext) {
            return &path[..path.len() - ext.len()];
        }
    }
    path
}

/// Both paths name the same file once source extensions are ignored.
pub fn same_file(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);
    strip_source_extension(&a) == strip_source_extension(&b)
}

/// Express `path` relative to `base` when it is an absolute path under it.
/// Anything else is only normalized.
pub fn relativize(base: &str, path: &str) -> String {
    let path = normalize(path);
    let base = normalize(base);
    if !is_absolute(&path) || !is_absolute(&base) {
        return path;
    }
    match relative_to(&base, &path) {
        Some(rest) if rest.is_empty() => ".".to_string(),
        Some(rest) => rest.join("/"),
        None => path,
    }
}
