/// Path utilities for route keys and URL paths
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
///
/// Two kinds of paths flow through the resolver:
/// - **route keys** like `./(app)/users/[id].tsx`, supplied by the route context
/// - **URL paths** like `/users/[id]`, used by rewrite and redirect rules
use std::borrow::Cow;

pub mod hierarchy;
pub use hierarchy::PathHierarchy;

/// Extensions recognised at the end of a route key
pub const SOURCE_EXTENSIONS: [&str; 4] = [".tsx", ".ts", ".jsx", ".js"];

/// Extension given to keys supplied without one
pub const DEFAULT_EXTENSION: &str = ".js";

/// A route key split into its slash path and source extension
///
/// `path` has no leading `./` and no extension: `(app)/users/[id]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteKey {
    pub path: String,
    pub extension: String,
}

impl RouteKey {
    /// Canonical context key: `./{path}{extension}`
    pub fn context_key(&self) -> String {
        format!("./{}{}", self.path, self.extension)
    }

    /// Slash-separated components of the path
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/')
    }
}

/// Parses a raw route key into a [`RouteKey`]
///
/// Returns `None` when nothing but separators remain.
///
/// # Handles
///
/// - Leading `./` or `/`: `./about` → `about`
/// - Backslashes and doubled separators: `.\\users\\\\[id]` → `users/[id]`
/// - Source extensions are kept, missing ones default to `.js`
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::path::parse_route_key;
///
/// let key = parse_route_key("./about").unwrap();
/// assert_eq!(key.path, "about");
/// assert_eq!(key.context_key(), "./about.js");
///
/// let key = parse_route_key("./(app)/users/[id].tsx").unwrap();
/// assert_eq!(key.path, "(app)/users/[id]");
/// assert_eq!(key.context_key(), "./(app)/users/[id].tsx");
///
/// assert!(parse_route_key("./").is_none());
/// ```
pub fn parse_route_key(raw: &str) -> Option<RouteKey> {
    let trimmed = raw.trim();
    let without_prefix = trimmed
        .strip_prefix("./")
        .or_else(|| trimmed.strip_prefix(".\\"))
        .unwrap_or(trimmed);

    let joined = without_prefix
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/");

    let (path, extension) = SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| {
            joined
                .strip_suffix(ext)
                .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
                .map(|stem| (stem.to_string(), (*ext).to_string()))
        })
        .unwrap_or_else(|| (joined.clone(), DEFAULT_EXTENSION.to_string()));

    if path.is_empty() {
        None
    } else {
        Some(RouteKey { path, extension })
    }
}

/// Validates if a URL path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/about"));
/// assert!(!is_valid_path("about"));
/// assert!(!is_valid_path("/about/"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a URL path to canonical form
///
/// **Pure function** with zero-copy optimization using `Cow<'_, str>`:
/// returns `Cow::Borrowed` when the input is already valid.
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("rewrite-about/"), "/rewrite-about");
/// assert_eq!(normalize_path("\\users\\123"), "/users/123");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Joins URL path components under `/`, skipping empty ones
pub(crate) fn join_url(base: &str, tail: &str) -> String {
    match (base.trim_end_matches('/'), tail.trim_matches('/')) {
        (base, "") if base.is_empty() => "/".to_string(),
        (base, "") => base.to_string(),
        (base, tail) => format!("{}/{}", base, tail),
    }
}
