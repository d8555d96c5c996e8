/// Lazy iterator over a URL path and its ancestors
///
/// For path `/a/b/c`, yields: `/a/b/c` → `/a/b` → `/a` → `/`
///
/// The rewrite synthesizer walks it to find the deepest existing layout a
/// rewrite source can be attached under, stopping at the first match.
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::path::PathHierarchy;
///
/// let paths: Vec<&str> = PathHierarchy::new("/settings/old").collect();
/// assert_eq!(paths, vec!["/settings/old", "/settings", "/"]);
/// ```
#[derive(Debug, Clone)]
pub struct PathHierarchy<'a> {
    current: Option<&'a str>,
}

impl<'a> PathHierarchy<'a> {
    /// Creates a new path hierarchy iterator starting from the given path
    pub fn new(path: &'a str) -> Self {
        Self {
            current: Some(path),
        }
    }
}

impl<'a> Iterator for PathHierarchy<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;

        self.current = if current == "/" {
            None
        } else {
            match current.rfind('/') {
                Some(0) => Some("/"),
                Some(slash_pos) => Some(&current[..slash_pos]),
                None => None,
            }
        };

        Some(current)
    }
}
