//! Route context: the enumerated set of route files handed to the resolver
//!
//! Discovery of files on disk or in a bundle happens elsewhere; the resolver
//! only sees keys and a lazy accessor per key.
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::RegexSet;

use crate::error::ResolveError;
use crate::path::{parse_route_key, RouteKey};

/// Opaque module reference produced by a loader
pub type Module = Arc<dyn Any + Send + Sync>;

/// Zero-argument accessor that lazily produces a route's module
///
/// Cloning shares the accessor. Two `LoadRoute`s are equal when they share it.
#[derive(Clone)]
pub struct LoadRoute(Arc<dyn Fn() -> Option<Module> + Send + Sync>);

impl LoadRoute {
    pub fn new<F>(load: F) -> Self
    where
        F: Fn() -> Option<Module> + Send + Sync + 'static,
    {
        LoadRoute(Arc::new(load))
    }

    /// Loader that always yields `module`
    pub fn module<T: Any + Send + Sync>(module: T) -> Self {
        let module: Module = Arc::new(module);
        LoadRoute::new(move || Some(Arc::clone(&module)))
    }

    /// Loader that yields nothing
    pub fn empty() -> Self {
        LoadRoute::new(|| None)
    }

    /// Invokes the accessor
    pub fn load(&self) -> Option<Module> {
        (self.0)()
    }
}

impl fmt::Debug for LoadRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoadRoute(..)")
    }
}

impl PartialEq for LoadRoute {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Source of route keys and their loaders
pub trait RouteContext {
    /// Every route key in the snapshot, e.g. `./(app)/users/[id]`
    fn keys(&self) -> Vec<String>;

    /// Loader for a key returned by [`keys`](RouteContext::keys)
    fn resolve(&self, key: &str) -> Option<LoadRoute>;
}

/// Route context backed by an in-memory map
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::{InMemoryContext, LoadRoute, RouteContext};
///
/// let context = InMemoryContext::new()
///     .with_route("./index", LoadRoute::module("home"))
///     .with_route("./about", LoadRoute::empty());
///
/// assert_eq!(context.keys(), vec!["./about", "./index"]);
/// assert!(context.resolve("./index").unwrap().load().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryContext {
    routes: BTreeMap<String, LoadRoute>,
}

impl InMemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose loaders all yield nothing
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter()
            .map(|key| (key, LoadRoute::empty()))
            .collect()
    }

    pub fn with_route(mut self, key: impl Into<String>, load_route: LoadRoute) -> Self {
        self.insert(key, load_route);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, load_route: LoadRoute) {
        self.routes.insert(key.into(), load_route);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, LoadRoute)> for InMemoryContext {
    fn from_iter<I: IntoIterator<Item = (S, LoadRoute)>>(iter: I) -> Self {
        Self {
            routes: iter
                .into_iter()
                .map(|(key, load_route)| (key.into(), load_route))
                .collect(),
        }
    }
}

impl RouteContext for InMemoryContext {
    fn keys(&self) -> Vec<String> {
        self.routes.keys().cloned().collect()
    }

    fn resolve(&self, key: &str) -> Option<LoadRoute> {
        self.routes.get(key).cloned()
    }
}

/// A collected route file
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: RouteKey,
    pub load_route: LoadRoute,
}

/// Normalizes the context into entries ordered by context key
///
/// Keys matching `ignore` are skipped. A key the context lists but cannot
/// resolve, or a key that is empty, makes the snapshot unusable.
pub(crate) fn collect_entries<C>(context: &C, ignore: &RegexSet) -> Result<Vec<Entry>, ResolveError>
where
    C: RouteContext + ?Sized,
{
    let mut entries = context
        .keys()
        .into_iter()
        .map(|raw| {
            let key = parse_route_key(&raw)
                .ok_or_else(|| ResolveError::invalid_input(format!("empty route key `{}`", raw)))?;
            Ok::<_, ResolveError>((raw, key))
        })
        .filter(|parsed| match parsed {
            Ok((raw, key)) if ignore.is_match(&key.context_key()) => {
                tracing::debug!(key = %raw, "ignoring route");
                false
            }
            _ => true,
        })
        .map(|parsed| {
            let (raw, key) = parsed?;
            let load_route = context.resolve(&raw).ok_or_else(|| {
                ResolveError::invalid_input(format!("`{}` is listed but cannot be resolved", raw))
            })?;
            Ok(Entry { key, load_route })
        })
        .collect::<Result<Vec<_>, ResolveError>>()?;

    entries.sort_by_key(|entry| entry.key.context_key());
    Ok(entries)
}
