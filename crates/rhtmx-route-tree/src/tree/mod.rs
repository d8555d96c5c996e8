/// Tree module: builds, links and finishes the navigation tree
///
/// - `builder` - fold classified routes into layouts and routes
/// - `rewrite` - attach rewrite and redirect nodes
/// - `finalize` - prune generated nodes, fill entry points and dynamic params
pub(crate) mod builder;
pub(crate) mod finalize;
pub(crate) mod rewrite;

pub use builder::{NOT_FOUND_ROUTE, ROOT_CONTEXT_KEY, SITEMAP_ROUTE};
