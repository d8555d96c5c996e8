//! # RHTMX Route Tree
//!
//! Resolves a flat set of file-based route entries into the nested navigation
//! tree a rendering layer mounts. Supported key syntax:
//! - Static segments (`./about`)
//! - Dynamic parameters (`./users/[id]`)
//! - Catch-all and optional catch-all (`./docs/[...slug]`, `./[[...all]]`)
//! - Groups, elided from URLs (`./(app)/feed`), with aliases (`./(a,b)/feed`)
//! - Layouts (`_layout`), index routes, `+not-found`, `+api` routes
//!
//! ## Pipeline
//!
//! Resolution is one synchronous pass over an immutable snapshot:
//! 1. **collect** keys from a [`RouteContext`] and normalize them
//! 2. **classify** every key into segments and flags ([`route`])
//! 3. **build** the layout tree, merging entries that share a position
//! 4. **link** rewrite and redirect rules to existing routes
//! 5. **finalize**: prune generated nodes, fill `entryPoints` and `dynamic`
//!
//! Recoverable problems (malformed keys, collisions, unresolved rewrites) drop
//! only the offending entry or rule and come back as [`RouteWarning`]s.
//!
//! ## Example
//!
//! ```
//! use rhtmx_route_tree::{get_routes, InMemoryContext, NodeKind, Options};
//!
//! let context = InMemoryContext::from_keys(["./index", "./about"]);
//! let options = Options::default()
//!     .with_rewrite("/rewrite-about", "/about")
//!     .with_preserve_redirect_and_rewrites(true);
//!
//! let resolution = get_routes(&context, &options).unwrap();
//! let rewrite = resolution.tree.find("./rewrite-about.js").unwrap();
//!
//! assert!(matches!(rewrite.kind, NodeKind::Rewrite { .. }));
//! assert_eq!(rewrite.destination_context_key(), Some("./about.js"));
//! assert!(resolution.warnings.is_empty());
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod context;
mod error;
mod node;
mod options;
pub mod path;
pub mod route;
mod tree;

pub use context::{InMemoryContext, LoadRoute, Module, RouteContext};
pub use error::{ResolveError, RouteWarning};
pub use node::{DynamicConvention, Iter, NodeKind, RouteNode};
pub use options::{Options, RedirectConfig, RewriteConfig};
pub use path::{is_valid_path, normalize_path, PathHierarchy};
pub use route::pattern::{classify_segment, SegmentKind};
pub use tree::{NOT_FOUND_ROUTE, ROOT_CONTEXT_KEY, SITEMAP_ROUTE};

use context::{collect_entries, Entry};
use error::Diagnostics;

// ============================================================================
// Resolution
// ============================================================================

/// Result of one resolution call
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Root layout of the navigation tree
    pub tree: RouteNode,
    /// Entries and rules that were dropped, in the order they were found
    pub warnings: Vec<RouteWarning>,
}

impl Resolution {
    /// Serializes the tree for snapshot comparison
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.tree).unwrap_or(serde_json::Value::Null)
    }
}

/// Resolves a route context into a navigation tree
///
/// The same context and options always produce the same tree.
///
/// # Errors
///
/// - [`ResolveError::InvalidPattern`] when an `ignore` expression does not compile
/// - [`ResolveError::InvalidInput`] when the context lists a key that is empty
///   or cannot be resolved
#[tracing::instrument(skip_all, fields(entries = tracing::field::Empty))]
pub fn get_routes<C>(context: &C, options: &Options) -> Result<Resolution, ResolveError>
where
    C: RouteContext + ?Sized,
{
    let ignore = options.ignore_set()?;
    let entries = collect_entries(context, &ignore)?;
    tracing::Span::current().record("entries", entries.len());

    let mut diagnostics = Diagnostics::default();
    if options.verify_modules {
        verify_modules(&entries, &mut diagnostics);
    }

    let mut tree = tree::builder::build_tree(&entries, options, &mut diagnostics);
    tree::rewrite::synthesize_links(&mut tree, options, &mut diagnostics);
    let tree = tree::finalize::finalize(tree, options);

    Ok(Resolution {
        tree,
        warnings: diagnostics.into_warnings(),
    })
}

/// Invokes every loader once, warning about those that yield nothing
fn verify_modules(entries: &[Entry], diagnostics: &mut Diagnostics) {
    for entry in entries {
        if entry.load_route.load().is_none() {
            diagnostics.report(RouteWarning::EmptyModule {
                context_key: entry.key.context_key(),
            });
        }
    }
}
