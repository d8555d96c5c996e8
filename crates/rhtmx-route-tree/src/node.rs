//! The resolved navigation tree
//!
//! [`RouteNode`] is a plain value: fields are public, there is no interior
//! mutability, and the whole tree serializes with serde for snapshot tests.
use std::cmp::Ordering;

use serde::Serialize;

use crate::context::LoadRoute;
use crate::route::classify_segment;

/// One dynamic parameter visible at a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicConvention {
    pub name: String,
    /// `true` for catch-all parameters, which capture several components
    pub deep: bool,
}

/// Node type with the fields only that type carries
///
/// Closed set: consumers match exhaustively on the four variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Route {
        #[serde(rename = "entryPoints")]
        entry_points: Vec<String>,
    },
    Layout {
        #[serde(rename = "entryPoints")]
        entry_points: Vec<String>,
    },
    Rewrite {
        #[serde(rename = "destinationContextKey")]
        destination_context_key: String,
    },
    Redirect {
        #[serde(rename = "destinationContextKey")]
        destination_context_key: String,
        #[serde(skip_serializing_if = "is_false")]
        permanent: bool,
    },
}

impl NodeKind {
    fn sort_order(&self) -> u8 {
        match self {
            NodeKind::Route { .. } => 0,
            NodeKind::Layout { .. } => 1,
            NodeKind::Rewrite { .. } => 2,
            NodeKind::Redirect { .. } => 3,
        }
    }
}

/// A node of the resolved route tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteNode {
    /// Path segment(s) at this level, empty for the root
    pub route: String,
    #[serde(rename = "contextKey")]
    pub context_key: String,
    /// Dynamic parameters on the path from the root to this node
    pub dynamic: Option<Vec<DynamicConvention>>,
    pub children: Vec<RouteNode>,
    /// Synthesized rather than backed by a file
    #[serde(skip_serializing_if = "is_false")]
    pub generated: bool,
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Accessor for the module, absent for generated nodes and with `internal_strip_load_route`
    #[serde(skip)]
    pub load_route: Option<LoadRoute>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl RouteNode {
    pub(crate) fn layout(route: impl Into<String>, context_key: impl Into<String>) -> Self {
        Self::new(
            route,
            context_key,
            NodeKind::Layout {
                entry_points: Vec::new(),
            },
        )
    }

    pub(crate) fn page(route: impl Into<String>, context_key: impl Into<String>) -> Self {
        Self::new(
            route,
            context_key,
            NodeKind::Route {
                entry_points: Vec::new(),
            },
        )
    }

    pub(crate) fn new(
        route: impl Into<String>,
        context_key: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        RouteNode {
            route: route.into(),
            context_key: context_key.into(),
            dynamic: None,
            children: Vec::new(),
            generated: false,
            kind,
            load_route: None,
        }
    }

    pub(crate) fn with_generated(mut self, generated: bool) -> Self {
        self.generated = generated;
        self
    }

    pub fn is_layout(&self) -> bool {
        matches!(self.kind, NodeKind::Layout { .. })
    }

    /// `true` for rewrite and redirect nodes
    pub fn is_link(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Rewrite { .. } | NodeKind::Redirect { .. }
        )
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Entry points of a route or layout node
    pub fn entry_points(&self) -> Option<&[String]> {
        match &self.kind {
            NodeKind::Route { entry_points } | NodeKind::Layout { entry_points } => {
                Some(entry_points)
            }
            NodeKind::Rewrite { .. } | NodeKind::Redirect { .. } => None,
        }
    }

    /// Destination of a rewrite or redirect node
    pub fn destination_context_key(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Rewrite {
                destination_context_key,
            }
            | NodeKind::Redirect {
                destination_context_key,
                ..
            } => Some(destination_context_key),
            NodeKind::Route { .. } | NodeKind::Layout { .. } => None,
        }
    }

    /// Depth-first pre-order iterator over this node and its descendants
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_route_tree::{get_routes, InMemoryContext, Options};
    ///
    /// let context = InMemoryContext::from_keys(["./index", "./users/[id]"]);
    /// let tree = get_routes(&context, &Options::default().with_skip_generated(true))
    ///     .unwrap()
    ///     .tree;
    ///
    /// let keys: Vec<&str> = tree.iter().map(|n| n.context_key.as_str()).collect();
    /// assert_eq!(keys, vec!["./_layout.js", "./index.js", "./users/_layout.js", "./users/[id].js"]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Finds the node with the given context key
    pub fn find(&self, context_key: &str) -> Option<&RouteNode> {
        self.iter().find(|node| node.context_key == context_key)
    }

    /// Sorts children by specificity, then lexically (recursively)
    pub(crate) fn sort_recursive(&mut self) {
        self.children.sort_by(compare_siblings);
        for child in &mut self.children {
            child.sort_recursive();
        }
    }
}

/// Pre-order iterator returned by [`RouteNode::iter`]
pub struct Iter<'a> {
    stack: Vec<&'a RouteNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a RouteNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Specificity rank of a route string: the least specific of its segments
///
/// Static → 0, dynamic → 1, catch-all → 2, optional catch-all → 3.
pub(crate) fn route_rank(route: &str) -> u8 {
    route
        .split('/')
        .filter_map(|segment| classify_segment(segment).ok())
        .map(|kind| kind.rank())
        .max()
        .unwrap_or(0)
}

/// Sibling order: static > dynamic > catch-all > optional catch-all, then by route
fn compare_siblings(a: &RouteNode, b: &RouteNode) -> Ordering {
    route_rank(&a.route)
        .cmp(&route_rank(&b.route))
        .then_with(|| a.route.cmp(&b.route))
        .then_with(|| a.kind.sort_order().cmp(&b.kind.sort_order()))
        .then_with(|| a.context_key.cmp(&b.context_key))
}

/// Dynamic parameters declared by a route string, in order
pub(crate) fn route_params(route: &str) -> Vec<DynamicConvention> {
    route
        .split('/')
        .filter_map(|segment| classify_segment(segment).ok())
        .filter_map(|kind| {
            kind.param().map(|(name, deep)| DynamicConvention {
                name: name.to_string(),
                deep,
            })
        })
        .collect()
}
