/// Rewrite and redirect synthesis
///
/// Rules are matched by URL pathname: a node's pathname is its ancestors'
/// routes joined under `/`, with groups and `index` elided. Destinations must
/// name an existing route (preferred) or layout; sources attach under the
/// deepest layout whose pathname prefixes them.
use std::collections::HashMap;

use crate::error::{Diagnostics, RouteWarning};
use crate::node::{NodeKind, RouteNode};
use crate::options::Options;
use crate::path::{join_url, normalize_path, PathHierarchy, DEFAULT_EXTENSION};
use crate::route::{classify_segment, RouteFlags};

/// Pathname lookups over the tree built from files
#[derive(Debug, Default)]
struct PathIndex {
    /// Pathname → context key of the node a destination resolves to
    destinations: HashMap<String, String>,
    /// Pathname → child-index path of the first layout serving it
    containers: HashMap<String, Vec<usize>>,
}

impl PathIndex {
    fn build(root: &RouteNode) -> Self {
        let mut routes = Vec::new();
        let mut layouts = vec![("/".to_string(), root.context_key.clone(), Vec::new())];
        collect_pathnames(root, "/", &mut Vec::new(), &mut routes, &mut layouts);

        let mut index = PathIndex::default();
        for (pathname, context_key) in routes {
            index.destinations.entry(pathname).or_insert(context_key);
        }
        for (pathname, context_key, position) in layouts {
            index
                .destinations
                .entry(pathname.clone())
                .or_insert(context_key);
            index.containers.entry(pathname).or_insert(position);
        }
        index
    }

    /// Layout a source attaches under, and the route the new node gets there
    fn container_for(&self, source: &str) -> (&[usize], String) {
        let parent = match source.rfind('/') {
            Some(0) | None => "/",
            Some(slash) => &source[..slash],
        };

        PathHierarchy::new(parent)
            .find_map(|candidate| {
                self.containers.get(candidate).map(|position| {
                    let route = source[candidate.len()..].trim_start_matches('/');
                    (position.as_slice(), route.to_string())
                })
            })
            .unwrap_or_else(|| (&[], source.trim_start_matches('/').to_string()))
    }
}

/// Pre-order walk recording every route and layout pathname
fn collect_pathnames(
    node: &RouteNode,
    pathname: &str,
    position: &mut Vec<usize>,
    routes: &mut Vec<(String, String)>,
    layouts: &mut Vec<(String, String, Vec<usize>)>,
) {
    for (i, child) in node.children.iter().enumerate() {
        if child.is_link() {
            continue;
        }

        let child_pathname = join_url(pathname, &url_tail(child));
        position.push(i);
        if child.is_layout() {
            layouts.push((child_pathname.clone(), child.context_key.clone(), position.clone()));
            collect_pathnames(child, &child_pathname, position, routes, layouts);
        } else {
            routes.push((child_pathname, child.context_key.clone()));
        }
        position.pop();
    }
}

/// URL components a node adds below its parent
fn url_tail(node: &RouteNode) -> String {
    node.route
        .split('/')
        .filter(|segment| !matches!(classify_segment(segment), Ok(kind) if kind.is_group()))
        .filter(|segment| node.is_layout() || !RouteFlags::from_filename(segment).is_index)
        .collect::<Vec<_>>()
        .join("/")
}

fn node_at_mut<'a>(root: &'a mut RouteNode, position: &[usize]) -> Option<&'a mut RouteNode> {
    position
        .iter()
        .try_fold(root, |node, &i| node.children.get_mut(i))
}

/// Context key of a link node: `./{source}.js`
fn link_context_key(source: &str) -> String {
    match source.trim_start_matches('/') {
        "" => format!("./index{}", DEFAULT_EXTENSION),
        path => format!("./{}{}", path, DEFAULT_EXTENSION),
    }
}

/// First sibling a link route cannot sit next to, with the reason
fn sibling_clash(container: &RouteNode, route: &str) -> Option<(String, String)> {
    let head = route.split('/').next()?;
    let kind = classify_segment(head).ok()?;

    container.children.iter().find_map(|sibling| {
        let sibling_head = sibling.route.split('/').next()?;
        let sibling_kind = classify_segment(sibling_head).ok()?;
        kind.clash_with(&sibling_kind)
            .map(|clash| clash.describe(head, sibling_head))
            .or_else(|| {
                sibling_kind
                    .clash_with(&kind)
                    .map(|clash| clash.describe(sibling_head, head))
            })
            .map(|reason| (sibling.context_key.clone(), reason))
    })
}

#[derive(Debug, Clone, Copy)]
enum LinkKind {
    Rewrite,
    Redirect { permanent: bool },
}

impl LinkKind {
    fn node_kind(self, destination_context_key: String) -> NodeKind {
        match self {
            LinkKind::Rewrite => NodeKind::Rewrite {
                destination_context_key,
            },
            LinkKind::Redirect { permanent } => NodeKind::Redirect {
                destination_context_key,
                permanent,
            },
        }
    }
}

/// Validates every rewrite and redirect rule and, with
/// `preserve_redirect_and_rewrites`, attaches a generated node per rule
///
/// A rule is dropped with a warning when its destination resolves to
/// nothing, when its source pathname or context key is already taken, or when
/// its route clashes with a sibling (`[slug]` next to `[id]`).
pub(crate) fn synthesize_links(root: &mut RouteNode, options: &Options, diagnostics: &mut Diagnostics) {
    if options.rewrites.is_empty() && options.redirects.is_empty() {
        return;
    }

    let index = PathIndex::build(root);
    let rules = options
        .rewrites
        .iter()
        .map(|rule| (&rule.source, &rule.destination, LinkKind::Rewrite))
        .chain(options.redirects.iter().map(|rule| {
            (
                &rule.source,
                &rule.destination,
                LinkKind::Redirect {
                    permanent: rule.permanent,
                },
            )
        }));

    let mut added = false;
    for (source, destination, link) in rules {
        let source = normalize_path(source);
        let destination = normalize_path(destination);

        let Some(destination_key) = index.destinations.get(&*destination) else {
            diagnostics.report(RouteWarning::UnresolvedRewriteTarget {
                source_path: source.into_owned(),
                destination: destination.into_owned(),
            });
            continue;
        };

        if !options.preserve_redirect_and_rewrites {
            continue;
        }

        if let Some(existing) = index.destinations.get(&*source) {
            diagnostics.report(RouteWarning::SegmentCollision {
                context_key: link_context_key(&source),
                existing: existing.clone(),
                reason: format!("`{}` is already served by a route", source),
            });
            continue;
        }

        let context_key = link_context_key(&source);
        if let Some(existing) = root.find(&context_key) {
            diagnostics.report(RouteWarning::SegmentCollision {
                context_key: context_key.clone(),
                existing: existing.context_key.clone(),
                reason: format!("`{}` is already defined", source),
            });
            continue;
        }

        let (position, route) = index.container_for(&source);
        let Some(container) = node_at_mut(root, position) else {
            continue;
        };
        if let Some((existing, reason)) = sibling_clash(container, &route) {
            diagnostics.report(RouteWarning::SegmentCollision {
                context_key,
                existing,
                reason,
            });
            continue;
        }

        tracing::debug!(
            context_key = %context_key,
            destination = %destination_key,
            "adding {:?} node",
            link
        );
        container.children.push(
            RouteNode::new(route, context_key, link.node_kind(destination_key.clone()))
                .with_generated(true),
        );
        added = true;
    }

    if added {
        root.sort_recursive();
    }
}
