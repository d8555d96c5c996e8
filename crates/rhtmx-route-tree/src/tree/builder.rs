/// Tree builder: folds classified routes into one layout tree
///
/// Positions live in an arena indexed by `(parent, slot kind, route)`, so a
/// second file resolving to an occupied position merges into (or collides
/// with) the node already there instead of duplicating it.
use std::collections::{HashMap, HashSet};

use crate::context::{Entry, LoadRoute};
use crate::error::{Diagnostics, RouteWarning};
use crate::node::RouteNode;
use crate::options::Options;
use crate::path::DEFAULT_EXTENSION;
use crate::route::{parse_route, ParsedRoute, RouteFlags, Segment, SegmentKind};

/// Context key of the root layout when no `./_layout` file exists
pub const ROOT_CONTEXT_KEY: &str = "./_layout.js";

/// Generated root routes added when the app does not provide them
pub const SITEMAP_ROUTE: &str = "_sitemap";
pub const NOT_FOUND_ROUTE: &str = "+not-found";

/// Root files that configure the app rather than name a screen
const RESERVED_ROOT_FILES: [&str; 2] = ["+html", "+native-intent"];

const ROOT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SlotKind {
    Layout,
    Route,
}

#[derive(Debug)]
struct Slot {
    route: String,
    context_key: String,
    /// Physical file behind the slot, `None` while generated
    source_key: Option<String>,
    kind: SlotKind,
    segment: SegmentKind,
    flags: RouteFlags,
    load_route: Option<LoadRoute>,
    children: Vec<usize>,
}

impl Slot {
    fn is_generated(&self) -> bool {
        self.source_key.is_none()
    }
}

/// One level an entry passes through on its way down the tree
struct Step<'a> {
    segment: &'a Segment,
    slot: SlotKind,
    /// Raw directory path up to and including this level
    directory: String,
}

/// How an entry met the node already at its position
enum Placement {
    Placed,
    Merged,
    Collided { existing: String, reason: String },
}

struct TreeBuilder {
    slots: Vec<Slot>,
    index: HashMap<(usize, SlotKind, String), usize>,
    /// Directories (raw paths, aliases expanded) holding a `_layout` file
    layout_dirs: HashSet<String>,
}

impl TreeBuilder {
    fn new(layout_dirs: HashSet<String>) -> Self {
        Self {
            slots: vec![Slot {
                route: String::new(),
                context_key: ROOT_CONTEXT_KEY.to_string(),
                source_key: None,
                kind: SlotKind::Layout,
                segment: SegmentKind::Static(String::new()),
                flags: RouteFlags::default(),
                load_route: None,
                children: Vec::new(),
            }],
            index: HashMap::new(),
            layout_dirs,
        }
    }

    /// Levels a route occupies: one layout per directory (groups only when
    /// they carry a `_layout`), then the route itself unless it is a layout
    fn steps<'a>(&self, parsed: &'a ParsedRoute) -> Vec<Step<'a>> {
        let mut steps: Vec<Step<'a>> = parsed
            .directories
            .iter()
            .enumerate()
            .map(|(depth, segment)| Step {
                segment,
                slot: SlotKind::Layout,
                directory: parsed.directory_path(depth + 1),
            })
            .filter(|step| {
                !step.segment.kind.is_group() || self.layout_dirs.contains(&step.directory)
            })
            .collect();

        if !parsed.flags.is_layout {
            steps.push(Step {
                segment: &parsed.file,
                slot: SlotKind::Route,
                directory: parsed.directory_path(parsed.directories.len()),
            });
        }
        steps
    }

    fn child(&self, parent: usize, slot: SlotKind, route: &str) -> Option<usize> {
        self.index.get(&(parent, slot, route.to_string())).copied()
    }

    /// Checks a segment against its future siblings
    fn conflict(&self, parent: usize, segment: &Segment) -> Option<(String, String)> {
        self.slots[parent]
            .children
            .iter()
            .map(|&id| &self.slots[id])
            .find_map(|sibling| {
                segment.kind.clash_with(&sibling.segment).map(|clash| {
                    (
                        sibling.context_key.clone(),
                        clash.describe(&segment.raw, &sibling.route),
                    )
                })
            })
    }

    fn push(&mut self, parent: usize, slot: Slot) -> usize {
        let id = self.slots.len();
        self.index
            .insert((parent, slot.kind, slot.route.clone()), id);
        self.slots[parent].children.push(id);
        self.slots.push(slot);
        id
    }

    fn find_or_create_layout(&mut self, parent: usize, step: &Step<'_>) -> usize {
        if let Some(id) = self.child(parent, SlotKind::Layout, &step.segment.raw) {
            return id;
        }

        let context_key = format!("./{}/_layout{}", step.directory, DEFAULT_EXTENSION);
        tracing::debug!(context_key = %context_key, "generating layout");
        self.push(
            parent,
            Slot {
                route: step.segment.raw.clone(),
                context_key,
                source_key: None,
                kind: SlotKind::Layout,
                segment: step.segment.kind.clone(),
                flags: RouteFlags::default(),
                load_route: None,
                children: Vec::new(),
            },
        )
    }

    /// A `_layout` file takes over the layout at its directory's position
    fn claim_layout(&mut self, id: usize, parsed: &ParsedRoute, load_route: LoadRoute) -> Placement {
        let slot = &mut self.slots[id];
        if slot.is_generated() {
            slot.context_key = parsed.context_key.clone();
            slot.source_key = Some(parsed.source_key.clone());
            slot.load_route = Some(load_route);
            return Placement::Placed;
        }

        if slot.source_key.as_deref() == Some(parsed.source_key.as_str()) {
            Placement::Merged
        } else {
            Placement::Collided {
                existing: slot.context_key.clone(),
                reason: "two layouts resolve to the same position".to_string(),
            }
        }
    }

    fn add_route(
        &mut self,
        parent: usize,
        step: &Step<'_>,
        parsed: &ParsedRoute,
        load_route: LoadRoute,
    ) -> Placement {
        if let Some(id) = self.child(parent, SlotKind::Route, &step.segment.raw) {
            let existing = &self.slots[id];
            return if existing.source_key.as_deref() == Some(parsed.source_key.as_str()) {
                Placement::Merged
            } else {
                Placement::Collided {
                    existing: existing.context_key.clone(),
                    reason: format!("both resolve to route `{}`", step.segment.raw),
                }
            };
        }

        self.push(
            parent,
            Slot {
                route: step.segment.raw.clone(),
                context_key: parsed.context_key.clone(),
                source_key: Some(parsed.source_key.clone()),
                kind: SlotKind::Route,
                segment: step.segment.kind.clone(),
                flags: parsed.flags,
                load_route: Some(load_route),
                children: Vec::new(),
            },
        );
        Placement::Placed
    }

    /// Inserts one route: check every level for collisions first, then commit
    fn insert(&mut self, parsed: &ParsedRoute, load_route: LoadRoute) -> Placement {
        let steps = self.steps(parsed);

        let mut parent = Some(ROOT);
        for step in &steps {
            let Some(id) = parent else { break };
            if let Some((existing, reason)) = self.conflict(id, step.segment) {
                return Placement::Collided { existing, reason };
            }
            parent = self.child(id, step.slot, &step.segment.raw);
        }

        let mut parent = ROOT;
        for step in steps.iter().filter(|s| s.slot == SlotKind::Layout) {
            parent = self.find_or_create_layout(parent, step);
        }

        match steps.last().filter(|s| s.slot == SlotKind::Route) {
            Some(leaf) => self.add_route(parent, leaf, parsed, load_route),
            None => self.claim_layout(parent, parsed, load_route),
        }
    }

    /// Whether a route directly under the root satisfies `provides`
    fn has_root_route(&self, provides: impl Fn(&Slot) -> bool) -> bool {
        self.slots[ROOT]
            .children
            .iter()
            .map(|&id| &self.slots[id])
            .any(|slot| slot.kind == SlotKind::Route && provides(slot))
    }

    /// Adds the `_sitemap` and `+not-found` routes the app does not provide
    fn add_fallback_routes(&mut self) {
        if !self.has_root_route(|slot| slot.route == SITEMAP_ROUTE) {
            self.add_generated_route(SITEMAP_ROUTE);
        }
        if !self.has_root_route(|slot| slot.flags.is_not_found) {
            self.add_generated_route(NOT_FOUND_ROUTE);
        }
    }

    fn add_generated_route(&mut self, route: &str) {
        let context_key = format!("./{}{}", route, DEFAULT_EXTENSION);
        tracing::debug!(context_key = %context_key, "generating fallback route");
        self.push(
            ROOT,
            Slot {
                route: route.to_string(),
                context_key,
                source_key: None,
                kind: SlotKind::Route,
                segment: SegmentKind::Static(route.to_string()),
                flags: RouteFlags::from_filename(route),
                load_route: None,
                children: Vec::new(),
            },
        );
    }

    fn to_node(&self, id: usize, strip_load_route: bool) -> RouteNode {
        let slot = &self.slots[id];
        let mut node = match slot.kind {
            SlotKind::Layout => RouteNode::layout(&slot.route, &slot.context_key),
            SlotKind::Route => RouteNode::page(&slot.route, &slot.context_key),
        }
        .with_generated(slot.is_generated());

        if !strip_load_route {
            node.load_route = slot.load_route.clone();
        }
        node.children = slot
            .children
            .iter()
            .map(|&child| self.to_node(child, strip_load_route))
            .collect();
        node
    }
}

/// Whether a classified route belongs in the navigation tree at all
fn is_navigable(parsed: &ParsedRoute, options: &Options) -> bool {
    if parsed.flags.is_api && !options.preserve_api_routes {
        tracing::debug!(context_key = %parsed.context_key, "skipping api route");
        return false;
    }
    if parsed.directories.is_empty() && RESERVED_ROOT_FILES.contains(&parsed.file.raw.as_str()) {
        tracing::debug!(context_key = %parsed.context_key, "skipping reserved root file");
        return false;
    }
    true
}

/// Builds the layout tree for the collected entries
///
/// Entries are inserted most specific first (static before dynamic at the
/// first level where they differ), then by context key; on a collision the
/// entry inserted first survives.
pub(crate) fn build_tree(
    entries: &[Entry],
    options: &Options,
    diagnostics: &mut Diagnostics,
) -> RouteNode {
    let mut parsed_routes: Vec<(ParsedRoute, LoadRoute)> = Vec::new();
    for entry in entries {
        match parse_route(&entry.key) {
            Ok(routes) => parsed_routes.extend(
                routes
                    .into_iter()
                    .filter(|parsed| is_navigable(parsed, options))
                    .map(|parsed| (parsed, entry.load_route.clone())),
            ),
            Err(malformed) => diagnostics.report(RouteWarning::MalformedSegment {
                context_key: entry.key.context_key(),
                segment: malformed.segment,
                reason: malformed.reason.to_string(),
            }),
        }
    }

    let layout_dirs: HashSet<String> = parsed_routes
        .iter()
        .filter(|(parsed, _)| parsed.flags.is_layout)
        .map(|(parsed, _)| parsed.directory_path(parsed.directories.len()))
        .collect();
    let mut builder = TreeBuilder::new(layout_dirs);

    let mut ordered: Vec<(Vec<u8>, ParsedRoute, LoadRoute)> = parsed_routes
        .into_iter()
        .map(|(parsed, load_route)| {
            let ranks = builder
                .steps(&parsed)
                .iter()
                .map(|step| step.segment.kind.rank())
                .collect();
            (ranks, parsed, load_route)
        })
        .collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.context_key.cmp(&b.1.context_key)));

    let mut placed_any = false;
    for (_, parsed, load_route) in ordered {
        match builder.insert(&parsed, load_route) {
            Placement::Placed => placed_any = true,
            Placement::Merged => {
                tracing::debug!(context_key = %parsed.context_key, "merged into existing position");
            }
            Placement::Collided { existing, reason } => {
                diagnostics.report(RouteWarning::SegmentCollision {
                    context_key: parsed.context_key.clone(),
                    existing,
                    reason,
                });
            }
        }
    }

    if placed_any {
        builder.add_fallback_routes();
    }

    let mut root = builder.to_node(ROOT, options.internal_strip_load_route);
    root.sort_recursive();
    root
}
