/// Tree finalization: pruning, entry points and dynamic metadata
use crate::node::{route_params, DynamicConvention, NodeKind, RouteNode};
use crate::options::Options;

/// Finishes a built tree
///
/// With `skip_generated`, generated nodes left without any file-backed or
/// link descendant are removed first (the root always stays). Then every
/// node gets its `entryPoints` and `dynamic` from its ancestry.
pub(crate) fn finalize(mut root: RouteNode, options: &Options) -> RouteNode {
    if options.skip_generated {
        prune_generated(&mut root);
    }
    assign_ancestry(&mut root, &[], &[]);
    root
}

fn prune_generated(node: &mut RouteNode) {
    node.children.retain_mut(|child| {
        prune_generated(child);
        let keep = !child.generated || child.is_link() || !child.children.is_empty();
        if !keep {
            tracing::debug!(context_key = %child.context_key, "pruning generated node");
        }
        keep
    });
}

fn assign_ancestry(
    node: &mut RouteNode,
    parent_entry_points: &[String],
    parent_dynamic: &[DynamicConvention],
) {
    let mut dynamic = parent_dynamic.to_vec();
    dynamic.extend(route_params(&node.route));
    node.dynamic = (!dynamic.is_empty()).then(|| dynamic.clone());

    let mut entry_points = parent_entry_points.to_vec();
    if let NodeKind::Route { entry_points: own } | NodeKind::Layout { entry_points: own } =
        &mut node.kind
    {
        entry_points.push(node.context_key.clone());
        own.clone_from(&entry_points);
    }

    for child in &mut node.children {
        assign_ancestry(child, &entry_points, &dynamic);
    }
}
