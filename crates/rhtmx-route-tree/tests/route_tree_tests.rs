//! Integration tests for rhtmx-route-tree
//!
//! Tests are organized by feature area and cover:
//! - Empty and basic trees
//! - Layout nesting and generated layouts
//! - Groups and group aliases
//! - Dynamic metadata and entry points
//! - Collisions and malformed keys
//! - Generated fallbacks and `skip_generated`
//! - API routes, ignore patterns, loaders

use pretty_assertions::assert_eq;
use rhtmx_route_tree::*;
use rstest::rstest;
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn resolve(keys: &[&str], options: &Options) -> Resolution {
    init_tracing();
    get_routes(&InMemoryContext::from_keys(keys.iter().copied()), options).unwrap()
}

fn skip_generated() -> Options {
    Options::default().with_skip_generated(true)
}

fn child_keys(node: &RouteNode) -> Vec<&str> {
    node.children.iter().map(|c| c.context_key.as_str()).collect()
}

// ============================================================================
// Basic trees
// ============================================================================

#[test]
fn test_empty_input_yields_root_only() {
    let resolution = resolve(&[], &Options::default());
    assert_eq!(resolution.tree.route, "");
    assert_eq!(resolution.tree.context_key, ROOT_CONTEXT_KEY);
    assert!(resolution.tree.is_layout());
    assert!(resolution.tree.generated);
    assert!(resolution.tree.is_leaf());
}

#[test]
fn test_flat_routes_snapshot() {
    let resolution = resolve(&["./index", "./about"], &skip_generated());
    assert_eq!(
        resolution.to_json(),
        json!({
            "route": "",
            "contextKey": "./_layout.js",
            "dynamic": null,
            "generated": true,
            "type": "layout",
            "entryPoints": ["./_layout.js"],
            "children": [
                {
                    "route": "about",
                    "contextKey": "./about.js",
                    "dynamic": null,
                    "children": [],
                    "type": "route",
                    "entryPoints": ["./_layout.js", "./about.js"],
                },
                {
                    "route": "index",
                    "contextKey": "./index.js",
                    "dynamic": null,
                    "children": [],
                    "type": "route",
                    "entryPoints": ["./_layout.js", "./index.js"],
                },
            ],
        })
    );
}

#[test]
fn test_extensions_are_kept_in_context_keys() {
    let resolution = resolve(&["./_layout.tsx", "./index.tsx", "./about.ts"], &skip_generated());
    assert_eq!(resolution.tree.context_key, "./_layout.tsx");
    assert!(!resolution.tree.generated);
    assert_eq!(child_keys(&resolution.tree), vec!["./about.ts", "./index.tsx"]);
}

#[test]
fn test_children_ordered_by_specificity() {
    let resolution = resolve(
        &["./[[...all]]", "./[...rest]", "./[id]", "./settings", "./about"],
        &skip_generated(),
    );
    let routes: Vec<&str> = resolution.tree.children.iter().map(|c| c.route.as_str()).collect();
    assert_eq!(routes, vec!["about", "settings", "[id]", "[...rest]", "[[...all]]"]);
}

// ============================================================================
// Layouts
// ============================================================================

#[test]
fn test_nested_layouts() {
    let resolution = resolve(
        &[
            "./_layout",
            "./settings/_layout",
            "./settings/index",
            "./settings/profile",
        ],
        &Options::default(),
    );

    let settings = resolution.tree.find("./settings/_layout.js").unwrap();
    assert!(!settings.generated);
    assert_eq!(settings.route, "settings");
    assert_eq!(
        child_keys(settings),
        vec!["./settings/index.js", "./settings/profile.js"]
    );
    assert_eq!(
        settings.find("./settings/profile.js").unwrap().entry_points().unwrap(),
        &[
            "./_layout.js".to_string(),
            "./settings/_layout.js".to_string(),
            "./settings/profile.js".to_string(),
        ]
    );
}

#[test]
fn test_route_and_directory_with_same_name_coexist() {
    let resolution = resolve(&["./settings", "./settings/profile"], &skip_generated());
    assert!(resolution.warnings.is_empty());
    assert_eq!(
        child_keys(&resolution.tree),
        vec!["./settings.js", "./settings/_layout.js"]
    );
}

#[test]
fn test_generated_layout_kept_when_it_has_real_children() {
    let resolution = resolve(&["./users/[id]"], &skip_generated());
    let users = resolution.tree.find("./users/_layout.js").unwrap();
    assert!(users.generated);
    assert_eq!(child_keys(users), vec!["./users/[id].js"]);
}

#[test]
fn test_layout_and_index_share_a_directory() {
    // Layout wraps the index, the explicit file replaces any generated layout
    let resolution = resolve(&["./docs/index", "./docs/_layout"], &skip_generated());
    let docs = resolution.tree.find("./docs/_layout.js").unwrap();
    assert!(!docs.generated);
    assert_eq!(child_keys(docs), vec!["./docs/index.js"]);
    assert_eq!(resolution.tree.children.len(), 1);
}

// ============================================================================
// Groups
// ============================================================================

#[test]
fn test_group_with_layout_becomes_layout_node() {
    let resolution = resolve(
        &["./(app)/_layout", "./(app)/feed", "./(app)/[user]"],
        &skip_generated(),
    );
    let group = resolution.tree.find("./(app)/_layout.js").unwrap();
    assert_eq!(group.route, "(app)");
    assert_eq!(child_keys(group), vec!["./(app)/feed.js", "./(app)/[user].js"]);
}

#[test]
fn test_group_without_layout_is_transparent() {
    let resolution = resolve(&["./(marketing)/pricing", "./index"], &skip_generated());
    assert_eq!(
        child_keys(&resolution.tree),
        vec!["./index.js", "./(marketing)/pricing.js"]
    );
    assert_eq!(resolution.tree.children[1].route, "pricing");
}

#[test]
fn test_group_aliases_expand_under_their_layouts() {
    let resolution = resolve(&["./(home,search)/_layout", "./(home,search)/[user]"], &skip_generated());
    assert!(resolution.warnings.is_empty());

    for group in ["home", "search"] {
        let layout = resolution
            .tree
            .find(&format!("./({})/_layout.js", group))
            .unwrap();
        assert_eq!(layout.route, format!("({})", group));
        assert_eq!(
            child_keys(layout),
            vec![format!("./({})/[user].js", group).as_str()]
        );
    }
}

// ============================================================================
// Dynamic metadata and entry points
// ============================================================================

#[test]
fn test_dynamic_metadata() {
    let resolution = resolve(&["./[org]/docs/[...path]", "./[org]/index"], &skip_generated());

    let path = resolution.tree.find("./[org]/docs/[...path].js").unwrap();
    assert_eq!(
        serde_json::to_value(&path.dynamic).unwrap(),
        json!([
            { "name": "org", "deep": false },
            { "name": "path", "deep": true },
        ])
    );

    let index = resolution.tree.find("./[org]/index.js").unwrap();
    assert_eq!(
        index.dynamic,
        Some(vec![DynamicConvention {
            name: "org".to_string(),
            deep: false,
        }])
    );
    assert_eq!(resolution.tree.dynamic, None);
}

#[test]
fn test_optional_catch_all_is_deep() {
    let resolution = resolve(&["./[[...all]]"], &skip_generated());
    let all = resolution.tree.find("./[[...all]].js").unwrap();
    assert_eq!(
        all.dynamic,
        Some(vec![DynamicConvention {
            name: "all".to_string(),
            deep: true,
        }])
    );
}

fn check_entry_points(node: &RouteNode, parent: &[String]) {
    if let Some(entry_points) = node.entry_points() {
        let (own, ancestors) = entry_points.split_last().unwrap();
        assert_eq!(own, &node.context_key);
        assert_eq!(ancestors, parent);
        for child in &node.children {
            check_entry_points(child, entry_points);
        }
    }
}

#[test]
fn test_entry_points_extend_parent_chain() {
    let resolution = resolve(
        &[
            "./_layout",
            "./(app)/_layout",
            "./(app)/users/[id]/index",
            "./(app)/users/[id]/posts/[...rest]",
            "./settings/_layout",
            "./settings/index",
        ],
        &Options::default(),
    );
    check_entry_points(&resolution.tree, &[]);
}

// ============================================================================
// Collisions and malformed keys
// ============================================================================

#[test]
fn test_static_and_dynamic_siblings_coexist() {
    let resolution = resolve(&["./[id]", "./settings"], &skip_generated());
    assert!(resolution.warnings.is_empty());
    assert_eq!(child_keys(&resolution.tree), vec!["./settings.js", "./[id].js"]);
}

#[test]
fn test_two_dynamic_names_at_one_level_collide() {
    let resolution = resolve(&["./[id]", "./[slug]"], &skip_generated());
    assert_eq!(child_keys(&resolution.tree), vec!["./[id].js"]);
    assert_eq!(resolution.warnings.len(), 1);
    assert!(matches!(
        &resolution.warnings[0],
        RouteWarning::SegmentCollision { context_key, existing, .. }
            if context_key == "./[slug].js" && existing == "./[id].js"
    ));
}

#[test]
fn test_dynamic_directories_with_different_names_collide() {
    let resolution = resolve(&["./[id]/edit", "./[slug]/view"], &skip_generated());
    assert!(resolution.tree.find("./[id]/edit.js").is_some());
    assert!(resolution.tree.find("./[slug]/view.js").is_none());
    assert_eq!(resolution.warnings[0].context_key(), "./[slug]/view.js");
}

#[test]
fn test_same_dynamic_name_merges() {
    let resolution = resolve(&["./[id]/edit", "./[id]/view"], &skip_generated());
    assert!(resolution.warnings.is_empty());
    let id = resolution.tree.find("./[id]/_layout.js").unwrap();
    assert_eq!(child_keys(id), vec!["./[id]/edit.js", "./[id]/view.js"]);
}

#[test]
fn test_static_wins_over_same_named_dynamic() {
    let resolution = resolve(&["./[settings]", "./settings"], &skip_generated());
    assert_eq!(child_keys(&resolution.tree), vec!["./settings.js"]);
    assert!(matches!(
        &resolution.warnings[..],
        [RouteWarning::SegmentCollision { context_key, .. }] if context_key == "./[settings].js"
    ));
}

#[rstest]
#[case("./users/[id", "[id")]
#[case("./users/id]", "id]")]
#[case("./[]", "[]")]
#[case("./(app/index", "(app")]
#[case("./(a,)/index", "(a,)")]
#[case("./[[id]]", "[[id]]")]
fn test_malformed_key_is_dropped_with_warning(#[case] key: &str, #[case] segment: &str) {
    let resolution = resolve(&[key, "./index"], &skip_generated());
    assert_eq!(child_keys(&resolution.tree), vec!["./index.js"]);
    assert_eq!(resolution.warnings.len(), 1);
    assert!(matches!(
        &resolution.warnings[0],
        RouteWarning::MalformedSegment { segment: s, .. } if s == segment
    ));
}

#[test]
fn test_well_formed_entries_are_all_reachable() {
    let keys = [
        "./_layout",
        "./index",
        "./about",
        "./(app)/_layout",
        "./(app)/feed",
        "./users/[id]",
        "./users/index",
        "./docs/[...slug]",
        "./[[...all]]",
    ];
    let resolution = resolve(&keys, &skip_generated());
    assert!(resolution.warnings.is_empty());
    for key in keys {
        let context_key = format!("{}.js", key);
        assert_eq!(
            resolution.tree.iter().filter(|n| n.context_key == context_key).count(),
            1,
            "{} should appear exactly once",
            context_key
        );
    }
}

#[test]
fn test_resolution_is_idempotent() {
    let keys = ["./[id]", "./[slug]", "./(a,b)/_layout", "./(a,b)/x", "./index"];
    let options = Options::default()
        .with_rewrite("/y", "/x")
        .with_preserve_redirect_and_rewrites(true);

    let context = InMemoryContext::from_keys(keys);
    let first = get_routes(&context, &options).unwrap();
    let second = get_routes(&context, &options).unwrap();
    assert_eq!(first.tree, second.tree);
    assert_eq!(first.warnings, second.warnings);
}

// ============================================================================
// Generated fallbacks
// ============================================================================

#[test]
fn test_fallbacks_added_without_skip_generated() {
    let resolution = resolve(&["./index"], &Options::default());
    let sitemap = resolution.tree.find("./_sitemap.js").unwrap();
    assert!(sitemap.generated);
    assert_eq!(sitemap.route, SITEMAP_ROUTE);
    assert!(resolution.tree.find("./+not-found.js").unwrap().generated);
}

#[test]
fn test_fallbacks_pruned_with_skip_generated() {
    let resolution = resolve(&["./index"], &skip_generated());
    assert!(resolution.tree.find("./_sitemap.js").is_none());
    assert!(resolution.tree.find("./+not-found.js").is_none());
}

#[test]
fn test_user_not_found_is_kept() {
    let resolution = resolve(&["./index", "./+not-found"], &skip_generated());
    let not_found = resolution.tree.find("./+not-found.js").unwrap();
    assert!(!not_found.generated);
    assert_eq!(not_found.route, NOT_FOUND_ROUTE);
}

// ============================================================================
// Filtering and loaders
// ============================================================================

#[test]
fn test_api_routes_hidden_by_default() {
    let resolution = resolve(&["./index", "./users/hello+api"], &skip_generated());
    assert!(resolution.tree.find("./users/hello+api.js").is_none());
    assert!(resolution.tree.find("./users/_layout.js").is_none());
    assert!(resolution.warnings.is_empty());
}

#[test]
fn test_reserved_root_files_are_skipped() {
    let resolution = resolve(&["./index", "./+html", "./+native-intent"], &skip_generated());
    assert_eq!(child_keys(&resolution.tree), vec!["./index.js"]);
}

#[test]
fn test_ignore_patterns() {
    let options = skip_generated().with_ignore(r"^\./components/");
    let resolution = resolve(&["./index", "./components/button"], &options);
    assert_eq!(child_keys(&resolution.tree), vec!["./index.js"]);
    assert!(resolution.warnings.is_empty());
}

#[test]
fn test_load_route_is_carried_unless_stripped() {
    let context = InMemoryContext::new().with_route("./index", LoadRoute::module(7_u8));

    let resolution = get_routes(&context, &Options::default()).unwrap();
    let module = resolution
        .tree
        .find("./index.js")
        .and_then(|n| n.load_route.as_ref())
        .and_then(|load| load.load())
        .unwrap();
    assert_eq!(module.downcast_ref::<u8>(), Some(&7));
    assert!(resolution.tree.load_route.is_none());

    let stripped = get_routes(&context, &Options::default().with_strip_load_route(true)).unwrap();
    assert!(stripped.tree.iter().all(|n| n.load_route.is_none()));
}

#[test]
fn test_unresolvable_key_is_fatal() {
    struct Listing;

    impl RouteContext for Listing {
        fn keys(&self) -> Vec<String> {
            vec!["./index".to_string()]
        }

        fn resolve(&self, _key: &str) -> Option<LoadRoute> {
            None
        }
    }

    assert!(matches!(
        get_routes(&Listing, &Options::default()),
        Err(ResolveError::InvalidInput { .. })
    ));
}

#[test]
fn test_options_from_toml() {
    let options = Options::from_toml_str(
        r#"
        skipGenerated = true
        ignore = ["/\\+html"]
        "#,
    )
    .unwrap();
    let resolution = resolve(&["./index", "./docs/+html"], &options);
    assert_eq!(child_keys(&resolution.tree), vec!["./index.js"]);
}
