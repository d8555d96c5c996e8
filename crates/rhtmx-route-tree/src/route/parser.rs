/// Route key parsing and group alias expansion
///
/// Pure functional parsers that turn one route key into one or more
/// classified routes. All functions are **pure**: same input → same output.
use super::pattern::{Segment, SegmentKind};
use crate::path::RouteKey;

/// Special-file flags taken from the last segment of a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteFlags {
    /// `_layout`
    pub is_layout: bool,
    /// `index`
    pub is_index: bool,
    /// `+not-found`
    pub is_not_found: bool,
    /// `name+api`
    pub is_api: bool,
}

impl RouteFlags {
    /// Flags for a filename without extension
    pub fn from_filename(name: &str) -> Self {
        RouteFlags {
            is_layout: name == "_layout",
            is_index: name == "index",
            is_not_found: name == "+not-found",
            is_api: name.ends_with("+api"),
        }
    }
}

/// A key segment that could not be classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSegment {
    pub segment: String,
    pub reason: &'static str,
}

/// One classified route produced from a key
///
/// A key whose groups list aliases (`(a,b)`) yields one `ParsedRoute` per
/// alias combination; they share `source_key` but differ in `context_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRoute {
    /// Context key of this alias, e.g. `./(a)/home.js`
    pub context_key: String,
    /// Context key of the physical file, e.g. `./(a,b)/home.js`
    pub source_key: String,
    /// Directory segments, outermost first
    pub directories: Vec<Segment>,
    /// Filename segment
    pub file: Segment,
    pub flags: RouteFlags,
}

impl ParsedRoute {
    /// Raw directory path of the first `depth` directories, e.g. `(app)/users`
    pub fn directory_path(&self, depth: usize) -> String {
        self.directories[..depth]
            .iter()
            .map(|s| s.raw.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Accumulator for fold-based parsing: every alias expansion built so far
struct ParseState {
    expansions: Vec<Vec<Segment>>,
}

impl Default for ParseState {
    fn default() -> Self {
        Self {
            expansions: vec![Vec::new()],
        }
    }
}

impl ParseState {
    /// Appends a segment to every expansion
    fn with_segment(mut self, segment: Segment) -> Self {
        for expansion in &mut self.expansions {
            expansion.push(segment.clone());
        }
        self
    }

    /// Forks every expansion once per group label
    fn with_group_aliases(self, labels: &[String]) -> Self {
        let expansions = self
            .expansions
            .into_iter()
            .flat_map(|prefix| {
                labels.iter().map(move |label| {
                    let mut expansion = prefix.clone();
                    expansion.push(group_segment(label));
                    expansion
                })
            })
            .collect();
        Self { expansions }
    }
}

fn group_segment(label: &str) -> Segment {
    Segment {
        raw: format!("({})", label),
        kind: SegmentKind::Group(vec![label.to_string()]),
    }
}

/// Processes a single raw segment and updates the parse state
fn process_segment(state: ParseState, raw: &str) -> Result<ParseState, MalformedSegment> {
    let segment = Segment::parse(raw).map_err(|reason| MalformedSegment {
        segment: raw.to_string(),
        reason,
    })?;

    Ok(match &segment.kind {
        SegmentKind::Group(labels) => state.with_group_aliases(labels),
        _ => state.with_segment(segment),
    })
}

/// Parses a route key into classified routes (pure function)
///
/// Uses functional composition:
/// - `segments()` - break the key into components
/// - `try_fold` - accumulate alias expansions, stopping at the first malformed segment
/// - `map` - split every expansion into directories + filename
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::path::parse_route_key;
/// use rhtmx_route_tree::route::parser::parse_route;
///
/// let key = parse_route_key("./(a,b)/[id]").unwrap();
/// let routes = parse_route(&key).unwrap();
///
/// let keys: Vec<&str> = routes.iter().map(|r| r.context_key.as_str()).collect();
/// assert_eq!(keys, vec!["./(a)/[id].js", "./(b)/[id].js"]);
/// assert!(routes.iter().all(|r| r.source_key == "./(a,b)/[id].js"));
/// ```
pub fn parse_route(key: &RouteKey) -> Result<Vec<ParsedRoute>, MalformedSegment> {
    let state = key
        .segments()
        .try_fold(ParseState::default(), process_segment)?;
    let source_key = key.context_key();

    state
        .expansions
        .into_iter()
        .map(|mut segments| {
            let file = segments.pop().ok_or(MalformedSegment {
                segment: String::new(),
                reason: "empty route key",
            })?;
            if file.kind.is_group() {
                return Err(MalformedSegment {
                    segment: file.raw,
                    reason: "a group cannot name a route file",
                });
            }

            let context_key = format!(
                "./{}{}",
                segments
                    .iter()
                    .chain(std::iter::once(&file))
                    .map(|s| s.raw.as_str())
                    .collect::<Vec<_>>()
                    .join("/"),
                key.extension
            );

            Ok(ParsedRoute {
                context_key,
                source_key: source_key.clone(),
                directories: segments,
                flags: RouteFlags::from_filename(&file.raw),
                file,
            })
        })
        .collect()
}
