/// Segment classification for route keys
///
/// Pure functional parsing of one path component into a typed segment.
/// All functions are **pure**: same input → same output, no side effects.

/// Represents the different kinds of path segments
///
/// Functional sum type for pattern matching route segments.
/// Parameter variants carry the parameter name, groups carry their alias labels.
///
/// # Examples
///
/// ```
/// use rhtmx_route_tree::route::pattern::{classify_segment, SegmentKind};
///
/// assert_eq!(classify_segment("about"), Ok(SegmentKind::Static("about".to_string())));
/// assert_eq!(classify_segment("[id]"), Ok(SegmentKind::Dynamic("id".to_string())));
/// assert_eq!(classify_segment("[...slug]"), Ok(SegmentKind::CatchAll("slug".to_string())));
/// assert_eq!(
///     classify_segment("[[...slug]]"),
///     Ok(SegmentKind::OptionalCatchAll("slug".to_string()))
/// );
/// assert_eq!(
///     classify_segment("(app,admin)"),
///     Ok(SegmentKind::Group(vec!["app".to_string(), "admin".to_string()]))
/// );
/// assert!(classify_segment("[id").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Static text segment
    Static(String),
    /// Dynamic segment: [id]
    Dynamic(String),
    /// Catch-all segment: [...slug]
    CatchAll(String),
    /// Optional catch-all segment: [[...slug]]
    OptionalCatchAll(String),
    /// Route group: (name) or (a,b) for aliases
    Group(Vec<String>),
}

impl SegmentKind {
    /// Specificity rank used for child ordering (lower = more specific)
    ///
    /// Static and group segments → 0, dynamic → 1, catch-all → 2,
    /// optional catch-all → 3.
    pub fn rank(&self) -> u8 {
        match self {
            SegmentKind::Static(_) | SegmentKind::Group(_) => 0,
            SegmentKind::Dynamic(_) => 1,
            SegmentKind::CatchAll(_) => 2,
            SegmentKind::OptionalCatchAll(_) => 3,
        }
    }

    /// Parameter name and whether it captures several components
    pub fn param(&self) -> Option<(&str, bool)> {
        match self {
            SegmentKind::Dynamic(name) => Some((name, false)),
            SegmentKind::CatchAll(name) | SegmentKind::OptionalCatchAll(name) => {
                Some((name, true))
            }
            SegmentKind::Static(_) | SegmentKind::Group(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, SegmentKind::Group(_))
    }

    /// Why this parameter segment cannot join a level holding `sibling`
    ///
    /// A static sibling named like the parameter shadows it; a sibling of
    /// the same parameter kind under another name makes the level ambiguous.
    pub fn clash_with(&self, sibling: &SegmentKind) -> Option<SiblingClash> {
        let (name, _) = self.param()?;
        match sibling {
            SegmentKind::Static(text) if text == name => Some(SiblingClash::ShadowedByStatic),
            other
                if std::mem::discriminant(other) == std::mem::discriminant(self)
                    && other.param().map(|(n, _)| n) != Some(name) =>
            {
                Some(SiblingClash::SharedLevel)
            }
            _ => None,
        }
    }
}

/// Reason two segments cannot be siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingClash {
    /// `settings` next to `[settings]`
    ShadowedByStatic,
    /// `[id]` next to `[slug]`
    SharedLevel,
}

impl SiblingClash {
    /// Warning text for `segment` refused next to `sibling` (raw texts)
    pub fn describe(self, segment: &str, sibling: &str) -> String {
        match self {
            SiblingClash::ShadowedByStatic => format!(
                "static segment `{}` takes precedence over `{}`",
                sibling, segment
            ),
            SiblingClash::SharedLevel => format!(
                "dynamic segments `{}` and `{}` share one level",
                sibling, segment
            ),
        }
    }
}

/// One classified path component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Text as written in the key, e.g. `[id]` or `(app)`
    pub raw: String,
    pub kind: SegmentKind,
}

impl Segment {
    /// Classifies `raw` and keeps the original text alongside the kind
    pub fn parse(raw: &str) -> Result<Self, &'static str> {
        classify_segment(raw).map(|kind| Segment {
            raw: raw.to_string(),
            kind,
        })
    }
}

/// Classifies a segment into a [`SegmentKind`] (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Optional catch-all**: `[[...name]]`
/// 2. **Catch-all**: `[...name]`
/// 3. **Dynamic**: `[name]`
/// 4. **Group**: `(name)` or `(a,b,c)`
/// 5. **Static**: any other text without brackets or parentheses
///
/// Anything else (unbalanced `[`, empty names, `[[id]]`, `(a,)`) is rejected
/// with a short reason.
pub fn classify_segment(segment: &str) -> Result<SegmentKind, &'static str> {
    if segment.is_empty() {
        return Err("empty segment");
    }

    if let Some(inner) = segment
        .strip_prefix("[[")
        .and_then(|s| s.strip_suffix("]]"))
    {
        return inner
            .strip_prefix("...")
            .ok_or("double brackets are only valid as `[[...name]]`")
            .and_then(parse_param_name)
            .map(SegmentKind::OptionalCatchAll);
    }

    if let Some(inner) = segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return match inner.strip_prefix("...") {
            Some(name) => parse_param_name(name).map(SegmentKind::CatchAll),
            None => parse_param_name(inner).map(SegmentKind::Dynamic),
        };
    }

    if let Some(inner) = segment.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        return parse_group_labels(inner).map(SegmentKind::Group);
    }

    if segment.contains(['[', ']', '(', ')']) {
        return Err("unbalanced brackets or parentheses");
    }

    Ok(SegmentKind::Static(segment.to_string()))
}

/// Validates a parameter name taken from inside brackets
fn parse_param_name(name: &str) -> Result<String, &'static str> {
    if name.is_empty() {
        return Err("empty parameter name");
    }
    if name.contains(['[', ']', '(', ')', '/']) {
        return Err("unbalanced brackets in parameter name");
    }
    Ok(name.to_string())
}

/// Splits `a,b` into group labels; every label must be non-empty
fn parse_group_labels(inner: &str) -> Result<Vec<String>, &'static str> {
    inner
        .split(',')
        .map(str::trim)
        .map(|label| {
            if label.is_empty() {
                Err("empty group label")
            } else if label.contains(['[', ']', '(', ')', '/']) {
                Err("unbalanced parentheses in group")
            } else {
                Ok(label.to_string())
            }
        })
        .collect()
}
