/// Route module for route-key classification
///
/// Contains pure functional components for parsing route keys:
/// - `pattern` - classify one segment (static, dynamic, catch-all, group)
/// - `parser` - classify a whole key and expand group aliases
pub mod parser;
pub mod pattern;

// Re-export commonly used types
pub use parser::{parse_route, MalformedSegment, ParsedRoute, RouteFlags};
pub use pattern::{classify_segment, Segment, SegmentKind, SiblingClash};
