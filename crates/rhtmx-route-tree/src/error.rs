//! Errors and warnings produced while resolving a route tree
//!
//! Resolution distinguishes two families:
//! - [`ResolveError`]: nothing can be built, returned as `Err`
//! - [`RouteWarning`]: a single entry or rule was dropped, collected next to the tree

/// Fatal resolution failure
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The route context itself is unusable
    #[error("invalid route context: {reason}")]
    InvalidInput { reason: String },

    /// An `ignore` expression is not a valid regular expression
    #[error("invalid ignore pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl ResolveError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        ResolveError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Non-fatal problem found while resolving
///
/// Every warning names the offending context key (or rewrite source) so callers
/// can surface it next to the file that caused it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteWarning {
    /// Unbalanced or empty brackets/parentheses; the entry was dropped
    #[error("malformed segment `{segment}` in `{context_key}`: {reason}")]
    MalformedSegment {
        context_key: String,
        segment: String,
        reason: String,
    },

    /// Two entries claim the same tree position; the later one was dropped
    #[error("`{context_key}` collides with `{existing}`: {reason}")]
    SegmentCollision {
        context_key: String,
        existing: String,
        reason: String,
    },

    /// A rewrite or redirect destination matches no route; the rule was dropped
    #[error("`{source_path}` -> `{destination}` does not resolve to an existing route")]
    UnresolvedRewriteTarget {
        source_path: String,
        destination: String,
    },

    /// The loader produced no module (only reported with `verify_modules`)
    #[error("`{context_key}` did not load a module")]
    EmptyModule { context_key: String },
}

impl RouteWarning {
    /// Context key (or rewrite source) the warning is about
    pub fn context_key(&self) -> &str {
        match self {
            RouteWarning::MalformedSegment { context_key, .. }
            | RouteWarning::SegmentCollision { context_key, .. }
            | RouteWarning::EmptyModule { context_key } => context_key,
            RouteWarning::UnresolvedRewriteTarget { source_path, .. } => source_path,
        }
    }
}

/// Collects warnings for one resolution call and logs each as it is reported
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    warnings: Vec<RouteWarning>,
}

impl Diagnostics {
    pub(crate) fn report(&mut self, warning: RouteWarning) {
        tracing::warn!(context_key = warning.context_key(), "{}", warning);
        self.warnings.push(warning);
    }

    pub(crate) fn into_warnings(self) -> Vec<RouteWarning> {
        self.warnings
    }
}
