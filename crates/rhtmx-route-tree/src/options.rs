// File: src/options.rs
// Purpose: Resolution options, from code or from a TOML file

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// URL rewrite rule: `source` renders whatever `destination` resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteConfig {
    pub source: String,
    pub destination: String,
}

/// URL redirect rule: `source` navigates to `destination`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectConfig {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub permanent: bool,
}

/// Options for one resolution call
///
/// Field names deserialize in camelCase (`skipGenerated`,
/// `preserveRedirectAndRewrites`); the test-only switch keeps its literal
/// name `internal_stripLoadRoute`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Drop generated nodes that have no file-backed descendant
    pub skip_generated: bool,

    /// Rewrite rules, materialized with `preserve_redirect_and_rewrites`
    pub rewrites: Vec<RewriteConfig>,

    /// Redirect rules, materialized with `preserve_redirect_and_rewrites`
    pub redirects: Vec<RedirectConfig>,

    /// Add rewrite/redirect nodes to the tree instead of only validating rules
    pub preserve_redirect_and_rewrites: bool,

    /// Leave loaders out of the output nodes
    #[serde(rename = "internal_stripLoadRoute")]
    pub internal_strip_load_route: bool,

    /// Keep `+api` routes in the navigation tree
    pub preserve_api_routes: bool,

    /// Regular expressions; matching context keys are skipped
    pub ignore: Vec<String>,

    /// Invoke every loader once and warn about the ones yielding nothing
    pub verify_modules: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip_generated(mut self, skip_generated: bool) -> Self {
        self.skip_generated = skip_generated;
        self
    }

    pub fn with_rewrite(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.rewrites.push(RewriteConfig {
            source: source.into(),
            destination: destination.into(),
        });
        self
    }

    pub fn with_redirect(
        mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
        permanent: bool,
    ) -> Self {
        self.redirects.push(RedirectConfig {
            source: source.into(),
            destination: destination.into(),
            permanent,
        });
        self
    }

    pub fn with_preserve_redirect_and_rewrites(mut self, preserve: bool) -> Self {
        self.preserve_redirect_and_rewrites = preserve;
        self
    }

    pub fn with_strip_load_route(mut self, strip: bool) -> Self {
        self.internal_strip_load_route = strip;
        self
    }

    pub fn with_preserve_api_routes(mut self, preserve: bool) -> Self {
        self.preserve_api_routes = preserve;
        self
    }

    pub fn with_ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    pub fn with_verify_modules(mut self, verify: bool) -> Self {
        self.verify_modules = verify;
        self
    }

    /// Compiles `ignore` into one set
    pub(crate) fn ignore_set(&self) -> Result<RegexSet, ResolveError> {
        Ok(RegexSet::new(&self.ignore)?)
    }

    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load options from a TOML file
    ///
    /// A missing or empty file yields the default options.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route options: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse route options: {:?}", path))
    }
}
