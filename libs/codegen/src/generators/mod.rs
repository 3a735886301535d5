//! Generators and their configuration
//!
//! A generator turns a synthesized tree into output files. Each backend
//! implements the `Generator` trait; the outline generator is the
//! language-neutral one shipped here.

pub mod outline;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use sdkgen_dom::CodeTree;

use crate::synthesis::TreeSynthesis;

/// Trait that all generators must implement
pub trait Generator {
    /// The output type of this generator
    type Output;

    /// Generate output from a synthesized tree
    fn generate(&self, tree: &CodeTree, synthesis: &TreeSynthesis) -> Result<Self::Output>;
}

/// What the target backend can express
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendProfile {
    pub name: String,
    /// Native keyed-access syntax; indexers are lowered to methods otherwise
    pub supports_indexers: bool,
    pub supports_raw_url_constructor: bool,
    pub supports_request_builder_backward_compatibility: bool,
}

impl BackendProfile {
    pub fn with_indexers(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supports_indexers: true,
            supports_raw_url_constructor: true,
            supports_request_builder_backward_compatibility: true,
        }
    }

    pub fn without_indexers(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supports_indexers: false,
            supports_raw_url_constructor: false,
            supports_request_builder_backward_compatibility: false,
        }
    }
}

impl Default for BackendProfile {
    fn default() -> Self {
        Self::without_indexers("outline")
    }
}

/// Configuration options for synthesis and generation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Whether to carry descriptions into generated output
    pub generate_docs: bool,
    /// Models keep their values in a backing store
    pub uses_backing_store: bool,
    pub backend: BackendProfile,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generate_docs: true,
            uses_backing_store: false,
            backend: BackendProfile::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: GeneratorConfig = serde_json::from_str(
            r#"{ "usesBackingStore": true, "backend": { "name": "python" } }"#,
        )
        .unwrap();
        assert!(config.uses_backing_store);
        assert!(config.generate_docs);
        assert_eq!(config.backend.name, "python");
        assert!(!config.backend.supports_indexers);
    }
}
