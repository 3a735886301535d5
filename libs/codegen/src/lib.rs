//! SDK code generation core
//!
//! Turns a [`CodeTree`] describing a client library into per-method programs
//! that backends render into source code.
//!
//! ## Architecture
//!
//! The generator uses a four-stage pipeline:
//! 1. **Parser**: Loads a JSON model description into a validated tree
//! 2. **Preparation**: Lowers indexers for backends without keyed access
//! 3. **Synthesis**: Resolves each class's polymorphism strategy and
//!    produces an instruction program for every method
//! 4. **Generators**: Render the programs for a target (the outline
//!    generator ships here)
//!
//! The reference interpreter in [`eval`] executes model programs so backends
//! can check their output against it.

pub mod conventions;
pub mod discriminator;
pub mod error;
pub mod eval;
pub mod generators;
pub mod parser;
pub mod synthesis;
pub mod utils;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::debug;

use generators::outline::OutlineGenerator;
use generators::{Generator, GeneratorConfig};
use sdkgen_dom::CodeTree;
use synthesis::TreeSynthesis;

pub use error::Error;

/// Lower every class's indexer when the backend has no keyed-access syntax.
///
/// Returns the number of classes that were lowered.
pub fn prepare_tree(tree: &mut CodeTree, config: &GeneratorConfig) -> error::Result<usize> {
    if config.backend.supports_indexers {
        return Ok(0);
    }
    let mut lowered = 0;
    for class in tree.classes() {
        if tree.lower_indexer(class)? {
            lowered += 1;
        }
    }
    debug!(lowered, backend = %config.backend.name, "prepared tree");
    Ok(lowered)
}

/// Synthesize several independent, already prepared trees in parallel
pub fn synthesize_all(
    trees: &[CodeTree],
    config: &GeneratorConfig,
) -> Vec<error::Result<TreeSynthesis>> {
    trees
        .par_iter()
        .map(|tree| synthesis::synthesize_tree(tree, config))
        .collect()
}

/// Main entry point for code generation
pub struct CodeGenerator {
    tree: CodeTree,
    config: GeneratorConfig,
}

impl CodeGenerator {
    /// Create a new code generator from a JSON description
    pub fn from_description(json: &str, config: GeneratorConfig) -> Result<Self> {
        let tree = parser::parse_description(json).context("loading model description")?;
        Self::from_tree(tree, config)
    }

    /// Create a new code generator from an existing tree
    pub fn from_tree(mut tree: CodeTree, config: GeneratorConfig) -> Result<Self> {
        prepare_tree(&mut tree, &config).context("lowering indexers")?;
        Ok(Self { tree, config })
    }

    /// Get the code tree
    pub fn tree(&self) -> &CodeTree {
        &self.tree
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Synthesize every method of every class
    pub fn synthesize(&self) -> Result<TreeSynthesis> {
        synthesis::synthesize_tree(&self.tree, &self.config).context("synthesizing method bodies")
    }

    /// Generate code with a specific generator
    pub fn generate<G: Generator>(&self, generator: G) -> Result<G::Output> {
        let synthesis = self.synthesize()?;
        generator.generate(&self.tree, &synthesis)
    }
}

/// Convenience helper to render the outline of a description file.
///
/// Returns the number of generated files.
pub fn generate_outline_from_file(
    description_path: &Path,
    output_dir: &Path,
    config: GeneratorConfig,
) -> Result<usize> {
    let json = fs::read_to_string(description_path)
        .with_context(|| format!("reading description {}", description_path.display()))?;

    let codegen = CodeGenerator::from_description(&json, config.clone())?;

    let generator = OutlineGenerator::new(config);
    let output = codegen
        .generate(generator)
        .context("running outline generator")?;

    utils::write_modules(output_dir, &output.modules)?;

    Ok(output.modules.len())
}
