//! Scintilla Interface Binding Generator
//!
//! This library reads a Scintilla-style interface description and generates the
//! glue code of a C++ binding from it.
//!
//! ## Architecture
//!
//! The generator uses a three-stage pipeline:
//! 1. **Parser**: Reads `.iface` documents (or their JSON rendition) into ordered feature records
//! 2. **IR (Intermediate Representation)**: Normalized, cross-referenced interface model
//! 3. **Generators**: Target-specific section renderers and template splicing
//!
//! Rendering never re-reads the description, so further targets only need a new generator.

pub mod error;
pub mod generators;
pub mod ir;
pub mod naming;
pub mod parser;
pub mod utils;

pub use error::{Error, Result};

use std::fs;
use std::path::Path;

use anyhow::Context;
use generators::cpp::CppGenerator;
use generators::{Generator, GeneratorConfig};
use ir::Interface;
use parser::FeatureSet;

/// Main entry point for code generation
pub struct CodeGenerator {
    iface: Interface,
}

impl CodeGenerator {
    /// Build the interface model from already-read feature records
    pub fn from_features(features: &FeatureSet) -> Result<Self> {
        let iface = ir::build(features)?;
        Ok(Self { iface })
    }

    /// Read an interface description and build its model
    pub fn from_path(path: &Path) -> Result<Self> {
        let features = parser::read_features(path)?;
        Self::from_features(&features)
    }

    /// Get the interface model
    pub fn interface(&self) -> &Interface {
        &self.iface
    }

    /// Generate code with a specific generator
    pub fn generate<G: Generator>(&self, generator: G) -> Result<G::Output> {
        generator.generate(&self.iface)
    }
}

/// Convenience helper to build a C++ binding from an interface description and a
/// template document.
///
/// Nothing is written when any stage fails. Returns whether the output was written.
pub fn generate_binding(
    iface_path: &Path,
    template_path: &Path,
    output: &Path,
    config: GeneratorConfig,
) -> anyhow::Result<bool> {
    let codegen = CodeGenerator::from_path(iface_path)
        .with_context(|| format!("building interface model from {}", iface_path.display()))?;

    let template = fs::read_to_string(template_path)
        .with_context(|| format!("reading template {}", template_path.display()))?;

    let binding = codegen
        .generate(CppGenerator::new(config))
        .context("running C++ generator")?;

    let written = utils::write_if_changed(&binding.splice(&template), output)
        .with_context(|| format!("writing {}", output.display()))?;

    Ok(written)
}
