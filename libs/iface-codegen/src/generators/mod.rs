//! Code generators for interface models
//!
//! Each target binding has its own module that implements the `Generator` trait.

pub mod cpp;
mod writer;

pub use writer::CodeWriter;

use crate::ir::Interface;
use crate::Result;

/// Trait that all binding generators must implement
pub trait Generator {
    /// The output type of this generator
    type Output;

    /// Generate code from the interface model
    fn generate(&self, iface: &Interface) -> Result<Self::Output>;
}

/// Line prepended to every spliced document.
pub const DEFAULT_HEADER: &str = "// This file is auto-generated, do not edit.";

/// Configuration options for code generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// String repeated once per indentation level
    pub indent_unit: String,
    /// Header line written before the template document
    pub header: String,
    /// Check every function signature against the template catalog before rendering
    pub validate_catalog: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent_unit: "\t".to_string(),
            header: DEFAULT_HEADER.to_string(),
            validate_catalog: true,
        }
    }
}
