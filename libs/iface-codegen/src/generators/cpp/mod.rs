//! C++ binding generator
//!
//! Renders every [`Section`] of the binding and splices the fragments into a template
//! document at their placeholder tokens.

pub mod catalog;
pub mod sections;

pub use catalog::Signature;

use crate::generators::{CodeWriter, Generator, GeneratorConfig};
use crate::ir::Interface;
use crate::Result;

/// An output fragment and the placeholder it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Enums,
    LexerNames,
    LexerStyleDefs,
    LexerStyleRefs,
    Methods,
    ConstantUndefs,
    ConstantDecls,
    Properties,
    Signals,
    SignalAccessors,
}

/// What happens to trailing whitespace of a rendered fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trailing {
    Trim,
    TrimKeepNewline,
    Keep,
}

impl Section {
    /// Splice order.
    pub const ALL: [Section; 10] = [
        Section::Enums,
        Section::LexerNames,
        Section::LexerStyleDefs,
        Section::LexerStyleRefs,
        Section::Methods,
        Section::ConstantUndefs,
        Section::ConstantDecls,
        Section::Properties,
        Section::Signals,
        Section::SignalAccessors,
    ];

    pub fn placeholder(self) -> &'static str {
        match self {
            Section::Enums => "/*@@enums@@*/",
            Section::LexerNames => "/*@@lexer_names@@*/",
            Section::LexerStyleDefs => "/*@@lexer_style_defs@@*/",
            Section::LexerStyleRefs => "/*@@lexer_style_refs@@*/",
            Section::Methods => "/*@@methods@@*/",
            Section::ConstantUndefs => "/*@@constant_undefs@@*/",
            Section::ConstantDecls => "/*@@constant_decls@@*/",
            Section::Properties => "/*@@properties@@*/",
            Section::Signals => "/*@@signals@@*/",
            Section::SignalAccessors => "/*@@signal_accessors@@*/",
        }
    }

    /// Indentation level the fragment starts at.
    pub fn level(self) -> usize {
        match self {
            Section::ConstantUndefs => 0,
            Section::Enums | Section::LexerStyleDefs => 1,
            _ => 2,
        }
    }

    fn trailing(self) -> Trailing {
        match self {
            Section::LexerStyleDefs => Trailing::TrimKeepNewline,
            Section::LexerStyleRefs | Section::ConstantUndefs | Section::ConstantDecls => {
                Trailing::Keep
            }
            _ => Trailing::Trim,
        }
    }

    /// Render this section of the binding.
    pub fn render(self, iface: &Interface, config: &GeneratorConfig) -> Result<String> {
        let mut w = CodeWriter::new(self.level(), &config.indent_unit);
        match self {
            Section::Enums => sections::enums(iface, &mut w),
            Section::LexerNames => sections::lexer_names(iface, &mut w),
            Section::LexerStyleDefs => sections::lexer_style_defs(iface, &mut w),
            Section::LexerStyleRefs => sections::lexer_style_refs(iface, &mut w),
            Section::Methods => sections::functions(iface, &mut w)?,
            Section::ConstantUndefs => sections::constant_undefs(iface, &mut w),
            Section::ConstantDecls => sections::constant_decls(iface, &mut w),
            Section::Properties => sections::properties(iface, &mut w)?,
            Section::Signals => sections::signals(iface, &mut w),
            Section::SignalAccessors => sections::signal_accessors(iface, &mut w),
        }

        let text = w.into_string();
        Ok(match self.trailing() {
            Trailing::Trim => text.trim_end().to_string(),
            Trailing::TrimKeepNewline => format!("{}\n", text.trim_end()),
            Trailing::Keep => text,
        })
    }
}

/// Output of the C++ generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOutput {
    header: String,
    /// Rendered fragments in splice order
    fragments: Vec<(Section, String)>,
}

impl BindingOutput {
    pub fn get(&self, section: Section) -> Option<&str> {
        self.fragments
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, text)| text.as_str())
    }

    pub fn fragments(&self) -> impl Iterator<Item = (Section, &str)> {
        self.fragments.iter().map(|(s, text)| (*s, text.as_str()))
    }

    /// Prepend the header line and replace every placeholder occurrence.
    ///
    /// Unknown placeholders are left as they are.
    pub fn splice(&self, template: &str) -> String {
        let mut text = format!("{}\n{}", self.header, template);
        for (section, fragment) in &self.fragments {
            text = text.replace(section.placeholder(), fragment);
        }
        text
    }
}

/// C++ binding generator
pub struct CppGenerator {
    config: GeneratorConfig,
}

impl CppGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn new_default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl Generator for CppGenerator {
    type Output = BindingOutput;

    fn generate(&self, iface: &Interface) -> Result<Self::Output> {
        if self.config.validate_catalog {
            catalog::validate(iface)?;
        }

        let mut fragments = Vec::with_capacity(Section::ALL.len());
        for section in Section::ALL {
            tracing::debug!(?section, "rendering section");
            fragments.push((section, section.render(iface, &self.config)?));
        }

        Ok(BindingOutput {
            header: self.config.header.clone(),
            fragments,
        })
    }
}
