//! Intermediate Representation (IR)
//!
//! The normalized, cross-referenced interface model built from raw feature records.
//! Every entity is owned by [`Interface`]; the symbol table refers to entities by
//! position in the owning collection, so a lookup never outlives the model.

mod builder;

pub use builder::build;

use crate::parser::FeatureSet;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// A named integer constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constant {
    pub name: String,
    pub value: i64,
    pub comment: Vec<String>,
}

/// A constant owned by an enumeration (an enumerator) or a lexer (a style).
///
/// `name` is the canonical short name produced by prefix stripping; `raw_name` is
/// the name declared in the interface description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    pub raw_name: String,
    pub value: i64,
    pub comment: Vec<String>,
}

pub type Enumerator = Member;
pub type Style = Member;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enumeration {
    pub name: String,
    /// Identifier prefixes that mark membership, in declaration order.
    pub prefixes: IndexSet<String>,
    pub enumerators: Vec<Enumerator>,
    pub comment: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lexer {
    pub name: String,
    /// Lexer id, resolved through the symbol named by `ident`.
    pub value: i64,
    pub ident: String,
    pub prefixes: IndexSet<String>,
    pub styles: Vec<Style>,
    pub comment: Vec<String>,
}

impl Lexer {
    /// Highest style number, zero when the lexer has no styles.
    pub fn max_style(&self) -> i64 {
        self.styles.iter().map(|s| s.value).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// `None` for an unused slot.
    pub type_name: Option<String>,
    /// snake_case parameter name.
    pub name: String,
    pub value: String,
    pub comment: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    /// snake_case name.
    pub name: String,
    /// Message number.
    pub value: i64,
    pub return_type: String,
    pub parameters: [Parameter; 2],
    pub comment: Vec<String>,
}

/// A getter/setter pair sharing one normalized name. At least one side is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub getter: Option<Function>,
    pub setter: Option<Function>,
}

impl Property {
    /// Accessors in rendering order: getter first, then setter.
    pub fn accessors(&self) -> impl Iterator<Item = &Function> {
        self.getter.iter().chain(self.setter.iter())
    }
}

/// A notification with a variable-length parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub name: String,
    pub value: i64,
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub comment: Vec<String>,
}

/// Placeholder type used in signatures for a parameter slot without a type.
pub const NO_TYPE: &str = "void";
/// Separator between the parts of a type signature.
pub const SIGNATURE_SEPARATOR: &str = "_";

/// Shared view of functions and events used by the code generators.
pub trait Callable {
    fn name(&self) -> &str;
    fn value(&self) -> i64;
    fn return_type(&self) -> &str;
    fn parameters(&self) -> &[Parameter];
    fn comment(&self) -> &[String];

    /// Return type followed by each parameter type, e.g. `int_void_stringresult`.
    fn type_signature(&self) -> String {
        std::iter::once(self.return_type())
            .chain(
                self.parameters()
                    .iter()
                    .map(|p| p.type_name.as_deref().unwrap_or(NO_TYPE)),
            )
            .collect::<Vec<_>>()
            .join(SIGNATURE_SEPARATOR)
    }
}

impl Callable for Function {
    fn name(&self) -> &str {
        &self.name
    }
    fn value(&self) -> i64 {
        self.value
    }
    fn return_type(&self) -> &str {
        &self.return_type
    }
    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
    fn comment(&self) -> &[String] {
        &self.comment
    }
}

impl Callable for Event {
    fn name(&self) -> &str {
        &self.name
    }
    fn value(&self) -> i64 {
        self.value
    }
    fn return_type(&self) -> &str {
        &self.return_type
    }
    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
    fn comment(&self) -> &[String] {
        &self.comment
    }
}

/// Where a symbol lives inside the [`Interface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolRef {
    Constant { index: usize },
    Enumeration { index: usize },
    Enumerator { enumeration: usize, index: usize },
    Lexer { index: usize },
    Function { index: usize },
    Property { index: usize },
    Event { index: usize },
}

/// A borrowed entity of any kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity<'a> {
    Constant(&'a Constant),
    Enumeration(&'a Enumeration),
    Enumerator(&'a Enumerator),
    Lexer(&'a Lexer),
    Function(&'a Function),
    Property(&'a Property),
    Event(&'a Event),
}

impl Entity<'_> {
    /// Numeric value carried by the entity, if it has one.
    pub fn value(&self) -> Option<i64> {
        match self {
            Entity::Constant(c) => Some(c.value),
            Entity::Enumerator(e) => Some(e.value),
            Entity::Lexer(l) => Some(l.value),
            Entity::Function(f) => Some(f.value),
            Entity::Event(e) => Some(e.value),
            Entity::Enumeration(_) | Entity::Property(_) => None,
        }
    }
}

/// The aggregate root of the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub(crate) constants: Vec<Constant>,
    pub(crate) properties: Vec<Property>,
    pub(crate) functions: Vec<Function>,
    pub(crate) events: Vec<Event>,
    pub(crate) enumerations: Vec<Enumeration>,
    pub(crate) lexers: Vec<Lexer>,
    pub(crate) symbols: IndexMap<String, SymbolRef>,
}

impl Interface {
    /// Build the model from an ordered feature set.
    pub fn from_features(features: &FeatureSet) -> crate::Result<Self> {
        build(features)
    }

    /// Free-standing constants in declaration order.
    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn enumerations(&self) -> &[Enumeration] {
        &self.enumerations
    }

    pub fn lexers(&self) -> &[Lexer] {
        &self.lexers
    }

    /// Symbol names in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    pub fn contains_symbol(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Resolve a symbol to the entity it names.
    pub fn lookup(&self, name: &str) -> Option<Entity<'_>> {
        self.symbols.get(name).and_then(|sym| self.resolve(*sym))
    }

    fn resolve(&self, sym: SymbolRef) -> Option<Entity<'_>> {
        match sym {
            SymbolRef::Constant { index } => self.constants.get(index).map(Entity::Constant),
            SymbolRef::Enumeration { index } => {
                self.enumerations.get(index).map(Entity::Enumeration)
            }
            SymbolRef::Enumerator { enumeration, index } => self
                .enumerations
                .get(enumeration)
                .and_then(|e| e.enumerators.get(index))
                .map(Entity::Enumerator),
            SymbolRef::Lexer { index } => self.lexers.get(index).map(Entity::Lexer),
            SymbolRef::Function { index } => self.functions.get(index).map(Entity::Function),
            SymbolRef::Property { index } => self.properties.get(index).map(Entity::Property),
            SymbolRef::Event { index } => self.events.get(index).map(Entity::Event),
        }
    }

    /// Highest lexer id, `None` without lexers.
    pub fn max_lexer(&self) -> Option<i64> {
        self.lexers.iter().map(|l| l.value).max()
    }
}
