//! Raw feature records as read from an interface description

use serde::{Deserialize, Serialize};

/// Discriminant of a feature record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    #[serde(rename = "fun")]
    Function,
    #[serde(rename = "get")]
    Getter,
    #[serde(rename = "set")]
    Setter,
    #[serde(rename = "enu")]
    Enumeration,
    #[serde(rename = "evt")]
    Event,
    #[serde(rename = "val")]
    Value,
    #[serde(rename = "lex")]
    Lexer,
}

impl FeatureKind {
    /// Parse the three-letter feature word used by the text format.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "fun" => Some(Self::Function),
            "get" => Some(Self::Getter),
            "set" => Some(Self::Setter),
            "enu" => Some(Self::Enumeration),
            "evt" => Some(Self::Event),
            "val" => Some(Self::Value),
            "lex" => Some(Self::Lexer),
            _ => None,
        }
    }

    /// Functions, accessors and events carry a message number.
    pub fn is_callable(self) -> bool {
        matches!(
            self,
            Self::Function | Self::Getter | Self::Setter | Self::Event
        )
    }
}

/// One parameter slot of a function-like record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRecord {
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl ParamRecord {
    pub fn new(type_name: &str, name: &str, value: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// A single feature of the interface description.
///
/// `value` holds the literal for functions, events and values, the symbol name of
/// the lexer id for lexers, and is empty for enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub kind: FeatureKind,
    #[serde(default)]
    pub return_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub params: Vec<ParamRecord>,
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub comment: Vec<String>,
    #[serde(default)]
    pub category: String,
}

impl FeatureRecord {
    pub fn new(kind: FeatureKind) -> Self {
        Self {
            kind,
            return_type: String::new(),
            value: String::new(),
            params: Vec::new(),
            prefixes: Vec::new(),
            comment: Vec::new(),
            category: String::new(),
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_return_type(mut self, return_type: &str) -> Self {
        self.return_type = return_type.to_string();
        self
    }

    pub fn with_params(mut self, params: Vec<ParamRecord>) -> Self {
        self.params = params;
        self
    }

    pub fn with_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.prefixes = prefixes.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_comment(mut self, lines: &[&str]) -> Self {
        self.comment = lines.iter().map(|l| l.to_string()).collect();
        self
    }
}

#[derive(Debug, Deserialize)]
struct NamedRecord {
    name: String,
    #[serde(flatten)]
    record: FeatureRecord,
}

/// Ordered sequence of `(name, record)` pairs.
///
/// Order is significant: the builder walks records in declaration order and the
/// generated output follows it. Names may repeat (enumerations are declared in
/// several places and merged by the builder).
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    features: Vec<(String, FeatureRecord)>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, record: FeatureRecord) {
        self.features.push((name.into(), record));
    }

    /// First record declared under `name`.
    pub fn get(&self, name: &str) -> Option<&FeatureRecord> {
        self.iter().find(|(n, _)| *n == name).map(|(_, rec)| rec)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over `(name, record)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureRecord)> {
        self.features.iter().map(|(name, rec)| (name.as_str(), rec))
    }

    /// Iterate over records of one kind in declaration order.
    pub fn of_kind(&self, kind: FeatureKind) -> impl Iterator<Item = (&str, &FeatureRecord)> {
        self.iter().filter(move |(_, rec)| rec.kind == kind)
    }

    /// Parse the JSON rendition: an array of records, each with a `name` field.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let named: Vec<NamedRecord> = serde_json::from_str(json)?;
        Ok(named.into_iter().map(|n| (n.name, n.record)).collect())
    }
}

impl FromIterator<(String, FeatureRecord)> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = (String, FeatureRecord)>>(iter: T) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, FeatureRecord)> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = (&'a str, FeatureRecord)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(name, rec)| (name.to_string(), rec))
            .collect()
    }
}
