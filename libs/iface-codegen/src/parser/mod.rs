//! Reader for interface descriptions
//!
//! Turns a Scintilla-style `.iface` document (or its JSON rendition) into an ordered
//! [`FeatureSet`] ready for the model builder. The text format is line oriented:
//!
//! ```text
//! cat Basics
//! # Set the text in the document.
//! set void SetText=2181(, string text)
//! val SCI_START=2000
//! enu FoldAction=SC_FOLDACTION_
//! lex Python=SCLEX_PYTHON SCE_P_
//! evt void StyleNeeded=2000(int position)
//! ```

mod records;

pub use records::{FeatureKind, FeatureRecord, FeatureSet, ParamRecord};

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Read an interface description from disk, choosing the format by extension.
pub fn read_features(path: &Path) -> Result<FeatureSet> {
    let text = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        FeatureSet::from_json_str(&text)
    } else {
        parse_iface(&text)
    }
}

/// Parse the text format into an ordered feature set.
pub fn parse_iface(text: &str) -> Result<FeatureSet> {
    let mut reader = Reader::default();
    for (idx, line) in text.lines().enumerate() {
        reader.line(idx + 1, line.trim_end())?;
    }
    Ok(reader.features)
}

#[derive(Default)]
struct Reader {
    features: FeatureSet,
    category: String,
    pending_comment: Vec<String>,
    seen: HashSet<String>,
    messages: HashSet<(bool, String)>,
}

impl Reader {
    fn line(&mut self, line_no: usize, line: &str) -> Result<()> {
        if line.is_empty() {
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix('#') {
            // "## ..." and bare "#" lines are file commentary, not documentation
            if let Some(text) = rest.strip_prefix(' ') {
                self.pending_comment.push(text.to_string());
            }
            return Ok(());
        }

        let (word, body) = line
            .split_once(' ')
            .ok_or_else(|| syntax(line_no, format!("expected a feature value after '{line}'")))?;

        if word == "cat" {
            self.category = body.trim().to_string();
            return Ok(());
        }

        let Some(kind) = FeatureKind::from_word(word) else {
            tracing::trace!(line = line_no, word, "skipping unsupported feature");
            self.pending_comment.clear();
            return Ok(());
        };

        let (name, mut record) = match kind {
            FeatureKind::Function | FeatureKind::Getter | FeatureKind::Setter => {
                decode_function(line_no, kind, body)?
            }
            FeatureKind::Event => decode_event(line_no, body)?,
            FeatureKind::Value => {
                let (name, value) = split_assignment(line_no, body)?;
                (name, FeatureRecord::new(kind).with_value(value.trim()))
            }
            FeatureKind::Enumeration => {
                let (name, value) = split_assignment(line_no, body)?;
                let mut record = FeatureRecord::new(kind);
                record.prefixes = value.split_whitespace().map(String::from).collect();
                (name, record)
            }
            FeatureKind::Lexer => {
                let (name, value) = split_assignment(line_no, body)?;
                let mut tokens = value.split_whitespace();
                let ident = tokens
                    .next()
                    .ok_or_else(|| syntax(line_no, format!("lexer '{name}' has no identifier")))?;
                let mut record = FeatureRecord::new(kind).with_value(ident);
                record.prefixes = tokens.map(String::from).collect();
                (name, record)
            }
        };

        record.comment = std::mem::take(&mut self.pending_comment);
        record.category = self.category.clone();
        self.push(name, record)
    }

    fn push(&mut self, name: &str, record: FeatureRecord) -> Result<()> {
        if record.kind != FeatureKind::Enumeration && !self.seen.insert(name.to_string()) {
            return Err(Error::DuplicateFeature(name.to_string()));
        }

        // events are numbered independently of messages
        if record.kind.is_callable() {
            let key = (record.kind == FeatureKind::Event, record.value.clone());
            if !self.messages.insert(key) {
                return Err(Error::DuplicateMessage {
                    name: name.to_string(),
                    value: record.value.clone(),
                });
            }
        }

        self.features.push(name, record);
        Ok(())
    }
}

fn syntax(line: usize, message: impl Into<String>) -> Error {
    Error::Syntax {
        line,
        message: message.into(),
    }
}

fn split_assignment(line_no: usize, body: &str) -> Result<(&str, &str)> {
    let (name, value) = body
        .split_once('=')
        .ok_or_else(|| syntax(line_no, format!("expected NAME=VALUE, found '{body}'")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(syntax(line_no, "feature name is empty"));
    }
    Ok((name, value))
}

/// Split `RET NAME=VALUE(PARAMS)` into its parts.
fn split_callable(line_no: usize, body: &str) -> Result<(&str, &str, &str, &str)> {
    let (return_type, rest) = body
        .split_once(' ')
        .ok_or_else(|| syntax(line_no, "expected a return type"))?;
    let (head, params) = rest
        .split_once('(')
        .ok_or_else(|| syntax(line_no, "expected '(' after the feature name"))?;
    let (params, _) = params
        .split_once(')')
        .ok_or_else(|| syntax(line_no, "unterminated parameter list"))?;
    let (name, value) = split_assignment(line_no, head)?;
    Ok((return_type.trim(), name, value.trim(), params))
}

fn decode_function<'a>(
    line_no: usize,
    kind: FeatureKind,
    body: &'a str,
) -> Result<(&'a str, FeatureRecord)> {
    let (return_type, name, value, params) = split_callable(line_no, body)?;
    let (first, second) = params
        .split_once(',')
        .ok_or_else(|| syntax(line_no, format!("'{name}' must declare two parameter slots")))?;
    if second.contains(',') {
        return Err(syntax(
            line_no,
            format!("'{name}' declares more than two parameters"),
        ));
    }

    let record = FeatureRecord::new(kind)
        .with_return_type(return_type)
        .with_value(value)
        .with_params(vec![decode_param(first), decode_param(second)]);
    Ok((name, record))
}

fn decode_event(line_no: usize, body: &str) -> Result<(&str, FeatureRecord)> {
    let (return_type, name, value, params) = split_callable(line_no, body)?;
    let params = params
        .split(',')
        .map(decode_param)
        .filter(|p| !p.type_name.is_empty())
        .collect();

    let record = FeatureRecord::new(FeatureKind::Event)
        .with_return_type(return_type)
        .with_value(value)
        .with_params(params);
    Ok((name, record))
}

/// Decode one slot: empty, `TYPE NAME` or `TYPE NAME=VALUE`.
fn decode_param(slot: &str) -> ParamRecord {
    let slot = slot.trim();
    match slot.split_once(' ') {
        Some((type_name, rest)) => {
            let rest = rest.trim();
            let (name, value) = rest.split_once('=').unwrap_or((rest, ""));
            ParamRecord::new(type_name, name, value)
        }
        None => ParamRecord::default(),
    }
}
