//! Interface model builder
//!
//! Classifies raw feature records into entities in five ordered passes, then
//! normalizes member names. Later passes resolve references created by earlier
//! ones, so the order is fixed:
//!
//! 1. functions, properties, enumerations and events
//! 2. enumerators, claimed by enumeration prefixes
//! 3. lexers, whose id is looked up through a symbol
//! 4. styles, claimed by lexer prefixes
//! 5. every remaining value becomes a free-standing constant
//!
//! All state lives in a [`BuildContext`]; the model is only handed out once every
//! pass has succeeded.

use super::{
    Constant, Enumeration, Event, Function, Interface, Lexer, Member, Parameter, Property,
    SymbolRef,
};
use crate::error::{Error, Result};
use crate::naming::{camel_to_under, fix_ident, strip_enumerator_prefix, strip_prefix_set};
use crate::parser::{FeatureKind, FeatureRecord, FeatureSet, ParamRecord};
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};

/// Build a fully linked [`Interface`] from an ordered feature set.
pub fn build(features: &FeatureSet) -> Result<Interface> {
    let mut ctx = BuildContext::new(features);
    ctx.declare_primary()?;
    ctx.collect_enumerators()?;
    ctx.collect_lexers()?;
    ctx.collect_styles()?;
    ctx.collect_constants()?;
    ctx.normalize_members();
    Ok(ctx.finish())
}

struct BuildContext<'f> {
    features: &'f FeatureSet,
    iface: Interface,
    /// Raw names of styles; kept out of the symbol table but not free constants.
    claimed: HashSet<&'f str>,
}

impl<'f> BuildContext<'f> {
    fn new(features: &'f FeatureSet) -> Self {
        Self {
            features,
            iface: Interface::default(),
            claimed: HashSet::new(),
        }
    }

    fn finish(self) -> Interface {
        tracing::debug!(
            symbols = self.iface.symbols.len(),
            functions = self.iface.functions.len(),
            properties = self.iface.properties.len(),
            events = self.iface.events.len(),
            enumerations = self.iface.enumerations.len(),
            lexers = self.iface.lexers.len(),
            constants = self.iface.constants.len(),
            "interface model built"
        );
        self.iface
    }

    fn add_symbol(&mut self, name: &str, sym: SymbolRef) -> Result<()> {
        if self.iface.symbols.contains_key(name) {
            return Err(Error::DuplicateSymbol(name.to_string()));
        }
        self.iface.symbols.insert(name.to_string(), sym);
        Ok(())
    }

    fn declare_primary(&mut self) -> Result<()> {
        let features = self.features;
        let mut property_index: HashMap<String, usize> = HashMap::new();

        for (name, record) in features.iter() {
            match record.kind {
                FeatureKind::Function => {
                    let func = function_from_record(name, record)?;
                    let index = self.iface.functions.len();
                    self.add_symbol(&func.name, SymbolRef::Function { index })?;
                    self.iface.functions.push(func);
                }
                FeatureKind::Getter | FeatureKind::Setter => {
                    let func = function_from_record(name, record)?;
                    let index = match property_index.get(&func.name) {
                        Some(index) => *index,
                        None => {
                            let index = self.iface.properties.len();
                            self.add_symbol(&func.name, SymbolRef::Property { index })?;
                            self.iface.properties.push(Property {
                                name: func.name.clone(),
                                getter: None,
                                setter: None,
                            });
                            property_index.insert(func.name.clone(), index);
                            index
                        }
                    };

                    let property = &mut self.iface.properties[index];
                    if record.kind == FeatureKind::Getter {
                        property.getter = Some(func);
                    } else {
                        property.setter = Some(func);
                    }
                }
                FeatureKind::Enumeration => self.declare_enumeration(name, record)?,
                FeatureKind::Event => {
                    let event = Event {
                        name: camel_to_under(name),
                        value: parse_int(name, &record.value)?,
                        return_type: record.return_type.clone(),
                        parameters: record.params.iter().map(parameter_from_record).collect(),
                        comment: record.comment.clone(),
                    };
                    let index = self.iface.events.len();
                    self.add_symbol(&event.name, SymbolRef::Event { index })?;
                    self.iface.events.push(event);
                }
                FeatureKind::Value | FeatureKind::Lexer => {}
            }
        }

        tracing::debug!(
            functions = self.iface.functions.len(),
            properties = self.iface.properties.len(),
            enumerations = self.iface.enumerations.len(),
            events = self.iface.events.len(),
            "declared primary features"
        );
        Ok(())
    }

    /// Create an enumeration or merge a repeated declaration into the existing one.
    fn declare_enumeration(&mut self, name: &str, record: &FeatureRecord) -> Result<()> {
        match self.iface.symbols.get(name).copied() {
            Some(SymbolRef::Enumeration { index }) => {
                let enumeration = &mut self.iface.enumerations[index];
                enumeration.prefixes.extend(record.prefixes.iter().cloned());
                enumeration.comment.extend(record.comment.iter().cloned());
                Ok(())
            }
            Some(_) => Err(Error::DuplicateSymbol(name.to_string())),
            None => {
                let index = self.iface.enumerations.len();
                self.add_symbol(name, SymbolRef::Enumeration { index })?;
                self.iface.enumerations.push(Enumeration {
                    name: name.to_string(),
                    prefixes: record.prefixes.iter().cloned().collect(),
                    enumerators: Vec::new(),
                    comment: record.comment.clone(),
                });
                Ok(())
            }
        }
    }

    fn collect_enumerators(&mut self) -> Result<()> {
        let features = self.features;
        for enumeration in 0..self.iface.enumerations.len() {
            let prefixes = self.iface.enumerations[enumeration].prefixes.clone();
            for (name, record) in features.of_kind(FeatureKind::Value) {
                if !has_prefix(name, &prefixes) {
                    continue;
                }
                let member = member_from_record(name, record)?;
                let index = self.iface.enumerations[enumeration].enumerators.len();
                self.add_symbol(name, SymbolRef::Enumerator { enumeration, index })?;
                self.iface.enumerations[enumeration].enumerators.push(member);
            }
        }

        tracing::debug!(
            enumerators = self
                .iface
                .enumerations
                .iter()
                .map(|e| e.enumerators.len())
                .sum::<usize>(),
            "collected enumerators"
        );
        Ok(())
    }

    fn collect_lexers(&mut self) -> Result<()> {
        let features = self.features;
        for (name, record) in features.of_kind(FeatureKind::Lexer) {
            let value = self
                .iface
                .lookup(&record.value)
                .and_then(|entity| entity.value())
                .ok_or_else(|| Error::UnresolvedReference {
                    symbol: name.to_string(),
                    reference: record.value.clone(),
                })?;

            let index = self.iface.lexers.len();
            self.add_symbol(name, SymbolRef::Lexer { index })?;
            self.iface.lexers.push(Lexer {
                name: name.to_string(),
                value,
                ident: record.value.clone(),
                prefixes: record.prefixes.iter().cloned().collect(),
                styles: Vec::new(),
                comment: record.comment.clone(),
            });
        }

        tracing::debug!(lexers = self.iface.lexers.len(), "collected lexers");
        Ok(())
    }

    // Styles may share raw-name prefixes with enumerators claimed earlier, so they
    // are not registered as symbols and never trip the duplicate check.
    fn collect_styles(&mut self) -> Result<()> {
        let features = self.features;
        for lexer in 0..self.iface.lexers.len() {
            let prefixes = self.iface.lexers[lexer].prefixes.clone();
            for (name, record) in features.of_kind(FeatureKind::Value) {
                if !has_prefix(name, &prefixes) {
                    continue;
                }
                let style = member_from_record(name, record)?;
                self.claimed.insert(name);
                self.iface.lexers[lexer].styles.push(style);
            }
        }

        tracing::debug!(styles = self.claimed.len(), "collected lexer styles");
        Ok(())
    }

    fn collect_constants(&mut self) -> Result<()> {
        let features = self.features;
        for (name, record) in features.of_kind(FeatureKind::Value) {
            if self.iface.symbols.contains_key(name) || self.claimed.contains(name) {
                continue;
            }
            let constant = Constant {
                name: name.to_string(),
                value: parse_int(name, &record.value)?,
                comment: record.comment.clone(),
            };
            let index = self.iface.constants.len();
            self.add_symbol(name, SymbolRef::Constant { index })?;
            self.iface.constants.push(constant);
        }

        tracing::debug!(constants = self.iface.constants.len(), "collected constants");
        Ok(())
    }

    /// Replace member raw names with their canonical short names.
    fn normalize_members(&mut self) {
        for enumeration in &mut self.iface.enumerations {
            for member in &mut enumeration.enumerators {
                member.name = fix_ident(strip_enumerator_prefix(
                    &enumeration.name,
                    &enumeration.prefixes,
                    &member.raw_name,
                ));
            }
        }

        for lexer in &mut self.iface.lexers {
            for style in &mut lexer.styles {
                style.name = fix_ident(strip_prefix_set(
                    &lexer.name,
                    &lexer.prefixes,
                    &style.raw_name,
                ));
            }
        }
    }
}

fn has_prefix(name: &str, prefixes: &IndexSet<String>) -> bool {
    prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
}

fn parameter_from_record(param: &ParamRecord) -> Parameter {
    Parameter {
        type_name: Some(param.type_name.clone()).filter(|t| !t.is_empty()),
        name: camel_to_under(&param.name),
        value: param.value.clone(),
        comment: Vec::new(),
    }
}

fn function_from_record(name: &str, record: &FeatureRecord) -> Result<Function> {
    let slot = |i: usize| {
        record
            .params
            .get(i)
            .map(parameter_from_record)
            .unwrap_or_else(|| parameter_from_record(&ParamRecord::default()))
    };

    Ok(Function {
        name: camel_to_under(name),
        value: parse_int(name, &record.value)?,
        return_type: record.return_type.clone(),
        parameters: [slot(0), slot(1)],
        comment: record.comment.clone(),
    })
}

fn member_from_record(name: &str, record: &FeatureRecord) -> Result<Member> {
    Ok(Member {
        name: name.to_string(),
        raw_name: name.to_string(),
        value: parse_int(name, &record.value)?,
        comment: record.comment.clone(),
    })
}

/// Parse a decimal, `0x`, `0o` or `0b` integer literal with an optional sign.
pub(crate) fn parse_int(symbol: &str, literal: &str) -> Result<i64> {
    parse_int_literal(literal).ok_or_else(|| Error::InvalidValue {
        symbol: symbol.to_string(),
        value: literal.to_string(),
    })
}

fn parse_int_literal(literal: &str) -> Option<i64> {
    let text = literal.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let lower = unsigned.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return None;
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if !cleaned.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = i128::from(u64::from_str_radix(&cleaned, radix).ok()?);
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Entity;

    fn val(value: &str) -> FeatureRecord {
        FeatureRecord::new(FeatureKind::Value).with_value(value)
    }

    fn enu(prefixes: &[&str]) -> FeatureRecord {
        FeatureRecord::new(FeatureKind::Enumeration).with_prefixes(prefixes)
    }

    fn fun(kind: FeatureKind, ret: &str, value: &str, params: Vec<ParamRecord>) -> FeatureRecord {
        FeatureRecord::new(kind)
            .with_return_type(ret)
            .with_value(value)
            .with_params(params)
    }

    #[test]
    fn test_parse_int_literal() {
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("-1"), Some(-1));
        assert_eq!(parse_int_literal("0x10"), Some(16));
        assert_eq!(parse_int_literal("0XFF"), Some(255));
        assert_eq!(parse_int_literal("0b101"), Some(5));
        assert_eq!(parse_int_literal("0o17"), Some(15));
        assert_eq!(parse_int_literal("1_000"), Some(1000));
        assert_eq!(parse_int_literal("0xFFFFFFFF"), Some(4_294_967_295));
        assert_eq!(parse_int_literal(""), None);
        assert_eq!(parse_int_literal("0x"), None);
        assert_eq!(parse_int_literal("SCLEX_PYTHON"), None);
        assert_eq!(parse_int_literal("0x-5"), None);
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let features: FeatureSet = vec![("SC_BROKEN", val("twelve"))].into_iter().collect();
        let err = build(&features).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { symbol, .. } if symbol == "SC_BROKEN"));
    }

    #[test]
    fn test_enumeration_merge_deduplicates_prefixes() {
        let features: FeatureSet = vec![
            ("Flags", enu(&["SC_A_"]).with_comment(&["First"])),
            ("Flags", enu(&["SC_A_", "SC_B_"]).with_comment(&["Second"])),
            ("SC_A_ONE", val("1")),
            ("SC_B_TWO", val("2")),
        ]
        .into_iter()
        .collect();

        let iface = build(&features).unwrap();
        assert_eq!(iface.enumerations().len(), 1);
        let flags = &iface.enumerations()[0];
        assert_eq!(flags.prefixes.iter().collect::<Vec<_>>(), vec!["SC_A_", "SC_B_"]);
        assert_eq!(flags.comment, vec!["First", "Second"]);
        let names: Vec<_> = flags.enumerators.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ONE", "TWO"]);
    }

    #[test]
    fn test_enumerators_registered_under_raw_name() {
        let features: FeatureSet = vec![("MarkerSymbol", enu(&["SC_MARK_"])), ("SC_MARK_CIRCLE", val("0"))]
            .into_iter()
            .collect();
        let iface = build(&features).unwrap();

        assert!(iface.contains_symbol("SC_MARK_CIRCLE"));
        assert!(!iface.contains_symbol("CIRCLE"));
        match iface.lookup("SC_MARK_CIRCLE") {
            Some(Entity::Enumerator(e)) => assert_eq!(e.name, "CIRCLE"),
            other => panic!("unexpected entity: {other:?}"),
        }
    }

    #[test]
    fn test_value_claimed_by_two_enumerations_is_duplicate() {
        let features: FeatureSet = vec![
            ("A", enu(&["SC_X"])),
            ("B", enu(&["SC_X_"])),
            ("SC_X_ONE", val("1")),
        ]
        .into_iter()
        .collect();
        let err = build(&features).unwrap_err();
        assert!(matches!(err, Error::DuplicateSymbol(name) if name == "SC_X_ONE"));
    }

    #[test]
    fn test_enumeration_name_colliding_with_function() {
        let features: FeatureSet = vec![
            ("marker", fun(FeatureKind::Function, "void", "2001", vec![])),
            ("marker", enu(&["SC_M_"])),
        ]
        .into_iter()
        .collect();
        let err = build(&features).unwrap_err();
        assert!(matches!(err, Error::DuplicateSymbol(name) if name == "marker"));
    }

    #[test]
    fn test_function_missing_slots_are_filled() {
        let features: FeatureSet = vec![("ClearAll", fun(FeatureKind::Function, "void", "2004", vec![]))]
            .into_iter()
            .collect();
        let iface = build(&features).unwrap();
        let func = &iface.functions()[0];
        assert_eq!(func.name, "clear_all");
        assert!(func.parameters.iter().all(|p| p.type_name.is_none()));
    }

    #[test]
    fn test_lexer_with_unresolved_ident() {
        let features: FeatureSet = vec![(
            "Python",
            FeatureRecord::new(FeatureKind::Lexer).with_value("SCLEX_PYTHON"),
        )]
        .into_iter()
        .collect();
        let err = build(&features).unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedReference { symbol, reference }
                if symbol == "Python" && reference == "SCLEX_PYTHON"
        ));
    }

    #[test]
    fn test_lexer_ident_naming_enumeration_has_no_value() {
        let features: FeatureSet = vec![
            ("Lexer", enu(&["SCLEX_"])),
            ("Python", FeatureRecord::new(FeatureKind::Lexer).with_value("Lexer")),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            build(&features).unwrap_err(),
            Error::UnresolvedReference { .. }
        ));
    }

    #[test]
    fn test_styles_stay_out_of_symbols_and_constants() {
        let features: FeatureSet = vec![
            ("Lexer", enu(&["SCLEX_"])),
            ("SCLEX_NULL", val("1")),
            ("SCE_NULL_DEFAULT", val("0")),
            ("Null", FeatureRecord::new(FeatureKind::Lexer).with_value("SCLEX_NULL").with_prefixes(&["SCE_NULL_"])),
        ]
        .into_iter()
        .collect();
        let iface = build(&features).unwrap();

        assert!(iface.constants().is_empty());
        assert!(!iface.contains_symbol("SCE_NULL_DEFAULT"));
        assert_eq!(iface.lexers()[0].styles[0].name, "DEFAULT");
        assert_eq!(iface.enumerations()[0].enumerators[0].name, "NULL_LEXER");
    }

    #[test]
    fn test_symbol_order_follows_passes() {
        let features: FeatureSet = vec![
            ("SC_FREE", val("7")),
            ("Lexer", enu(&["SCLEX_"])),
            ("SCLEX_CPP", val("3")),
            ("Cpp", FeatureRecord::new(FeatureKind::Lexer).with_value("SCLEX_CPP")),
            ("GetLength", fun(FeatureKind::Getter, "position", "2006", vec![])),
        ]
        .into_iter()
        .collect();
        let iface = build(&features).unwrap();
        let symbols: Vec<_> = iface.symbols().collect();
        assert_eq!(symbols, vec!["Lexer", "get_length", "SCLEX_CPP", "Cpp", "SC_FREE"]);
    }
}
