//! Model builder tests driven through the public API

use scibind_codegen::ir::{Entity, Interface};
use scibind_codegen::parser::{parse_iface, FeatureKind, FeatureRecord, FeatureSet, ParamRecord};
use scibind_codegen::Error;
mod test_support;

fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<&str> {
    items.iter().map(name).collect()
}

#[test]
fn test_every_feature_lands_in_one_collection() {
    let iface = test_support::mini_interface();

    assert_eq!(names(iface.functions(), |f| f.name.as_str()), vec!["add_text", "clear_all"]);
    assert_eq!(
        names(iface.properties(), |p| p.name.as_str()),
        vec!["set_text", "get_text", "get_view_ws", "set_view_ws"]
    );
    assert_eq!(names(iface.events(), |e| e.name.as_str()), vec!["style_needed", "char_added"]);
    assert_eq!(
        names(iface.enumerations(), |e| e.name.as_str()),
        vec!["Lexer", "WhiteSpace", "FoldAction"]
    );
    assert_eq!(names(iface.lexers(), |l| l.name.as_str()), vec!["Python", "Null"]);
    assert_eq!(
        names(iface.constants(), |c| c.name.as_str()),
        vec!["INVALID_POSITION", "SCI_START", "SC_CP_UTF8", "SCEN_CHANGE"]
    );
}

#[test]
fn test_enumerators_are_normalized() {
    let iface = test_support::mini_interface();
    let short = |enumeration: &str| -> Vec<String> {
        iface
            .enumerations()
            .iter()
            .find(|e| e.name == enumeration)
            .map(|e| e.enumerators.iter().map(|m| m.name.clone()).collect())
            .unwrap_or_default()
    };

    assert_eq!(short("Lexer"), vec!["CONTAINER", "NULL_LEXER", "PYTHON", "CPP"]);
    assert_eq!(short("WhiteSpace"), vec!["INVISIBLE", "VISIBLEALWAYS", "VISIBLEAFTERINDENT"]);
    assert_eq!(short("FoldAction"), vec!["CONTRACT", "EXPAND", "TOGGLE"]);
}

#[test]
fn test_lexers_resolve_ids_and_claim_styles() {
    let iface = test_support::mini_interface();
    let python = &iface.lexers()[0];
    assert_eq!(python.value, 2);
    assert_eq!(python.max_style(), 3);
    assert_eq!(
        names(&python.styles, |s| s.name.as_str()),
        vec!["DEFAULT", "COMMENTLINE", "STRING"]
    );
    assert_eq!(python.comment, vec!["Lexical states for SCLEX_PYTHON"]);

    let null = &iface.lexers()[1];
    assert_eq!(null.value, 1);
    assert!(null.styles.is_empty());
    assert_eq!(iface.max_lexer(), Some(2));

    // styles are owned by their lexer, not by the symbol table
    assert!(!iface.contains_symbol("SCE_P_STRING"));
}

#[test]
fn test_symbol_lookup() {
    let iface = test_support::mini_interface();

    assert!(matches!(iface.lookup("SCLEX_PYTHON"), Some(Entity::Enumerator(e)) if e.value == 2));
    assert!(matches!(iface.lookup("get_text"), Some(Entity::Property(p)) if p.getter.is_some()));
    assert!(matches!(iface.lookup("char_added"), Some(Entity::Event(e)) if e.parameters.len() == 2));
    assert_eq!(iface.lookup("SCI_START").and_then(|e| e.value()), Some(2000));
    assert!(iface.lookup("SC_ALPHA_NOALPHA").is_none());
}

fn text_accessor(kind: FeatureKind) -> (&'static str, FeatureRecord) {
    let record = match kind {
        FeatureKind::Getter => FeatureRecord::new(kind)
            .with_return_type("int")
            .with_value("2182")
            .with_params(vec![
                ParamRecord::default(),
                ParamRecord::new("stringresult", "text", ""),
            ]),
        _ => FeatureRecord::new(kind)
            .with_return_type("void")
            .with_value("2181")
            .with_params(vec![ParamRecord::new("string", "text", ""), ParamRecord::default()]),
    };
    ("Text", record)
}

#[test]
fn test_property_merge_in_either_order() {
    for order in [
        [FeatureKind::Getter, FeatureKind::Setter],
        [FeatureKind::Setter, FeatureKind::Getter],
    ] {
        let features: FeatureSet = order.into_iter().map(text_accessor).collect();
        let iface = Interface::from_features(&features).unwrap();

        assert_eq!(iface.properties().len(), 1);
        let prop = &iface.properties()[0];
        assert_eq!(prop.name, "text");
        assert_eq!(prop.getter.as_ref().map(|f| f.value), Some(2182));
        assert_eq!(prop.setter.as_ref().map(|f| f.value), Some(2181));
    }
}

#[test]
fn test_normalized_name_clash_is_fatal() {
    let features = parse_iface("fun void GetText=2001(,)\nget int getText=2002(,)\n").unwrap();
    let err = Interface::from_features(&features).unwrap_err();
    assert!(matches!(err, Error::DuplicateSymbol(name) if name == "get_text"));
}

#[test]
fn test_unresolved_lexer_ident() {
    let features = parse_iface("lex Python=SCLEX_PYTHON SCE_P_\n").unwrap();
    let err = Interface::from_features(&features).unwrap_err();
    assert!(matches!(
        err,
        Error::UnresolvedReference { symbol, reference } if symbol == "Python" && reference == "SCLEX_PYTHON"
    ));
}

#[test]
fn test_repeated_enumeration_merges_prefixes() {
    let features = parse_iface(
        "enu Flags=SC_A_\nval SC_A_ONE=1\nenu Flags=SC_B_ SC_A_\nval SC_B_TWO=2\n",
    )
    .unwrap();
    let iface = Interface::from_features(&features).unwrap();

    assert_eq!(iface.enumerations().len(), 1);
    let flags = &iface.enumerations()[0];
    assert_eq!(flags.prefixes.iter().collect::<Vec<_>>(), vec!["SC_A_", "SC_B_"]);
    assert_eq!(names(&flags.enumerators, |m| m.name.as_str()), vec!["ONE", "TWO"]);
}

#[test]
fn test_model_serializes_to_json() {
    let iface = test_support::mini_interface();
    let json = serde_json::to_value(&iface).unwrap();

    assert_eq!(json["functions"][0]["name"], "add_text");
    assert_eq!(json["symbols"]["SCLEX_NULL"]["kind"], "enumerator");
    assert_eq!(json["lexers"][0]["prefixes"][0], "SCE_P_");
}
