//! Identifier normalization
//!
//! Pure helpers shared by the model builder and the generators: camel-case to
//! snake_case conversion, member prefix stripping (with a per-enumeration override
//! table) and renaming of identifiers that cannot be emitted verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));
static LOWER_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Convert a CamelCase identifier to snake_case.
///
/// `GetText` becomes `get_text`, `SetXCaretPolicy` becomes `set_x_caret_policy`.
/// Existing underscores and digits are kept as they are.
pub fn camel_to_under(name: &str) -> String {
    let words = WORD_START.replace_all(name, "${1}_${2}");
    LOWER_UPPER
        .replace_all(&words, "${1}_${2}")
        .to_lowercase()
}

/// Bespoke stripping rule for an enumeration whose members do not follow the
/// usual prefix conventions. `None` means "fall back to generic prefix stripping".
pub type PrefixOverride = fn(&str) -> Option<&str>;

/// Enumerations whose member names need special handling.
pub const PREFIX_OVERRIDES: &[(&str, PrefixOverride)] = &[
    ("ModificationFlags", strip_modification_flag),
    ("FoldAction", strip_fold_action),
    ("FontQuality", strip_font_quality),
];

fn strip_modification_flag(name: &str) -> Option<&str> {
    Some(name.strip_prefix("SC_").unwrap_or(name))
}

fn strip_fold_action(name: &str) -> Option<&str> {
    Some(name.strip_prefix("SC_FOLDACTION_").unwrap_or(name))
}

// SC_PHASES_* share the enumeration with SC_EFF_QUALITY_* but keep their PHASES_ stem.
fn strip_font_quality(name: &str) -> Option<&str> {
    name.strip_prefix("SC_")
        .filter(|rest| rest.starts_with("PHASES_"))
}

/// Look up the override rule registered for an enumeration.
pub fn prefix_override(enumeration: &str) -> Option<PrefixOverride> {
    PREFIX_OVERRIDES
        .iter()
        .find(|(name, _)| *name == enumeration)
        .map(|(_, rule)| *rule)
}

/// All prefixes that match `name`, longest first (ties broken lexically).
pub fn matching_prefixes<'p, I>(name: &str, prefixes: I) -> Vec<&'p str>
where
    I: IntoIterator<Item = &'p String>,
{
    let mut matches: Vec<&str> = prefixes
        .into_iter()
        .map(String::as_str)
        .filter(|prefix| name.starts_with(prefix))
        .collect();
    matches.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    matches
}

/// Strip the longest matching prefix from `name`.
///
/// `owner` names the enumeration or lexer and only appears in the warning emitted
/// when several prefixes match. If no prefix matches the name is returned unchanged.
pub fn strip_prefix_set<'a, 'p, I>(owner: &str, prefixes: I, name: &'a str) -> &'a str
where
    I: IntoIterator<Item = &'p String>,
{
    let matches = matching_prefixes(name, prefixes);
    if matches.len() > 1 {
        tracing::warn!(
            owner,
            identifier = name,
            prefixes = ?matches,
            "identifier matches more than one prefix, stripping the longest"
        );
    }

    match matches.first() {
        Some(prefix) => &name[prefix.len()..],
        None => name,
    }
}

/// Strip an enumerator's raw name, consulting [`PREFIX_OVERRIDES`] first.
pub fn strip_enumerator_prefix<'a, 'p, I>(enumeration: &str, prefixes: I, name: &'a str) -> &'a str
where
    I: IntoIterator<Item = &'p String>,
{
    match prefix_override(enumeration).and_then(|rule| rule(name)) {
        Some(stripped) => stripped,
        None => strip_prefix_set(enumeration, prefixes, name),
    }
}

/// Rename canonical member names that are not valid identifiers in the generated
/// code (a leading digit) or that collide with a macro of the target environment.
pub fn fix_ident(name: &str) -> String {
    match name {
        "8859_15" => "ISO_8859_15".to_string(),
        "NULL" => "NULL_LEXER".to_string(),
        other => other.to_string(),
    }
}

/// Strip the well-known message/constant prefixes from a free-standing constant.
///
/// `SCEN_` keeps its `EN_` stem so that notification codes stay recognisable.
pub fn strip_constant_prefix(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix("SCI_") {
        rest
    } else if let Some(rest) = name.strip_prefix("SC_") {
        rest
    } else if name.starts_with("SCEN_") {
        &name[2..]
    } else {
        name
    }
}
