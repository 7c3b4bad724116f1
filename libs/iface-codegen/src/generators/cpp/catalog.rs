//! Template catalog
//!
//! Closed mapping from a function's type signature (return type and parameter types
//! joined by `_`) to the C++ signature and body skeletons used to wrap it. Each
//! supported shape is one [`Signature`] variant; the string form is resolved through
//! a compile-time perfect hash map.
//!
//! Templates use `$name` (snake_case function name), `$msg` (message number) and
//! `$p1`/`$p2` (parameter names).

use crate::error::{Error, Result};
use crate::ir::{Callable, Interface};
use once_cell::sync::Lazy;
use phf::phf_map;
use regex::Regex;

/// Every function shape the generator knows how to wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    BoolIntVoid,
    BoolPositionPosition,
    BoolVoidVoid,
    ColourIntVoid,
    ColourVoidVoid,
    IntIntInt,
    IntIntString,
    IntIntStringresult,
    IntIntVoid,
    IntPositionBool,
    IntPositionPosition,
    IntPositionVoid,
    IntStringStringresult,
    IntStringVoid,
    IntVoidPosition,
    IntVoidStringresult,
    IntVoidTextrange,
    IntVoidVoid,
    PositionBoolFormatrange,
    PositionIntFindtext,
    PositionIntInt,
    PositionIntVoid,
    PositionPositionInt,
    PositionPositionVoid,
    PositionVoidVoid,
    VoidBoolColour,
    VoidBoolInt,
    VoidBoolVoid,
    VoidColourVoid,
    VoidIntBool,
    VoidIntCells,
    VoidIntColour,
    VoidIntInt,
    VoidIntPosition,
    VoidIntString,
    VoidIntVoid,
    VoidKeymodInt,
    VoidKeymodVoid,
    VoidPositionInt,
    VoidPositionPosition,
    VoidPositionString,
    VoidPositionVoid,
    VoidStringString,
    VoidStringVoid,
    VoidVoidInt,
    VoidVoidString,
    VoidVoidVoid,
}

static SIGNATURES: phf::Map<&'static str, Signature> = phf_map! {
    "bool_int_void" => Signature::BoolIntVoid,
    "bool_position_position" => Signature::BoolPositionPosition,
    "bool_void_void" => Signature::BoolVoidVoid,
    "colour_int_void" => Signature::ColourIntVoid,
    "colour_void_void" => Signature::ColourVoidVoid,
    "int_int_int" => Signature::IntIntInt,
    "int_int_string" => Signature::IntIntString,
    "int_int_stringresult" => Signature::IntIntStringresult,
    "int_int_void" => Signature::IntIntVoid,
    "int_position_bool" => Signature::IntPositionBool,
    "int_position_position" => Signature::IntPositionPosition,
    "int_position_void" => Signature::IntPositionVoid,
    "int_string_stringresult" => Signature::IntStringStringresult,
    "int_string_void" => Signature::IntStringVoid,
    "int_void_position" => Signature::IntVoidPosition,
    "int_void_stringresult" => Signature::IntVoidStringresult,
    "int_void_textrange" => Signature::IntVoidTextrange,
    "int_void_void" => Signature::IntVoidVoid,
    "position_bool_formatrange" => Signature::PositionBoolFormatrange,
    "position_int_findtext" => Signature::PositionIntFindtext,
    "position_int_int" => Signature::PositionIntInt,
    "position_int_void" => Signature::PositionIntVoid,
    "position_position_int" => Signature::PositionPositionInt,
    "position_position_void" => Signature::PositionPositionVoid,
    "position_void_void" => Signature::PositionVoidVoid,
    "void_bool_colour" => Signature::VoidBoolColour,
    "void_bool_int" => Signature::VoidBoolInt,
    "void_bool_void" => Signature::VoidBoolVoid,
    "void_colour_void" => Signature::VoidColourVoid,
    "void_int_bool" => Signature::VoidIntBool,
    "void_int_cells" => Signature::VoidIntCells,
    "void_int_colour" => Signature::VoidIntColour,
    "void_int_int" => Signature::VoidIntInt,
    "void_int_position" => Signature::VoidIntPosition,
    "void_int_string" => Signature::VoidIntString,
    "void_int_void" => Signature::VoidIntVoid,
    "void_keymod_int" => Signature::VoidKeymodInt,
    "void_keymod_void" => Signature::VoidKeymodVoid,
    "void_position_int" => Signature::VoidPositionInt,
    "void_position_position" => Signature::VoidPositionPosition,
    "void_position_string" => Signature::VoidPositionString,
    "void_position_void" => Signature::VoidPositionVoid,
    "void_string_string" => Signature::VoidStringString,
    "void_string_void" => Signature::VoidStringVoid,
    "void_void_int" => Signature::VoidVoidInt,
    "void_void_string" => Signature::VoidVoidString,
    "void_void_void" => Signature::VoidVoidVoid,
};

impl Signature {
    /// All catalog entries.
    pub const ALL: &'static [Signature] = &[
        Signature::BoolIntVoid,
        Signature::BoolPositionPosition,
        Signature::BoolVoidVoid,
        Signature::ColourIntVoid,
        Signature::ColourVoidVoid,
        Signature::IntIntInt,
        Signature::IntIntString,
        Signature::IntIntStringresult,
        Signature::IntIntVoid,
        Signature::IntPositionBool,
        Signature::IntPositionPosition,
        Signature::IntPositionVoid,
        Signature::IntStringStringresult,
        Signature::IntStringVoid,
        Signature::IntVoidPosition,
        Signature::IntVoidStringresult,
        Signature::IntVoidTextrange,
        Signature::IntVoidVoid,
        Signature::PositionBoolFormatrange,
        Signature::PositionIntFindtext,
        Signature::PositionIntInt,
        Signature::PositionIntVoid,
        Signature::PositionPositionInt,
        Signature::PositionPositionVoid,
        Signature::PositionVoidVoid,
        Signature::VoidBoolColour,
        Signature::VoidBoolInt,
        Signature::VoidBoolVoid,
        Signature::VoidColourVoid,
        Signature::VoidIntBool,
        Signature::VoidIntCells,
        Signature::VoidIntColour,
        Signature::VoidIntInt,
        Signature::VoidIntPosition,
        Signature::VoidIntString,
        Signature::VoidIntVoid,
        Signature::VoidKeymodInt,
        Signature::VoidKeymodVoid,
        Signature::VoidPositionInt,
        Signature::VoidPositionPosition,
        Signature::VoidPositionString,
        Signature::VoidPositionVoid,
        Signature::VoidStringString,
        Signature::VoidStringVoid,
        Signature::VoidVoidInt,
        Signature::VoidVoidString,
        Signature::VoidVoidVoid,
    ];

    /// Resolve a signature string such as `int_void_stringresult`.
    pub fn from_key(key: &str) -> Option<Self> {
        SIGNATURES.get(key).copied()
    }

    /// The signature string this variant is keyed by.
    pub fn key(self) -> &'static str {
        match self {
            Signature::BoolIntVoid => "bool_int_void",
            Signature::BoolPositionPosition => "bool_position_position",
            Signature::BoolVoidVoid => "bool_void_void",
            Signature::ColourIntVoid => "colour_int_void",
            Signature::ColourVoidVoid => "colour_void_void",
            Signature::IntIntInt => "int_int_int",
            Signature::IntIntString => "int_int_string",
            Signature::IntIntStringresult => "int_int_stringresult",
            Signature::IntIntVoid => "int_int_void",
            Signature::IntPositionBool => "int_position_bool",
            Signature::IntPositionPosition => "int_position_position",
            Signature::IntPositionVoid => "int_position_void",
            Signature::IntStringStringresult => "int_string_stringresult",
            Signature::IntStringVoid => "int_string_void",
            Signature::IntVoidPosition => "int_void_position",
            Signature::IntVoidStringresult => "int_void_stringresult",
            Signature::IntVoidTextrange => "int_void_textrange",
            Signature::IntVoidVoid => "int_void_void",
            Signature::PositionBoolFormatrange => "position_bool_formatrange",
            Signature::PositionIntFindtext => "position_int_findtext",
            Signature::PositionIntInt => "position_int_int",
            Signature::PositionIntVoid => "position_int_void",
            Signature::PositionPositionInt => "position_position_int",
            Signature::PositionPositionVoid => "position_position_void",
            Signature::PositionVoidVoid => "position_void_void",
            Signature::VoidBoolColour => "void_bool_colour",
            Signature::VoidBoolInt => "void_bool_int",
            Signature::VoidBoolVoid => "void_bool_void",
            Signature::VoidColourVoid => "void_colour_void",
            Signature::VoidIntBool => "void_int_bool",
            Signature::VoidIntCells => "void_int_cells",
            Signature::VoidIntColour => "void_int_colour",
            Signature::VoidIntInt => "void_int_int",
            Signature::VoidIntPosition => "void_int_position",
            Signature::VoidIntString => "void_int_string",
            Signature::VoidIntVoid => "void_int_void",
            Signature::VoidKeymodInt => "void_keymod_int",
            Signature::VoidKeymodVoid => "void_keymod_void",
            Signature::VoidPositionInt => "void_position_int",
            Signature::VoidPositionPosition => "void_position_position",
            Signature::VoidPositionString => "void_position_string",
            Signature::VoidPositionVoid => "void_position_void",
            Signature::VoidStringString => "void_string_string",
            Signature::VoidStringVoid => "void_string_void",
            Signature::VoidVoidInt => "void_void_int",
            Signature::VoidVoidString => "void_void_string",
            Signature::VoidVoidVoid => "void_void_void",
        }
    }

    /// Declaration line of the wrapper.
    pub fn signature_template(self) -> &'static str {
        match self {
            Signature::BoolIntVoid => "bool $name(int $p1)",
            Signature::BoolPositionPosition => "bool $name(int $p1, int $p2)",
            Signature::BoolVoidVoid => "bool $name()",
            Signature::ColourIntVoid => "Color $name(int $p1)",
            Signature::ColourVoidVoid => "Color $name()",
            Signature::IntIntInt => "int $name(int $p1, int $p2)",
            Signature::IntIntString => "int $name(int $p1, const std::string &$p2)",
            Signature::IntIntStringresult => "int $name(int $p1, std::string &$p2)",
            Signature::IntIntVoid => "int $name(int $p1)",
            Signature::IntPositionBool => "int $name(int $p1, bool $p2)",
            Signature::IntPositionPosition => "int $name(int $p1, int $p2)",
            Signature::IntPositionVoid => "int $name(int $p1)",
            Signature::IntStringStringresult => "int $name(const std::string &$p1, std::string &$p2)",
            Signature::IntStringVoid => "int $name(const std::string &$p1)",
            Signature::IntVoidPosition => "int $name(int $p2)",
            Signature::IntVoidStringresult => "int $name(std::string &$p2)",
            Signature::IntVoidTextrange => "int $name(Sci_TextRange &$p2)",
            Signature::IntVoidVoid => "int $name()",
            Signature::PositionBoolFormatrange => "int $name(bool $p1, Sci_RangeToFormat &$p2)",
            Signature::PositionIntFindtext => "int $name(int $p1, Sci_TextToFind &$p2)",
            Signature::PositionIntInt => "int $name(int $p1, int $p2)",
            Signature::PositionIntVoid => "int $name(int $p1)",
            Signature::PositionPositionInt => "int $name(int $p1, int $p2)",
            Signature::PositionPositionVoid => "int $name(int $p1)",
            Signature::PositionVoidVoid => "int $name()",
            Signature::VoidBoolColour => "void $name(bool $p1, const Color &$p2)",
            Signature::VoidBoolInt => "void $name(bool $p1, int $p2)",
            Signature::VoidBoolVoid => "void $name(bool $p1)",
            Signature::VoidColourVoid => "void $name(const Color &$p1)",
            Signature::VoidIntBool => "void $name(int $p1, bool $p2)",
            Signature::VoidIntCells => "void $name(int $p1, std::uint8_t *$p2)",
            Signature::VoidIntColour => "void $name(int $p1, const Color &$p2)",
            Signature::VoidIntInt => "void $name(int $p1, int $p2)",
            Signature::VoidIntPosition => "void $name(int $p1, int $p2)",
            Signature::VoidIntString => "void $name(int $p1, const std::string &$p2)",
            Signature::VoidIntVoid => "void $name(int $p1)",
            Signature::VoidKeymodInt => "void $name(const KeyMod &$p1, int $p2)",
            Signature::VoidKeymodVoid => "void $name(const KeyMod &$p1)",
            Signature::VoidPositionInt => "void $name(int $p1, int $p2)",
            Signature::VoidPositionPosition => "void $name(int $p1, int $p2)",
            Signature::VoidPositionString => "void $name(int $p1, const std::string &$p2)",
            Signature::VoidPositionVoid => "void $name(int $p1)",
            Signature::VoidStringString => "void $name(const std::string &$p1, const std::string &$p2)",
            Signature::VoidStringVoid => "void $name(const std::string &$p1)",
            Signature::VoidVoidInt => "void $name(int $p2)",
            Signature::VoidVoidString => "void $name(const std::string &$p2)",
            Signature::VoidVoidVoid => "void $name()",
        }
    }

    /// Single-statement body of the wrapper.
    pub fn body_template(self) -> &'static str {
        match self {
            Signature::BoolIntVoid => "return send($msg, $p1);",
            Signature::BoolPositionPosition => "return send($msg, $p1, $p2);",
            Signature::BoolVoidVoid => "return send($msg);",
            Signature::ColourIntVoid => "return Color::from_int(send($msg, $p1));",
            Signature::ColourVoidVoid => "return Color::from_int(send($msg));",
            Signature::IntIntInt => "return send($msg, $p1, $p2);",
            Signature::IntIntString => "return send($msg, $p1, reinterpret_cast<intptr_t>($p2.c_str()));",
            Signature::IntIntStringresult => "return send($msg, $p1, $p2);",
            Signature::IntIntVoid => "return send($msg, $p1);",
            Signature::IntPositionBool => "return send($msg, $p1, $p2);",
            Signature::IntPositionPosition => "return send($msg, $p1, $p2);",
            Signature::IntPositionVoid => "return send($msg, $p1);",
            Signature::IntStringStringresult => "return send($msg, reinterpret_cast<uintptr_t>($p1.c_str()), $p2);",
            Signature::IntStringVoid => "return send($msg, reinterpret_cast<uintptr_t>($p1.c_str()));",
            Signature::IntVoidPosition => "return send($msg, 0, $p2);",
            Signature::IntVoidStringresult => "return send($msg, 0, $p2);",
            Signature::IntVoidTextrange => "return send($msg, 0, reinterpret_cast<intptr_t>(&$p2));",
            Signature::IntVoidVoid => "return send($msg);",
            Signature::PositionBoolFormatrange => "return send($msg, $p1, reinterpret_cast<intptr_t>(&$p2));",
            Signature::PositionIntFindtext => "return send($msg, $p1, reinterpret_cast<intptr_t>(&$p2));",
            Signature::PositionIntInt => "return send($msg, $p1, $p2);",
            Signature::PositionIntVoid => "return send($msg, $p1);",
            Signature::PositionPositionInt => "return send($msg, $p1, $p2);",
            Signature::PositionPositionVoid => "return send($msg, $p1);",
            Signature::PositionVoidVoid => "return send($msg);",
            Signature::VoidBoolColour => "send($msg, $p1, $p2.to_int());",
            Signature::VoidBoolInt => "send($msg, $p1, $p2);",
            Signature::VoidBoolVoid => "send($msg, $p1);",
            Signature::VoidColourVoid => "send($msg, $p1.to_int());",
            Signature::VoidIntBool => "send($msg, $p1, $p2);",
            Signature::VoidIntCells => "send($msg, $p1, reinterpret_cast<intptr_t>($p2));",
            Signature::VoidIntColour => "send($msg, $p1, $p2.to_int());",
            Signature::VoidIntInt => "send($msg, $p1, $p2);",
            Signature::VoidIntPosition => "send($msg, $p1, $p2);",
            Signature::VoidIntString => "send($msg, $p1, reinterpret_cast<intptr_t>($p2.c_str()));",
            Signature::VoidIntVoid => "send($msg, $p1);",
            Signature::VoidKeymodInt => "send($msg, $p1.to_int(), $p2);",
            Signature::VoidKeymodVoid => "send($msg, $p1.to_int());",
            Signature::VoidPositionInt => "send($msg, $p1, $p2);",
            Signature::VoidPositionPosition => "send($msg, $p1, $p2);",
            Signature::VoidPositionString => "send($msg, $p1, reinterpret_cast<intptr_t>($p2.c_str()));",
            Signature::VoidPositionVoid => "send($msg, $p1);",
            Signature::VoidStringString => "send($msg, reinterpret_cast<uintptr_t>($p1.c_str()), reinterpret_cast<intptr_t>($p2.c_str()));",
            Signature::VoidStringVoid => "send($msg, reinterpret_cast<uintptr_t>($p1.c_str()));",
            Signature::VoidVoidInt => "send($msg, 0, $p2);",
            Signature::VoidVoidString => "send($msg, 0, reinterpret_cast<intptr_t>($p2.c_str()));",
            Signature::VoidVoidVoid => "send($msg);",
        }
    }
}
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:(\$)|([_A-Za-z][_A-Za-z0-9]*)|\{([_A-Za-z][_A-Za-z0-9]*)\})")
        .expect("valid regex")
});

/// Values substituted into the catalog templates for one function.
#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    name: &'a str,
    msg: String,
    p1: Option<&'a str>,
    p2: Option<&'a str>,
}

impl<'a> Placeholders<'a> {
    pub fn for_callable<C: Callable + ?Sized>(func: &'a C) -> Self {
        let params = func.parameters();
        Self {
            name: func.name(),
            msg: func.value().to_string(),
            p1: params.first().map(|p| p.name.as_str()),
            p2: params.get(1).map(|p| p.name.as_str()),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        match key {
            "name" => Some(self.name),
            "msg" => Some(&self.msg),
            "p1" => self.p1,
            "p2" => self.p2,
            _ => None,
        }
    }
}

/// Replace `$key` / `${key}` placeholders; `$$` yields a literal `$`.
pub fn substitute(template: &str, values: &Placeholders<'_>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&template[last..whole.start()]);

        if caps.get(1).is_some() {
            out.push('$');
        } else {
            let key = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            let value = values.get(key).ok_or_else(|| Error::MissingPlaceholder {
                placeholder: key.to_string(),
                template: template.to_string(),
            })?;
            out.push_str(value);
        }
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}

/// Find the catalog entry for a function's type signature.
pub fn lookup<C: Callable + ?Sized>(func: &C) -> Result<Signature> {
    let key = func.type_signature();
    Signature::from_key(&key).ok_or_else(|| Error::UnsupportedSignature {
        symbol: func.name().to_string(),
        signature: key,
    })
}

/// Render the declaration line and body of a function wrapper.
pub fn render_templates<C: Callable + ?Sized>(func: &C) -> Result<(String, String)> {
    let signature = lookup(func)?;
    let values = Placeholders::for_callable(func);
    Ok((
        substitute(signature.signature_template(), &values)?,
        substitute(signature.body_template(), &values)?,
    ))
}

/// Check every function and property accessor against the catalog.
///
/// Each unsupported signature is logged; the first one in declaration order is
/// returned as the error.
pub fn validate(iface: &Interface) -> Result<()> {
    let accessors = iface.properties().iter().flat_map(|p| p.accessors());
    let mut first = None;
    for err in iface
        .functions()
        .iter()
        .chain(accessors)
        .filter_map(|func| lookup(func).err())
    {
        tracing::error!(error = %err, "unsupported function signature");
        first.get_or_insert(err);
    }

    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Function, Parameter};

    fn param(type_name: &str, name: &str) -> Parameter {
        Parameter {
            type_name: Some(type_name.to_string()).filter(|t| !t.is_empty()),
            name: name.to_string(),
            value: String::new(),
            comment: Vec::new(),
        }
    }

    fn function(name: &str, ret: &str, p1: (&str, &str), p2: (&str, &str)) -> Function {
        Function {
            name: name.to_string(),
            value: 2181,
            return_type: ret.to_string(),
            parameters: [param(p1.0, p1.1), param(p2.0, p2.1)],
            comment: Vec::new(),
        }
    }

    #[test]
    fn test_catalog_is_closed_and_consistent() {
        assert_eq!(Signature::ALL.len(), 47);
        for sig in Signature::ALL {
            assert_eq!(Signature::from_key(sig.key()), Some(*sig));
            assert!(sig.signature_template().contains("$name"));
        }
        assert_eq!(Signature::from_key("void_double_void"), None);
    }

    #[test]
    fn test_substitute() {
        let func = function("set_text", "void", ("", ""), ("string", "text"));
        let values = Placeholders::for_callable(&func);
        assert_eq!(
            substitute("$name(${p2}) = $msg $$", &values).unwrap(),
            "set_text(text) = 2181 $"
        );

        let err = substitute("$missing", &values).unwrap_err();
        assert!(matches!(err, Error::MissingPlaceholder { placeholder, .. } if placeholder == "missing"));
    }

    #[test]
    fn test_render_set_text() {
        let func = function("set_text", "void", ("", ""), ("string", "text"));
        let (sig, body) = render_templates(&func).unwrap();
        assert_eq!(sig, "void set_text(const std::string &text)");
        assert_eq!(body, "send(2181, 0, reinterpret_cast<intptr_t>(text.c_str()));");
    }

    #[test]
    fn test_unsupported_signature() {
        let func = function("frobnicate", "double", ("int", "x"), ("", ""));
        let err = lookup(&func).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedSignature { symbol, signature }
                if symbol == "frobnicate" && signature == "double_int_void"
        ));
    }
}
