//! Section renderers
//!
//! One function per output section. Each walks the model in declaration order and
//! writes into a [`CodeWriter`]; trailing whitespace is trimmed by the caller.

use super::catalog;
use crate::generators::CodeWriter;
use crate::ir::{Callable, Interface, Lexer, Style};
use crate::naming::strip_constant_prefix;
use crate::Result;

/// Entry written for an unassigned table slot.
pub const NULL_ENTRY: &str = "nullptr";

/// Write a block comment, one ` * ` line per comment line.
pub fn format_comment(w: &mut CodeWriter, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    w.iwriteln("/**");
    for line in lines {
        let line = line.strip_prefix('#').unwrap_or(line).trim();
        w.iwriteln(&format!(" * {line}"));
    }
    w.iwriteln(" */");
}

pub fn enums(iface: &Interface, w: &mut CodeWriter) {
    for enumeration in iface.enumerations() {
        format_comment(w, &enumeration.comment);
        w.iwriteln(&format!("enum class {}", enumeration.name));
        w.iwriteln("{");
        w.indent();
        for etor in &enumeration.enumerators {
            w.iwriteln(&format!("{} = {},", etor.name, etor.value));
        }
        w.unindent();
        w.iwriteln("};\n");
    }
}

/// Lexer names indexed by lexer id.
pub fn lexer_names(iface: &Interface, w: &mut CodeWriter) {
    for entry in lexer_table(iface) {
        let name = entry
            .map(|lexer| format!("\"{}\"", lexer.name))
            .unwrap_or_else(|| NULL_ENTRY.to_string());
        w.iwriteln(&format!("{name},"));
    }
}

/// One null-terminated style name array per lexer.
pub fn lexer_style_defs(iface: &Interface, w: &mut CodeWriter) {
    for lexer in iface.lexers() {
        let styles = style_table(lexer);
        w.iwriteln(&format!(
            "static const char *{}[{}]",
            style_table_name(lexer),
            styles.len() + 1
        ));
        w.iwriteln("{");
        w.indent();
        for entry in &styles {
            let name = entry
                .map(|style| format!("\"{}\"", style.name.to_lowercase()))
                .unwrap_or_else(|| NULL_ENTRY.to_string());
            w.iwriteln(&format!("{name},"));
        }
        w.iwriteln(&format!("{NULL_ENTRY},"));
        w.unindent();
        w.iwriteln("};");
        w.writeln("");
    }
}

/// `{ count, table }` pairs indexed by lexer id.
pub fn lexer_style_refs(iface: &Interface, w: &mut CodeWriter) {
    for entry in lexer_table(iface) {
        match entry {
            Some(lexer) => w.iwriteln(&format!(
                "{{ {}, {} }},",
                style_table(lexer).len(),
                style_table_name(lexer)
            )),
            None => w.iwriteln(&format!("{{ 0, {NULL_ENTRY} }},")),
        }
    }
}

/// Render one wrapper: comment, signature line and a braced single-statement body.
pub fn function<C: Callable + ?Sized>(func: &C, w: &mut CodeWriter) -> Result<()> {
    let (signature, body) = catalog::render_templates(func)?;
    format_comment(w, func.comment());
    w.iwriteln(&signature);
    w.iwriteln("{");
    w.indent();
    w.iwriteln(&body);
    w.unindent();
    w.iwriteln("}\n");
    Ok(())
}

pub fn functions(iface: &Interface, w: &mut CodeWriter) -> Result<()> {
    for func in iface.functions() {
        function(func, w)?;
    }
    Ok(())
}

/// Getter then setter for every property; a missing side is skipped.
pub fn properties(iface: &Interface, w: &mut CodeWriter) -> Result<()> {
    for prop in iface.properties() {
        for accessor in prop.accessors() {
            function(accessor, w)?;
        }
    }
    Ok(())
}

/// Constants sorted by their stripped name, then value.
pub fn constant_decls(iface: &Interface, w: &mut CodeWriter) {
    let mut decls: Vec<(&str, i64)> = iface
        .constants()
        .iter()
        .map(|c| (strip_constant_prefix(&c.name), c.value))
        .collect();
    decls.sort();

    for (name, value) in decls {
        w.iwriteln(&format!("static constexpr int {name} = {value};"));
    }
}

pub fn constant_undefs(iface: &Interface, w: &mut CodeWriter) {
    for constant in iface.constants() {
        w.iwriteln(&format!("#undef {}", constant.name));
    }
}

pub fn signals(iface: &Interface, w: &mut CodeWriter) {
    for event in iface.events() {
        w.iwriteln(&format!("NotificationSignal signal_{}_;", event.name));
    }
}

pub fn signal_accessors(iface: &Interface, w: &mut CodeWriter) {
    for event in iface.events() {
        w.iwriteln(&format!("NotificationSignal &signal_{}()", event.name));
        w.iwriteln("{");
        w.indent();
        w.iwriteln(&format!("return signal_{}_;", event.name));
        w.unindent();
        w.iwriteln("}\n");
    }
}

fn style_table_name(lexer: &Lexer) -> String {
    format!("{}_styles", lexer.name.to_lowercase())
}

/// Lexers placed at the slot of their id; empty without lexers.
fn lexer_table(iface: &Interface) -> Vec<Option<&Lexer>> {
    sparse(
        iface
            .lexers()
            .iter()
            .filter_map(|lexer| slot("lexers", &lexer.name, lexer.value).map(|idx| (idx, lexer))),
    )
}

/// Styles placed at the slot of their value; always at least one slot.
fn style_table(lexer: &Lexer) -> Vec<Option<&Style>> {
    let mut slots = sparse(
        lexer
            .styles
            .iter()
            .filter_map(|style| slot(&lexer.name, &style.name, style.value).map(|idx| (idx, style))),
    );
    if slots.is_empty() {
        slots.push(None);
    }
    slots
}

fn slot(owner: &str, name: &str, value: i64) -> Option<usize> {
    match usize::try_from(value) {
        Ok(idx) => Some(idx),
        Err(_) => {
            tracing::warn!(owner, name, value, "negative value has no table slot, skipping");
            None
        }
    }
}

/// Later entries overwrite earlier ones at the same slot.
fn sparse<T>(entries: impl IntoIterator<Item = (usize, T)>) -> Vec<Option<T>> {
    let mut slots: Vec<Option<T>> = Vec::new();
    for (idx, item) in entries {
        if idx >= slots.len() {
            slots.resize_with(idx + 1, || None);
        }
        slots[idx] = Some(item);
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Constant, Enumeration, Event, Member};
    use indexmap::IndexSet;

    fn member(name: &str, value: i64) -> Member {
        Member {
            name: name.to_string(),
            raw_name: name.to_string(),
            value,
            comment: Vec::new(),
        }
    }

    fn lexer(name: &str, value: i64, styles: Vec<Member>) -> Lexer {
        Lexer {
            name: name.to_string(),
            value,
            ident: format!("SCLEX_{}", name.to_uppercase()),
            prefixes: IndexSet::new(),
            styles,
            comment: Vec::new(),
        }
    }

    fn render(iface: &Interface, f: impl Fn(&Interface, &mut CodeWriter)) -> String {
        let mut w = CodeWriter::new(0, "\t");
        f(iface, &mut w);
        w.into_string()
    }

    #[test]
    fn test_format_comment_strips_marker() {
        let mut w = CodeWriter::new(1, "\t");
        format_comment(&mut w, &["# Set the text.  ".to_string(), "More".to_string()]);
        assert_eq!(w.as_str(), "\t/**\n\t * Set the text.\n\t * More\n\t */\n");

        let mut w = CodeWriter::new(0, "\t");
        format_comment(&mut w, &[]);
        assert_eq!(w.as_str(), "");
    }

    #[test]
    fn test_enums() {
        let iface = Interface {
            enumerations: vec![Enumeration {
                name: "FoldAction".to_string(),
                prefixes: IndexSet::new(),
                enumerators: vec![member("CONTRACT", 0), member("EXPAND", 1)],
                comment: vec!["Fold actions".to_string()],
            }],
            ..Interface::default()
        };
        assert_eq!(
            render(&iface, enums),
            "/**\n * Fold actions\n */\nenum class FoldAction\n{\n\tCONTRACT = 0,\n\tEXPAND = 1,\n};\n\n"
        );
    }

    #[test]
    fn test_sparse_lexer_names() {
        let iface = Interface {
            lexers: vec![
                lexer("Container", 0, Vec::new()),
                lexer("Python", 2, Vec::new()),
                lexer("Cpp", 5, Vec::new()),
            ],
            ..Interface::default()
        };
        let text = render(&iface, lexer_names);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["\"Container\",", "nullptr,", "\"Python\",", "nullptr,", "nullptr,", "\"Cpp\","]
        );

        let text = render(&iface, lexer_style_refs);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "{ 1, container_styles },");
        assert_eq!(lines[1], "{ 0, nullptr },");
        assert_eq!(lines[5], "{ 1, cpp_styles },");
    }

    #[test]
    fn test_lexer_style_defs() {
        let iface = Interface {
            lexers: vec![
                lexer("Python", 2, vec![member("DEFAULT", 0), member("STRING", 2)]),
                lexer("Null", 1, Vec::new()),
            ],
            ..Interface::default()
        };
        assert_eq!(
            render(&iface, lexer_style_defs),
            "static const char *python_styles[4]\n{\n\t\"default\",\n\tnullptr,\n\t\"string\",\n\tnullptr,\n};\n\n\
             static const char *null_styles[2]\n{\n\tnullptr,\n\tnullptr,\n};\n\n"
        );
    }

    #[test]
    fn test_duplicate_style_value_overwrites() {
        let lex = lexer("Python", 2, vec![member("OLD", 1), member("NEW", 1)]);
        let table = style_table(&lex);
        assert_eq!(table.len(), 2);
        assert_eq!(table[1].map(|s| s.name.as_str()), Some("NEW"));
    }

    #[test]
    fn test_no_lexers_renders_nothing() {
        let iface = Interface::default();
        assert_eq!(render(&iface, lexer_names), "");
        assert_eq!(render(&iface, lexer_style_refs), "");
    }

    #[test]
    fn test_constants() {
        let constant = |name: &str, value| Constant {
            name: name.to_string(),
            value,
            comment: Vec::new(),
        };
        let iface = Interface {
            constants: vec![
                constant("SCI_START", 2000),
                constant("SCEN_CHANGE", 768),
                constant("SC_CP_UTF8", 65001),
                constant("INVALID_POSITION", -1),
            ],
            ..Interface::default()
        };
        assert_eq!(
            render(&iface, constant_decls),
            "static constexpr int CP_UTF8 = 65001;\n\
             static constexpr int EN_CHANGE = 768;\n\
             static constexpr int INVALID_POSITION = -1;\n\
             static constexpr int START = 2000;\n"
        );
        assert_eq!(
            render(&iface, constant_undefs),
            "#undef SCI_START\n#undef SCEN_CHANGE\n#undef SC_CP_UTF8\n#undef INVALID_POSITION\n"
        );
    }

    #[test]
    fn test_signals() {
        let iface = Interface {
            events: vec![Event {
                name: "style_needed".to_string(),
                value: 2000,
                return_type: "void".to_string(),
                parameters: Vec::new(),
                comment: Vec::new(),
            }],
            ..Interface::default()
        };
        assert_eq!(
            render(&iface, signals),
            "NotificationSignal signal_style_needed_;\n"
        );
        assert_eq!(
            render(&iface, signal_accessors),
            "NotificationSignal &signal_style_needed()\n{\n\treturn signal_style_needed_;\n}\n\n"
        );
    }
}
