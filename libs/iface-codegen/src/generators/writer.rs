//! Incremental, indentation-aware text writer

/// Accumulates generated text, prefixing `i*` writes with the current indentation.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    out: String,
    level: usize,
    unit: String,
    prefix: String,
}

impl CodeWriter {
    pub fn new(level: usize, unit: &str) -> Self {
        Self {
            out: String::new(),
            level,
            unit: unit.to_string(),
            prefix: unit.repeat(level),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn indent(&mut self) {
        self.level += 1;
        self.prefix = self.unit.repeat(self.level);
    }

    pub fn unindent(&mut self) {
        self.level = self.level.saturating_sub(1);
        self.prefix = self.unit.repeat(self.level);
    }

    pub fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    pub fn writeln(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Write `text` after the current indentation.
    pub fn iwrite(&mut self, text: &str) {
        self.out.push_str(&self.prefix);
        self.out.push_str(text);
    }

    /// Write an indented line.
    pub fn iwriteln(&mut self, text: &str) {
        self.iwrite(text);
        self.out.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}
