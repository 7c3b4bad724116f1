use crate::Result;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Target name that streams the output to stdout.
pub const STDOUT_TARGET: &str = "-";

/// Write `text` to `target` unless the file already holds exactly that text.
///
/// `-` streams to stdout. Returns whether anything was written.
pub fn write_if_changed(text: &str, target: &Path) -> Result<bool> {
    if target.as_os_str() == STDOUT_TARGET {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        return Ok(true);
    }

    if target.exists() && fs::read_to_string(target)? == text {
        tracing::info!(path = %target.display(), "output unchanged");
        return Ok(false);
    }

    fs::write(target, text)?;
    tracing::info!(path = %target.display(), bytes = text.len(), "wrote output");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_if_changed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binding.h");

        assert!(write_if_changed("one\n", &path).unwrap());
        assert!(!write_if_changed("one\n", &path).unwrap());
        assert!(write_if_changed("two\n", &path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "two\n");
    }
}
