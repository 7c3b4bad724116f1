//! Binding generator command line tool
//!
//! Reads a Scintilla interface description and splices the generated C++ sections
//! into a template document.
//!
//! Usage:
//!   scibind [--iface Scintilla.iface] [--output-file binding.h] binding.h.in
//!   scibind --iface Scintilla.iface --dump-model

mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use scibind_codegen::generators::GeneratorConfig;
use scibind_codegen::{generate_binding, CodeGenerator};
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

/// Interface description looked up when `--iface` is not given.
const DEFAULT_IFACE: &str = "Scintilla.iface";

#[derive(Parser, Debug)]
#[clap(name = "scibind")]
#[clap(about = "Generate C++ binding code from a Scintilla interface description")]
struct Args {
    /// Template document containing the section placeholders
    #[clap(required_unless_present = "dump_model")]
    template: Option<PathBuf>,

    /// The interface description to read (.iface, or .json for the JSON rendition)
    #[clap(short, long, value_name = "FILE")]
    iface: Option<PathBuf>,

    /// The output file, or - for stdout
    #[clap(short, long, value_name = "FILE", default_value = "-")]
    output_file: PathBuf,

    /// Print the interface model as JSON instead of generating code
    #[clap(long)]
    dump_model: bool,

    /// Log level used when RUST_LOG is not set
    #[clap(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines
    #[clap(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(&args.log_level, args.log_json)?;

    let iface = locate_iface(args.iface)?;
    info!(iface = %iface.display(), "using interface description");

    if args.dump_model {
        let codegen = CodeGenerator::from_path(&iface)
            .with_context(|| format!("building interface model from {}", iface.display()))?;
        let json = serde_json::to_string_pretty(codegen.interface())
            .context("serializing interface model")?;
        println!("{json}");
        return Ok(());
    }

    let Some(template) = args.template else {
        bail!("missing template document");
    };

    let written = generate_binding(
        &iface,
        &template,
        &args.output_file,
        GeneratorConfig::default(),
    )?;
    info!(written, output = %args.output_file.display(), "binding generated");

    Ok(())
}

/// Prefer an explicit path, then `./Scintilla.iface`, then one next to the executable.
fn locate_iface(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let local = Path::new(".").join(DEFAULT_IFACE);
    if local.exists() {
        return Ok(local);
    }

    let exe = env::current_exe().context("locating the executable")?;
    if let Some(bundled) = exe.parent().map(|dir| dir.join(DEFAULT_IFACE)) {
        if bundled.exists() {
            return Ok(bundled);
        }
    }

    bail!("unable to locate '{DEFAULT_IFACE}' file, use --iface option to specify")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["scibind", "-i", "api.iface", "-o", "out.h", "in.h"]);
        assert_eq!(args.iface, Some(PathBuf::from("api.iface")));
        assert_eq!(args.output_file, PathBuf::from("out.h"));
        assert_eq!(args.template, Some(PathBuf::from("in.h")));
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_template_optional_when_dumping() {
        let args = Args::parse_from(["scibind", "--dump-model"]);
        assert!(args.dump_model);
        assert_eq!(args.output_file, PathBuf::from("-"));
        assert!(Args::try_parse_from(["scibind"]).is_err());
    }

    #[test]
    fn test_explicit_iface_wins() {
        let path = locate_iface(Some(PathBuf::from("custom.iface"))).unwrap();
        assert_eq!(path, PathBuf::from("custom.iface"));
    }
}
