#![allow(dead_code)]

use scibind_codegen::ir::Interface;
use scibind_codegen::parser::{self, FeatureSet};
use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn mini_features() -> FeatureSet {
    parser::read_features(&fixture("mini.iface")).expect("fixture parses")
}

pub fn mini_interface() -> Interface {
    Interface::from_features(&mini_features()).expect("fixture builds")
}
