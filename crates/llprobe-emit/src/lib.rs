//! Build artifacts consumed by the downstream binding build:
//! - `clang_includes.h`: system include directories as a C array
//! - `config.mk`: make variables for compiler, flags, and libraries
//! - `tests.json`: per-generator build/run templates for integration tests
//!
//! Every file is written through [`write_if_changed`] so reruns with the same
//! toolchain leave timestamps alone.

pub mod header;
mod project;
pub mod testcfg;
pub mod vars;
mod write;

pub use header::gen_include_header;
pub use project::*;
pub use testcfg::{
    Generator, NAME_PLACEHOLDER, ParserInput, TestConfig, expand_case, gen_test_config,
};
pub use vars::{BuildVars, gen_vars};
pub use write::write_if_changed;
