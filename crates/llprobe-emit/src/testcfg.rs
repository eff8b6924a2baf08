//! Test-build configuration document.
//!
//! Describes, per generator, where a generated test case lands and how to build
//! and run it. Command templates use [`NAME_PLACEHOLDER`] for the case name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Placeholder for the test case name in templates.
pub const NAME_PLACEHOLDER: &str = "{NAME}";

/// Directory (relative to the build root) that generated test cases go to.
pub const TEST_OUTPUT_DIR: &str = "build/tests";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    /// Path of the generated source for one case.
    pub output: String,
    /// Command compiling the generated source.
    pub build: String,
    /// Command linking and running the case.
    pub run: String,
}

/// Parser input for the binding generator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserInput {
    /// Header to parse, when one was found.
    pub input: Option<String>,
    /// Include directories handed to the parser.
    pub includes: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestConfig {
    pub module: String,
    pub generators: BTreeMap<String, Generator>,
    pub libs: String,
    pub parser: ParserInput,
}

impl TestConfig {
    /// Standard `c` and `cxx` generators compiling with `compiler`.
    ///
    /// `include_flags` is prepended to every compile, `cxxflags` only to C++.
    #[must_use]
    pub fn standard(
        module: &str,
        compiler: &Path,
        include_flags: &str,
        cxxflags: &str,
        libs: &str,
        parser: ParserInput,
    ) -> Self {
        let cc = compiler.display().to_string();
        let mut generators = BTreeMap::new();
        generators.insert(
            "c".to_string(),
            generator(&cc, &join_flags(&[include_flags]), "c", libs),
        );
        generators.insert(
            "cxx".to_string(),
            generator(&cc, &join_flags(&[include_flags, cxxflags]), "cpp", libs),
        );
        Self {
            module: module.to_string(),
            generators,
            libs: libs.to_string(),
            parser,
        }
    }

    /// Resolve templates of `generator` for one case.
    #[must_use]
    pub fn case(&self, generator: &str, name: &str) -> Option<Generator> {
        self.generators.get(generator).map(|g| Generator {
            output: expand_case(&g.output, name),
            build: expand_case(&g.build, name),
            run: expand_case(&g.run, name),
        })
    }
}

fn join_flags(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn generator(cc: &str, flags: &str, ext: &str, libs: &str) -> Generator {
    let stem = format!("{TEST_OUTPUT_DIR}/{NAME_PLACEHOLDER}");
    let output = format!("{stem}.{ext}");
    let compile = join_flags(&[cc, flags]);
    Generator {
        build: format!("{compile} -c {output} -o {stem}.o"),
        run: format!(
            "{} && {stem}",
            join_flags(&[cc, &format!("{stem}.o"), libs, &format!("-o {stem}")])
        ),
        output,
    }
}

/// Substitute `name` for every [`NAME_PLACEHOLDER`] in `template`.
#[must_use]
pub fn expand_case(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}

/// Render as pretty JSON with a trailing newline.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn gen_test_config(config: &TestConfig) -> serde_json::Result<String> {
    let mut s = serde_json::to_string_pretty(config)?;
    s.push('\n');
    Ok(s)
}

/// Include list for [`ParserInput`] from directory paths.
#[must_use]
pub fn include_strings(dirs: &[PathBuf]) -> Vec<String> {
    dirs.iter().map(|d| d.display().to_string()).collect()
}
