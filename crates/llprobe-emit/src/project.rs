//! Artifact set: the three files written for the downstream build.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::header::gen_include_header;
use crate::testcfg::{TestConfig, gen_test_config};
use crate::vars::{BuildVars, gen_vars};
use crate::write::write_if_changed;

pub const HEADER_FILE: &str = "clang_includes.h";
pub const VARS_FILE: &str = "config.mk";
pub const TESTS_FILE: &str = "tests.json";

/// Where artifacts go.
#[derive(Clone, Debug)]
pub struct Artifacts {
    /// Output directory.
    pub output_dir: PathBuf,
}

/// Outcome of writing one artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Written {
    pub path: PathBuf,
    /// False if the file already had the same content.
    pub changed: bool,
}

impl Artifacts {
    #[must_use]
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    // ============= Path helpers =============

    /// Path to the generated include header.
    #[must_use]
    pub fn header_path(&self) -> PathBuf {
        self.output_dir.join(HEADER_FILE)
    }

    /// Path to the variable-definition file.
    #[must_use]
    pub fn vars_path(&self) -> PathBuf {
        self.output_dir.join(VARS_FILE)
    }

    /// Path to the test configuration document.
    #[must_use]
    pub fn tests_path(&self) -> PathBuf {
        self.output_dir.join(TESTS_FILE)
    }

    // ============= Writers =============

    /// Write the include header.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_header(&self, include_dirs: &[PathBuf]) -> io::Result<Written> {
        Self::write(self.header_path(), &gen_include_header(include_dirs))
    }

    /// Write the variable-definition file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_vars(&self, vars: &BuildVars) -> io::Result<Written> {
        Self::write(self.vars_path(), &gen_vars(vars))
    }

    /// Write the test configuration document.
    ///
    /// # Errors
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn write_tests(&self, config: &TestConfig) -> io::Result<Written> {
        let content = gen_test_config(config).map_err(io::Error::other)?;
        Self::write(self.tests_path(), &content)
    }

    /// Write all three artifacts, creating the output directory if needed.
    ///
    /// # Errors
    /// Returns the first write failure.
    pub fn write_all(
        &self,
        vars: &BuildVars,
        tests: &TestConfig,
    ) -> io::Result<Vec<Written>> {
        fs::create_dir_all(&self.output_dir)?;
        debug!(dir = %self.output_dir.display(), "writing artifacts");
        Ok(vec![
            self.write_header(&vars.include_dirs)?,
            self.write_vars(vars)?,
            self.write_tests(tests)?,
        ])
    }

    fn write(path: PathBuf, content: &str) -> io::Result<Written> {
        let changed = write_if_changed(&path, content)?;
        if changed {
            info!(path = %path.display(), "updated");
        } else {
            debug!(path = %path.display(), "up to date");
        }
        Ok(Written { path, changed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testcfg::ParserInput;

    fn vars() -> BuildVars {
        BuildVars {
            clang: PathBuf::from("/usr/bin/clang"),
            include_dirs: vec![PathBuf::from("/usr/include")],
            version: "14.0.6".into(),
            version_major: "14".into(),
            ..BuildVars::default()
        }
    }

    fn tests() -> TestConfig {
        TestConfig::standard(
            "clang",
            Path::new("/usr/bin/clang"),
            "",
            "",
            "",
            ParserInput::default(),
        )
    }

    #[test]
    fn test_write_all_then_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = Artifacts::new(dir.path().join("out"));

        let first = artifacts.write_all(&vars(), &tests()).unwrap();
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|w| w.changed));
        assert!(artifacts.header_path().is_file());
        assert!(artifacts.vars_path().is_file());
        assert!(artifacts.tests_path().is_file());

        let second = artifacts.write_all(&vars(), &tests()).unwrap();
        assert!(second.iter().all(|w| !w.changed));

        let mut changed = vars();
        changed.version = "14.0.7".into();
        let third = artifacts.write_all(&changed, &tests()).unwrap();
        let flags: Vec<bool> = third.iter().map(|w| w.changed).collect();
        assert_eq!(flags, vec![false, true, false]);
    }
}
