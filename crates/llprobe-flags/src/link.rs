//! Link argument assembly.

/// How `-l` arguments are laid out for the host linker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStyle {
    /// Wrap in `--start-group`/`--end-group` so mutually dependent static
    /// archives resolve in one pass (GNU ld, lld).
    Grouped,
    /// Plain `-l` list (ld64, which has no group directives).
    Flat,
}

impl LinkStyle {
    /// Style for the platform this binary was built for.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_os = "macos") {
            Self::Flat
        } else {
            Self::Grouped
        }
    }
}

pub const START_GROUP: &str = "-Wl,--start-group";
pub const END_GROUP: &str = "-Wl,--end-group";

/// Build `-l<name>` arguments for `names` in the given style.
#[must_use]
pub fn link_args<I, S>(names: I, style: LinkStyle) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let libs = names.into_iter().map(|name| format!("-l{}", name.as_ref()));
    match style {
        LinkStyle::Grouped => std::iter::once(START_GROUP.to_string())
            .chain(libs)
            .chain(std::iter::once(END_GROUP.to_string()))
            .collect(),
        LinkStyle::Flat => libs.collect(),
    }
}
