//! Dotted-numeric version ordering.
//!
//! Versions are compared component-wise as integers, so `10.0.0 > 9.0.0`.
//! Missing trailing components count as zero (`6 == 6.0.0`).
//!
//! Each dot-separated segment contributes its leading decimal digits only:
//! - "14.0.6" → [14, 0, 6]
//! - "15.0.0git" → [15, 0, 0]
//! - "6.0.0-rc1" → [6, 0, 0]
//! - "x.2" → [0, 2] (a segment without leading digits counts as zero)

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed dotted version.
#[derive(Clone, Debug, Default)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Parse a version string. Never fails; see the module docs for the policy.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let components = s.trim().split('.').map(leading_number).collect();
        Self { components }
    }

    /// Numeric components in order.
    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// First component, or zero for an empty version.
    #[must_use]
    pub fn major(&self) -> u64 {
        self.components.first().copied().unwrap_or(0)
    }

    /// Whether this version is at least `min`.
    #[must_use]
    pub fn satisfies(&self, min: &Self) -> bool {
        self >= min
    }
}

/// Digits at the start of a segment, zero if there are none.
fn leading_number(segment: &str) -> u64 {
    let end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    if end == 0 {
        return 0;
    }
    // Only digits remain, so the sole failure mode is overflow.
    segment[..end].parse().unwrap_or(u64::MAX)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| {
                let a = self.components.get(i).copied().unwrap_or(0);
                let b = other.components.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Compare two version strings.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    Version::parse(a).cmp(&Version::parse(b))
}

/// Whether `candidate` is at least `min`.
#[must_use]
pub fn satisfies(candidate: &str, min: &str) -> bool {
    compare(candidate, min).is_ge()
}
