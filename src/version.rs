use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, ScribeError};

/// A three-part release version. Ordering is lexicographic over
/// (major, minor, patch), which the field order gives us for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Version used when a repository has never been released.
    pub const fn initial() -> Self {
        Self::new(0, 1, 0)
    }

    /// `None` when the bumped field would overflow.
    pub fn bump(self, request: BumpRequest) -> Option<Version> {
        match request {
            BumpRequest::Major => Some(Version::new(self.major.checked_add(1)?, 0, 0)),
            BumpRequest::Minor => Some(Version::new(self.major, self.minor.checked_add(1)?, 0)),
            BumpRequest::Patch => Some(Version::new(
                self.major,
                self.minor,
                self.patch.checked_add(1)?,
            )),
            BumpRequest::Exact(version) => Some(version),
        }
    }
}

/// Always rendered with the leading `v`.
impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self> {
        parse_version(s).ok_or_else(|| ScribeError::InvalidVersion(s.to_string()))
    }
}

/// What the user asked for: a symbolic bump or an explicit version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpRequest {
    Major,
    Minor,
    Patch,
    Exact(Version),
}

impl FromStr for BumpRequest {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(BumpRequest::Major),
            "minor" => Ok(BumpRequest::Minor),
            "patch" => Ok(BumpRequest::Patch),
            other => parse_version(other)
                .map(BumpRequest::Exact)
                .ok_or_else(|| ScribeError::InvalidBumpType(other.to_string())),
        }
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)(?:-(.+))?$").expect("version pattern is valid")
    })
}

/// Parses `[v]MAJOR.MINOR.PATCH[-suffix]`. The suffix is accepted and dropped.
/// Returns `None` for anything else, including components that overflow `u64`.
pub fn parse_version(input: &str) -> Option<Version> {
    let caps = version_pattern().captures(input.trim())?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps.get(3)?.as_str().parse().ok()?;
    Some(Version::new(major, minor, patch))
}

pub fn format_version(version: &Version) -> String {
    version.to_string()
}

/// Applies a user-supplied bump string to `current`.
///
/// `major`, `minor` and `patch` increment the matching field and zero the lower
/// ones. Any other string is taken as a literal version when it parses.
pub fn bump_version(current: Version, kind: &str) -> Result<Version> {
    let request: BumpRequest = kind.parse()?;
    current
        .bump(request)
        .ok_or_else(|| ScribeError::InvalidVersion(format!("{current} cannot be bumped ({kind})")))
}
