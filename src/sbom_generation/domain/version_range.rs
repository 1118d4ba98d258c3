//! Version parsing and range matching for NuGet and npm requirements.
//!
//! NuGet ranges use interval notation (`[1.0, 2.0)`, `(, 3.0]`, `[1.2.3]`)
//! and a bare version means "this version or higher". npm ranges are
//! delegated to the `semver` crate, except that a bare npm version pins
//! exactly that version.

use super::package::Ecosystem;
use crate::shared::Result;
use std::cmp::Ordering;

/// Returns true if `requirement` names one concrete version rather than a range
pub fn is_exact_version(requirement: &str) -> bool {
    let Some(first) = requirement.chars().next() else {
        return false;
    };
    if !first.is_ascii_digit() {
        return false;
    }
    if !requirement
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '+')
    {
        return false;
    }
    // 1.x / 1.X are npm wildcards
    !requirement
        .split('.')
        .any(|part| part.eq_ignore_ascii_case("x"))
}

/// A NuGet version: up to four numeric parts plus an optional prerelease label.
///
/// Build metadata after `+` is ignored for ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NuGetVersion {
    release: [u64; 4],
    prerelease: Option<String>,
}

impl NuGetVersion {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let without_build = trimmed.split('+').next().unwrap_or_default();
        let (release_part, prerelease) = match without_build.split_once('-') {
            Some((release, label)) if !label.is_empty() => (release, Some(label.to_string())),
            Some(_) => anyhow::bail!("Invalid NuGet version '{}': empty prerelease label", input),
            None => (without_build, None),
        };

        let parts: Vec<&str> = release_part.split('.').collect();
        if parts.is_empty() || parts.len() > 4 {
            anyhow::bail!(
                "Invalid NuGet version '{}': expected 1 to 4 numeric parts",
                input
            );
        }

        let mut release = [0u64; 4];
        for (slot, part) in release.iter_mut().zip(parts.iter()) {
            *slot = part.parse::<u64>().map_err(|_| {
                anyhow::anyhow!("Invalid NuGet version '{}': '{}' is not numeric", input, part)
            })?;
        }

        Ok(Self {
            release,
            prerelease,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }
}

impl PartialOrd for NuGetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NuGetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.release
            .cmp(&other.release)
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => compare_prerelease(a, b),
            })
    }
}

/// Compares dot-separated prerelease labels; numeric labels sort before alphanumeric ones
fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(ln), Ok(rn)) => ln.cmp(&rn),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => l.to_lowercase().cmp(&r.to_lowercase()),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    version: NuGetVersion,
    inclusive: bool,
}

/// NuGet interval range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NuGetRange {
    min: Option<Bound>,
    max: Option<Bound>,
}

impl NuGetRange {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Version range cannot be empty");
        }

        let first = trimmed.chars().next().unwrap_or_default();
        if first != '[' && first != '(' {
            // Bare version: minimum inclusive, no upper bound
            return Ok(Self {
                min: Some(Bound {
                    version: NuGetVersion::parse(trimmed)?,
                    inclusive: true,
                }),
                max: None,
            });
        }

        let last = trimmed.chars().last().unwrap_or_default();
        if last != ']' && last != ')' {
            anyhow::bail!("Invalid version range '{}': missing closing bracket", input);
        }

        let min_inclusive = first == '[';
        let max_inclusive = last == ']';
        let inner = &trimmed[1..trimmed.len() - 1];

        let Some((min_part, max_part)) = inner.split_once(',') else {
            // [1.0] pins an exact version
            if !min_inclusive || !max_inclusive {
                anyhow::bail!(
                    "Invalid version range '{}': single versions must use [x]",
                    input
                );
            }
            let version = NuGetVersion::parse(inner)?;
            return Ok(Self {
                min: Some(Bound {
                    version: version.clone(),
                    inclusive: true,
                }),
                max: Some(Bound {
                    version,
                    inclusive: true,
                }),
            });
        };

        let parse_bound = |part: &str, inclusive: bool| -> Result<Option<Bound>> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            Ok(Some(Bound {
                version: NuGetVersion::parse(part)?,
                inclusive,
            }))
        };

        let min = parse_bound(min_part, min_inclusive)?;
        let max = parse_bound(max_part, max_inclusive)?;
        if min.is_none() && max.is_none() {
            anyhow::bail!("Invalid version range '{}': no bounds given", input);
        }

        Ok(Self { min, max })
    }

    pub fn contains(&self, version: &NuGetVersion) -> bool {
        let above_min = match &self.min {
            None => true,
            Some(bound) if bound.inclusive => version >= &bound.version,
            Some(bound) => version > &bound.version,
        };
        let below_max = match &self.max {
            None => true,
            Some(bound) if bound.inclusive => version <= &bound.version,
            Some(bound) => version < &bound.version,
        };
        above_min && below_max
    }
}

/// A parsed version requirement for one ecosystem
#[derive(Debug, Clone)]
pub enum VersionRange {
    NuGet(NuGetRange),
    Npm(semver::VersionReq),
}

impl VersionRange {
    pub fn parse(requirement: &str, ecosystem: Ecosystem) -> Result<Self> {
        match ecosystem {
            Ecosystem::NuGet => Ok(VersionRange::NuGet(NuGetRange::parse(requirement)?)),
            Ecosystem::Npm => {
                let trimmed = requirement.trim();
                // semver reads a bare version as a caret range
                let text = if is_exact_version(trimmed) {
                    format!("={}", trimmed)
                } else {
                    trimmed.to_string()
                };
                let req = semver::VersionReq::parse(&text).map_err(|e| {
                    anyhow::anyhow!("Invalid npm version range '{}': {}", requirement, e)
                })?;
                Ok(VersionRange::Npm(req))
            }
        }
    }

    /// Returns true if the concrete `version` falls inside this range
    pub fn satisfied_by(&self, version: &str) -> bool {
        match self {
            VersionRange::NuGet(range) => NuGetVersion::parse(version)
                .map(|v| range.contains(&v))
                .unwrap_or(false),
            VersionRange::Npm(req) => semver::Version::parse(version)
                .map(|v| req.matches(&v))
                .unwrap_or(false),
        }
    }
}

/// Orders two concrete versions of the same ecosystem.
///
/// Unparseable versions fall back to ordinal string comparison.
pub fn compare_versions(a: &str, b: &str, ecosystem: Ecosystem) -> Ordering {
    match ecosystem {
        Ecosystem::NuGet => match (NuGetVersion::parse(a), NuGetVersion::parse(b)) {
            (Ok(left), Ok(right)) => left.cmp(&right),
            _ => a.cmp(b),
        },
        Ecosystem::Npm => match (semver::Version::parse(a), semver::Version::parse(b)) {
            (Ok(left), Ok(right)) => left.cmp(&right),
            _ => a.cmp(b),
        },
    }
}
