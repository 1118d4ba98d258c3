use super::package::PackageName;

/// Why a dependency edge could not be pinned to a concrete version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The requirement has not been resolved against its set yet
    Pending,
    /// No record in the resolution set satisfies the range
    NoMatchingVersion,
    /// The requirement could not be parsed as a version range
    InvalidRange(String),
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::Pending => write!(f, "not yet resolved"),
            UnresolvedReason::NoMatchingVersion => {
                write!(f, "no package in the resolution set satisfies the range")
            }
            UnresolvedReason::InvalidRange(details) => write!(f, "invalid range: {}", details),
        }
    }
}

/// Resolution state of a dependency edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeResolution {
    Resolved(String),
    Unresolved(UnresolvedReason),
}

/// Edge from a package record to one of its dependencies.
///
/// `requirement` keeps the version or range exactly as the source
/// declared it; `resolution` holds the concrete version once known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    target: PackageName,
    requirement: String,
    resolution: EdgeResolution,
}

impl DependencyEdge {
    /// Creates a pending edge.
    ///
    /// A bare version is not pinned here: in NuGet it means "this version or
    /// higher", and which version satisfies it depends on the resolution set.
    pub fn new(target: PackageName, requirement: &str) -> Self {
        Self {
            target,
            requirement: requirement.trim().to_string(),
            resolution: EdgeResolution::Unresolved(UnresolvedReason::Pending),
        }
    }

    pub fn target(&self) -> &PackageName {
        &self.target
    }

    pub fn requirement(&self) -> &str {
        &self.requirement
    }

    pub fn resolution(&self) -> &EdgeResolution {
        &self.resolution
    }

    pub fn resolved_version(&self) -> Option<&str> {
        match &self.resolution {
            EdgeResolution::Resolved(version) => Some(version),
            EdgeResolution::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, EdgeResolution::Resolved(_))
    }

    pub fn resolved_to(&self, version: &str) -> Self {
        Self {
            target: self.target.clone(),
            requirement: self.requirement.clone(),
            resolution: EdgeResolution::Resolved(version.to_string()),
        }
    }

    pub fn unresolved(&self, reason: UnresolvedReason) -> Self {
        Self {
            target: self.target.clone(),
            requirement: self.requirement.clone(),
            resolution: EdgeResolution::Unresolved(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> PackageName {
        PackageName::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_bare_version_requirement_is_pending() {
        let edge = DependencyEdge::new(name("System.Runtime"), " 4.3.0 ");
        assert_eq!(edge.requirement(), "4.3.0");
        assert_eq!(edge.resolved_version(), None);
    }

    #[test]
    fn test_range_requirement_is_pending() {
        let edge = DependencyEdge::new(name("System.Runtime"), "[4.5, )");
        assert!(!edge.is_resolved());
        assert_eq!(
            edge.resolution(),
            &EdgeResolution::Unresolved(UnresolvedReason::Pending)
        );
    }

    #[test]
    fn test_resolved_to_keeps_requirement() {
        let edge = DependencyEdge::new(name("Foo"), "[4.5, )").resolved_to("4.5.1");
        assert_eq!(edge.requirement(), "[4.5, )");
        assert_eq!(edge.resolved_version(), Some("4.5.1"));
    }
}
