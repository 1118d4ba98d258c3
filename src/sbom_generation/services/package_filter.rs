use crate::sbom_generation::domain::{PackageId, PackageRecord, PackageSet};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::HashSet;

/// Maximum number of exclude tokens to prevent DoS attacks
const MAX_EXCLUDE_TOKENS: usize = 256;

/// Maximum length of a single exclude token to prevent DoS attacks
const MAX_TOKEN_LENGTH: usize = 512;

/// Result of applying an exclude filter
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub packages: PackageSet,
    pub removed: HashSet<PackageId>,
    /// Tokens that matched no record; not an error
    pub unmatched_tokens: Vec<String>,
}

/// PackageFilter - Removes packages named in a dependency exclude filter
///
/// The filter is a comma-separated list of `name` or `name@version` tokens.
/// A bare name removes every version of that package; names compare
/// case-insensitively.
#[derive(Debug)]
pub struct PackageFilter {
    tokens: Vec<ExcludeToken>,
}

impl PackageFilter {
    /// Parses a comma-separated exclude filter
    ///
    /// # Errors
    /// Returns `SbomError::InvalidOptions` when a token is empty after
    /// trimming (e.g. `"A, ,B"`), too long, or malformed.
    pub fn parse(filter: &str) -> Result<Self> {
        let raw: Vec<&str> = filter.split(',').collect();
        if raw.len() > MAX_EXCLUDE_TOKENS {
            return Err(SbomError::invalid_options(
                format!(
                    "Too many dependency exclude tokens: {} (maximum: {})",
                    raw.len(),
                    MAX_EXCLUDE_TOKENS
                ),
                "Reduce the number of entries in the dependency exclude filter",
            )
            .into());
        }

        let tokens = raw
            .into_iter()
            .map(ExcludeToken::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { tokens })
    }

    /// Removes every record matched by a token
    ///
    /// Edges that pointed at removed records are stripped from the
    /// survivors; unreachable leftovers are the orphan pruner's job.
    pub fn apply(&self, packages: PackageSet) -> FilterOutcome {
        let mut matched = vec![false; self.tokens.len()];
        let mut removed = HashSet::new();

        for record in packages.iter() {
            for (index, token) in self.tokens.iter().enumerate() {
                if token.matches(record) {
                    matched[index] = true;
                    removed.insert(record.id());
                }
            }
        }

        let unmatched_tokens = self
            .tokens
            .iter()
            .zip(matched)
            .filter(|(_, was_matched)| !was_matched)
            .map(|(token, _)| token.original.clone())
            .collect();

        let packages = packages
            .retain(|record| !removed.contains(&record.id()))
            .without_edges_to(&removed);

        FilterOutcome {
            packages,
            removed,
            unmatched_tokens,
        }
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

/// One `name` or `name@version` entry of the exclude filter
#[derive(Debug)]
struct ExcludeToken {
    original: String,
    name: String,
    version: Option<String>,
}

impl ExcludeToken {
    fn parse(raw: &str) -> Result<Self> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(SbomError::invalid_options(
                "Dependency exclude filter contains an empty entry",
                "Use a comma-separated list of name or name@version entries without empty items, e.g. \"Foo,Bar@1.2.3\"",
            )
            .into());
        }

        if token.len() > MAX_TOKEN_LENGTH {
            return Err(SbomError::invalid_options(
                format!(
                    "Dependency exclude entry is too long ({} chars). Maximum: {} chars",
                    token.len(),
                    MAX_TOKEN_LENGTH
                ),
                "Shorten the entry",
            )
            .into());
        }

        // A leading '@' belongs to a scoped npm name, not to the version separator
        let (name, version) = match token.rfind('@') {
            Some(index) if index > 0 => {
                let (name, version) = (&token[..index], &token[index + 1..]);
                (name.trim(), Some(version.trim()))
            }
            _ => (token, None),
        };

        if name.is_empty() || version.is_some_and(str::is_empty) {
            return Err(SbomError::invalid_options(
                format!("Malformed dependency exclude entry '{}'", token),
                "Entries must look like name or name@version",
            )
            .into());
        }

        Ok(Self {
            original: token.to_string(),
            name: name.to_lowercase(),
            version: version.map(str::to_string),
        })
    }

    fn matches(&self, record: &PackageRecord) -> bool {
        if record.package_name().key() != self.name {
            return false;
        }
        match &self.version {
            Some(version) => version.eq_ignore_ascii_case(record.version()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::ExitCode;

    fn record(name: &str, version: &str) -> PackageRecord {
        PackageRecord::new(name.to_string(), version.to_string())
            .unwrap()
            .with_direct_reference(true)
    }

    fn sample_set() -> PackageSet {
        vec![
            record("Antlr3.Runtime", "3.5.1"),
            record("NETStandard.Library", "1.6.0"),
            record("NETStandard.Library", "2.0.3"),
            record("NLog", "5.4.0"),
        ]
        .into_iter()
        .collect()
    }

    fn names(set: &PackageSet) -> Vec<String> {
        set.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_bare_name_removes_all_versions() {
        let filter = PackageFilter::parse("NETStandard.Library").unwrap();
        let outcome = filter.apply(sample_set());

        assert_eq!(names(&outcome.packages), vec!["Antlr3.Runtime@3.5.1", "NLog@5.4.0"]);
        assert_eq!(outcome.removed.len(), 2);
    }

    #[test]
    fn test_name_at_version_removes_only_that_pair() {
        let filter = PackageFilter::parse("NETStandard.Library@1.6.0").unwrap();
        let outcome = filter.apply(sample_set());

        assert_eq!(outcome.packages.len(), 3);
        assert!(!outcome
            .packages
            .contains(&PackageId::new("netstandard.library", "1.6.0")));
        assert!(outcome
            .packages
            .contains(&PackageId::new("netstandard.library", "2.0.3")));
    }

    #[test]
    fn test_names_match_case_insensitively() {
        let filter = PackageFilter::parse("nlog").unwrap();
        let outcome = filter.apply(sample_set());
        assert!(!outcome.packages.contains(&PackageId::new("nlog", "5.4.0")));
    }

    #[test]
    fn test_multiple_tokens_with_whitespace() {
        let filter = PackageFilter::parse(" NETStandard.Library , NLog@5.4.0 ").unwrap();
        let outcome = filter.apply(sample_set());
        assert_eq!(names(&outcome.packages), vec!["Antlr3.Runtime@3.5.1"]);
    }

    #[test]
    fn test_empty_token_is_invalid_options() {
        let err = PackageFilter::parse("A, ,B").unwrap_err();
        assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidOptions);
        assert!(err.to_string().contains("empty entry"));
    }

    #[test]
    fn test_trailing_comma_is_invalid_options() {
        let err = PackageFilter::parse("A,").unwrap_err();
        assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidOptions);
    }

    #[test]
    fn test_missing_version_after_at_is_invalid() {
        let err = PackageFilter::parse("NLog@").unwrap_err();
        assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidOptions);
    }

    #[test]
    fn test_unknown_package_is_noop() {
        let filter = PackageFilter::parse("DoesNotExist,NLog@9.9.9").unwrap();
        let outcome = filter.apply(sample_set());

        assert_eq!(outcome.packages.len(), 4);
        assert!(outcome.removed.is_empty());
        assert_eq!(
            outcome.unmatched_tokens,
            vec!["DoesNotExist".to_string(), "NLog@9.9.9".to_string()]
        );
    }

    #[test]
    fn test_scoped_npm_name() {
        let set: PackageSet = vec![
            record("@angular/core", "17.0.0"),
            record("@angular/core", "16.0.0"),
        ]
        .into_iter()
        .collect();

        let outcome = PackageFilter::parse("@angular/core@17.0.0").unwrap().apply(set.clone());
        assert_eq!(outcome.packages.len(), 1);

        let outcome = PackageFilter::parse("@angular/core").unwrap().apply(set);
        assert!(outcome.packages.is_empty());
    }

    #[test]
    fn test_edges_to_removed_records_are_stripped() {
        let set: PackageSet = vec![
            record("App.Lib", "1.0.0")
                .with_dependency("NLog", "5.4.0")
                .unwrap(),
            record("NLog", "5.4.0"),
        ]
        .into_iter()
        .collect();

        let outcome = PackageFilter::parse("NLog").unwrap().apply(set);
        let lib = outcome
            .packages
            .get(&PackageId::new("app.lib", "1.0.0"))
            .unwrap();
        assert!(lib.dependencies().is_empty());
    }

    #[test]
    fn test_too_many_tokens() {
        let filter = vec!["pkg"; MAX_EXCLUDE_TOKENS + 1].join(",");
        let err = PackageFilter::parse(&filter).unwrap_err();
        assert!(err.to_string().contains("Too many"));
    }
}
