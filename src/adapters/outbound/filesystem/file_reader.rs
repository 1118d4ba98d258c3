use super::metadata_template::parse_metadata_template;
use super::npm_lockfile::{parse_npm_lockfile, NPM_LOCKFILE_NAME};
use super::nuget_lockfile::{parse_nuget_lockfile, NUGET_LOCKFILE_NAME};
use crate::ports::outbound::{MetadataTemplateReader, PackageSource, SourceScan};
use crate::sbom_generation::domain::ScannedPackageSet;
use crate::sbom_generation::policies::ComponentFields;
use crate::shared::error::SbomError;
use crate::shared::security::read_validated_file;
use crate::shared::Result;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Project names treated as test projects unless configured otherwise
pub const DEFAULT_TEST_PROJECT_PATTERNS: &[&str] = &["*.Tests", "*.Test", "*.*Tests"];

/// How far below the given directory lockfiles are searched for
const MAX_DISCOVERY_DEPTH: usize = 5;

const SKIPPED_DIRECTORIES: &[&str] = &["bin", "obj", "node_modules", "packages", "TestResults"];

const PROJECT_FILE_EXTENSIONS: &[&str] = &["csproj", "fsproj", "vbproj"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockfileKind {
    NuGet,
    Npm,
}

impl LockfileKind {
    fn of(path: &Path) -> Option<Self> {
        match path.file_name()?.to_str()? {
            NUGET_LOCKFILE_NAME => Some(LockfileKind::NuGet),
            NPM_LOCKFILE_NAME => Some(LockfileKind::Npm),
            _ => None,
        }
    }
}

/// FileSystemReader adapter for reading files from the file system
///
/// Implements [`PackageSource`] by discovering `packages.lock.json` and
/// `package-lock.json` files, and [`MetadataTemplateReader`] by parsing
/// CycloneDX JSON templates. Every file goes through the same
/// regular-file and size checks before it is read.
pub struct FileSystemReader {
    test_project_patterns: Vec<String>,
}

impl FileSystemReader {
    pub fn new() -> Self {
        Self {
            test_project_patterns: DEFAULT_TEST_PROJECT_PATTERNS
                .iter()
                .map(|pattern| pattern.to_string())
                .collect(),
        }
    }

    /// Replaces the project-name patterns that mark a test project
    pub fn with_test_project_patterns(mut self, patterns: Vec<String>) -> Self {
        self.test_project_patterns = patterns;
        self
    }

    fn discover_lockfiles(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        walk(root, 0, &mut found)
            .with_context(|| format!("Failed to search {} for lockfiles", root.display()))?;
        Ok(found)
    }

    fn is_test_project(&self, project_dir: &Path, project_name: &str) -> bool {
        if self
            .test_project_patterns
            .iter()
            .any(|pattern| matches_pattern(pattern, project_name))
        {
            return true;
        }

        project_files(project_dir).iter().any(|project_file| {
            read_validated_file(project_file, "project file")
                .map(|content| {
                    content
                        .to_lowercase()
                        .contains("<istestproject>true</istestproject>")
                })
                .unwrap_or(false)
        })
    }

    fn read_lockfile(&self, path: &Path) -> Result<String> {
        read_validated_file(path, "lockfile").map_err(|e| {
            SbomError::LockfileParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageSource for FileSystemReader {
    fn read_sources(&self, project_path: &Path) -> Result<SourceScan> {
        let metadata = fs::metadata(project_path).map_err(|e| SbomError::InvalidProjectPath {
            path: project_path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let (root_dir, lockfiles) = if metadata.is_file() {
            if LockfileKind::of(project_path).is_none() {
                return Err(SbomError::InvalidProjectPath {
                    path: project_path.to_path_buf(),
                    reason: format!(
                        "expected a directory, {} or {}",
                        NUGET_LOCKFILE_NAME, NPM_LOCKFILE_NAME
                    ),
                }
                .into());
            }
            let parent = project_path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            (parent.to_path_buf(), vec![project_path.to_path_buf()])
        } else {
            (
                project_path.to_path_buf(),
                self.discover_lockfiles(project_path)?,
            )
        };

        if lockfiles.is_empty() {
            return Err(SbomError::LockfileNotFound {
                path: project_path.to_path_buf(),
                suggestion: format!(
                    "No {} or {} found under \"{}\".\n   \
                     Set <RestorePackagesWithLockFile>true</RestorePackagesWithLockFile> in the project and run dotnet restore, or pass --restore.",
                    NUGET_LOCKFILE_NAME,
                    NPM_LOCKFILE_NAME,
                    project_path.display()
                ),
            }
            .into());
        }

        let mut sets: Vec<ScannedPackageSet> = Vec::new();
        let mut root_npm_name = None;

        for lockfile in &lockfiles {
            let dir = lockfile
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or(root_dir.as_path());
            let dir_name = project_name_for(dir);
            let content = self.read_lockfile(lockfile)?;

            let parse_error = |e: anyhow::Error| SbomError::LockfileParseError {
                path: lockfile.clone(),
                details: format!("{:#}", e),
            };

            match LockfileKind::of(lockfile) {
                Some(LockfileKind::NuGet) => {
                    let is_test = self.is_test_project(dir, &dir_name);
                    sets.extend(
                        parse_nuget_lockfile(&content, &dir_name, is_test).map_err(parse_error)?,
                    );
                }
                Some(LockfileKind::Npm) => {
                    let (name, set) =
                        parse_npm_lockfile(&content, &dir_name).map_err(parse_error)?;
                    if dir == root_dir.as_path() {
                        root_npm_name = Some(name);
                    }
                    sets.push(set);
                }
                None => {}
            }
        }

        let project_name = root_npm_name.unwrap_or_else(|| project_name_for(&root_dir));

        Ok(SourceScan { project_name, sets })
    }
}

impl MetadataTemplateReader for FileSystemReader {
    fn read_template(&self, path: &Path) -> Result<ComponentFields> {
        let content =
            read_validated_file(path, "metadata template").map_err(|e| SbomError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        parse_metadata_template(&content)
            .with_context(|| format!("Failed to import metadata from {}", path.display()))
    }
}

/// Collects lockfiles below `dir`, skipping build output, vendored
/// packages, hidden directories and symlinks
fn walk(dir: &Path, depth: usize, found: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .collect();
    entries.sort();

    for path in entries {
        let Ok(metadata) = fs::symlink_metadata(&path) else {
            continue;
        };
        if metadata.is_symlink() {
            continue;
        }

        if metadata.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            let skipped = name.starts_with('.')
                || SKIPPED_DIRECTORIES
                    .iter()
                    .any(|skip| skip.eq_ignore_ascii_case(name));
            if !skipped && depth < MAX_DISCOVERY_DEPTH {
                walk(&path, depth + 1, found)?;
            }
        } else if metadata.is_file() && LockfileKind::of(&path).is_some() {
            found.push(path);
        }
    }

    Ok(())
}

fn project_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| PROJECT_FILE_EXTENSIONS.contains(&ext))
        })
        .collect();
    files.sort();
    files
}

/// The single project file's stem, otherwise the directory name
fn project_name_for(dir: &Path) -> String {
    let files = project_files(dir);
    if let [single] = files.as_slice() {
        if let Some(stem) = single.file_stem().and_then(|s| s.to_str()) {
            return stem.to_string();
        }
    }

    fs::canonicalize(dir)
        .ok()
        .as_deref()
        .unwrap_or(dir)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "project".to_string())
}

/// Case-insensitive match where `*` stands for any run of characters
fn matches_pattern(pattern: &str, name: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let name = name.to_lowercase();

    let parts: Vec<&str> = pattern.split('*').collect();
    let [first, middle @ .., last] = parts.as_slice() else {
        return pattern == name;
    };
    let (first, last) = (*first, *last);

    if name.len() < first.len() + last.len() || !name.starts_with(first) || !name.ends_with(last)
    {
        return false;
    }

    let mut rest = &name[first.len()..name.len() - last.len()];
    for part in middle {
        match rest.find(part) {
            Some(index) => rest = &rest[index + part.len()..],
            None => return false,
        }
    }
    true
}
