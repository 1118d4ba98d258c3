use crate::application::dto::{SbomRequest, SbomResponse};
use crate::ports::outbound::{
    MetadataRepository, MetadataTemplateReader, PackageSource, ProgressReporter, RestoreRunner,
    SourceScan,
};
use crate::sbom_generation::domain::{Component, ComponentType, PackageSet, Scope};
use crate::sbom_generation::policies::MetadataPrecedence;
use crate::sbom_generation::services::{
    BomAssembler, DependencyClassifier, GraphMerger, MetadataLookup, OrphanPruner, PackageFilter,
    RootPolicy, SbomGenerator, ScopePolicy, VersionRangeResolver,
};
use crate::shared::Result;
use anyhow::Context;
use futures::stream::{self, StreamExt};

/// Maximum number of metadata lookups in flight at once
const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Version given to the top-level component when nothing else names one
const DEFAULT_TOP_LEVEL_VERSION: &str = "0.0.0";

/// GenerateSbomUseCase - Core use case for SBOM generation
///
/// This use case orchestrates the SBOM generation workflow using
/// generic dependency injection for all infrastructure dependencies.
///
/// # Type Parameters
/// * `PS` - PackageSource implementation
/// * `MR` - MetadataRepository implementation
/// * `PR` - ProgressReporter implementation
/// * `RR` - RestoreRunner implementation
/// * `TR` - MetadataTemplateReader implementation
pub struct GenerateSbomUseCase<PS, MR, PR, RR, TR> {
    package_source: PS,
    metadata_repository: MR,
    progress_reporter: PR,
    restore_runner: RR,
    template_reader: TR,
}

impl<PS, MR, PR, RR, TR> GenerateSbomUseCase<PS, MR, PR, RR, TR>
where
    PS: PackageSource,
    MR: MetadataRepository,
    PR: ProgressReporter,
    RR: RestoreRunner,
    TR: MetadataTemplateReader,
{
    /// Creates a new GenerateSbomUseCase with injected dependencies
    pub fn new(
        package_source: PS,
        metadata_repository: MR,
        progress_reporter: PR,
        restore_runner: RR,
        template_reader: TR,
    ) -> Self {
        Self {
            package_source,
            metadata_repository,
            progress_reporter,
            restore_runner,
            template_reader,
        }
    }

    /// Executes the SBOM generation use case
    ///
    /// Runs restore, reads every package set, resolves ranges per set,
    /// merges, filters, prunes, fetches metadata and assembles the BOM.
    /// Any fatal error aborts the run before anything is written.
    pub async fn execute(&self, request: SbomRequest) -> Result<SbomResponse> {
        let mut warnings = Vec::new();

        // Step 1: Validate the exclude filter before doing any work
        let filter = request
            .dependency_exclude_filter
            .as_deref()
            .map(PackageFilter::parse)
            .transpose()?;

        // Step 2: Restore if requested
        if request.restore {
            self.progress_reporter.report(&format!(
                "🔧 Running dotnet restore for: {}",
                request.project_path.display()
            ));
            self.restore_runner
                .restore(&request.project_path, request.restore_timeout)
                .await?;
        }

        // Step 3: Read package sets
        let scan = self.read_and_report_sources(&request)?;
        let project_name = scan.project_name.clone();

        // Step 4: Resolve each set on its own, then merge
        let packages = self.resolve_and_merge(scan, &request, &mut warnings);

        // Step 5: Scope and filter passes
        let packages = self.apply_filters(packages, &request, filter.as_ref(), &mut warnings);

        // Step 6: Classify
        let classification = DependencyClassifier::classify(&packages);
        self.progress_reporter.report(&format!(
            "📊 {} direct, {} transitive dependencies",
            classification.direct.len(),
            packages.len() - classification.direct.len()
        ));
        if classification.inferred {
            self.progress_reporter.report(
                "   - No direct references recorded; treating unreferenced packages as direct",
            );
        }

        // Step 7: Fetch metadata; graph passes are done by now
        let include_excluded = !request.exclude_dev;
        let metadata = self.fetch_metadata(&packages, include_excluded).await?;

        // Step 8: Top-level component and assembly
        let top_level = self.resolve_top_level(&project_name, &request)?;
        let assembler = BomAssembler::new(include_excluded);
        let outcome = assembler.assemble(
            &packages,
            &metadata,
            top_level,
            SbomGenerator::generate_default_metadata(),
        )?;

        for warning in &outcome.warnings {
            self.warn(&warning.to_string(), &mut warnings);
        }

        self.progress_reporter.report_completion(&format!(
            "✅ BOM assembled: {} component(s), {} warning(s)",
            outcome.bom.components.len(),
            warnings.len()
        ));

        Ok(SbomResponse::new(outcome.bom, warnings))
    }

    fn warn(&self, message: &str, warnings: &mut Vec<String>) {
        self.progress_reporter
            .report_warning(&format!("⚠️  Warning: {}", message));
        warnings.push(message.to_string());
    }

    /// Reads the package sets, reporting progress
    fn read_and_report_sources(&self, request: &SbomRequest) -> Result<SourceScan> {
        self.progress_reporter.report(&format!(
            "📖 Loading packages from: {}",
            request.project_path.display()
        ));

        let scan = self.package_source.read_sources(&request.project_path)?;

        let record_count: usize = scan.sets.iter().map(|set| set.packages.len()).sum();
        self.progress_reporter.report(&format!(
            "✅ Detected {} package record(s) in {} resolution set(s)",
            record_count,
            scan.sets.len()
        ));

        Ok(scan)
    }

    /// Applies the test-project rule and resolves ranges per set before merging
    fn resolve_and_merge(
        &self,
        scan: SourceScan,
        request: &SbomRequest,
        warnings: &mut Vec<String>,
    ) -> PackageSet {
        let mut resolved_sets = Vec::with_capacity(scan.sets.len());

        for scanned in scan.sets {
            let origin = scanned.origin.clone();
            let Some(kept) = ScopePolicy::apply_test_project(scanned, request.exclude_test_projects)
            else {
                self.progress_reporter
                    .report(&format!("🚫 Skipped test project: {}", origin));
                continue;
            };

            let outcome = VersionRangeResolver::resolve(kept.packages);
            for warning in &outcome.warnings {
                self.warn(&format!("{} ({})", warning, origin), warnings);
            }
            resolved_sets.push(outcome.packages);
        }

        let merged = GraphMerger::merge(resolved_sets);
        if request.include_project_references {
            merged
        } else {
            GraphMerger::hide_project_references(merged)
        }
    }

    /// Dev scope, exclude filter and orphan pruning
    fn apply_filters(
        &self,
        packages: PackageSet,
        request: &SbomRequest,
        filter: Option<&PackageFilter>,
        warnings: &mut Vec<String>,
    ) -> PackageSet {
        let roots = RootPolicy::for_input(&packages);
        let dev = ScopePolicy::apply_dev_dependencies(packages, request.exclude_dev);
        let mut removed_any = !dev.removed.is_empty();
        if removed_any {
            self.progress_reporter.report(&format!(
                "🚫 Excluded {} dev dependency record(s)",
                dev.removed.len()
            ));
        }

        let packages = match filter {
            Some(filter) => {
                let outcome = filter.apply(dev.packages);
                if !outcome.removed.is_empty() {
                    removed_any = true;
                    self.progress_reporter.report(&format!(
                        "🚫 Excluded {} package(s) based on the dependency exclude filter",
                        outcome.removed.len()
                    ));
                }
                for token in &outcome.unmatched_tokens {
                    self.warn(
                        &format!("Exclude filter entry '{}' did not match any dependency", token),
                        warnings,
                    );
                }
                outcome.packages
            }
            None => dev.packages,
        };

        if !removed_any {
            return packages;
        }

        let pruned = OrphanPruner::prune(packages, roots);
        if !pruned.removed.is_empty() {
            self.progress_reporter.report(&format!(
                "🧹 Removed {} orphaned package(s)",
                pruned.removed.len()
            ));
        }
        pruned.packages
    }

    /// Looks up metadata for every record that can become a component
    async fn fetch_metadata(
        &self,
        packages: &PackageSet,
        include_excluded: bool,
    ) -> Result<MetadataLookup> {
        let targets: Vec<_> = packages
            .iter()
            .filter(|record| include_excluded || record.scope() != Scope::Excluded)
            .map(|record| {
                (
                    record.id(),
                    record.ecosystem(),
                    record.name().to_string(),
                    record.version().to_string(),
                )
            })
            .collect();

        let total = targets.len();
        self.progress_reporter.report(&format!(
            "🔍 Fetching metadata for {} package(s)...",
            total
        ));

        let repository = &self.metadata_repository;
        let mut lookups = stream::iter(targets)
            .map(|(id, ecosystem, name, version)| async move {
                let result = repository.fetch_metadata(ecosystem, &name, &version).await;
                (id, name, version, result)
            })
            .buffer_unordered(MAX_CONCURRENT_LOOKUPS);

        let mut metadata = MetadataLookup::with_capacity(total);
        let mut completed = 0;
        while let Some((id, name, version, result)) = lookups.next().await {
            let found = result
                .with_context(|| format!("Failed to fetch metadata for {}@{}", name, version))?;
            completed += 1;
            self.progress_reporter
                .report_progress(completed, total, Some(name.as_str()));
            metadata.insert(id, found);
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Metadata retrieval complete: {} package(s)",
            completed
        ));

        Ok(metadata)
    }

    /// Applies the imported template and overrides to the scanned project
    fn resolve_top_level(&self, project_name: &str, request: &SbomRequest) -> Result<Component> {
        let scanned = Component::top_level(
            project_name,
            DEFAULT_TOP_LEVEL_VERSION,
            ComponentType::Application,
        );

        let imported = match &request.import_metadata {
            Some(path) => {
                self.progress_reporter
                    .report(&format!("📥 Importing metadata from: {}", path.display()));
                Some(self.template_reader.read_template(path)?)
            }
            None => None,
        };

        Ok(MetadataPrecedence::resolve(
            &scanned,
            imported.as_ref(),
            &request.overrides,
        ))
    }
}
