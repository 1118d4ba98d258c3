use clap::Parser;
use dotnet_sbom::adapters::outbound::console::StderrProgressReporter;
use dotnet_sbom::adapters::outbound::filesystem::{
    FileSystemReader, FileSystemWriter, StdoutPresenter,
};
use dotnet_sbom::adapters::outbound::formatters::CycloneDxFormatter;
use dotnet_sbom::adapters::outbound::network::{
    CachingMetadataRepository, GitHubLicenseResolver, OfflineMetadataRepository,
    RegistryMetadataRepository,
};
use dotnet_sbom::adapters::outbound::process::DotnetRestoreRunner;
use dotnet_sbom::application::dto::{SbomRequest, SbomResponse};
use dotnet_sbom::application::use_cases::GenerateSbomUseCase;
use dotnet_sbom::cli::Args;
use dotnet_sbom::config::{self, ConfigFile};
use dotnet_sbom::ports::outbound::{MetadataRepository, OutputPresenter, SbomFormatter};
use dotnet_sbom::sbom_generation::domain::ComponentType;
use dotnet_sbom::sbom_generation::policies::ComponentFields;
use dotnet_sbom::shared::error::{ExitCode, SbomError};
use dotnet_sbom::shared::Result;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let code = if e.use_stderr() {
                ExitCode::InvalidOptions
            } else {
                ExitCode::Ok
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    if let Err(e) = run(args).await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        eprintln!();
        process::exit(ExitCode::for_error(&e).as_i32());
    }
}

async fn run(args: Args) -> Result<()> {
    let project_path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));

    let config = load_config(&args, &project_path)?.unwrap_or_default();
    let request = build_request(&args, &config, project_path)?;

    let mut package_source = FileSystemReader::new();
    if let Some(patterns) = config.test_project_patterns.clone() {
        package_source = package_source.with_test_project_patterns(patterns);
    }

    let response = if args.offline {
        generate(OfflineMetadataRepository::new(), package_source, request, args.quiet).await?
    } else if args.enable_github_licenses {
        let repository = CachingMetadataRepository::new(GitHubLicenseResolver::new(
            RegistryMetadataRepository::new()?,
            args.github_token.clone(),
        )?);
        generate(repository, package_source, request, args.quiet).await?
    } else {
        let repository = CachingMetadataRepository::new(RegistryMetadataRepository::new()?);
        generate(repository, package_source, request, args.quiet).await?
    };

    if !args.quiet {
        eprintln!("📝 Generating CycloneDX JSON output...");
    }
    let output = CycloneDxFormatter::new().format(&response.bom)?;

    let presenter: Box<dyn OutputPresenter> = match args.output {
        Some(output_path) => Box::new(FileSystemWriter::new(output_path)),
        None => Box::new(StdoutPresenter::new()),
    };
    presenter.present(&output)?;

    Ok(())
}

async fn generate<MR: MetadataRepository>(
    metadata_repository: MR,
    package_source: FileSystemReader,
    request: SbomRequest,
    quiet: bool,
) -> Result<SbomResponse> {
    let use_case = GenerateSbomUseCase::new(
        package_source,
        metadata_repository,
        StderrProgressReporter::new().with_quiet(quiet),
        DotnetRestoreRunner::new(),
        FileSystemReader::new(),
    );
    use_case.execute(request).await
}

/// An explicit `--config` must exist; otherwise look next to the scanned path
fn load_config(args: &Args, project_path: &Path) -> Result<Option<ConfigFile>> {
    if let Some(config_path) = &args.config {
        return config::load_config_from_path(config_path).map(Some);
    }

    let config_dir = if project_path.is_file() {
        project_path.parent().unwrap_or(Path::new("."))
    } else {
        project_path
    };
    config::discover_config(config_dir)
}

/// Command-line flags win over config values
fn build_request(args: &Args, config: &ConfigFile, project_path: PathBuf) -> Result<SbomRequest> {
    let config_type = config
        .set_type
        .as_deref()
        .map(str::parse::<ComponentType>)
        .transpose()
        .map_err(|e| SbomError::invalid_options(e, "Fix set_type in the config file"))?;

    let overrides = ComponentFields {
        name: args.set_name.clone().or_else(|| config.set_name.clone()),
        version: args.set_version.clone().or_else(|| config.set_version.clone()),
        component_type: args.set_type.or(config_type),
        metadata: None,
    };

    let filter = args.dependency_exclude_filter.clone().or_else(|| {
        config
            .dependency_exclude_filter
            .as_ref()
            .map(|filter| filter.to_filter_string())
    });

    Ok(SbomRequest::new(project_path)
        .with_exclude_dev(args.exclude_dev || config.exclude_dev.unwrap_or(false))
        .with_exclude_test_projects(
            args.exclude_test_projects || config.exclude_test_projects.unwrap_or(false),
        )
        .with_include_project_references(
            args.include_project_references || config.include_project_references.unwrap_or(false),
        )
        .with_dependency_exclude_filter(filter)
        .with_overrides(overrides)
        .with_import_metadata(args.import_metadata.clone())
        .with_restore(args.restore, Duration::from_secs(args.restore_timeout)))
}
