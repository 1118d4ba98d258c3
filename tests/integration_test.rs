/// Integration tests for the application layer
///
/// Lockfiles are read from disk by the real `FileSystemReader`; registry
/// lookups and `dotnet restore` are mocked.
mod test_utilities;

use dotnet_sbom::prelude::*;
use dotnet_sbom::sbom_generation::domain::Scope;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use test_utilities::mocks::*;

const THREE_PACKAGE_LOCKFILE: &str = r#"{
  "version": 1,
  "dependencies": {
    "net8.0": {
      "Antlr3.Runtime": { "type": "Direct", "requested": "[3.5.1, )", "resolved": "3.5.1" },
      "NETStandard.Library": { "type": "Direct", "requested": "[1.6.0, )", "resolved": "1.6.0" },
      "NLog": { "type": "Direct", "requested": "[5.4.0, )", "resolved": "5.4.0" }
    }
  }
}"#;

fn write_project(dir: &Path, name: &str, lockfile: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(format!("{}.csproj", name)),
        "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>",
    )
    .unwrap();
    fs::write(dir.join("packages.lock.json"), lockfile).unwrap();
}

fn use_case(
    metadata_repository: MockMetadataRepository,
    progress_reporter: MockProgressReporter,
    restore_runner: MockRestoreRunner,
) -> GenerateSbomUseCase<
    FileSystemReader,
    MockMetadataRepository,
    MockProgressReporter,
    MockRestoreRunner,
    FileSystemReader,
> {
    GenerateSbomUseCase::new(
        FileSystemReader::new(),
        metadata_repository,
        progress_reporter,
        restore_runner,
        FileSystemReader::new(),
    )
}

fn default_use_case() -> GenerateSbomUseCase<
    FileSystemReader,
    MockMetadataRepository,
    MockProgressReporter,
    MockRestoreRunner,
    FileSystemReader,
> {
    use_case(
        MockMetadataRepository::new(),
        MockProgressReporter::new(),
        MockRestoreRunner::new(),
    )
}

fn component_ids(response: &SbomResponse) -> Vec<String> {
    response
        .bom
        .components
        .iter()
        .map(|c| format!("{}@{}", c.name(), c.version()))
        .collect()
}

fn three_package_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_project(dir.path(), "SampleApp", THREE_PACKAGE_LOCKFILE);
    dir
}

#[tokio::test]
async fn test_exclude_single_package_version() {
    let dir = three_package_project();
    let request = SbomRequest::new(dir.path().to_path_buf())
        .with_dependency_exclude_filter(Some("NETStandard.Library@1.6.0".to_string()));

    let response = default_use_case().execute(request).await.unwrap();

    assert_eq!(
        component_ids(&response),
        vec!["Antlr3.Runtime@3.5.1", "NLog@5.4.0"]
    );
}

#[tokio::test]
async fn test_exclude_by_name_and_by_name_at_version() {
    let dir = three_package_project();
    let request = SbomRequest::new(dir.path().to_path_buf())
        .with_dependency_exclude_filter(Some("NETStandard.Library,NLog@5.4.0".to_string()));

    let response = default_use_case().execute(request).await.unwrap();

    assert_eq!(component_ids(&response), vec!["Antlr3.Runtime@3.5.1"]);
    let root = response
        .bom
        .dependencies
        .iter()
        .find(|d| d.bom_ref() == "SampleApp@0.0.0")
        .unwrap();
    assert_eq!(root.child_refs(), vec!["pkg:nuget/Antlr3.Runtime@3.5.1"]);
}

#[tokio::test]
async fn test_empty_filter_token_rejected_before_any_work() {
    let dir = three_package_project();
    let repository = MockMetadataRepository::new();
    let restore_runner = MockRestoreRunner::new();
    let use_case = use_case(
        repository.clone(),
        MockProgressReporter::new(),
        restore_runner.clone(),
    );
    let request = SbomRequest::new(dir.path().to_path_buf())
        .with_dependency_exclude_filter(Some("A, ,B".to_string()))
        .with_restore(true, std::time::Duration::from_secs(1));

    let err = use_case.execute(request).await.unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidOptions);
    assert_eq!(restore_runner.invocation_count(), 0);
    assert_eq!(repository.lookup_count(), 0);
}

#[tokio::test]
async fn test_restore_runs_before_scan() {
    let dir = three_package_project();
    let restore_runner = MockRestoreRunner::new();
    let use_case = use_case(
        MockMetadataRepository::new(),
        MockProgressReporter::new(),
        restore_runner.clone(),
    );
    let request = SbomRequest::new(dir.path().to_path_buf())
        .with_restore(true, std::time::Duration::from_secs(30));

    let response = use_case.execute(request).await.unwrap();

    assert_eq!(restore_runner.invocation_count(), 1);
    assert_eq!(response.bom.components.len(), 3);
}

#[tokio::test]
async fn test_restore_failure_stops_generation() {
    let dir = three_package_project();
    let repository = MockMetadataRepository::new();
    let use_case = use_case(
        repository.clone(),
        MockProgressReporter::new(),
        MockRestoreRunner::with_failure(),
    );
    let request = SbomRequest::new(dir.path().to_path_buf())
        .with_restore(true, std::time::Duration::from_secs(30));

    let err = use_case.execute(request).await.unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::DotnetRestoreFailed);
    assert_eq!(repository.lookup_count(), 0);
}

#[tokio::test]
async fn test_components_carry_metadata_and_lockfile_hash() {
    let dir = TempDir::new().unwrap();
    write_project(
        dir.path(),
        "SampleApp",
        r#"{
  "version": 1,
  "dependencies": {
    "net8.0": {
      "NLog": {
        "type": "Direct",
        "requested": "[5.4.0, )",
        "resolved": "5.4.0",
        "contentHash": "FXeCjPq8H6tOJV4c3vNOiLBDEhfEuhBfWrro93pNBPSFI0ORpiFQLPw7+veWz2YFju85IKjSY5IfOq8vfx7LRA=="
      }
    }
  }
}"#,
    );
    let repository = MockMetadataRepository::new().with_license("NLog", "5.4.0", "BSD-3-Clause");
    let use_case = use_case(
        repository,
        MockProgressReporter::new(),
        MockRestoreRunner::new(),
    );

    let response = use_case
        .execute(SbomRequest::new(dir.path().to_path_buf()))
        .await
        .unwrap();

    let nlog = &response.bom.components[0];
    assert_eq!(nlog.purl(), Some("pkg:nuget/NLog@5.4.0"));
    assert_eq!(nlog.scope(), Some(Scope::Required));
    assert_eq!(
        nlog.metadata().license,
        Some(LicenseInfo::SpdxId("BSD-3-Clause".to_string()))
    );
    assert_eq!(
        nlog.metadata().hashes[0].content,
        "1577828cfabc1fab4e255e1cdef34e88b0431217c4ba105f5abae8f77a4d04f485234391a621502cfc3bfaf796cf66058eef3920a8d263921f3aaf2f7f1ecb44"
    );
}

#[tokio::test]
async fn test_transitive_range_resolved_into_dependency_graph() {
    let dir = TempDir::new().unwrap();
    write_project(
        dir.path(),
        "SampleApp",
        r#"{
  "version": 1,
  "dependencies": {
    "net8.0": {
      "Serilog.Sinks.Console": {
        "type": "Direct",
        "requested": "[5.0.1, )",
        "resolved": "5.0.1",
        "dependencies": { "Serilog": "[3.1.0, )" }
      },
      "Serilog": { "type": "Transitive", "resolved": "3.1.1" }
    }
  }
}"#,
    );

    let response = default_use_case()
        .execute(SbomRequest::new(dir.path().to_path_buf()))
        .await
        .unwrap();

    let sink = response
        .bom
        .dependencies
        .iter()
        .find(|d| d.bom_ref() == "pkg:nuget/Serilog.Sinks.Console@5.0.1")
        .unwrap();
    assert_eq!(sink.child_refs(), vec!["pkg:nuget/Serilog@3.1.1"]);

    let root = response
        .bom
        .dependencies
        .iter()
        .find(|d| d.bom_ref() == "SampleApp@0.0.0")
        .unwrap();
    assert_eq!(
        root.child_refs(),
        vec!["pkg:nuget/Serilog.Sinks.Console@5.0.1"]
    );
}

#[tokio::test]
async fn test_target_frameworks_resolve_independently() {
    let dir = TempDir::new().unwrap();
    write_project(
        dir.path(),
        "SampleApp",
        r#"{
  "version": 1,
  "dependencies": {
    "net6.0": {
      "Serilog": { "type": "Direct", "requested": "[2.12.0, )", "resolved": "2.12.0" }
    },
    "net8.0": {
      "Serilog": { "type": "Direct", "requested": "[3.1.1, )", "resolved": "3.1.1" }
    }
  }
}"#,
    );

    let response = default_use_case()
        .execute(SbomRequest::new(dir.path().to_path_buf()))
        .await
        .unwrap();

    assert_eq!(
        component_ids(&response),
        vec!["Serilog@2.12.0", "Serilog@3.1.1"]
    );
}

#[tokio::test]
async fn test_bare_transitive_requirement_bumped_per_target_framework() {
    // Both targets record DiagnosticSource 6.0.0 as Logging's minimum;
    // net6.0 restored 6.0.1 and net8.0 pins 8.0.0 directly
    let project =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/multi-target-project");

    let response = default_use_case()
        .execute(SbomRequest::new(project))
        .await
        .unwrap();

    assert_eq!(
        component_ids(&response),
        vec![
            "Microsoft.Extensions.Logging@6.0.0",
            "System.Diagnostics.DiagnosticSource@6.0.1",
            "System.Diagnostics.DiagnosticSource@8.0.0",
        ]
    );
    let logging = response
        .bom
        .dependencies
        .iter()
        .find(|d| d.bom_ref() == "pkg:nuget/Microsoft.Extensions.Logging@6.0.0")
        .unwrap();
    assert_eq!(
        logging.child_refs(),
        vec![
            "pkg:nuget/System.Diagnostics.DiagnosticSource@6.0.1",
            "pkg:nuget/System.Diagnostics.DiagnosticSource@8.0.0",
        ]
    );
    assert!(response.warnings.is_empty());
}

#[tokio::test]
async fn test_excluding_the_only_direct_package_leaves_no_orphans() {
    let dir = TempDir::new().unwrap();
    write_project(
        dir.path(),
        "SampleApp",
        r#"{
  "version": 1,
  "dependencies": {
    "net8.0": {
      "Serilog.Sinks.Console": {
        "type": "Direct",
        "requested": "[5.0.1, )",
        "resolved": "5.0.1",
        "dependencies": { "Serilog": "3.1.1" }
      },
      "Serilog": { "type": "Transitive", "resolved": "3.1.1" }
    }
  }
}"#,
    );

    let response = default_use_case()
        .execute(
            SbomRequest::new(dir.path().to_path_buf())
                .with_dependency_exclude_filter(Some("Serilog.Sinks.Console".to_string())),
        )
        .await
        .unwrap();

    assert!(response.bom.components.is_empty());
}

#[tokio::test]
async fn test_test_projects_marked_excluded_or_dropped() {
    let dir = TempDir::new().unwrap();
    write_project(
        &dir.path().join("App"),
        "App",
        r#"{"version":1,"dependencies":{"net8.0":{"NLog":{"type":"Direct","requested":"[5.4.0, )","resolved":"5.4.0"}}}}"#,
    );
    write_project(
        &dir.path().join("App.Tests"),
        "App.Tests",
        r#"{"version":1,"dependencies":{"net8.0":{"xunit":{"type":"Direct","requested":"[2.6.0, )","resolved":"2.6.0"}}}}"#,
    );

    let marked = default_use_case()
        .execute(SbomRequest::new(dir.path().to_path_buf()))
        .await
        .unwrap();
    let xunit = marked
        .bom
        .components
        .iter()
        .find(|c| c.name() == "xunit")
        .unwrap();
    assert_eq!(xunit.scope(), Some(Scope::Excluded));

    let dropped = default_use_case()
        .execute(SbomRequest::new(dir.path().to_path_buf()).with_exclude_test_projects(true))
        .await
        .unwrap();
    assert_eq!(component_ids(&dropped), vec!["NLog@5.4.0"]);
}

#[tokio::test]
async fn test_npm_lockfile_next_to_project() {
    let dir = three_package_project();
    let client_dir = dir.path().join("ClientApp");
    fs::create_dir_all(&client_dir).unwrap();
    fs::write(
        client_dir.join("package-lock.json"),
        r#"{
  "name": "client-app",
  "lockfileVersion": 3,
  "packages": {
    "": { "name": "client-app", "dependencies": { "lodash": "^4.17.21" } },
    "node_modules/lodash": { "version": "4.17.21" }
  }
}"#,
    )
    .unwrap();

    let response = default_use_case()
        .execute(SbomRequest::new(dir.path().to_path_buf()))
        .await
        .unwrap();

    let lodash = response
        .bom
        .components
        .iter()
        .find(|c| c.name() == "lodash")
        .unwrap();
    assert_eq!(lodash.purl(), Some("pkg:npm/lodash@4.17.21"));
    assert_eq!(response.bom.components.len(), 4);
}

#[tokio::test]
async fn test_unknown_package_left_out_with_warning() {
    let dir = three_package_project();
    let reporter = MockProgressReporter::new();
    let use_case = use_case(
        MockMetadataRepository::new().with_unknown("NLog", "5.4.0"),
        reporter.clone(),
        MockRestoreRunner::new(),
    );

    let response = use_case
        .execute(SbomRequest::new(dir.path().to_path_buf()))
        .await
        .unwrap();

    assert_eq!(
        component_ids(&response),
        vec!["Antlr3.Runtime@3.5.1", "NETStandard.Library@1.6.0"]
    );
    assert_eq!(response.warnings.len(), 1);
    assert!(reporter
        .warnings()
        .iter()
        .any(|warning| warning.contains("NLog@5.4.0")));
}

#[tokio::test]
async fn test_registry_failure_is_fatal() {
    let dir = three_package_project();
    let use_case = use_case(
        MockMetadataRepository::with_failure(),
        MockProgressReporter::new(),
        MockRestoreRunner::new(),
    );

    let err = use_case
        .execute(SbomRequest::new(dir.path().to_path_buf()))
        .await
        .unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::ApplicationError);
    assert!(format!("{:#}", err).contains("Mock registry failure"));
}

#[tokio::test]
async fn test_imported_template_with_version_override() {
    let dir = three_package_project();
    let template =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/template.cdx.json");
    let request = SbomRequest::new(dir.path().to_path_buf())
        .with_import_metadata(Some(template))
        .with_overrides(ComponentFields {
            version: Some("3.0.0".to_string()),
            ..ComponentFields::default()
        });

    let response = default_use_case().execute(request).await.unwrap();

    let top_level = response.bom.metadata.component().unwrap();
    assert_eq!(top_level.name(), "Contoso.Sample");
    assert_eq!(top_level.version(), "3.0.0");
    assert_eq!(top_level.component_type(), ComponentType::Library);
    assert_eq!(top_level.metadata().publisher.as_deref(), Some("Contoso"));
    assert!(response
        .bom
        .dependencies
        .iter()
        .any(|d| d.bom_ref() == "Contoso.Sample@3.0.0"));
}

#[tokio::test]
async fn test_missing_lockfile_reported() {
    let dir = TempDir::new().unwrap();

    let err = default_use_case()
        .execute(SbomRequest::new(dir.path().to_path_buf()))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("packages.lock.json"));
    assert_eq!(ExitCode::for_error(&err), ExitCode::ApplicationError);
}
