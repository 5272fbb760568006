mod atomic;
mod registry;
mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use modelforge_core::{ImportedSchema, ProjectModel, project_json_schema};
use modelforge_import::{ImportError, ImportFormat, ImportOptions, importer_for};
use modelforge_validate::{
    RelationPolicy, ValidateError, ValidationIssue, ValidationReport, validate_project,
    validate_project_json,
};
use registry::{RunContext, RunPaths, init_run_logging, start_run, write_project, write_report};
use settings::{ImportMode, Settings, SettingsError, load_settings};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("import rejected: {0}")]
    Import(#[from] ImportError),
    #[error("validation error: {0}")]
    Validate(#[from] ValidateError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid project file {path}: {source}")]
    Project {
        path: PathBuf,
        source: modelforge_core::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("project has {0} validation error(s)")]
    Invalid(usize),
}

#[derive(Parser, Debug)]
#[command(name = "modelforge", version, about = "Import and validate domain models")]
struct Cli {
    /// Settings file (defaults to ./modelforge.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output directory for runs (overrides the settings file).
    #[arg(long, global = true, value_name = "DIR")]
    run_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import entities from a CREATE TABLE script.
    ImportSql(ImportArgs),
    /// Import entities and relations from a JSON schema export.
    ImportJson(ImportArgs),
    /// Validate a project file.
    Validate(ValidateArgs),
    /// Print the project JSON Schema.
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// File to import.
    #[arg(value_name = "FILE")]
    input: PathBuf,
    /// Existing project to import into.
    #[arg(long, value_name = "PROJECT")]
    into: Option<PathBuf>,
    /// How imported entities combine with the project (overrides settings).
    #[arg(long, value_enum)]
    mode: Option<ImportMode>,
    /// Optional output path for project.json.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Project file to validate.
    #[arg(value_name = "PROJECT")]
    project: PathBuf,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the schema to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(run_dir) = cli.run_dir {
        settings.run_dir = run_dir;
    }

    match cli.command {
        Command::ImportSql(args) => run_import(ImportFormat::Sql, args, settings).await,
        Command::ImportJson(args) => run_import(ImportFormat::Json, args, settings).await,
        Command::Validate(args) => run_validate(args, settings).await,
        Command::Schema(args) => run_schema(args),
    }
}

fn begin_run(
    command: &str,
    input: &Path,
    settings: &Settings,
) -> Result<(RunPaths, Instant), CliError> {
    let run_id = Uuid::new_v4().to_string();
    let ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        command: command.to_string(),
        input: Some(input.to_path_buf()),
        run_dir: settings.run_dir.clone(),
        settings: settings.clone(),
    };

    let paths = start_run(&ctx)?;
    init_run_logging(&paths.logs_path, &settings.log_level)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        command = %command,
        run_root = %paths.root.display()
    );
    Ok((paths, Instant::now()))
}

async fn read_input(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_project(path: &Path) -> Result<ProjectModel, CliError> {
    let content = read_input(path).await?;
    ProjectModel::from_json_str(&content).map_err(|source| CliError::Project {
        path: path.to_path_buf(),
        source,
    })
}

async fn run_import(
    format: ImportFormat,
    args: ImportArgs,
    settings: Settings,
) -> Result<(), CliError> {
    let command = match format {
        ImportFormat::Sql => "import-sql",
        ImportFormat::Json => "import-json",
    };
    let (paths, timer) = begin_run(command, &args.input, &settings)?;

    let input = read_input(&args.input).await?;
    let importer = importer_for(
        format,
        ImportOptions {
            allow_self_reference: settings.allow_self_reference,
        },
    );

    let imported = match importer.import(&input) {
        Ok(imported) => imported,
        Err(err) => {
            tracing::warn!(event = "import_rejected", format = importer.format(), error = %err);
            return Err(err.into());
        }
    };
    let (entities, relations) = (imported.entities.len(), imported.relations.len());
    tracing::info!(
        event = "import_finished",
        format = importer.format(),
        entities = entities,
        relations = relations
    );

    let mut project = match &args.into {
        Some(path) => read_project(path).await?,
        None => ProjectModel::default(),
    };
    let mode = args.mode.unwrap_or(settings.import_mode);
    apply_import(&mut project, imported, mode);

    write_project(&paths, &project, args.out.as_deref())?;
    tracing::info!(event = "project_written", path = %paths.project_path.display());

    println!("{}", import_summary(entities, relations));

    tracing::info!(
        event = "run_finished",
        status = "success",
        duration_ms = timer.elapsed().as_millis()
    );
    Ok(())
}

fn apply_import(project: &mut ProjectModel, imported: ImportedSchema, mode: ImportMode) {
    match mode {
        ImportMode::Replace => project.replace_imported(imported),
        ImportMode::Merge => project.merge_imported(imported),
    }
}

fn import_summary(entities: usize, relations: usize) -> String {
    format!("imported {entities} entities and {relations} relations")
}

async fn run_validate(args: ValidateArgs, settings: Settings) -> Result<(), CliError> {
    let (paths, timer) = begin_run("validate", &args.project, &settings)?;

    let content = read_input(&args.project).await?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| CliError::Project {
            path: args.project.clone(),
            source: source.into(),
        })?;

    let structural = validate_project_json(&value)?;
    let report = if structural.is_ok() {
        let project: ProjectModel = serde_json::from_value(value)?;
        let policy = RelationPolicy {
            allow_self_reference: settings.allow_self_reference,
        };
        validate_project(&project, policy)
    } else {
        structural
    };

    write_report(&paths, &report)?;
    print_report(&report);

    let status = if report.is_ok() { "success" } else { "invalid" };
    tracing::info!(
        event = "run_finished",
        status = status,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        duration_ms = timer.elapsed().as_millis()
    );

    if report.is_ok() {
        Ok(())
    } else {
        Err(CliError::Invalid(report.errors.len()))
    }
}

fn print_report(report: &ValidationReport) {
    for issue in &report.errors {
        eprintln!("error {}", format_issue(issue));
    }
    for issue in &report.warnings {
        eprintln!("warning {}", format_issue(issue));
    }
    if report.is_ok() {
        println!("project is valid ({} warning(s))", report.warnings.len());
    }
}

fn format_issue(issue: &ValidationIssue) -> String {
    let mut line = format!("[{}] {}: {}", issue.code, issue.path, issue.message);
    if let Some(hint) = &issue.hint {
        line.push_str(&format!(" (hint: {hint})"));
    }
    line
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = project_json_schema();
    match args.out {
        Some(path) => atomic::write_json_atomic(&path, &schema)?,
        None => println!("{}", serde_json::to_string_pretty(&schema)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use modelforge_core::{Entity, Field};

    use super::*;

    fn schema(names: &[&str]) -> ImportedSchema {
        ImportedSchema {
            entities: names
                .iter()
                .map(|name| Entity::new(*name, vec![Field::synthetic_id()]))
                .collect(),
            relations: Vec::new(),
        }
    }

    #[test]
    fn replace_mode_drops_previous_entities() {
        let mut project = ProjectModel::default();
        apply_import(&mut project, schema(&["Customer", "Invoice"]), ImportMode::Replace);
        apply_import(&mut project, schema(&["Product"]), ImportMode::Replace);
        let names: Vec<&str> = project.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Product"]);
    }

    #[test]
    fn merge_mode_keeps_unrelated_entities() {
        let mut project = ProjectModel::default();
        apply_import(&mut project, schema(&["Customer", "Invoice"]), ImportMode::Merge);
        apply_import(&mut project, schema(&["customer", "Product"]), ImportMode::Merge);
        let names: Vec<&str> = project.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["customer", "Invoice", "Product"]);
    }

    #[test]
    fn summary_reports_counts() {
        assert_eq!(import_summary(2, 1), "imported 2 entities and 1 relations");
    }

    #[test]
    fn issues_render_with_hints() {
        let issue = ValidationIssue::error("duplicate_name", "/entities/1/name", "taken")
            .with_hint("rename it");
        assert_eq!(
            format_issue(&issue),
            "[duplicate_name] /entities/1/name: taken (hint: rename it)"
        );
    }

    #[test]
    fn rejected_import_message_is_readable() {
        let err = CliError::from(ImportError::UnsupportedStatement("DROP TABLE b".to_string()));
        assert_eq!(
            err.to_string(),
            "import rejected: only CREATE TABLE statements are supported, found: DROP TABLE b"
        );
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "modelforge",
            "import-sql",
            "schema.sql",
            "--mode",
            "merge",
            "--run-dir",
            "tmp/runs",
        ])
        .unwrap();
        assert_eq!(cli.run_dir, Some(PathBuf::from("tmp/runs")));
        match cli.command {
            Command::ImportSql(args) => assert_eq!(args.mode, Some(ImportMode::Merge)),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
