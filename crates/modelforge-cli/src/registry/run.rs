use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use modelforge_core::{MODEL_VERSION, ProjectModel};
use modelforge_validate::ValidationReport;

use super::{RegistryError, RegistryResult};
use crate::atomic::write_json_atomic;
use crate::settings::Settings;

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub command: String,
    pub input: Option<PathBuf>,
    pub run_dir: PathBuf,
    pub settings: Settings,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub command: String,
    pub input: Option<PathBuf>,
    pub model_version: String,
    pub settings: Settings,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub project_path: PathBuf,
    pub report_path: PathBuf,
    pub logs_path: PathBuf,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&root)?;

    let config_path = root.join("config.json");
    let logs_path = root.join("logs.ndjson");

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        command: ctx.command.clone(),
        input: ctx.input.clone(),
        model_version: MODEL_VERSION.to_string(),
        settings: ctx.settings.clone(),
        git: collect_git_info(),
    };

    write_json(&config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        project_path: root.join("project.json"),
        report_path: root.join("report.json"),
        logs_path,
        root,
    })
}

/// Write the resulting project into the run directory and, when given, to
/// `out_path`.
pub fn write_project(
    paths: &RunPaths,
    project: &ProjectModel,
    out_path: Option<&Path>,
) -> RegistryResult<()> {
    write_json(&paths.project_path, project)?;

    if let Some(out_path) = out_path {
        write_json_atomic(out_path, project)?;
    }

    Ok(())
}

pub fn write_report(paths: &RunPaths, report: &ValidationReport) -> RegistryResult<()> {
    write_json(&paths.report_path, report)
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use modelforge_core::{Entity, Field};

    use super::*;

    fn context(run_dir: PathBuf) -> RunContext {
        RunContext {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap(),
            command: "import-sql".to_string(),
            input: Some(PathBuf::from("schema.sql")),
            run_dir,
            settings: Settings::default(),
        }
    }

    #[test]
    fn run_directory_holds_config_logs_and_project() {
        let run_dir =
            std::env::temp_dir().join(format!("modelforge-runs-{}", uuid::Uuid::new_v4()));
        let ctx = context(run_dir.clone());

        let paths = start_run(&ctx).unwrap();
        let dir_name = paths.root.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(dir_name, format!("2026-03-01T12-30-00Z__run_{}", ctx.run_id));
        assert!(paths.logs_path.exists());

        let config: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(paths.root.join("config.json")).unwrap())
                .unwrap();
        assert_eq!(config["command"], "import-sql");
        assert_eq!(config["model_version"], MODEL_VERSION);
        assert_eq!(config["settings"]["import_mode"], "replace");

        let project = ProjectModel {
            entities: vec![Entity::new("Customer", vec![Field::synthetic_id()])],
            ..ProjectModel::default()
        };
        let out = run_dir.join("exports").join("project.json");
        write_project(&paths, &project, Some(&out)).unwrap();

        let written: ProjectModel =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, project);
        assert!(paths.project_path.exists());

        std::fs::remove_dir_all(run_dir).unwrap();
    }
}
