//! Tests for layered configuration: user file, project file, modeline, CLI
use std::fs;

use canned_cycle_expander::config::{Args, Config, DwellUnit, PROJECT_CONFIG_FILE};
use tempfile::TempDir;

fn args() -> Args {
    Args {
        log_level: "warn".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_defaults_without_config_files() {
    let project = TempDir::new().expect("create temp dir");
    let config = Config::from_args_in(args(), None, project.path()).expect("create config");

    assert!(!config.has_project_config());
    assert!(!config.expander.suppress_duplicate_lines);
    assert_eq!(config.expander.dwell_unit, DwellUnit::Seconds);
    assert_eq!(config.expander.precision, None);
    assert_eq!(config.input, None);
    assert_eq!(config.output, None);
}

#[test]
fn test_project_config_is_loaded() {
    let project = TempDir::new().expect("create temp dir");
    fs::write(
        project.path().join(PROJECT_CONFIG_FILE),
        "dwell_unit = \"milliseconds\"\nprecision = 3\n",
    )
    .expect("write project config");

    let config = Config::from_args_in(args(), None, project.path()).expect("create config");
    assert!(config.has_project_config());
    assert_eq!(config.expander.dwell_unit, DwellUnit::Milliseconds);
    assert_eq!(config.expander.precision, Some(3));
}

#[test]
fn test_project_config_overrides_user_config() {
    let user = TempDir::new().expect("create user dir");
    fs::create_dir_all(user.path().join("ccx")).expect("create ccx dir");
    fs::write(
        user.path().join("ccx").join("config.toml"),
        "suppress_duplicate_lines = true\nprecision = 2\n",
    )
    .expect("write user config");

    let project = TempDir::new().expect("create project dir");
    fs::write(project.path().join(PROJECT_CONFIG_FILE), "precision = 5\n")
        .expect("write project config");

    let config = Config::from_args_in(args(), Some(user.path().to_path_buf()), project.path())
        .expect("create config");
    assert!(config.expander.suppress_duplicate_lines);
    assert_eq!(config.expander.precision, Some(5));
}

#[test]
fn test_explicit_config_must_exist() {
    let project = TempDir::new().expect("create temp dir");
    let args = Args {
        config: Some(project.path().join("missing.toml")),
        ..args()
    };
    let err = Config::from_args_in(args, None, project.path()).unwrap_err();
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn test_invalid_config_is_an_error() {
    let project = TempDir::new().expect("create temp dir");
    fs::write(project.path().join(PROJECT_CONFIG_FILE), "dwell_unit = \"hours\"\n")
        .expect("write project config");

    assert!(Config::from_args_in(args(), None, project.path()).is_err());
}

#[test]
fn test_modeline_overrides_files_and_cli_overrides_modeline() {
    let project = TempDir::new().expect("create temp dir");
    fs::write(project.path().join(PROJECT_CONFIG_FILE), "dwell_unit = \"seconds\"\n")
        .expect("write project config");

    let program = include_str!("fixtures/drills_modeline.nc");

    let config = Config::from_args_in(args(), None, project.path()).expect("create config");
    let expander = config.expander_config_for(program);
    assert_eq!(expander.dwell_unit, DwellUnit::Milliseconds);
    assert!(expander.suppress_duplicate_lines);

    let args = Args {
        dwell_unit: Some(DwellUnit::Seconds),
        ..args()
    };
    let config = Config::from_args_in(args, None, project.path()).expect("create config");
    assert_eq!(
        config.expander_config_for(program).dwell_unit,
        DwellUnit::Seconds
    );
}

#[test]
fn test_derived_output_and_stdin_marker() {
    let project = TempDir::new().expect("create temp dir");
    let args = Args {
        input: Some("jobs/drills.nc".into()),
        derive_output: true,
        ..args()
    };
    let config = Config::from_args_in(args, None, project.path()).expect("create config");
    assert_eq!(config.output, Some("jobs/drills.expanded.nc".into()));

    let args = Args {
        input: Some("-".into()),
        ..self::args()
    };
    let config = Config::from_args_in(args, None, project.path()).expect("create config");
    assert_eq!(config.input, None);
}

#[test]
fn test_derived_output_needs_input() {
    let project = TempDir::new().expect("create temp dir");
    let args = Args {
        derive_output: true,
        ..args()
    };
    assert!(Config::from_args_in(args, None, project.path()).is_err());
}
