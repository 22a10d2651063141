//! End-to-end tests: GeoJSON workspace, project registration and the CLI.
//!
//! Run: cargo test --test workflow_test

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::Command;

use trueno_transect::prelude::*;

fn plot() -> Rectangle {
    Rectangle::new([
        Point::new(600_000.0, 5_000_000.0),
        Point::new(600_100.0, 5_000_000.0),
        Point::new(600_100.0, 5_000_040.0),
        Point::new(600_000.0, 5_000_040.0),
    ])
}

fn seed(dir: &Path) -> GeoJsonWorkspace {
    let ws = GeoJsonWorkspace::new(dir.join("data"));
    let other = Rectangle::new([
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ]);
    ws.write_rectangles(
        "plots",
        Some(&SpatialReference::new("EPSG:32632")),
        &[(1, other), (2, plot())],
    )
    .unwrap();
    ws
}

fn request(line_count: i64, direction: &str) -> SplitRequest {
    SplitRequest {
        rectangle_layer: "plots".to_string(),
        rectangle_id: 2,
        output_layer: "plot2_lines".to_string(),
        line_count,
        direction: direction.to_string(),
    }
}

#[test]
fn library_pipeline_writes_and_registers_layer() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = seed(dir.path());

    let summary = create_spaced_lines(&mut ws, &request(4, "horizontal"), &SplitOptions::default())
        .unwrap();
    assert_eq!(summary.transects.len(), 5);

    let lines = ws.read_lines("plot2_lines").unwrap();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[2].1,
        vec![Point::new(600_050.0, 5_000_000.0), Point::new(600_050.0, 5_000_040.0)]
    );
    assert_eq!(
        ws.spatial_reference("plot2_lines").unwrap(),
        Some(SpatialReference::new("EPSG:32632"))
    );

    let mut project = ProjectFile::new().with_map("Survey");
    let uri = add_to_map(&ws, &mut project, "plot2_lines").unwrap();
    assert!(uri.ends_with("plot2_lines.geojson"));
    assert_eq!(project.active_map().unwrap().layers, vec![uri]);
}

#[test]
fn failed_generation_leaves_nothing_to_register() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = seed(dir.path());

    let mut req = request(4, "horizontal");
    req.rectangle_id = 9;
    let err = create_spaced_lines(&mut ws, &req, &SplitOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "No rectangle found with ID 9 in layer 'plots'.");

    let mut project = ProjectFile::new().with_map("Survey");
    let err = add_to_map(&ws, &mut project, "plot2_lines").unwrap_err();
    assert!(matches!(err, Error::OutputUnavailable(_)));
}

#[test]
fn rerun_replaces_layer_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = seed(dir.path());
    create_spaced_lines(&mut ws, &request(10, "vertical"), &SplitOptions::default()).unwrap();
    create_spaced_lines(&mut ws, &request(2, "vertical"), &SplitOptions::default()).unwrap();
    assert_eq!(ws.read_lines("plot2_lines").unwrap().len(), 3);
}

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_trueno-transect"));
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env("HOME", dir)
        .env_remove("TRUENO_TRANSECT_WORKSPACE")
        .env_remove("TRUENO_TRANSECT_PROJECT")
        .env_remove("TRUENO_TRANSECT_OVERWRITE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_generates_layer_and_registers_it() {
    let dir = tempfile::tempdir().unwrap();
    let ws = seed(dir.path());
    ProjectFile::new()
        .with_map("Survey")
        .save(dir.path().join("project.yaml"))
        .unwrap();

    let output = cli(dir.path())
        .args(["plots", "2", "plot2_lines", "3", "vertical"])
        .args(["--workspace", "data", "--project", "project.yaml"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created plot2_lines with 4 transects"));
    assert_eq!(ws.read_lines("plot2_lines").unwrap().len(), 4);

    let project = ProjectFile::load(dir.path().join("project.yaml")).unwrap();
    let layers = &project.active_map().unwrap().layers;
    assert_eq!(layers.len(), 1);
    assert!(layers[0].ends_with("plot2_lines.geojson"));
}

#[test]
fn cli_rejects_bad_direction() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let output = cli(dir.path())
        .args(["plots", "2", "plot2_lines", "3", "diagonal", "--workspace", "data"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be either 'horizontal' or 'vertical'"));
    assert!(!dir.path().join("data/plot2_lines.geojson").exists());
}

#[test]
fn cli_rejects_zero_and_negative_counts() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    for count in ["0", "-3"] {
        let output = cli(dir.path())
            .args(["plots", "2", "plot2_lines", count, "horizontal", "--workspace", "data"])
            .output()
            .unwrap();
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("positive integer"), "{stderr}");
    }
}

#[test]
fn cli_keeps_layer_when_registration_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ws = seed(dir.path());
    // project without an active map
    ProjectFile::new().save(dir.path().join("project.yaml")).unwrap();

    let output = cli(dir.path())
        .args(["plots", "2", "plot2_lines", "2", "horizontal"])
        .args(["--workspace", "data", "--project", "project.yaml"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no active map"));
    assert_eq!(ws.read_lines("plot2_lines").unwrap().len(), 3);
}

#[test]
fn cli_missing_project_reports_unregistered_layer() {
    let dir = tempfile::tempdir().unwrap();
    let ws = seed(dir.path());

    let output = cli(dir.path())
        .args(["plots", "2", "plot2_lines", "2", "horizontal"])
        .args(["--workspace", "data", "--project", "nope.yaml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("plot2_lines was created but not added to a map"), "{stderr}");
    assert!(stderr.contains("Project 'nope.yaml' not found"), "{stderr}");
    assert!(!stderr.contains("configuration file"), "{stderr}");
    assert_eq!(ws.read_lines("plot2_lines").unwrap().len(), 3);
    assert!(!dir.path().join("nope.yaml").exists());
}

#[test]
fn cli_no_overwrite_and_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let ws = seed(dir.path());
    fs::write(
        dir.path().join("transect.yaml"),
        "workspace: data\noutput:\n  overwrite: false\n",
    )
    .unwrap();

    let run = |count: &str| {
        cli(dir.path())
            .args(["plots", "2", "plot2_lines", count, "horizontal", "--config", "transect.yaml"])
            .output()
            .unwrap()
    };

    assert!(run("2").status.success());
    let second = run("5");
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("already exists"));
    assert_eq!(ws.read_lines("plot2_lines").unwrap().len(), 3);
}
