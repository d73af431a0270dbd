use std::process::Command;

use planokit::{FileStore, FloorPlan, FloorPlanRepository};

fn planokit(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_planokit"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn test_plans_in_empty_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_str().unwrap();
    let (ok, stdout, _) = planokit(&["plans", "--data-dir", data_dir]);
    assert!(ok);
    assert!(stdout.contains("No floor plans"));
}

#[test]
fn test_plans_marks_active_plan() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FloorPlanRepository::new(FileStore::open(dir.path()).unwrap());
    repo.save(&FloorPlan::new("Back store")).unwrap();
    let active = repo.save(&FloorPlan::new("Sales floor")).unwrap();

    let (ok, stdout, _) = planokit(&["plans", "--data-dir", dir.path().to_str().unwrap()]);
    assert!(ok);
    let active_line = stdout
        .lines()
        .find(|line| line.contains(&active.id))
        .unwrap();
    assert!(active_line.starts_with('*'));
    assert!(active_line.contains("Sales floor"));
    assert!(stdout.contains("Back store"));
}

#[test]
fn test_config_reads_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[editor]\ngrid_size = 10.0\n").unwrap();

    let (ok, stdout, _) = planokit(&["config", path.to_str().unwrap()]);
    assert!(ok);
    assert!(stdout.contains("grid_size = 10.0"));
    assert!(stdout.contains("max_quantity = 20"));
}

#[test]
fn test_missing_data_dir_value_fails() {
    let (ok, _, stderr) = planokit(&["plans", "--data-dir"]);
    assert!(!ok);
    assert!(stderr.contains("--data-dir"));
}
