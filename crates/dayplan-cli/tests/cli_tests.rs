use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a `dp` Command pinned to a store file and a
/// fixed date, with --no-color for stable assertions
fn dp_cmd(db_arg: &str) -> Command {
    let mut cmd = Command::cargo_bin("dp").expect("Failed to find dp binary");
    cmd.args(["--no-color", "--data-file", db_arg, "--date", "2025-01-01"]);
    cmd
}

#[test]
fn test_cli_empty_day_dashboard() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(db_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wednesday, 2025-01-01"))
        .stdout(predicate::str::contains("No tasks for this day."))
        .stdout(predicate::str::contains("Planned: 0 min"))
        .stdout(predicate::str::contains("Finish: all done"));
}

#[test]
fn test_cli_template_set_and_show() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    dp_cmd(db_arg)
        .args(["template", "set", "thu", "Math:40,Physics:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Thursday template"))
        .stdout(predicate::str::contains("1. Math (40 min)"))
        .stdout(predicate::str::contains("2. Physics (30 min)"));

    dp_cmd(db_arg)
        .args(["template", "show", "thu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Math (40 min)"));
}

#[test]
fn test_cli_template_rejects_malformed_entries() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(db_path.to_str().unwrap())
        .args(["template", "set", "thu", "Math"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title:minutes"));
}

#[test]
fn test_cli_template_rejects_negative_minutes() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(db_path.to_str().unwrap())
        .args(["template", "set", "thu", "Math:-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("minutesPlanned"));
}

#[test]
fn test_cli_empty_day_projects_tomorrows_template() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    // 2025-01-01 is a Wednesday, so it projects Thursday's template.
    dp_cmd(db_arg)
        .args(["template", "set", "thu", "Math:40"])
        .assert()
        .success();

    dp_cmd(db_arg)
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] Math (40 min, 0%)"))
        .stdout(predicate::str::contains("from Thursday's template"))
        .stdout(predicate::str::contains("id virt_thu_0"));
}

#[test]
fn test_cli_toggle_virtual_task_materializes() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    dp_cmd(db_arg)
        .args(["template", "set", "thu", "Math:40"])
        .assert()
        .success();

    dp_cmd(db_arg)
        .args(["task", "toggle", "virt_thu_0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Toggled task 'Math'"))
        .stdout(predicate::str::contains("[x] Math (40 min, 100%)"))
        .stdout(predicate::str::contains("Finish: all done"))
        .stdout(predicate::str::contains("virt_thu_0").not());
}

#[test]
fn test_cli_delete_last_task_reverts_to_projection() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    dp_cmd(db_arg)
        .args(["template", "set", "thu", "Math:40"])
        .assert()
        .success();
    let output = dp_cmd(db_arg)
        .args(["task", "toggle", "virt_thu_0"])
        .output()
        .expect("toggle should run");
    assert!(output.status.success());

    // Pull the materialized task id out of the rendered day view.
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let id = stdout
        .lines()
        .filter_map(|line| line.split("— id ").nth(1))
        .map(str::trim)
        .next()
        .expect("day view should list the task id")
        .to_string();

    dp_cmd(db_arg)
        .args(["task", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted task 'Math'"))
        .stdout(predicate::str::contains("id virt_thu_0"))
        .stdout(predicate::str::contains("[ ] Math (40 min, 0%)"));
}

#[test]
fn test_cli_add_task_directly() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(db_path.to_str().unwrap())
        .args(["task", "add", "Essay draft", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task 'Essay draft'"))
        .stdout(predicate::str::contains("[ ] Essay draft (25 min, 0%)"));
}

#[test]
fn test_cli_bump_progress() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    dp_cmd(db_arg)
        .args(["template", "set", "thu", "Math:40"])
        .assert()
        .success();

    dp_cmd(db_arg)
        .args(["task", "bump", "virt_thu_0", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Adjusted task 'Math'"))
        .stdout(predicate::str::contains("(40 min, 100%)"));
}

#[test]
fn test_cli_stale_id_reports_noop() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(db_path.to_str().unwrap())
        .args(["task", "toggle", "nosuchid"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No task with id nosuchid; nothing changed",
        ));
}

#[test]
fn test_cli_day_note_round_trip() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    dp_cmd(db_arg)
        .args(["day", "note", "mock exam at nine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note: mock exam at nine"));

    dp_cmd(db_arg)
        .assert()
        .success()
        .stdout(predicate::str::contains("Note: mock exam at nine"));
}

#[test]
fn test_cli_reset_clears_state() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    dp_cmd(db_arg)
        .args(["task", "add", "Essay draft", "25"])
        .assert()
        .success();

    dp_cmd(db_arg)
        .arg("--reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks for this day."));
}

#[test]
fn test_cli_select_remembers_date() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let mut cmd = Command::cargo_bin("dp").expect("Failed to find dp binary");
    cmd.args(["--no-color", "--data-file", db_arg, "day", "select", "2025-03-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected 2025-03-10"));

    // Without --date the remembered selection is used.
    let mut cmd = Command::cargo_bin("dp").expect("Failed to find dp binary");
    cmd.args(["--no-color", "--data-file", db_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday, 2025-03-10"));
}

#[test]
fn test_cli_view_switch() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    dp_cmd(db_path.to_str().unwrap())
        .args(["view", "schedule"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to schedule view"));
}
