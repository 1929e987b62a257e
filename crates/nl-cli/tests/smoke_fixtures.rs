use std::process::Command;

use nl_test_fixtures::fixture_dir;

fn run_check(fixture: &str, extra: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_nodelink"))
        .arg("check")
        .arg("--project-root")
        .arg(fixture_dir(fixture))
        .arg("--no-color")
        .args(extra)
        .output()
        .expect("cli should execute")
}

#[test]
fn clean_fixture_passes() {
    let output = run_check("01-valid-scene", &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout:\n{}", stdout);
    assert!(stdout.contains("scenes/ui/victory_screen.tscn -> scripts/ui/victory_screen.gd [valid]"));
    assert!(stdout.contains("Checked 2 scene(s), 1 with scripts: 0 error(s), 0 warning(s)"));
    assert!(stdout.trim_end().ends_with("RESULT:OK"));
}

#[test]
fn unresolved_reference_fails_with_help_lines() {
    let output = run_check("02-unresolved-reference", &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "stdout:\n{}", stdout);
    assert!(stdout.contains("error[UNRESOLVED_REFERENCE] scripts/hud.gd:4:"));
    assert!(stdout.contains("help: did you mean $Top/ScoreLabel?"));
    assert!(stdout.contains("help: did you mean $Bottom/Health?"));
    assert!(stdout.trim_end().ends_with("RESULT:FAIL"));
}

#[test]
fn json_report_is_machine_readable() {
    let output = run_check("03-structural-error", &["--format", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(report["scenesChecked"], 3);
    assert_eq!(report["errorCount"], 3);
    assert_eq!(report["warningCount"], 1);
    assert_eq!(report["pairs"][0]["scene"], "scenes/broken.tscn");
    assert_eq!(report["pairs"][0]["verdict"]["status"], "invalid");
    assert_eq!(report["pairs"][0]["verdict"]["violation"], "ROOT_HAS_PARENT");
}

#[test]
fn warnings_alone_do_not_fail() {
    let output = run_check("04-missing-script", &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout:\n{}", stdout);
    assert!(stdout.contains("warning[SCRIPT_MISSING] scenes/level.tscn:5:"));
    assert!(stdout.contains("0 error(s), 2 warning(s)"));
}

#[test]
fn missing_root_reports_result_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_nodelink"))
        .arg("check")
        .arg("--project-root")
        .arg(std::env::temp_dir().join("nodelink-smoke-no-such-project"))
        .output()
        .expect("cli should execute");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("RESULT:ERROR"));
    assert!(stdout.contains("ERROR_CODE:PROJECT_ROOT_NOT_FOUND"));
}

#[test]
fn index_lists_canonical_paths() {
    let output = Command::new(env!("CARGO_BIN_EXE_nodelink"))
        .arg("index")
        .arg("--project-root")
        .arg(fixture_dir("01-valid-scene"))
        .arg("--scene")
        .arg("scenes/ui/victory_screen.tscn")
        .output()
        .expect("cli should execute");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout:\n{}", stdout);
    let paths = stdout
        .lines()
        .filter(|line| line.starts_with('$'))
        .collect::<Vec<_>>();
    assert_eq!(
        paths,
        vec![
            "$Content",
            "$Content/Title",
            "$Content/Buttons",
            "$Content/Buttons/Continue",
            "$Content/Buttons/Quit",
        ]
    );
}
