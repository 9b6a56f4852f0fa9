use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn run_help(home: &TempDir, args: &[&str]) {
    let mut cmd = cargo_bin_cmd!("regutrack");
    cmd.env("HOME", home.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let home = TempDir::new().expect("temp home");

    // top-level
    run_help(&home, &[]);

    // views
    run_help(&home, &["dashboard"]);
    run_help(&home, &["show"]);
    run_help(&home, &["settings"]);

    // manage
    run_help(&home, &["requirement"]);
    run_help(&home, &["requirement", "list"]);
    run_help(&home, &["requirement", "add"]);
    run_help(&home, &["requirement", "update"]);
    run_help(&home, &["requirement", "remove"]);
    run_help(&home, &["verifier"]);
    run_help(&home, &["verifier", "list"]);
    run_help(&home, &["verifier", "add"]);
    run_help(&home, &["verifier", "update"]);
    run_help(&home, &["verifier", "remove"]);
    run_help(&home, &["reset"]);

    // import/export
    run_help(&home, &["export"]);
    run_help(&home, &["template"]);
    run_help(&home, &["import"]);
}
