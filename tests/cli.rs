use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("regutrack").unwrap();
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn settings_text() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("settings")
        .assert()
        .success()
        .stdout(contains("smtp_host=smtp.office365.com"))
        .stdout(contains("Display only"));
}

#[test]
fn verifier_list_text() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["verifier", "list"])
        .assert()
        .success()
        .stdout(contains("v2\tAudit Interne"))
        .stdout(contains("internal"));
}

#[test]
fn bad_today_is_rejected() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--today", "01/06/2024", "dashboard"])
        .assert()
        .failure()
        .stderr(contains("expected YYYY-MM-DD"));
}

#[test]
fn malformed_config_is_an_error() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config/regutrack");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[dashboard\n").unwrap();
    cmd(&home)
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(contains("invalid config file"));
}
