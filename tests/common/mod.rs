#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Fixed evaluation date so statuses of the seed dataset are stable.
pub const TODAY: &str = "2024-06-01";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");

        Self {
            _tmp: tmp,
            home,
            work,
        }
    }

    pub fn state_file(&self) -> PathBuf {
        self.home.join(".config/regutrack/regutrack_db_v1.json")
    }

    pub fn cmd(&self) -> Command {
        self.cmd_at(TODAY)
    }

    pub fn cmd_at(&self, today: &str) -> Command {
        let mut cmd = cargo_bin_cmd!("regutrack");
        cmd.env("HOME", &self.home)
            .env_remove("RUST_LOG")
            .current_dir(&self.work)
            .args(["--today", today]);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json error output")
    }

    pub fn saved_state(&self) -> Value {
        let raw = fs::read_to_string(self.state_file()).expect("state file written");
        serde_json::from_str(&raw).expect("state file is json")
    }
}

pub fn statuses(dashboard: &Value) -> Vec<(String, String)> {
    dashboard["data"]["rows"]
        .as_array()
        .expect("rows array")
        .iter()
        .map(|r| {
            (
                r["id"].as_str().expect("row id").to_string(),
                r["status"].as_str().expect("row status").to_string(),
            )
        })
        .collect()
}
