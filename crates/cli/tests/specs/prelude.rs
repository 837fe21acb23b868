// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spec helpers: an isolated `nightly` invocation and output assertions.

use std::path::PathBuf;
use std::process::Output;

use tempfile::TempDir;

/// Variables that would leak the developer's setup into a spec
const ISOLATED_VARS: &[&str] = &[
    "NIGHTLY_CONFIG",
    "NIGHTLY_JENKINS_URL",
    "NIGHTLY_JENKINS_TOKEN",
    "JenkinsToken",
    "NIGHTLY_DATABASE_URL",
    "NIGHTLY_LOG",
    "RUST_LOG",
    "COLOR",
];

pub struct Cli {
    home: TempDir,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    config: Option<PathBuf>,
}

/// A `nightly` invocation with an empty home directory.
pub fn cli() -> Cli {
    Cli {
        home: tempfile::tempdir().unwrap(),
        args: Vec::new(),
        envs: Vec::new(),
        config: None,
    }
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|a| a.to_string()));
        self
    }

    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.envs.push((name.to_string(), value.to_string()));
        self
    }

    /// Write `text` as the config file and pass it with `--config`.
    pub fn config(mut self, text: &str) -> Self {
        let path = self.home.path().join("config.toml");
        std::fs::write(&path, text).unwrap();
        self.config = Some(path);
        self
    }

    /// Path inside the isolated home
    pub fn home_path(&self, name: &str) -> PathBuf {
        self.home.path().join(name)
    }

    fn output(self) -> Output {
        let mut cmd = assert_cmd::Command::cargo_bin("nightly").unwrap();
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("APPDATA", self.home.path())
            .env("NO_COLOR", "1")
            .env("USER", "spec-runner")
            .env_remove("USERNAME");
        for (name, value) in &self.envs {
            cmd.env(name, value);
        }
        if let Some(config) = &self.config {
            cmd.arg("--config").arg(config);
        }
        cmd.args(&self.args);
        cmd.output().unwrap()
    }

    /// Run and require exit code 0.
    pub fn passes(self) -> Run {
        let run = Run { output: self.output() };
        assert!(run.output.status.success(), "expected success\nstderr:\n{}", run.stderr());
        run
    }

    /// Run and require the given exit code.
    pub fn exits_with(self, code: i32) -> Run {
        let run = Run { output: self.output() };
        assert_eq!(
            run.output.status.code(),
            Some(code),
            "stdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout is missing {:?}:\n{}", needle, stdout);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(needle), "stdout should not contain {:?}:\n{}", needle, stdout);
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr is missing {:?}:\n{}", needle, stderr);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.output.stdout).unwrap()
    }
}
