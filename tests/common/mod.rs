//! Common test utilities for modrunner tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Fake Gradle wrapper: logs its arguments to `calls.log` next to itself,
/// prints a line on stdout, and exits 1 when the task path names the
/// module in `$FAIL_MODULE`.
pub const FAKE_GRADLEW: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls.log"
echo "gradle output for $1"
case "$1" in
    *":$FAIL_MODULE:"*)
        echo "FAILURE: Build failed with an exception." >&2
        exit 1
        ;;
esac
exit 0
"#;

/// A project root containing `gradlew` and a `modules/` directory
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    /// Create a project with the fake wrapper and the given module directories
    pub fn new(modules: &[&str]) -> Self {
        let project = Self::without_tool(modules);
        project.write_executable("gradlew", FAKE_GRADLEW);
        project
    }

    /// Create a project with module directories but no build tool
    pub fn without_tool(modules: &[&str]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir(dir.path().join("modules")).expect("Failed to create modules dir");
        let project = Self { dir };
        for module in modules {
            project.add_module(module);
        }
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.dir.path().join("modules")
    }

    pub fn add_module(&self, name: &str) {
        std::fs::create_dir_all(self.modules_dir().join(name))
            .expect("Failed to create module dir");
    }

    /// Create a stray file in the modules directory
    pub fn add_file(&self, name: &str, content: &str) {
        std::fs::write(self.modules_dir().join(name), content).expect("Failed to write file");
    }

    pub fn write_executable(&self, name: &str, content: &str) {
        let path = self.root().join(name);
        std::fs::write(&path, content).expect("Failed to write script");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)
                .expect("Failed to get metadata")
                .permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).expect("Failed to set permissions");
        }
    }

    /// Arguments of every build tool call, one entry per call
    pub fn calls(&self) -> Vec<String> {
        match std::fs::read_to_string(self.root().join("calls.log")) {
            Ok(log) => log.lines().map(|l| l.to_string()).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Raw bytes of the call log, for module names that are not UTF-8
    pub fn calls_raw(&self) -> Vec<u8> {
        std::fs::read(self.root().join("calls.log")).unwrap_or_default()
    }

    /// `modrunner` running inside the modules directory, isolated from user config
    pub fn modrunner(&self) -> Command {
        let mut cmd = Command::cargo_bin("modrunner").expect("binary built");
        cmd.current_dir(self.modules_dir())
            .env("HOME", self.root())
            .env("XDG_CONFIG_HOME", self.root().join(".config"))
            .env_remove("MODRUNNER_DIR")
            .env_remove("RUST_LOG")
            .env("FAIL_MODULE", "");
        cmd
    }
}
