use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub const SNAPSHOT_SCHEMA: &str = "taskflow.tasks.v1";

/// Scratch directory for one test: config discovery, snapshot documents,
/// and upload fixtures all live here, and commands run with it as cwd.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let ws = Self { dir };
        // Pin config discovery to the workspace so a user-level config
        // cannot leak into test runs.
        ws.write_config("");
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, rel_path: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&path, contents).expect("failed to write file");
        path
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        self.write_file(".taskflow.toml", contents.as_bytes())
    }

    pub fn write_snapshot(&self, name: &str, document: &Value) -> PathBuf {
        let rendered =
            serde_json::to_string_pretty(document).expect("failed to serialize snapshot");
        self.write_file(name, rendered.as_bytes())
    }
}

/// Command for the taskflow binary with the ambient environment
/// scrubbed, so a developer's own TASKFLOW_* settings cannot leak into
/// test runs.
pub fn taskflow_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskflow").expect("taskflow binary");
    cmd.env_remove("TASKFLOW_DATA");
    cmd.env_remove("TASKFLOW_CONFIG");
    cmd.env_remove("TASKFLOW_EVENTS");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Wrap a task array in a snapshot document bearing the current schema
/// version.
pub fn snapshot(tasks: Value) -> Value {
    serde_json::json!({
        "schema_version": SNAPSHOT_SCHEMA,
        "tasks": tasks,
    })
}
