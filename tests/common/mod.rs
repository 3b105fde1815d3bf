//! Shared fixtures for the build-appimage integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Fixture project shipped with the tests
pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("example_project")
}

/// Copy of the fixture project plus fake tools in a temporary directory
pub struct TestProject {
    pub dir: tempfile::TempDir,
    pub tools: tempfile::TempDir,
}

impl TestProject {
    /// Copy the fixture project into a fresh temporary directory
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("creating project dir");
        for entry in std::fs::read_dir(fixture_dir()).expect("reading fixture dir") {
            let entry = entry.expect("reading fixture entry");
            std::fs::copy(entry.path(), dir.path().join(entry.file_name()))
                .expect("copying fixture file");
        }

        let tools = tempfile::tempdir().expect("creating tools dir");
        write_executable(&tools.path().join("poetry"), FAKE_POETRY);

        Self { dir, tools }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Replace the `[tool.poetry-plugin-appimage]` section (and everything after it)
    pub fn set_tool_section(&self, section: Option<&str>) {
        let pyproject = self.path("pyproject.toml");
        let content = std::fs::read_to_string(&pyproject).unwrap();
        let head = content
            .split("[tool.poetry-plugin-appimage]")
            .next()
            .unwrap()
            .to_string();
        let new = match section {
            Some(body) => format!("{head}[tool.poetry-plugin-appimage]\n{body}\n"),
            None => head,
        };
        std::fs::write(pyproject, new).unwrap();
    }

    /// Make the fake poetry report an outdated lock file
    pub fn mark_lock_stale(&self) {
        std::fs::write(self.path(".stale-lock"), "").unwrap();
    }

    /// Install a fake linuxdeploy with the given shell body and return its path
    pub fn fake_linuxdeploy(&self, body: &str) -> PathBuf {
        let path = self.tools.path().join("linuxdeploy");
        write_executable(&path, &format!("#!/bin/sh\n{body}\n"));
        path
    }

    /// `poetry-appimage -C <project> --poetry <fake> build-appimage <args>`
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("poetry-appimage").expect("binary built");
        cmd.env_remove("POETRY")
            .env_remove("LINUXDEPLOY")
            .env_remove("RUST_LOG")
            .arg("-C")
            .arg(self.root())
            .arg("--poetry")
            .arg(self.tools.path().join("poetry"))
            .arg("build-appimage")
            .args(args);
        cmd
    }

    /// Same as [`TestProject::command`] but with the poetry found on PATH
    pub fn system_command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("poetry-appimage").expect("binary built");
        cmd.env_remove("POETRY")
            .env_remove("LINUXDEPLOY")
            .arg("-C")
            .arg(self.root())
            .arg("build-appimage")
            .args(args);
        cmd
    }

    /// Files the tool may generate, relative to the project root
    pub fn generated_files(&self) -> Vec<PathBuf> {
        [
            "build_resources",
            "build_appimage.sh",
            "requirements_for_appimage.txt",
        ]
        .iter()
        .map(|p| self.path(p))
        .filter(|p| p.exists())
        .collect()
    }
}

fn write_executable(path: &Path, content: &str) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::write(path, content).expect("writing script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("making script executable");
}

/// Stand-in for poetry: `check --lock` and `export --output <file>` only
const FAKE_POETRY: &str = r#"#!/bin/sh
mode=""
for arg in "$@"; do
    case "$arg" in
        check|export) mode="$arg" ;;
    esac
done

case "$mode" in
    check)
        if [ -f .stale-lock ]; then
            echo "pyproject.toml changed significantly since poetry.lock was last generated." >&2
            exit 1
        fi
        exit 0
        ;;
    export)
        echo "$@" > .poetry-export-args
        while [ "$#" -gt 0 ]; do
            if [ "$1" = "--output" ]; then
                printf 'numpy==1.18.0\npyzmq==22.2.1\n' > "$2"
            fi
            shift
        done
        exit 0
        ;;
esac
echo "unsupported: $*" >&2
exit 2
"#;
