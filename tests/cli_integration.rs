//! CLI integration tests for quay.
//!
//! These tests drive the `quay` binary against a temporary quay root.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the quay binary command, isolated from the user's config.
fn quay(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quay").unwrap();
    cmd.env_remove("QUAY_ROOT")
        .env("HOME", root.join("home"))
        .arg("--no-color")
        .arg("--root")
        .arg(root);
    cmd
}

/// Create a quay root knowing the `x64-windows` triplet.
fn quay_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("triplets")).unwrap();
    fs::write(tmp.path().join("triplets/x64-windows.cmake"), "").unwrap();
    fs::create_dir_all(tmp.path().join("scripts")).unwrap();
    fs::write(tmp.path().join("scripts/ports.cmake"), "").unwrap();
    tmp
}

fn add_port(root: &Path, name: &str, control: &str) {
    let dir = root.join("ports").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("CONTROL"), control).unwrap();
}

// ============================================================================
// quay build
// ============================================================================

#[test]
fn test_build_cascades_on_missing_dependency() {
    let tmp = quay_root();
    add_port(
        tmp.path(),
        "zlib",
        "Source: zlib\nVersion: 1.2.11\nBuild-Depends: libpng (windows), bzip2 (linux)\n",
    );

    quay(tmp.path())
        .args(["build", "zlib:x64-windows"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "The build command requires all dependencies to be already installed.",
        ))
        .stderr(predicate::str::contains("    libpng:x64-windows"))
        .stderr(predicate::str::contains("bzip2").not());
}

#[test]
fn test_build_cascade_json_events() {
    let tmp = quay_root();
    add_port(tmp.path(), "zlib", "Source: zlib\nVersion: 1.2.11\nBuild-Depends: libpng\n");

    quay(tmp.path())
        .args(["--message-format", "json", "--triplet", "x64-windows", "build", "zlib"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""reason":"build-started""#))
        .stdout(predicate::str::contains(
            r#""result":"CASCADED_DUE_TO_MISSING_DEPENDENCIES""#,
        ))
        .stdout(predicate::str::contains(r#""unmet_dependencies":["libpng:x64-windows"]"#));
}

#[test]
fn test_build_rejects_malformed_spec() {
    let tmp = quay_root();

    quay(tmp.path())
        .args(["build", "zlib:x64-windows:extra"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed package spec"));
}

#[test]
fn test_build_rejects_unknown_triplet_file() {
    let tmp = quay_root();
    add_port(tmp.path(), "zlib", "Source: zlib\nVersion: 1.2.11\n");

    quay(tmp.path())
        .args(["build", "zlib:x64-linux"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid triplet `x64-linux`"));
}

#[test]
fn test_build_unknown_port() {
    let tmp = quay_root();

    quay(tmp.path())
        .args(["build", "zlib:x64-windows"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no port named `zlib`"));
}

#[cfg(unix)]
#[test]
fn test_build_runs_script_and_records_install() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = quay_root();
    let root = tmp.path();
    add_port(root, "zlib", "Source: zlib\nVersion: 1.2.11\nDescription: A compression library\n");

    // Stands in for cmake; only lays out a package when asked to.
    let script = root.join("fake-cmake.sh");
    fs::write(
        &script,
        "#!/bin/sh\n\
         if [ \"$QUAY_TEST_MODE\" = \"layout\" ]; then\n\
           mkdir -p \"$QUAY_TEST_OUT/include\"\n\
           touch \"$QUAY_TEST_OUT/include/zlib.h\"\n\
         fi\n\
         exit 0\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let write_config = |mode: &str| {
        fs::create_dir_all(root.join(".quay")).unwrap();
        fs::write(
            root.join(".quay/config.toml"),
            format!(
                "[build]\ncmake = \"{}\"\n\n[build.env]\nQUAY_TEST_MODE = \"{}\"\nQUAY_TEST_OUT = \"{}\"\n",
                script.display(),
                mode,
                root.join("packages/zlib_x64-windows").display()
            ),
        )
        .unwrap();
    };

    write_config("empty");
    quay(root)
        .args(["build", "zlib:x64-windows"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Building package zlib:x64-windows failed with: POST_BUILD_CHECKS_FAILED",
        ));

    write_config("layout");
    quay(root)
        .args(["build", "zlib:x64-windows"])
        .assert()
        .success();

    assert!(root.join("packages/zlib_x64-windows/CONTROL").is_file());
    assert!(root.join("installed/quay/status.d/zlib_x64-windows").is_file());

    quay(root)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("zlib:x64-windows"))
        .stdout(predicate::str::contains("1.2.11"));

    quay(root)
        .args(["remove", "zlib:x64-windows"])
        .assert()
        .success();
    assert!(!root.join("packages/zlib_x64-windows").exists());
}

// ============================================================================
// quay list / remove
// ============================================================================

#[test]
fn test_list_empty_root() {
    let tmp = quay_root();

    quay(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no packages are installed"));
}

#[test]
fn test_list_refuses_half_installed_database() {
    let tmp = quay_root();
    let status_dir = tmp.path().join("installed/quay/status.d");
    fs::create_dir_all(&status_dir).unwrap();
    fs::write(
        status_dir.join("zlib_x64-windows"),
        "Package: zlib\nArchitecture: x64-windows\nStatus: half-installed\n",
    )
    .unwrap();

    quay(tmp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("zlib:x64-windows"))
        .stderr(predicate::str::contains("quay remove"));
}

#[test]
fn test_remove_not_installed() {
    let tmp = quay_root();

    quay(tmp.path())
        .args(["remove", "zlib:x64-windows"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("package zlib:x64-windows is not installed"));
}

// ============================================================================
// quay completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = quay_root();

    quay(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quay"));
}
