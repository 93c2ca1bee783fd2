//! CLI end-to-end tests that invoke the compiled `mdev` binary.
//!
//! Remotes are local repositories from `mdev-test-utils`, so no test needs
//! the network.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use mdev_test_utils::git::{RemoteRepo, head_commit};
use mdev_test_utils::tree::ProgramTree;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

fn mdev(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mdev"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

/// A program at `<tree>/app` whose framework is `framework`, not fetched.
fn new_program(tree: &ProgramTree, framework: &RemoteRepo) {
    mdev(tree.root())
        .args(["new", "app", "--create-only"])
        .env("MDEV_FRAMEWORK_URL", framework.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    // Test remotes have no "master" branch
    fs::write(
        tree.path("app/mxos.component"),
        format!("{}#main\n", framework.url()),
    )
    .unwrap();
}

// ============================================================================
// help / usage
// ============================================================================

#[test]
fn test_help_lists_commands() {
    mdev(Path::new("."))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_version_flag() {
    mdev(Path::new("."))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mdev"));
}

#[test]
fn test_missing_command_is_usage_error() {
    mdev(Path::new(".")).assert().failure();
}

// ============================================================================
// errors
// ============================================================================

#[test]
fn test_status_outside_program_fails() {
    let tree = ProgramTree::new();

    mdev(tree.root())
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("No program found"));
}

#[test]
fn test_status_on_missing_directory_fails() {
    let tree = ProgramTree::new();

    mdev(tree.root())
        .args(["status", "nowhere"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_deploy_reports_malformed_reference() {
    let tree = ProgramTree::new();
    tree.write_reference("mxos.component", "not a reference");

    mdev(tree.root())
        .arg("deploy")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Malformed component reference"));
}

#[test]
fn test_new_inside_program_fails() {
    let framework = RemoteRepo::new();
    let tree = ProgramTree::new();
    new_program(&tree, &framework);

    mdev(&tree.path("app"))
        .args(["new", "inner", "--create-only"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("existing program"));
    tree.assert_file_not_exists("app/inner");
}

// ============================================================================
// workflows
// ============================================================================

#[test]
fn test_new_create_only_writes_scaffold() {
    let tree = ProgramTree::new();

    mdev(tree.root())
        .args(["new", "blinky", "--create-only"])
        .env("MDEV_FRAMEWORK_URL", "https://example.com/mxos.git")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped fetch"));

    assert_eq!(
        tree.read("blinky/mxos.component"),
        "https://example.com/mxos.git#master\n"
    );
    tree.assert_file_exists("blinky/CMakeLists.txt");
    tree.assert_file_exists("blinky/blinky/main.c");
    tree.assert_file_not_exists("blinky/mxos");
}

#[test]
fn test_deploy_sync_status_cycle() {
    let framework = RemoteRepo::new();
    let lib = RemoteRepo::new();
    let tree = ProgramTree::new();
    new_program(&tree, &framework);
    tree.write_reference("app/libs/net.component", &format!("{}#main", lib.url()));

    mdev(&tree.path("app"))
        .arg("deploy")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetched"));
    tree.assert_file_exists("app/mxos/README.md");
    assert_eq!(tree.head_of("app/libs/net"), lib.head());

    mdev(&tree.path("app"))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("(unsync)"));

    mdev(&tree.path("app"))
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pinned"));
    assert_eq!(
        tree.read("app/libs/net.component"),
        format!("{}#{}\n", lib.url(), lib.head())
    );

    mdev(&tree.path("app"))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("All components in sync"));
}

#[test]
fn test_status_json_reports_drift() {
    let framework = RemoteRepo::new();
    let tree = ProgramTree::new();
    new_program(&tree, &framework);
    mdev(&tree.path("app")).arg("deploy").assert().success();
    fs::write(tree.path("app/mxos/README.md"), "edited\n").unwrap();

    let output = mdev(&tree.path("app"))
        .args(["status", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let statuses: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &statuses[0];
    assert_eq!(first["name"], "mxos");
    assert_eq!(first["label"], "main");
    assert_eq!(first["dirty"], true);
    assert_eq!(first["unsync"], true);
    assert_eq!(first["current"], framework.head().as_str());
}

#[test]
fn test_list_json_lists_resolved_components() {
    let framework = RemoteRepo::new();
    let tree = ProgramTree::new();
    new_program(&tree, &framework);
    mdev(&tree.path("app")).arg("deploy").assert().success();
    tree.write_reference("app/pending.component", "https://example.com/pending.git");

    let output = mdev(&tree.path("app"))
        .args(["list", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let components: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(components.as_array().unwrap().len(), 1);
    assert_eq!(components[0]["path"], "mxos");
}

#[test]
fn test_deploy_dirty_requires_force() {
    let framework = RemoteRepo::new();
    let tree = ProgramTree::new();
    new_program(&tree, &framework);
    mdev(&tree.path("app")).arg("deploy").assert().success();
    framework.commit_file("feature.txt", "f", "Add feature");
    fs::write(tree.path("app/mxos/README.md"), "edited\n").unwrap();

    mdev(&tree.path("app"))
        .arg("deploy")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--force"));
    assert_eq!(tree.read("app/mxos/README.md"), "edited\n");

    mdev(&tree.path("app"))
        .args(["deploy", "--force"])
        .assert()
        .success();
    assert_eq!(tree.read("app/mxos/README.md"), "# Test\n");
    assert_eq!(tree.head_of("app/mxos"), framework.head());
}

#[test]
fn test_import_with_checkout() {
    let lib = RemoteRepo::new();
    let program = RemoteRepo::new();
    let first = program.head();
    program.commit_file("lib.component", &format!("{}\n", lib.url()), "Add lib");
    let tree = ProgramTree::new();

    mdev(tree.root())
        .args(["import", &program.url(), "copy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported into"));
    assert_eq!(head_commit(&tree.path("copy")), program.head());
    assert_eq!(tree.head_of("copy/lib"), lib.head());

    mdev(tree.root())
        .args(["import", &program.url(), "old", "--checkout", &first, "--skip-resolve-libs"])
        .assert()
        .success();
    assert_eq!(tree.head_of("old"), first);
    tree.assert_file_not_exists("old/lib");
}

#[test]
fn test_import_checkout_tag() {
    let program = RemoteRepo::new();
    let tagged = program.head();
    program.tag("v1.0");
    program.commit_file("later.txt", "later", "Later");
    let tree = ProgramTree::new();

    mdev(tree.root())
        .args(["import", &program.url(), "app", "-c", "v1.0", "-s"])
        .assert()
        .success();
    assert_eq!(tree.head_of("app"), tagged);
    tree.assert_file_not_exists("app/later.txt");
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let tree = ProgramTree::new();

    mdev(tree.root())
        .args(["-vv", "new", "app", "--create-only"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Creating program"))
        .stdout(predicate::str::contains("INFO").not());
}
