//! End-to-end runs of the `batchget` binary against a fake package manager.
#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Fake `winget`: logs its arguments, prints progress, and populates the
/// install directory. Packages with `Broken` in the id fail.
///
/// Arguments: install --id <id> -l <path> --verbose [flags...]
const FAKE_WINGET: &str = r#"
echo "$@" >> "$BATCHGET_TEST_LOG"
echo "Found $3"
case "$3" in
  *Broken*) echo "Installer failed"; exit 3 ;;
esac
echo "Successfully installed"
touch "$5/app.exe"
"#;

/// Temporary workspace with a config file, an install root and a fake
/// package manager.
struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        std::fs::write(temp_dir.path().join("fake-winget.sh"), FAKE_WINGET)
            .expect("failed to write fake package manager");
        std::fs::create_dir_all(temp_dir.path().join("apps")).expect("failed to create root");
        Self { temp_dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.temp_dir.path().join(rel)
    }

    fn log_path(&self) -> PathBuf {
        self.path("invocations.log")
    }

    /// Write `config.toml` with the given `[[target]]` tables and a probe
    /// reporting `installed` as present.
    fn write_config(&self, installed: &[&str], targets: &str) -> PathBuf {
        let listing: String = installed.iter().map(|id| format!("{id}\\\\n")).collect();
        let config = format!(
            r#"
[manager]
command = ["sh", "{script}"]
probe = ["printf", "Id\\n--\\n{listing}"]

[location]
apps = "{root}/"

{targets}
"#,
            script = self.path("fake-winget.sh").display(),
            root = self.path("apps").display(),
        );
        let path = self.path("config.toml");
        std::fs::write(&path, config).expect("failed to write config");
        path
    }

    fn batchget(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_batchget"));
        cmd.current_dir(self.temp_dir.path())
            .env("BATCHGET_TEST_LOG", self.log_path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    fn invocations(&self) -> Vec<String> {
        std::fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn install_dir(ctx: &TestContext, subpath: &str) -> PathBuf {
    ctx.path("apps").join(Path::new(subpath))
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx
        .batchget()
        .arg("--help")
        .output()
        .expect("failed to run batchget");
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Usage:"));
    assert!(out.contains("--concurrency"));
}

#[test]
fn test_batch_skips_installed_and_tolerates_failures() {
    let ctx = TestContext::new();
    ctx.write_config(
        &["Already.Here"],
        r#"
[[target]]
id = "Already.Here"
link = "apps"

[[target]]
id = "Foo.Bar"
link = "apps"

[[target]]
id = "Vendor.Broken"
link = "apps"
"#,
    );

    let output = ctx
        .batchget()
        .args(["-n", "2"])
        .output()
        .expect("failed to run batchget");

    // per-package failures do not change the exit status
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let invocations = ctx.invocations();
    assert_eq!(invocations.len(), 2, "{invocations:?}");
    assert!(invocations.iter().all(|line| !line.contains("Already.Here")));

    let out = stdout(&output);
    assert!(out.contains("[Bar] Found Foo.Bar"));
    assert!(out.contains("[Bar] Successfully installed"));
    assert!(out.contains("[Broken] Installer failed"));

    let err = stderr(&output);
    assert!(err.contains("skip installed app: Already.Here"));
    assert!(err.contains("[Broken] install failed"));

    // populated directory kept, failed one cleaned up
    assert!(install_dir(&ctx, "foo/bar/app.exe").exists());
    assert!(!install_dir(&ctx, "vendor/broken").exists());
}

#[test]
fn test_flags_passed_through() {
    let ctx = TestContext::new();
    ctx.write_config(
        &[],
        r#"
[[target]]
id = "Foo.Bar"
path = "Custom"
link = "apps"
version = "1.2.3"
no-upgrade = true
ignore-security-hash = true
"#,
    );

    let output = ctx.batchget().output().expect("failed to run batchget");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let invocations = ctx.invocations();
    assert_eq!(invocations.len(), 1);
    let args: Vec<&str> = invocations[0].split_whitespace().collect();
    assert_eq!(&args[..3], ["install", "--id", "Foo.Bar"]);
    assert_eq!(args[4], install_dir(&ctx, "Custom").to_str().unwrap());
    for flag in ["--verbose", "--no-upgrade", "--ignore-security-hash"] {
        assert_eq!(args.iter().filter(|a| **a == flag).count(), 1, "{flag}");
    }
    assert!(invocations[0].contains("--version 1.2.3"));
    assert!(!invocations[0].contains("--uninstall-previous"));
    assert!(install_dir(&ctx, "Custom/app.exe").exists());
}

#[test]
fn test_blocked_root_fails_job_without_spawning() {
    let ctx = TestContext::new();
    // a regular file where the install root should be
    std::fs::write(ctx.path("blocked"), b"").unwrap();
    ctx.write_config(
        &[],
        r#"
[[target]]
id = "Foo.Bar"
link = "apps"

[[target]]
id = "Other.Tool"
link = "blocked"
"#,
    );
    let config = std::fs::read_to_string(ctx.path("config.toml")).unwrap();
    let config = config.replace(
        "[location]\n",
        &format!("[location]\nblocked = \"{}\"\n", ctx.path("blocked").display()),
    );
    std::fs::write(ctx.path("config.toml"), config).unwrap();

    let output = ctx.batchget().output().expect("failed to run batchget");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let invocations = ctx.invocations();
    assert_eq!(invocations.len(), 1);
    assert!(invocations[0].contains("Foo.Bar"));
    assert!(stderr(&output).contains("[Tool] check path error"));
}

#[test]
fn test_dry_run_spawns_nothing() {
    let ctx = TestContext::new();
    ctx.write_config(
        &[],
        r#"
[[target]]
id = "Foo.Bar"
link = "apps"
"#,
    );

    let output = ctx
        .batchget()
        .arg("--dry-run")
        .output()
        .expect("failed to run batchget");
    assert!(output.status.success());
    assert!(ctx.invocations().is_empty());
    assert!(!install_dir(&ctx, "foo").exists());
    let err = stderr(&output);
    assert!(err.contains("(dry run)"));
    assert!(!err.contains("install finished"));
}

#[test]
fn test_missing_config_is_fatal() {
    let ctx = TestContext::new();
    let output = ctx
        .batchget()
        .args(["-c", "nope.toml"])
        .output()
        .expect("failed to run batchget");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("load the configuration file failed"));
}

#[test]
fn test_failing_probe_is_fatal() {
    let ctx = TestContext::new();
    std::fs::write(
        ctx.path("config.toml"),
        "[manager]\nprobe = [\"false\"]\n\n[[target]]\nid = \"Foo.Bar\"\nlink = \"apps\"\n",
    )
    .unwrap();

    let output = ctx.batchget().output().expect("failed to run batchget");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to query installed packages"));
    assert!(ctx.invocations().is_empty());
}
