//! Batch commands driven through `dispatch_with_context` with in-process
//! port doubles, so no external tools or git repository are needed.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use bugharvest::cli::Command;
use bugharvest::commands::dispatch_with_context;
use bugharvest::config::ToolConfig;
use bugharvest::context::ServiceContext;
use bugharvest::pipeline::remove_tree;
use bugharvest::ports::{Clock, GitRepo, Invocation, ShellExecutor, ShellOutput};

type PortResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Checkout double: writes `src.py` holding the version tag, and fails for
/// any bug id listed in `broken`.
struct FakeTools {
    broken: Vec<&'static str>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeTools {
    fn new(broken: Vec<&'static str>) -> Self {
        Self { broken, calls: Mutex::new(Vec::new()) }
    }
}

fn flag<'a>(inv: &'a Invocation, name: &str) -> &'a str {
    let idx = inv.args.iter().position(|a| a == name).unwrap();
    &inv.args[idx + 1]
}

impl ShellExecutor for FakeTools {
    fn run(&self, invocation: &Invocation) -> PortResult<ShellOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        let bug = flag(invocation, "-i");
        if self.broken.iter().any(|b| *b == bug) {
            return Ok(ShellOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: "checkout exploded".into(),
                timed_out: false,
            });
        }
        let stdout = if invocation.program == "checkout" {
            let tree = PathBuf::from(flag(invocation, "-w")).join(flag(invocation, "-p"));
            std::fs::create_dir_all(&tree)?;
            std::fs::write(tree.join("src.py"), format!("v{}\n", flag(invocation, "-v")))?;
            std::fs::write(tree.join("bugsinpy_patchfile.info"), "src.py")?;
            String::new()
        } else {
            format!("about bug {bug}\n")
        };
        Ok(ShellOutput { exit_code: 0, stdout, stderr: String::new(), timed_out: false })
    }
}

/// Git double whose checkout rewrites `src.py` with the commit id.
struct FakeGit;

impl GitRepo for FakeGit {
    fn reset_hard(&self, _repo: &Path) -> PortResult<()> {
        Ok(())
    }

    fn checkout(&self, repo: &Path, commit: &str) -> PortResult<()> {
        std::fs::write(repo.join("src.py"), format!("at {commit}\n"))?;
        Ok(())
    }

    fn clean(&self, _repo: &Path) -> PortResult<()> {
        Ok(())
    }
}

struct StillClock;

impl Clock for StillClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }
}

fn context(broken: Vec<&'static str>) -> ServiceContext {
    ServiceContext::new(Box::new(FakeTools::new(broken)), Box::new(FakeGit), Box::new(StillClock))
}

fn tools(root: &Path) -> ToolConfig {
    ToolConfig {
        checkout_bin: "checkout".into(),
        info_bin: "info".into(),
        scratch_dir: root.join("scratch"),
        timeout: None,
    }
}

fn add_bug(root: &Path, project: &str, bug: &str) -> PathBuf {
    let dir = root.join("projects").join(project).join("bugs").join(bug);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("bug.info"),
        "buggy_commit_id=\"b0\"\nfixed_commit_id=\"f1\"\ntest_file=\"src.py\"\n",
    )
    .unwrap();
    std::fs::write(dir.join("bug_patch.txt"), "diff --git a/src.py b/src.py\n").unwrap();
    dir
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn collect_isolates_failing_bugs() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    add_bug(root, "black", "1");
    add_bug(root, "black", "2");
    let report = root.join("report.json");

    dispatch_with_context(
        &Command::Collect {
            projects_dir: root.join("projects"),
            output_dir: root.join("complete_projects"),
            report: Some(report.clone()),
        },
        &context(vec!["2"]),
        &tools(root),
    )
    .unwrap();

    let good = root.join("complete_projects/black/1");
    assert_eq!(std::fs::read_to_string(good.join("buggy/src.py")).unwrap(), "v0\n");
    assert_eq!(std::fs::read_to_string(good.join("fixed/src.py")).unwrap(), "v1\n");
    assert_eq!(std::fs::read_to_string(good.join("bug_description.txt")).unwrap(), "about bug 1\n");
    assert!(!root.join("scratch").exists());

    let json = read_json(&report);
    assert_eq!(json["started_at"], "2025-06-01T00:00:00Z");
    let statuses: Vec<(String, String)> = json["outcomes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| (o["bug_id"].as_str().unwrap().into(), o["status"].as_str().unwrap().into()))
        .collect();
    assert!(statuses.contains(&("1".into(), "ok".into())));
    assert!(statuses.contains(&("2".into(), "failed".into())));
}

#[test]
fn minimal_keeps_full_tree_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    add_bug(root, "black", "1");

    dispatch_with_context(
        &Command::Minimal {
            projects_dir: root.join("projects"),
            work_dir: root.join("work"),
            output_dir: root.join("minimal"),
            keep_full: true,
            report: None,
        },
        &context(vec![]),
        &tools(root),
    )
    .unwrap();

    assert!(root.join("work/black/1/fixed/src.py").is_file());
    assert_eq!(
        std::fs::read_to_string(root.join("minimal/black/1/fixed/src.py")).unwrap(),
        "v1\n"
    );
    assert!(root.join("minimal/black/1/fixed/bugsinpy_patchfile.info").is_file());
}

#[test]
fn minimal_discards_full_tree_even_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    add_bug(root, "black", "3");

    dispatch_with_context(
        &Command::Minimal {
            projects_dir: root.join("projects"),
            work_dir: root.join("work"),
            output_dir: root.join("minimal"),
            keep_full: false,
            report: None,
        },
        &context(vec!["3"]),
        &tools(root),
    )
    .unwrap();

    assert!(!root.join("work/black/3").exists());
    assert!(!root.join("minimal/black/3").exists());
}

#[test]
fn git_extract_honours_project_filter() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    add_bug(root, "fastapi", "1");
    add_bug(root, "black", "1");

    dispatch_with_context(
        &Command::GitExtract {
            projects_dir: root.join("projects"),
            output_dir: root.join("base"),
            projects: vec!["fastapi".into()],
            report: None,
        },
        &context(vec![]),
        &tools(root),
    )
    .unwrap();

    let out = root.join("base/fastapi/1");
    assert_eq!(std::fs::read_to_string(out.join("buggy/src.py")).unwrap(), "at b0\n");
    assert_eq!(std::fs::read_to_string(out.join("fixed/src.py")).unwrap(), "at f1\n");
    assert_eq!(
        std::fs::read_to_string(out.join("run_test.sh")).unwrap(),
        "#!/bin/bash\npython -m pytest src.py\n"
    );
    assert!(!root.join("base/black").exists());
}

#[test]
fn cleanup_of_missing_tree_only_warns() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!remove_tree(&dir.path().join("never-created")).unwrap());
}
