use std::path::PathBuf;
use std::process::Command;

use vigil_core::{Severity, VerdictStatus};
use vigil_review::pipeline::verdict_from_response;
use vigil_review::report::ReviewReport;
use vigil_review::{collect, status};

#[test]
fn overall_status_is_monotonic_or() {
    // A single NEEDS_CHANGES verdict forces the run to NEEDS_CHANGES.
    let approved = verdict_from_response(Ok(
        r#"{"status":"APPROVED","issues":[],"summary":"Looks fine"}"#.into(),
    ));
    let rejected = verdict_from_response(Ok(
        r#"{"status":"NEEDS_CHANGES","issues":[],"summary":"nope"}"#.into(),
    ));

    let all_clean = ReviewReport::new(vec![
        vigil_core::FileReview {
            path: PathBuf::from("a.py"),
            verdict: approved.clone(),
        },
        vigil_core::FileReview {
            path: PathBuf::from("b.rs"),
            verdict: approved.clone(),
        },
    ]);
    assert_eq!(all_clean.overall(), VerdictStatus::Approved);

    let one_bad = ReviewReport::new(vec![
        vigil_core::FileReview {
            path: PathBuf::from("a.py"),
            verdict: approved,
        },
        vigil_core::FileReview {
            path: PathBuf::from("bad.js"),
            verdict: rejected,
        },
    ]);
    assert_eq!(one_bad.overall(), VerdictStatus::NeedsChanges);
}

#[test]
fn approved_run_end_to_end_without_network() {
    // Scenario: changed list has app.py (reviewable) and readme.md (skipped);
    // the model approves app.py; the run is APPROVED and the status file
    // says "approved".
    let dir = tempfile::tempdir().unwrap();
    let app = dir.path().join("app.py");
    std::fs::write(&app, "print('hello')\n").unwrap();
    let readme = dir.path().join("readme.md");
    std::fs::write(&readme, "# docs\n").unwrap();

    let list_path = dir.path().join("changed_files.txt");
    std::fs::write(
        &list_path,
        format!("{}\n{}\n", app.display(), readme.display()),
    )
    .unwrap();

    let changed = collect::read_changed_list(&list_path).unwrap();
    assert_eq!(changed.len(), 2);
    let eligible = collect::filter_eligible(&changed);
    assert_eq!(eligible, vec![app]);

    let verdict = verdict_from_response(Ok(
        r#"{"status":"APPROVED","issues":[],"summary":"Looks fine"}"#.into(),
    ));
    let report = ReviewReport::new(vec![vigil_core::FileReview {
        path: eligible[0].clone(),
        verdict,
    }]);
    assert_eq!(report.overall(), VerdictStatus::Approved);

    let status_path = dir.path().join("approval_status.txt");
    status::write_status(&status_path, report.overall()).unwrap();
    assert_eq!(std::fs::read_to_string(&status_path).unwrap(), "approved");
}

#[test]
fn transport_failure_gates_the_run() {
    // Scenario: the model call for x.go dies in transit; the file's verdict
    // is fail-closed and the run is NEEDS_CHANGES.
    let verdict = verdict_from_response(Err(vigil_core::GateError::Llm(
        "request failed: connection reset".into(),
    )));
    assert_eq!(verdict.status, VerdictStatus::NeedsChanges);
    assert_eq!(verdict.issues.len(), 1);
    assert_eq!(verdict.issues[0].line, Some(0));
    assert_eq!(verdict.issues[0].severity, Severity::Error);
    assert!(verdict.issues[0].message.contains("connection reset"));

    let report = ReviewReport::new(vec![vigil_core::FileReview {
        path: PathBuf::from("x.go"),
        verdict,
    }]);
    assert_eq!(report.overall(), VerdictStatus::NeedsChanges);

    let dir = tempfile::tempdir().unwrap();
    let status_path = dir.path().join("approval_status.txt");
    status::write_status(&status_path, report.overall()).unwrap();
    assert_eq!(
        std::fs::read_to_string(&status_path).unwrap(),
        "needs_changes"
    );
}

#[test]
fn check_without_configuration_exits_one_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("changed_files.txt"), "app.py\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_vigil"))
        .arg("check")
        .current_dir(dir.path())
        .env_clear()
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    // No status file: the run aborted before any file or network work.
    assert!(!dir.path().join("approval_status.txt").exists());
}
