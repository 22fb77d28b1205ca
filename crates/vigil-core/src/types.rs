use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-file review outcome reported by the model.
///
/// Serialized with the wire spellings the model is instructed to use.
///
/// # Examples
///
/// ```
/// use vigil_core::VerdictStatus;
///
/// let s: VerdictStatus = serde_json::from_str("\"NEEDS_CHANGES\"").unwrap();
/// assert_eq!(s, VerdictStatus::NeedsChanges);
/// assert_eq!(s.status_word(), "needs_changes");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    /// No blocking issues were found.
    Approved,
    /// At least one issue must be addressed.
    NeedsChanges,
}

impl VerdictStatus {
    /// Returns `true` for [`VerdictStatus::Approved`].
    pub fn is_approved(self) -> bool {
        matches!(self, VerdictStatus::Approved)
    }

    /// The lower-cased single word written to the status file.
    ///
    /// # Examples
    ///
    /// ```
    /// use vigil_core::VerdictStatus;
    ///
    /// assert_eq!(VerdictStatus::Approved.status_word(), "approved");
    /// assert_eq!(VerdictStatus::NeedsChanges.status_word(), "needs_changes");
    /// ```
    pub fn status_word(self) -> &'static str {
        match self {
            VerdictStatus::Approved => "approved",
            VerdictStatus::NeedsChanges => "needs_changes",
        }
    }

    /// Marker symbol used in the rendered report.
    pub fn marker(self) -> &'static str {
        match self {
            VerdictStatus::Approved => "\u{2705}",
            VerdictStatus::NeedsChanges => "\u{26a0}\u{fe0f}",
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictStatus::Approved => write!(f, "APPROVED"),
            VerdictStatus::NeedsChanges => write!(f, "NEEDS_CHANGES"),
        }
    }
}

impl FromStr for VerdictStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVED" => Ok(VerdictStatus::Approved),
            "NEEDS_CHANGES" => Ok(VerdictStatus::NeedsChanges),
            other => Err(format!("unknown verdict status: {other}")),
        }
    }
}

/// Issue severity level reported by the model.
///
/// # Examples
///
/// ```
/// use vigil_core::Severity;
///
/// let s: Severity = serde_json::from_str("\"warning\"").unwrap();
/// assert_eq!(s, Severity::Warning);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must fix.
    Error,
    /// Should fix.
    Warning,
    /// Suggestion.
    Info,
}

impl Severity {
    /// Marker symbol used for the issue bullet in the rendered report.
    pub fn marker(self) -> &'static str {
        match self {
            Severity::Error => "\u{1f534}",
            Severity::Warning => "\u{1f7e1}",
            Severity::Info => "\u{1f535}",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// A single issue raised by the model for one file.
///
/// Issue order is the order the model returned them in; it is never
/// re-sorted. `line` is `None` when the model did not tie the issue to a
/// specific line; synthetic issues produced by the fail-closed path use
/// line 0.
///
/// # Examples
///
/// ```
/// use vigil_core::{Issue, Severity};
///
/// let issue = Issue {
///     line: Some(5),
///     severity: Severity::Error,
///     message: "Unexpected token".into(),
/// };
/// assert_eq!(issue.severity, Severity::Error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Line number in the file, if the model provided one.
    pub line: Option<u32>,
    /// Severity of the finding.
    pub severity: Severity,
    /// Explanation of the issue.
    pub message: String,
}

/// The normalized review result for one file.
///
/// Produced either by parsing the model's JSON response or, on any call or
/// parse failure, by [`ReviewVerdict::failure`] — the fail-closed path that
/// makes an unreviewable file read as "needs changes" rather than "approved".
///
/// # Examples
///
/// ```
/// use vigil_core::{ReviewVerdict, Severity, VerdictStatus};
///
/// let v = ReviewVerdict::failure("Analysis error occurred", "model call failed: timeout");
/// assert_eq!(v.status, VerdictStatus::NeedsChanges);
/// assert_eq!(v.issues.len(), 1);
/// assert_eq!(v.issues[0].line, Some(0));
/// assert_eq!(v.issues[0].severity, Severity::Error);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewVerdict {
    /// Approval status for the file.
    pub status: VerdictStatus,
    /// Issues found, in model order.
    pub issues: Vec<Issue>,
    /// Free-text overall assessment.
    pub summary: String,
}

impl ReviewVerdict {
    /// A clean verdict with no issues.
    pub fn approved(summary: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::Approved,
            issues: Vec::new(),
            summary: summary.into(),
        }
    }

    /// The fail-closed verdict: needs changes, one synthetic error-severity
    /// issue at line 0 describing what went wrong.
    pub fn failure(summary: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::NeedsChanges,
            issues: vec![Issue {
                line: Some(0),
                severity: Severity::Error,
                message: message.into(),
            }],
            summary: summary.into(),
        }
    }
}

/// A reviewed file paired with its verdict.
///
/// # Examples
///
/// ```
/// use vigil_core::{FileReview, ReviewVerdict};
/// use std::path::PathBuf;
///
/// let review = FileReview {
///     path: PathBuf::from("src/app.py"),
///     verdict: ReviewVerdict::approved("Looks fine"),
/// };
/// assert!(review.verdict.status.is_approved());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReview {
    /// Path of the reviewed file, as listed in the changed-file list.
    pub path: PathBuf,
    /// The model's verdict for this file.
    pub verdict: ReviewVerdict,
}
