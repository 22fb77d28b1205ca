use vigil_core::{FileReview, VerdictStatus};

/// Aggregated result of a gate run.
///
/// Holds the per-file verdicts in input order and derives the single
/// overall status for the run.
///
/// # Examples
///
/// ```
/// use vigil_core::{FileReview, ReviewVerdict, VerdictStatus};
/// use vigil_review::report::ReviewReport;
/// use std::path::PathBuf;
///
/// let report = ReviewReport::new(vec![FileReview {
///     path: PathBuf::from("app.py"),
///     verdict: ReviewVerdict::approved("Looks fine"),
/// }]);
/// assert_eq!(report.overall(), VerdictStatus::Approved);
/// ```
#[derive(Debug, Clone)]
pub struct ReviewReport {
    /// Reviewed files in the order they were analyzed.
    pub files: Vec<FileReview>,
}

impl ReviewReport {
    /// Wrap a sequence of per-file reviews.
    pub fn new(files: Vec<FileReview>) -> Self {
        Self { files }
    }

    /// Whether no files survived collection and filtering.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The single overall status: Approved iff every verdict is Approved.
    ///
    /// An empty report is unconditionally Approved — "nothing to review" is
    /// a valid passing state, not a degenerate aggregation.
    pub fn overall(&self) -> VerdictStatus {
        if self
            .files
            .iter()
            .any(|f| f.verdict.status == VerdictStatus::NeedsChanges)
        {
            VerdictStatus::NeedsChanges
        } else {
            VerdictStatus::Approved
        }
    }

    /// Render the Markdown comment body posted to the pull request.
    pub fn to_markdown(&self) -> String {
        if self.is_empty() {
            return "## \u{1f916} AI Code Review\n\n\
                    \u{2705} No code files to review in this PR."
                .to_string();
        }

        let mut out = String::new();
        out.push_str("## \u{1f916} AI Code Review Results\n\n");
        out.push_str(&format!("**Analyzed {} file(s)**\n\n", self.files.len()));
        out.push_str("---\n\n");

        for review in &self.files {
            let verdict = &review.verdict;
            out.push_str(&format!(
                "### {} `{}`\n\n",
                verdict.status.marker(),
                review.path.display()
            ));
            out.push_str(&format!("**Status:** {}\n\n", verdict.status));
            out.push_str(&format!("**Summary:** {}\n\n", verdict.summary));

            if verdict.issues.is_empty() {
                out.push_str("No issues found! \u{2728}\n\n");
            } else {
                out.push_str("**Issues Found:**\n\n");
                for issue in &verdict.issues {
                    let line = issue
                        .line
                        .map(|l| l.to_string())
                        .unwrap_or_else(|| "N/A".into());
                    out.push_str(&format!(
                        "- {} **Line {line}:** {}\n",
                        issue.severity.marker(),
                        issue.message
                    ));
                }
                out.push('\n');
            }
            out.push_str("---\n\n");
        }

        match self.overall() {
            VerdictStatus::Approved => {
                out.push_str("## \u{2705} Overall: APPROVED\n\n");
                out.push_str("All syntax checks passed! This PR is ready for merge.\n");
            }
            VerdictStatus::NeedsChanges => {
                out.push_str("## \u{26a0}\u{fe0f} Overall: NEEDS CHANGES\n\n");
                out.push_str("Please address the issues found above before merging.\n");
            }
        }

        out.push_str("\n---\n");
        out.push_str("*Automated review by Vigil*");
        out
    }
}
