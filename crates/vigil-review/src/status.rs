use std::path::Path;

use vigil_core::{GateError, VerdictStatus};

/// Write the single-word overall status for downstream pipeline steps.
///
/// Runs unconditionally at the end of a gate run, whether or not the PR
/// comment could be posted. Downstream automation trusts this file over the
/// comment, so a write failure is a real error, not a loggable one.
///
/// # Errors
///
/// Returns [`GateError::Io`] if the file cannot be written.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use vigil_core::VerdictStatus;
/// use vigil_review::status::write_status;
///
/// write_status(Path::new("approval_status.txt"), VerdictStatus::Approved).unwrap();
/// ```
pub fn write_status(path: &Path, status: VerdictStatus) -> Result<(), GateError> {
    std::fs::write(path, status.status_word())?;
    Ok(())
}
