use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed
/// - `Failure` (1): Command completed but something needs attention
///   (a language could not be read, the settings file already exists)
/// - `Error` (2): Command failed (bad settings, rejected credentials, push conflict)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed.
    Success,
    /// Command completed with a degraded result.
    Failure,
    /// Command failed.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
