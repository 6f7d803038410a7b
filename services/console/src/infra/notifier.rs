use crate::domain::repository::CodeNotifier;
use crate::error::ConsoleError;

/// Writes the code to the service log instead of sending mail.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCodeNotifier;

impl CodeNotifier for LogCodeNotifier {
    async fn deliver(&self, subject: &str, code: &str) -> Result<(), ConsoleError> {
        tracing::info!(subject, code, "verification code issued");
        Ok(())
    }
}
