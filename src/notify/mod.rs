//! Notification boundary for reconciliation results.

pub mod email;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::reconcile::ReconciliationReport;

/// Dispatches a reconciliation report to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, report: &ReconciliationReport) -> Result<(), NotifyError>;
}

/// Notifier used when SMTP is not configured; findings still reach the
/// console through the pipeline's own logging.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _report: &ReconciliationReport) -> Result<(), NotifyError> {
        Ok(())
    }
}
