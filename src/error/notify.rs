use thiserror::Error;

/// Errors raised while building or delivering a notification email.
///
/// Delivery failures do not unwind an already-computed reconciliation
/// report; the caller logs them and continues.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to build notification email: {0}")]
    Email(#[from] lettre::error::Error),
    #[error("Failed to deliver notification email: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Invalid email address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
}
