use thiserror::Error;
use uuid::Uuid;

use notify_client::NotifyError;
use zaakmelder_common::AbortReason;
use zgw_client::ZgwError;

pub type Result<T> = std::result::Result<T, ProcessError>;

/// Everything that can end an event's processing early.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The rules said not to notify. Logged at warn, resolves to a
    /// "skipped" outcome rather than a failure.
    #[error("notification skipped: {0}")]
    Abort(#[from] AbortReason),

    /// An upstream query failed. Fails the whole event; never retried here.
    #[error(transparent)]
    Request(#[from] ZgwError),

    /// The notification gateway rejected a send.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] NotifyError),

    /// An accessor was invoked without enough context to derive a required
    /// URI, or a URI failed shape validation. A defect signal, not a
    /// transient failure; must not be retried.
    #[error("context error: {0}")]
    Context(String),

    /// An object event carried a type that is neither the configured task
    /// nor message type. Reported explicitly so configuration maintainers
    /// see the offending UUID; never silently folded into NotImplemented.
    #[error("unsupported object type '{uuid}': not a registered task or message type")]
    UnsupportedObjectType { uuid: Uuid },

    /// Terminal default for unclassified events.
    #[error("scenario is not implemented for this event")]
    NotImplemented,
}
