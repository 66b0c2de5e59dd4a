use thiserror::Error;
use uuid::Uuid;

use crate::types::{Confidentiality, IdType};

/// Reasons an event is intentionally skipped. None of these are defects:
/// they are logged and the event resolves to a "skipped" outcome, not a
/// failure. Every variant names the rule that triggered it so operators can
/// diagnose without code access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbortReason {
    #[error("case type '{identification}' is not on whitelist '{whitelist}'")]
    NotWhitelisted {
        identification: String,
        whitelist: String,
    },

    #[error("notifications are not expected for case type '{case_type}'")]
    NotificationNotExpected { case_type: String },

    #[error("object messages are disabled by configuration")]
    MessagesDisabled,

    #[error("task is closed, there is nobody left to notify")]
    TaskClosed,

    #[error("unsupported assignee identification type '{kind}'")]
    UnsupportedAssignee { kind: IdType },

    #[error("information object type '{uuid}' is not registered for announcements")]
    UnsupportedInfoObjectType { uuid: Uuid },

    #[error("information object '{title}' is not definitive")]
    DecisionNotDefinitive { title: String },

    #[error("information object '{title}' is marked '{confidentiality}', announcement suppressed")]
    ConfidentialInfoObject {
        title: String,
        confidentiality: Confidentiality,
    },

    #[error("party has no usable digital address")]
    NoDigitalAddress,
}
