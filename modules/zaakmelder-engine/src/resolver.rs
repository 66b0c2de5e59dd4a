//! Event classification: which business scenario an inbound event belongs to.

use zaakmelder_common::events::{EventAction, EventChannel, EventResource};

use crate::error::ProcessError;
use crate::queries::{uri, QueryContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioKind {
    CaseCreated,
    CaseStatusUpdated,
    CaseClosed,
    DecisionMade,
    TaskAssigned,
    MessageReceived,
    NotImplemented,
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioKind::CaseCreated => write!(f, "case_created"),
            ScenarioKind::CaseStatusUpdated => write!(f, "case_status_updated"),
            ScenarioKind::CaseClosed => write!(f, "case_closed"),
            ScenarioKind::DecisionMade => write!(f, "decision_made"),
            ScenarioKind::TaskAssigned => write!(f, "task_assigned"),
            ScenarioKind::MessageReceived => write!(f, "message_received"),
            ScenarioKind::NotImplemented => write!(f, "not_implemented"),
        }
    }
}

/// Classify an event by its `(action, channel, resource)` triple.
///
/// Never fails for a well-formed event: unmatched triples resolve to
/// `NotImplemented`. Queries issued here stay memoized on the context, so
/// the selected scenario re-uses them without extra upstream calls.
pub async fn determine_scenario(
    ctx: &mut QueryContext<'_>,
) -> Result<ScenarioKind, ProcessError> {
    match ctx.event().discriminator() {
        (EventAction::Create, EventChannel::Zaken, EventResource::Status) => {
            let statuses = ctx.case_statuses().await?;
            if !statuses.was_ever_updated() {
                return Ok(ScenarioKind::CaseCreated);
            }
            let case_type = ctx.last_case_type().await?;
            if case_type.is_final_status {
                Ok(ScenarioKind::CaseClosed)
            } else {
                Ok(ScenarioKind::CaseStatusUpdated)
            }
        }
        (EventAction::Create, EventChannel::Objecten, EventResource::Object) => {
            let object_type = ctx
                .event()
                .attributes
                .object_type
                .clone()
                .ok_or_else(|| {
                    ProcessError::Context("object event without an objectType attribute".into())
                })?;
            let uuid = uri::uuid_tail(&object_type)?;
            let types = &ctx.settings().object_types;
            if uuid == types.task {
                Ok(ScenarioKind::TaskAssigned)
            } else if uuid == types.message {
                Ok(ScenarioKind::MessageReceived)
            } else {
                // Rejected explicitly rather than routed to NotImplemented:
                // whitelist maintainers need to see the offending UUID.
                Err(ProcessError::UnsupportedObjectType { uuid })
            }
        }
        (EventAction::Create, EventChannel::Besluiten, EventResource::Besluit) => {
            Ok(ScenarioKind::DecisionMade)
        }
        _ => Ok(ScenarioKind::NotImplemented),
    }
}
