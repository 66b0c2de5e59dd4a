//! Per-event processing: classify, prepare, fan out, dispatch, report.

use notify_client::DeliveryReceipt;
use zaakmelder_common::events::NotificationEvent;
use zaakmelder_common::AbortReason;

use crate::deps::EngineDeps;
use crate::error::ProcessError;
use crate::queries::QueryContext;
use crate::report::CompletionRecord;
use crate::resolver::{self, ScenarioKind};
use crate::scenarios::{build_notify_data, scenario_for};

/// How one event ended. `Skipped` is a successful outcome: the rules said
/// not to notify.
#[derive(Debug)]
pub enum ProcessingOutcome {
    Sent {
        scenario: ScenarioKind,
        receipts: Vec<DeliveryReceipt>,
    },
    NothingToSend {
        scenario: ScenarioKind,
    },
    Skipped {
        scenario: ScenarioKind,
        reason: AbortReason,
    },
}

/// Process one inbound event end to end. Each call runs on its own state;
/// the only shared data is the read-only dependency container.
pub async fn process_event(
    deps: &EngineDeps,
    event: &NotificationEvent,
) -> Result<ProcessingOutcome, ProcessError> {
    if event.has_orphans() {
        tracing::warn!(
            channel = %event.channel,
            resource = %event.resource,
            "Event carried unrecognized keys"
        );
    }

    let mut ctx = QueryContext::new(deps, event);
    let kind = resolver::determine_scenario(&mut ctx).await?;
    tracing::debug!(scenario = %kind, "Classified event");

    let scenario = scenario_for(kind);
    let data = match scenario.prepare(&mut ctx).await {
        Ok(data) => data,
        Err(ProcessError::Abort(reason)) => {
            tracing::warn!(scenario = %kind, %reason, "Notification skipped");
            return Ok(ProcessingOutcome::Skipped {
                scenario: kind,
                reason,
            });
        }
        Err(err) => return Err(err),
    };

    let notifications = build_notify_data(&data, kind, &deps.settings)?;
    if notifications.is_empty() {
        tracing::info!(scenario = %kind, "No channel available, nothing to send");
        return Ok(ProcessingOutcome::NothingToSend { scenario: kind });
    }

    let mut receipts = Vec::with_capacity(notifications.len());
    for notification in &notifications {
        let receipt = deps.dispatcher.send(notification).await?;
        tracing::info!(
            scenario = %kind,
            method = %receipt.method,
            "Notification dispatched"
        );

        deps.reporter
            .report(&CompletionRecord {
                reference: data.reference.clone(),
                channel: receipt.method,
                recipient: receipt.recipient.clone(),
                messages: vec![format!(
                    "template {} dispatched via {}",
                    notification.template_id, receipt.method
                )],
            })
            .await?;

        receipts.push(receipt);
    }

    Ok(ProcessingOutcome::Sent {
        scenario: kind,
        receipts,
    })
}
